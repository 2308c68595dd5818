/// Call template — the fixed pattern that renders a `reproduce` invocation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Insertion point marker inside a template pattern.
pub const INSERTION_POINT: &str = "%s";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("call template needs exactly 3 insertion points, found {found}")]
    InsertionPoints { found: usize },
}

/// A pattern with three ordered insertion points: prologue, epilogue,
/// escaped body.
///
/// Stored as the four literal pieces around the insertion points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallTemplate {
    pieces: [Cow<'static, str>; 4],
}

impl CallTemplate {
    /// Build a template from its literal pieces, for compiled-in constants.
    pub const fn from_pieces(pieces: [&'static str; 4]) -> Self {
        let [p0, p1, p2, p3] = pieces;
        Self {
            pieces: [
                Cow::Borrowed(p0),
                Cow::Borrowed(p1),
                Cow::Borrowed(p2),
                Cow::Borrowed(p3),
            ],
        }
    }

    /// Parse a pattern such as `CALL(%s,%s,%s)`.
    pub fn parse(pattern: &str) -> Result<CallTemplate, TemplateError> {
        let parts: Vec<&str> = pattern.split(INSERTION_POINT).collect();
        let [p0, p1, p2, p3] = parts.as_slice() else {
            return Err(TemplateError::InsertionPoints {
                found: parts.len() - 1,
            });
        };
        Ok(CallTemplate {
            pieces: [
                Cow::Owned(p0.to_string()),
                Cow::Owned(p1.to_string()),
                Cow::Owned(p2.to_string()),
                Cow::Owned(p3.to_string()),
            ],
        })
    }

    /// The literal text around the insertion points, in order.
    pub fn pieces(&self) -> [&str; 4] {
        let [p0, p1, p2, p3] = &self.pieces;
        [&**p0, &**p1, &**p2, &**p3]
    }

    pub fn pattern(&self) -> String {
        self.pieces().join(INSERTION_POINT)
    }

    /// Substitute the three arguments in order. Substituted text is not
    /// rescanned, so arguments may themselves contain `%s`.
    pub fn render(&self, prologue: &str, epilogue: &str, escaped_body: &str) -> String {
        let [p0, p1, p2, p3] = self.pieces();
        let len = p0.len()
            + prologue.len()
            + p1.len()
            + epilogue.len()
            + p2.len()
            + escaped_body.len()
            + p3.len();
        let mut line = String::with_capacity(len);
        line.push_str(p0);
        line.push_str(prologue);
        line.push_str(p1);
        line.push_str(epilogue);
        line.push_str(p2);
        line.push_str(escaped_body);
        line.push_str(p3);
        line
    }
}

impl fmt::Display for CallTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

impl TryFrom<String> for CallTemplate {
    type Error = TemplateError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        CallTemplate::parse(&pattern)
    }
}

impl From<CallTemplate> for String {
    fn from(template: CallTemplate) -> String {
        template.pattern()
    }
}
