/// Quote escaping for the body segment embedded inside a rendered call.

use serde::{Deserialize, Serialize};

/// A two-character escape: `marker` placed before every `delimiter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escaping {
    pub marker: char,
    pub delimiter: char,
}

impl Default for Escaping {
    fn default() -> Self {
        Self::new('\\', '"')
    }
}

impl Escaping {
    pub const fn new(marker: char, delimiter: char) -> Self {
        Self { marker, delimiter }
    }

    /// Prefix every delimiter in `text` with the marker.
    pub fn escape(&self, text: &str) -> String {
        let extra = text.matches(self.delimiter).count() * self.marker.len_utf8();
        let mut out = String::with_capacity(text.len() + extra);
        for ch in text.chars() {
            if ch == self.delimiter {
                out.push(self.marker);
            }
            out.push(ch);
        }
        out
    }

    /// Collapse every marker+delimiter pair back to the delimiter.
    ///
    /// Pairs are matched left to right without overlap, which makes this the
    /// exact inverse of [`Escaping::escape`] even when the original text
    /// already held markers, or when marker and delimiter are the same
    /// character (doubling style).
    pub fn unescape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == self.marker && chars.peek() == Some(&self.delimiter) {
                chars.next();
                out.push(self.delimiter);
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Number of escape sequences in an escaped text, found by the same
    /// left-to-right scan `unescape` uses.
    pub fn count_sequences(&self, escaped: &str) -> usize {
        let mut count = 0;
        let mut chars = escaped.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == self.marker && chars.peek() == Some(&self.delimiter) {
                chars.next();
                count += 1;
            }
        }
        count
    }
}
