/// The replicator: emits prologue, the rendered call, epilogue and body,
/// in that order.
///
/// The rendered call re-invokes `reproduce` with the same three segments,
/// so an emission built from matching seeds is a fixed point of
/// "run the emitted text again".

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::escape::Escaping;
use crate::core::template::CallTemplate;
use crate::schema::segment::Seeds;
use crate::seed::CALL_TEMPLATE;

#[derive(Debug, Error)]
pub enum ReplicatorError {
    #[error("output write failed: {0}")]
    OutputWrite(#[from] io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Data description of a replicator, loadable from RON.
///
/// ```ron
/// (
///     template: "CALL(%s,%s,%s)",
///     escaping: (marker: '\\', delimiter: '"'),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicatorConfig {
    pub template: CallTemplate,
    #[serde(default)]
    pub escaping: Escaping,
}

/// Composes three seed segments into one emission.
///
/// Holds only the call template and escaping rule; every call depends on
/// its own arguments alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replicator {
    template: CallTemplate,
    escaping: Escaping,
}

impl Default for Replicator {
    fn default() -> Self {
        Self::new(CALL_TEMPLATE, Escaping::default())
    }
}

impl From<ReplicatorConfig> for Replicator {
    fn from(config: ReplicatorConfig) -> Self {
        Self::new(config.template, config.escaping)
    }
}

impl Replicator {
    pub fn new(template: CallTemplate, escaping: Escaping) -> Self {
        Self { template, escaping }
    }

    pub fn from_ron(source: &str) -> Result<Self, ReplicatorError> {
        let config: ReplicatorConfig = ron::from_str(source)?;
        Ok(config.into())
    }

    pub fn template(&self) -> &CallTemplate {
        &self.template
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }

    /// Render the invocation line: prologue, epilogue and escaped body
    /// substituted into the template. Prologue and epilogue go in unescaped.
    pub fn render_call(&self, seeds: &Seeds<'_>) -> String {
        let escaped = self.escaping.escape(seeds.body);
        self.template.render(seeds.prologue, seeds.epilogue, &escaped)
    }

    /// The four emitted pieces, in emission order.
    fn pieces<'s>(&self, seeds: &Seeds<'s>) -> [Cow<'s, str>; 4] {
        [
            Cow::Borrowed(seeds.prologue),
            Cow::Owned(self.render_call(seeds)),
            Cow::Borrowed(seeds.epilogue),
            Cow::Borrowed(seeds.body),
        ]
    }

    /// Write the emission to `out`.
    ///
    /// Each piece goes straight to `out`; the first failed write aborts the
    /// rest and partial output is left as is.
    pub fn reproduce<W: Write>(
        &self,
        out: &mut W,
        seeds: &Seeds<'_>,
    ) -> Result<(), ReplicatorError> {
        let pieces = self.pieces(seeds);
        debug!(
            bytes = pieces.iter().map(|p| p.len()).sum::<usize>(),
            "emitting replica"
        );
        for (index, piece) in pieces.iter().enumerate() {
            trace!(index, len = piece.len(), "writing piece");
            out.write_all(piece.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }

    /// The emission as a string, identical to what `reproduce` writes.
    pub fn emit(&self, seeds: &Seeds<'_>) -> String {
        self.pieces(seeds).concat()
    }
}

/// Emit `prologue`, the rendered call, `epilogue` and `body` to standard
/// output using the default Rust call template.
pub fn reproduce(prologue: &str, epilogue: &str, body: &str) -> Result<(), ReplicatorError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    Replicator::default().reproduce(&mut out, &Seeds::new(prologue, epilogue, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_replicator() -> Replicator {
        Replicator::new(
            CallTemplate::parse("CALL(%s,%s,%s)").unwrap(),
            Escaping::default(),
        )
    }

    /// A writer that accepts `budget` writes, then fails.
    struct FailingWriter {
        budget: usize,
        written: Vec<u8>,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.budget -= 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn concrete_scenario() {
        let r = call_replicator();
        let seeds = Seeds::new("X", "Y", "Z\"Q");
        assert_eq!(r.render_call(&seeds), r#"CALL(X,Y,Z\"Q)"#);
        assert_eq!(r.emit(&seeds), r#"XCALL(X,Y,Z\"Q)YZ"Q"#);
    }

    #[test]
    fn reproduce_matches_emit() {
        let r = call_replicator();
        let seeds = Seeds::new("head\n", "tail\n", "say \"hi\"\n");
        let mut out = Vec::new();
        r.reproduce(&mut out, &seeds).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r.emit(&seeds));
    }

    #[test]
    fn write_failure_stops_emission() {
        let r = call_replicator();
        let seeds = Seeds::new("A", "B", "R");
        let mut out = FailingWriter {
            budget: 2,
            written: Vec::new(),
        };
        let err = r.reproduce(&mut out, &seeds).unwrap_err();
        assert!(matches!(err, ReplicatorError::OutputWrite(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(out.written, b"ACALL(A,B,R)");
    }

    #[test]
    fn prologue_and_epilogue_go_in_unescaped() {
        let r = call_replicator();
        let seeds = Seeds::new("a\"", "b\"", "c\"");
        assert_eq!(r.render_call(&seeds), "CALL(a\",b\",c\\\")");
    }

    #[test]
    fn default_uses_rust_call_template() {
        let r = Replicator::default();
        assert_eq!(r.template(), &CALL_TEMPLATE);
        assert_eq!(r.escaping(), Escaping::default());
    }

    #[test]
    fn from_ron_config() {
        let r = Replicator::from_ron(
            r#"(template: "go(%s, %s, %s)\n", escaping: (marker: '\\', delimiter: '`'))"#,
        )
        .unwrap();
        let seeds = Seeds::new("", "", "a`b");
        assert_eq!(r.render_call(&seeds), "go(, , a\\`b)\n");

        let r = Replicator::from_ron(r#"(template: "CALL(%s,%s,%s)")"#).unwrap();
        assert_eq!(r, call_replicator());
    }

    #[test]
    fn from_ron_rejects_bad_template() {
        let err = Replicator::from_ron(r#"(template: "CALL(%s)")"#).unwrap_err();
        assert!(matches!(err, ReplicatorError::Ron(_)));
    }
}
