/// Interpret-then-run: recover the `reproduce` arguments from an emitted
/// text and replay them.
///
/// An emission has the shape `A + render(A, B, escape(R)) + B + R`. Running
/// it as a program means running its one call, and the call's behavior is
/// fixed by its three literal arguments. Locating those arguments and
/// emitting again is therefore the "execute the output" step of the fixed
/// point check.

use thiserror::Error;
use tracing::debug;

use crate::core::replicator::Replicator;
use crate::schema::segment::Seeds;

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("no call matching template {template:?} frames the text")]
    NotFound { template: String },
}

#[derive(Debug, Error)]
pub enum FixedPointError {
    #[error("emission does not replay: {0}")]
    Invocation(#[from] InvocationError),
    #[error("emitted call carries different arguments than the seeds")]
    ArgumentsDiffer,
    #[error("replayed emission diverges at byte {offset}")]
    Diverged { offset: usize },
}

/// The three literal arguments of a call found in an emitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub prologue: String,
    pub epilogue: String,
    pub body: String,
}

impl Invocation {
    pub fn seeds(&self) -> Seeds<'_> {
        Seeds::new(&self.prologue, &self.epilogue, &self.body)
    }

    /// Find the call whose arguments reproduce `text`.
    ///
    /// A candidate is accepted only when the text before the call is its
    /// first argument, the text after the call is its second argument
    /// followed by the un-escaped third, and the third is the canonical
    /// escaping of the body. The first candidate in text order wins.
    pub fn locate(replicator: &Replicator, text: &str) -> Result<Invocation, InvocationError> {
        let [open, first_sep, second_sep, close] = replicator.template().pieces();
        let escaping = replicator.escaping();

        for (start, _) in text.match_indices(open) {
            let prologue = &text[..start];
            let Some(rest) = text[start + open.len()..]
                .strip_prefix(prologue)
                .and_then(|rest| rest.strip_prefix(first_sep))
            else {
                continue;
            };

            for (epilogue_end, _) in rest.match_indices(second_sep) {
                let epilogue = &rest[..epilogue_end];
                let tail = &rest[epilogue_end + second_sep.len()..];

                for (escaped_end, _) in tail.match_indices(close) {
                    let escaped = &tail[..escaped_end];
                    let body = escaping.unescape(escaped);
                    if escaping.escape(&body) != escaped {
                        continue;
                    }
                    let trailer = &tail[escaped_end + close.len()..];
                    if trailer.strip_prefix(epilogue) == Some(body.as_str()) {
                        debug!(
                            prologue = prologue.len(),
                            epilogue = epilogue.len(),
                            body = body.len(),
                            "located invocation"
                        );
                        return Ok(Invocation {
                            prologue: prologue.to_string(),
                            epilogue: epilogue.to_string(),
                            body,
                        });
                    }
                }
            }
        }

        Err(InvocationError::NotFound {
            template: replicator.template().pattern(),
        })
    }
}

/// Emit `seeds`, replay the emitted call, and require both emissions to be
/// byte-identical. Returns the emission.
pub fn check_fixed_point(
    replicator: &Replicator,
    seeds: &Seeds<'_>,
) -> Result<String, FixedPointError> {
    let first = replicator.emit(seeds);
    let invocation = Invocation::locate(replicator, &first)?;
    if invocation.seeds() != *seeds {
        return Err(FixedPointError::ArgumentsDiffer);
    }

    let second = replicator.emit(&invocation.seeds());
    if let Some(offset) = first_difference(&first, &second) {
        return Err(FixedPointError::Diverged { offset });
    }
    Ok(first)
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::escape::Escaping;
    use crate::core::template::CallTemplate;

    fn call_replicator() -> Replicator {
        Replicator::new(
            CallTemplate::parse("CALL(%s,%s,%s)").unwrap(),
            Escaping::default(),
        )
    }

    #[test]
    fn locate_concrete_scenario() {
        let r = call_replicator();
        let inv = Invocation::locate(&r, r#"XCALL(X,Y,Z\"Q)YZ"Q"#).unwrap();
        assert_eq!(inv.seeds(), Seeds::new("X", "Y", "Z\"Q"));
    }

    #[test]
    fn locate_skips_decoy_calls() {
        let r = call_replicator();
        // The prologue itself mentions the call opener.
        let seeds = Seeds::new("CALL(", ",)", "x,y)");
        let text = r.emit(&seeds);
        assert_eq!(Invocation::locate(&r, &text).unwrap().seeds(), seeds);
    }

    #[test]
    fn locate_rejects_unrelated_text() {
        let r = call_replicator();
        let err = Invocation::locate(&r, "CALL(a,b,c)").unwrap_err();
        assert!(matches!(err, InvocationError::NotFound { .. }));
    }

    #[test]
    fn locate_rejects_non_canonical_escaping() {
        let r = call_replicator();
        // An unescaped quote in the third argument cannot come from `escape`.
        assert!(Invocation::locate(&r, "CALL(,,\")\"").is_err());
    }

    #[test]
    fn fixed_point_holds_for_any_emission_shape() {
        let r = call_replicator();
        let out = check_fixed_point(&r, &Seeds::new("A\n", "B\n", "R \"q\"\n")).unwrap();
        assert!(out.starts_with("A\nCALL(A\n,B\n,R \\\"q\\\"\n)B\n"));
    }

    #[test]
    fn first_difference_reports_offset() {
        assert_eq!(first_difference("abc", "abc"), None);
        assert_eq!(first_difference("abc", "abd"), Some(2));
        assert_eq!(first_difference("ab", "abc"), Some(2));
    }
}
