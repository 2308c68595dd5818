/// Designated seeds: the segments whose emission is a standalone Rust
/// program that prints itself.
///
/// The emitted program passes the prologue and epilogue as raw strings and
/// the body as a normal string with every `"` escaped. The body never
/// contains a backslash (it builds the marker with `char::from(92u8)`), so
/// quote-only escaping is exact under Rust string-literal rules.

use crate::core::template::CallTemplate;
use crate::schema::segment::Seeds;

/// Everything before the self-referential call.
pub const PROLOGUE: &str = r##"//! ipse: a program that prints its own source text.

fn main() {
"##;

/// Everything after the self-referential call.
pub const EPILOGUE: &str = r##"}
"##;

/// The replicator's own source, rendered twice by itself.
pub const BODY: &str = r##"
fn reproduce(a: &str, b: &str, r: &str) {
    let quote = '"';
    let marker = char::from(92u8);
    let escaped = r.replace(quote, &format!("{marker}{quote}"));
    print!("{a}");
    println!("    reproduce(r#{quote}{a}{quote}#, r#{quote}{b}{quote}#, {quote}{escaped}{quote});");
    print!("{b}");
    print!("{r}");
}
"##;

/// `    reproduce(r#"%s"#, r#"%s"#, "%s");` followed by a line break.
pub const CALL_TEMPLATE: CallTemplate = CallTemplate::from_pieces([
    "    reproduce(r#\"",
    "\"#, r#\"",
    "\"#, \"",
    "\");\n",
]);

pub const fn seeds() -> Seeds<'static> {
    Seeds::new(PROLOGUE, EPILOGUE, BODY)
}
