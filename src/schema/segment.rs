/// The three immutable text segments a replicator composes.
///
/// `prologue` is everything before the self-referential call, `epilogue`
/// everything after it, and `body` the text that is emitted twice: once
/// escaped as the call's third argument, once raw as trailing program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seeds<'a> {
    pub prologue: &'a str,
    pub epilogue: &'a str,
    pub body: &'a str,
}

impl<'a> Seeds<'a> {
    pub const fn new(prologue: &'a str, epilogue: &'a str, body: &'a str) -> Self {
        Self {
            prologue,
            epilogue,
            body,
        }
    }
}
