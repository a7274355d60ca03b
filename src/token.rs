use crate::position::Range;

/// A single word of a command, preserving the literal source text.
///
/// The text is one syntactic unit exactly as written, delimiters
/// included; no substitution or unescaping is performed at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub range: Range,
}
