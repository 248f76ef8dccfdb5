use crate::error::Span;

/// The three lexical categories the TIS-100 assembly grammar produces (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Letters only, uppercased on emit: a mnemonic or operand name.
    Name,
    /// Letters followed by `:` (the colon itself is not part of the datum),
    /// uppercased on emit: a label definition.
    Label,
    /// An optional leading `-` followed by digits.
    Number,
}

/// A single lexical token: its kind, its raw text (already case-normalized
/// for `Name`/`Label`), and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: String,
    pub span: Span,
}
