//! Error types shared across the assembler and machine-construction stages.
//!
//! Runtime errors (an execution node hitting an unresolved label) have no
//! synchronous caller to hand a `Result` to — those are logged via the
//! `log` crate at the point of failure instead of flowing through here.

use thiserror::Error;

/// A location in source text, used to anchor lex/parse diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Span { line, col }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, character {}", self.line, self.col)
    }
}

/// Errors raised while scanning/lexing a single node's source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedCharacter { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => *span,
        }
    }
}

/// Errors raised while parsing a token stream into an instruction list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid instruction '{mnemonic}' at {span}")]
    InvalidInstruction { mnemonic: String, span: Span },

    #[error("duplicate label '{label}' at {span}")]
    DuplicateLabel { label: String, span: Span },

    #[error("invalid token '{token}' at {span}")]
    InvalidToken { token: String, span: Span },

    #[error("unexpected number where an instruction was expected at {span}")]
    UnexpectedNumber { span: Span },

    #[error("{value} falls outside the range of an acceptable TIS-100 number at {span}")]
    NumberOutOfRange { value: String, span: Span },

    #[error("unrecognized operand '{name}' at {span}")]
    UnrecognizedOperand { name: String, span: Span },

    #[error("unexpected end of input while parsing '{mnemonic}' at {span}")]
    UnexpectedEndOfInput { mnemonic: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::InvalidInstruction { span, .. }
            | ParseError::DuplicateLabel { span, .. }
            | ParseError::InvalidToken { span, .. }
            | ParseError::UnexpectedNumber { span }
            | ParseError::NumberOutOfRange { span, .. }
            | ParseError::UnrecognizedOperand { span, .. }
            | ParseError::UnexpectedEndOfInput { span, .. } => *span,
        }
    }
}

/// An error surfaced while assembling one node's program; a node is only
/// ever assembled through one pass that stops at the first lex error
/// before parsing begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors raised while validating a topology and wiring a machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("topology is not rectangular: row {row} has {actual} cells, expected {expected}")]
    NonRectangular {
        row: usize,
        actual: usize,
        expected: usize,
    },

    #[error("topology has zero width or height")]
    EmptyTopology,

    #[error("console position {position} is out of range for a side of length {bound}")]
    ConsolePositionOutOfRange { position: usize, bound: usize },

    #[error("missing source text for execution node at row {row}, column {col}")]
    MissingNodeSource { row: usize, col: usize },

    #[error("node at row {row}, column {col} failed to assemble: {source}")]
    Assembly {
        row: usize,
        col: usize,
        #[source]
        source: AssembleError,
    },
}
