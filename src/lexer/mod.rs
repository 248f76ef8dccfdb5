//! # Lexer
//!
//! Drives a `Scanner` and groups its character stream into `Name`, `Label`,
//! and `Number` tokens (§4.2).
//!
//! ## State machine
//!
//! - `None → NameOrLabel` on a letter.
//! - `None → Number` on a digit or `-`.
//! - `NameOrLabel → Label` on `:` (emits, the colon is dropped).
//! - `Name/Number → None` on whitespace (emits).
//!
//! Any other character in any state is a lex error. A pending `Name`/
//! `Number` token is flushed at end of input even without a trailing
//! whitespace character — tokenizing `"MOV"` with no trailing newline
//! should not silently drop the mnemonic.

pub mod token;


use crate::error::{LexError, Span};
use crate::scanner::Scanner;
use token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    NameOrLabel,
    Number,
}

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenizes `source` in full. `source` need not be pre-scanned — a fresh
/// `Scanner` is driven internally.
pub fn tokenize(source: &str) -> LexResult {
    let mut scanner = Scanner::new();
    scanner.feed(source);

    let mut state = State::None;
    let mut data = String::new();
    let mut start: Option<Span> = None;
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    macro_rules! flush {
        ($kind:expr) => {
            if let Some(span) = start.take() {
                tokens.push(Token {
                    kind: $kind,
                    data: std::mem::take(&mut data).to_uppercase(),
                    span,
                });
            }
            state = State::None;
        };
    }

    while let Some(c) = scanner.next() {
        let span = Span::new(c.line, c.col);
        match state {
            State::None => {
                if c.ch.is_alphabetic() {
                    state = State::NameOrLabel;
                    start = Some(span);
                    data.push(c.ch);
                } else if c.ch.is_ascii_digit() || c.ch == '-' {
                    state = State::Number;
                    start = Some(span);
                    data.push(c.ch);
                } else if !c.ch.is_whitespace() {
                    errors.push(LexError::UnexpectedCharacter { ch: c.ch, span });
                }
            }
            State::NameOrLabel => {
                if c.ch.is_alphabetic() {
                    data.push(c.ch);
                } else if c.ch == ':' {
                    flush!(TokenKind::Label);
                } else if c.ch.is_whitespace() {
                    flush!(TokenKind::Name);
                } else {
                    errors.push(LexError::UnexpectedCharacter { ch: c.ch, span });
                    data.clear();
                    state = State::None;
                }
            }
            State::Number => {
                if c.ch.is_ascii_digit() {
                    data.push(c.ch);
                } else if c.ch.is_whitespace() {
                    flush!(TokenKind::Number);
                } else {
                    errors.push(LexError::UnexpectedCharacter { ch: c.ch, span });
                    data.clear();
                    state = State::None;
                }
            }
        }
    }

    match state {
        State::NameOrLabel => flush!(TokenKind::Name),
        State::Number => flush!(TokenKind::Number),
        State::None => {}
    }

    LexResult { tokens, errors }
}
