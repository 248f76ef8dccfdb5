//! # Parser
//!
//! Turns a token stream into a [`Program`](crate::instruction::Program): an
//! instruction list plus a node-local label table (§4.4).
//!
//! The parser never touches a concrete node's ports or registers — operand
//! names resolve to symbolic roles (`Source::Acc`, `Sink::Up`, …), which the
//! execution node interprets against its own state at run time. That keeps
//! assembling a node's program independent of how (or whether) that node is
//! ever wired into a grid.

#[cfg(test)]
mod tests;

use crate::error::{AssembleError, ParseError, Span};
use crate::instruction::{Instruction, Program, Sink, Source};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::tokenize;
use crate::number::{self, Number};
use std::iter::Peekable;
use std::slice::Iter;

/// Scans, lexes, and parses `source` into a complete `Program`.
pub fn assemble(source: &str) -> Result<Program, AssembleError> {
    let lexed = tokenize(source);
    if let Some(err) = lexed.errors.into_iter().next() {
        return Err(AssembleError::Lex(err));
    }
    parse(&lexed.tokens).map_err(AssembleError::Parse)
}

fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let mut program = Program::default();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match token.kind {
            TokenKind::Label => {
                if program.labels.contains_key(&token.data) {
                    return Err(ParseError::DuplicateLabel {
                        label: token.data.clone(),
                        span: token.span,
                    });
                }
                program
                    .labels
                    .insert(token.data.clone(), program.instructions.len());
            }
            TokenKind::Number => {
                return Err(ParseError::UnexpectedNumber { span: token.span });
            }
            TokenKind::Name => {
                let instruction = parse_instruction(&token.data, token.span, &mut iter)?;
                program.instructions.push(instruction);
            }
        }
    }

    Ok(program)
}

fn parse_instruction(
    mnemonic: &str,
    span: Span,
    iter: &mut Peekable<Iter<Token>>,
) -> Result<Instruction, ParseError> {
    match mnemonic {
        "NOP" => Ok(Instruction::Nop),
        "SWP" => Ok(Instruction::Swp),
        "SAV" => Ok(Instruction::Sav),
        "NEG" => Ok(Instruction::Neg),
        "MOV" => {
            let src = parse_source(mnemonic, span, iter)?;
            let dst = parse_sink(mnemonic, span, iter)?;
            Ok(Instruction::Mov { src, dst })
        }
        "ADD" => Ok(Instruction::Add {
            src: parse_source(mnemonic, span, iter)?,
        }),
        "SUB" => Ok(Instruction::Sub {
            src: parse_source(mnemonic, span, iter)?,
        }),
        "JRO" => Ok(Instruction::Jro {
            src: parse_source(mnemonic, span, iter)?,
        }),
        "JMP" => Ok(Instruction::Jmp(parse_label_ref(mnemonic, span, iter)?)),
        "JEZ" => Ok(Instruction::Jez(parse_label_ref(mnemonic, span, iter)?)),
        "JNZ" => Ok(Instruction::Jnz(parse_label_ref(mnemonic, span, iter)?)),
        "JGZ" => Ok(Instruction::Jgz(parse_label_ref(mnemonic, span, iter)?)),
        "JLZ" => Ok(Instruction::Jlz(parse_label_ref(mnemonic, span, iter)?)),
        _ => Err(ParseError::InvalidInstruction {
            mnemonic: mnemonic.to_string(),
            span,
        }),
    }
}

fn next_operand<'a>(
    mnemonic: &str,
    span: Span,
    iter: &mut Peekable<Iter<'a, Token>>,
) -> Result<&'a Token, ParseError> {
    iter.next().ok_or_else(|| ParseError::UnexpectedEndOfInput {
        mnemonic: mnemonic.to_string(),
        span,
    })
}

fn parse_source(
    mnemonic: &str,
    span: Span,
    iter: &mut Peekable<Iter<Token>>,
) -> Result<Source, ParseError> {
    let token = next_operand(mnemonic, span, iter)?;
    match token.kind {
        TokenKind::Name => operand_name_to_source(&token.data, token.span),
        TokenKind::Number => parse_immediate(token),
        TokenKind::Label => Err(ParseError::InvalidToken {
            token: token.data.clone(),
            span: token.span,
        }),
    }
}

fn parse_sink(
    mnemonic: &str,
    span: Span,
    iter: &mut Peekable<Iter<Token>>,
) -> Result<Sink, ParseError> {
    let token = next_operand(mnemonic, span, iter)?;
    match token.kind {
        TokenKind::Name => operand_name_to_sink(&token.data, token.span),
        _ => Err(ParseError::InvalidToken {
            token: token.data.clone(),
            span: token.span,
        }),
    }
}

/// Parses the label-reference operand of a jump mnemonic. Any bare name that
/// isn't one of the recognized register/port keywords is a label symbol
/// (§4.3); a recognized keyword here is a parse error, since e.g. `JMP ACC`
/// does not name a valid jump target.
fn parse_label_ref(
    mnemonic: &str,
    span: Span,
    iter: &mut Peekable<Iter<Token>>,
) -> Result<String, ParseError> {
    let token = next_operand(mnemonic, span, iter)?;
    match token.kind {
        TokenKind::Name => {
            if is_known_operand_name(&token.data) {
                Err(ParseError::InvalidToken {
                    token: token.data.clone(),
                    span: token.span,
                })
            } else {
                Ok(token.data.clone())
            }
        }
        _ => Err(ParseError::InvalidToken {
            token: token.data.clone(),
            span: token.span,
        }),
    }
}

fn is_known_operand_name(name: &str) -> bool {
    matches!(
        name,
        "ACC" | "BAK" | "NIL" | "LEFT" | "RIGHT" | "UP" | "DOWN" | "ANY" | "LAST"
    )
}

fn operand_name_to_source(name: &str, span: Span) -> Result<Source, ParseError> {
    match name {
        "ACC" => Ok(Source::Acc),
        "NIL" => Ok(Source::Nil),
        "LEFT" => Ok(Source::Left),
        "RIGHT" => Ok(Source::Right),
        "UP" => Ok(Source::Up),
        "DOWN" => Ok(Source::Down),
        "ANY" => Ok(Source::Any),
        "LAST" => Ok(Source::Last),
        _ => Err(ParseError::UnrecognizedOperand {
            name: name.to_string(),
            span,
        }),
    }
}

fn operand_name_to_sink(name: &str, span: Span) -> Result<Sink, ParseError> {
    match name {
        "ACC" => Ok(Sink::Acc),
        "NIL" => Ok(Sink::Nil),
        "LEFT" => Ok(Sink::Left),
        "RIGHT" => Ok(Sink::Right),
        "UP" => Ok(Sink::Up),
        "DOWN" => Ok(Sink::Down),
        "ANY" => Ok(Sink::Any),
        "LAST" => Ok(Sink::Last),
        _ => Err(ParseError::UnrecognizedOperand {
            name: name.to_string(),
            span,
        }),
    }
}

fn parse_immediate(token: &Token) -> Result<Source, ParseError> {
    let value: i64 = token.data.parse().map_err(|_| ParseError::NumberOutOfRange {
        value: token.data.clone(),
        span: token.span,
    })?;
    if !(number::MIN as i64..=number::MAX as i64).contains(&value) {
        return Err(ParseError::NumberOutOfRange {
            value: token.data.clone(),
            span: token.span,
        });
    }
    Ok(Source::Immediate(Number::new(value as i32)))
}
