//! The instruction set: a closed sum of tagged variants with typed operand
//! slots (§3, §4.3, §9 "Instruction variants").

use crate::number::Number;

/// A Number source an operand position can name: one of the addressable
/// roles (§4.3), or an immediate literal materialized as a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Acc,
    Nil,
    Up,
    Down,
    Left,
    Right,
    Any,
    Last,
    Immediate(Number),
}

/// A Number sink an operand position can name. `Immediate` is deliberately
/// absent — a literal is never a valid write target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Acc,
    Nil,
    Up,
    Down,
    Left,
    Right,
    Any,
    Last,
}

/// One TIS-100 instruction. `Jmp`/`Jez`/`Jnz`/`Jgz`/`Jlz` carry their target
/// as a label symbol rather than a resolved index — resolution happens
/// against the owning node's label table at execution time (§4.4), so an
/// unresolved jump is a runtime error local to that node rather than a
/// parse-time one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Mov { src: Source, dst: Sink },
    Swp,
    Sav,
    Add { src: Source },
    Sub { src: Source },
    Neg,
    Jmp(String),
    Jez(String),
    Jnz(String),
    Jgz(String),
    Jlz(String),
    Jro { src: Source },
}

/// The result of assembling one node's source text: its instruction list
/// and its label table (label → index of the instruction it prefixes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: std::collections::HashMap<String, usize>,
}
