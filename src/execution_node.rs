//! The sequential interpreter that drives one execution node's instruction
//! list against its ports (§4.5).

use crate::instruction::{Instruction, Program, Sink, Source};
use crate::number::Number;
use crate::port::{block_forever, Direction, Edges, StopSignal, Stopped};
use crate::register::{NumberSink, NumberSource, Register, NIL};

/// A programmable node: `ACC`/`BAK` registers, a cyclic instruction list, a
/// node-local label table, and borrowed-for-its-lifetime access to its four
/// edge ports (§3).
pub struct ExecutionNode {
    acc: Register,
    bak: Register,
    edges: Edges,
    stop: StopSignal,
    last: Option<Direction>,
    program: Program,
}

impl ExecutionNode {
    pub fn new(edges: Edges, stop: StopSignal, program: Program) -> ExecutionNode {
        ExecutionNode {
            acc: Register::new(),
            bak: Register::new(),
            edges,
            stop,
            last: None,
            program,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.program.instructions.is_empty()
    }

    /// Runs the node's cyclic instruction list until the stop signal fires
    /// or an unresolved label halts it. A node with zero instructions
    /// returns immediately without running (§4.5).
    pub fn run(mut self) {
        if self.program.instructions.is_empty() {
            return;
        }
        let len = self.program.instructions.len();
        let mut pc = 0usize;

        loop {
            let instruction = self.program.instructions[pc].clone();
            match instruction {
                Instruction::Nop => {}
                Instruction::Mov { src, dst } => {
                    let value = match self.read(src) {
                        Ok(v) => v,
                        Err(Stopped) => return,
                    };
                    if self.write(dst, value).is_err() {
                        return;
                    }
                }
                Instruction::Swp => {
                    let acc = self.acc.read();
                    let bak = self.bak.read();
                    self.acc.write(bak);
                    self.bak.write(acc);
                }
                Instruction::Sav => {
                    let acc = self.acc.read();
                    self.bak.write(acc);
                }
                Instruction::Add { src } => {
                    let rhs = match self.read(src) {
                        Ok(v) => v,
                        Err(Stopped) => return,
                    };
                    let acc = self.acc.read();
                    self.acc.write(acc + rhs);
                }
                Instruction::Sub { src } => {
                    let rhs = match self.read(src) {
                        Ok(v) => v,
                        Err(Stopped) => return,
                    };
                    let acc = self.acc.read();
                    self.acc.write(acc - rhs);
                }
                Instruction::Neg => {
                    let acc = self.acc.read();
                    self.acc.write(-acc);
                }
                Instruction::Jmp(label) => match self.resolve(&label) {
                    Some(target) => {
                        pc = target;
                        continue;
                    }
                    None => {
                        log::error!("unknown label '{label}': node halted");
                        return;
                    }
                },
                Instruction::Jez(label) => {
                    if self.acc.read() == Number::ZERO {
                        match self.resolve(&label) {
                            Some(target) => {
                                pc = target;
                                continue;
                            }
                            None => {
                                log::error!("unknown label '{label}': node halted");
                                return;
                            }
                        }
                    }
                }
                Instruction::Jnz(label) => {
                    if self.acc.read() != Number::ZERO {
                        match self.resolve(&label) {
                            Some(target) => {
                                pc = target;
                                continue;
                            }
                            None => {
                                log::error!("unknown label '{label}': node halted");
                                return;
                            }
                        }
                    }
                }
                Instruction::Jgz(label) => {
                    if self.acc.read().value() > 0 {
                        match self.resolve(&label) {
                            Some(target) => {
                                pc = target;
                                continue;
                            }
                            None => {
                                log::error!("unknown label '{label}': node halted");
                                return;
                            }
                        }
                    }
                }
                Instruction::Jlz(label) => {
                    if self.acc.read().value() < 0 {
                        match self.resolve(&label) {
                            Some(target) => {
                                pc = target;
                                continue;
                            }
                            None => {
                                log::error!("unknown label '{label}': node halted");
                                return;
                            }
                        }
                    }
                }
                Instruction::Jro { src } => {
                    let offset = match self.read(src) {
                        Ok(v) => v,
                        Err(Stopped) => return,
                    };
                    pc = wrap_pc(pc, offset.value(), len);
                    continue;
                }
            }
            pc = (pc + 1) % len;
        }
    }

    fn resolve(&self, label: &str) -> Option<usize> {
        self.program.labels.get(label).copied()
    }

    fn read(&mut self, src: Source) -> Result<Number, Stopped> {
        match src {
            Source::Acc => Ok(self.acc.read()),
            Source::Nil => Ok(NIL.read()),
            Source::Immediate(n) => Ok(n),
            Source::Up => self.edges.up.read(),
            Source::Down => self.edges.down.read(),
            Source::Left => self.edges.left.read(),
            Source::Right => self.edges.right.read(),
            Source::Any => {
                let (value, direction) = self.edges.read_any(&self.stop)?;
                self.last = Some(direction);
                Ok(value)
            }
            Source::Last => match self.last {
                Some(direction) => self.edges.port(direction).read(),
                None => block_forever(&self.stop),
            },
        }
    }

    fn write(&mut self, dst: Sink, value: Number) -> Result<(), Stopped> {
        match dst {
            Sink::Acc => {
                self.acc.write(value);
                Ok(())
            }
            Sink::Nil => {
                let mut nil = NIL;
                nil.write(value);
                Ok(())
            }
            Sink::Up => self.edges.up.write(value),
            Sink::Down => self.edges.down.write(value),
            Sink::Left => self.edges.left.write(value),
            Sink::Right => self.edges.right.write(value),
            Sink::Any => {
                let direction = self.edges.write_any(value, &self.stop)?;
                self.last = Some(direction);
                Ok(())
            }
            Sink::Last => match self.last {
                Some(direction) => self.edges.port(direction).write(value),
                None => block_forever(&self.stop).map(|_: Number| ()),
            },
        }
    }
}

/// `PC + offset`, wrapped into `[0, len)`. Negative sums wrap into the
/// non-negative range before indexing (§9 "JRO with a value that causes PC
/// wrap"); `rem_euclid` gives that directly, unlike Rust's sign-preserving
/// `%`.
fn wrap_pc(pc: usize, offset: i32, len: usize) -> usize {
    let sum = pc as i64 + offset as i64;
    sum.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::assemble;
    use crate::port::{Port, Stopper};
    use std::thread;

    /// Builds a node wired to a `neighbor` `Edges` sharing all four of its
    /// ports, plus the `Stopper` that must outlive the test (dropping it
    /// early closes the stop channel immediately, which would make every
    /// blocking port op return `Stopped` instead of rendezvousing).
    fn node_with_edges(program_source: &str) -> (ExecutionNode, Stopper, Edges) {
        let (stopper, stop) = Stopper::new();
        let up = Port::new(stop.clone());
        let down = Port::new(stop.clone());
        let left = Port::new(stop.clone());
        let right = Port::new(stop.clone());
        let neighbor = Edges {
            up: up.clone(),
            down: down.clone(),
            left: left.clone(),
            right: right.clone(),
        };
        let program = assemble(program_source).expect("valid program");
        let node = ExecutionNode::new(
            Edges {
                up,
                down,
                left,
                right,
            },
            stop,
            program,
        );
        (node, stopper, neighbor)
    }

    #[test]
    fn saturation_scenario() {
        let (node, _stopper, neighbor) = node_with_edges("MOV 500 ACC\nADD 600\nMOV ACC DOWN");
        let handle = thread::spawn(move || node.run());
        assert_eq!(neighbor.down.read().unwrap(), Number::new(999));
        handle.join().unwrap();
    }

    #[test]
    fn negation_wrap_scenario() {
        let (node, _stopper, neighbor) = node_with_edges("MOV -500 ACC\nNEG\nMOV ACC DOWN");
        let handle = thread::spawn(move || node.run());
        assert_eq!(neighbor.down.read().unwrap(), Number::new(500));
        handle.join().unwrap();
    }

    #[test]
    fn labels_and_conditional_jump_scenario() {
        let (node, mut stopper, neighbor) =
            node_with_edges("MOV 3 ACC\nL: SUB 1\nMOV ACC DOWN\nJGZ L");
        let handle = thread::spawn(move || node.run());
        assert_eq!(neighbor.down.read().unwrap(), Number::new(2));
        assert_eq!(neighbor.down.read().unwrap(), Number::new(1));
        assert_eq!(neighbor.down.read().unwrap(), Number::new(0));
        // ACC is now negative and JGZ never taken again; the node loops
        // forever on SUB/MOV/JGZ. Stop it rather than waiting it out.
        stopper.stop();
        handle.join().unwrap();
    }

    #[test]
    fn empty_program_does_not_run() {
        let (node, _stopper, _neighbor) = node_with_edges("");
        assert!(node.is_empty());
        node.run();
    }

    #[test]
    fn unresolved_label_halts_only_this_node() {
        let (node, _stopper, _neighbor) = node_with_edges("JMP NOWHERE");
        node.run();
    }
}
