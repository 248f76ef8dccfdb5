//! # tis100
//!
//! An emulator core for a TIS-100–style asynchronous parallel computer: a
//! rectangular grid of small nodes, each running a tiny assembly program,
//! communicating exclusively through blocking rendezvous channels on their
//! four cardinal edges.
//!
//! ## Pipeline
//!
//! Per-node source text flows through four stages before it runs:
//!
//! 1. **Scanner** - tags every character with its line/column and strips comments
//! 2. **Lexer** - turns the tagged characters into mnemonic/label/number tokens
//! 3. **Parser** - turns the token stream into a [`Program`](instruction::Program)
//! 4. **Execution node** - interprets a `Program` against the node's ports
//!
//! Concurrency is one OS thread per node task, each blocking on
//! `crossbeam-channel` rendezvous operations at its suspension points; see
//! [`machine`] for how a grid of nodes is wired up, started, and stopped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use tis100::machine::{ConsoleSpec, Machine, NodeKind, Side, Topology};
//!
//! let topology = Topology {
//!     width: 1,
//!     height: 1,
//!     nodes: vec![vec![NodeKind::Execution]],
//!     console_in: ConsoleSpec { side: Side::Top, position: 0 },
//!     console_out: ConsoleSpec { side: Side::Bottom, position: 0 },
//! };
//! let mut sources = HashMap::new();
//! sources.insert((0, 0), "MOV 500 ACC\nADD 600\nMOV ACC DOWN".to_string());
//!
//! let (mut machine, _console_in, console_out) = Machine::build(&topology, &sources).unwrap();
//! machine.start();
//! assert_eq!(console_out.read().unwrap().to_string(), "999");
//! machine.stop();
//! ```

pub mod error;
pub mod execution_node;
pub mod instruction;
pub mod lexer;
pub mod machine;
pub mod number;
pub mod parser;
pub mod port;
pub mod register;
pub mod scanner;
pub mod stack_node;
