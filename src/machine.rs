//! Grid assembly and lifecycle (§4.8): turns a validated topology plus
//! per-node source text into a running set of node tasks, wired together
//! with `Port`s and a shared stop signal.

use crate::error::MachineError;
use crate::execution_node::ExecutionNode;
use crate::parser;
use crate::port::{Direction, Edges, Port, StopSignal, Stopper};
use crate::stack_node::StackNode;
use std::collections::HashMap;
use std::thread::{self, JoinHandle};

/// The kind of node occupying one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Execution,
    Stack,
}

/// Which boundary side a console endpoint is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Where on the grid's boundary a console endpoint attaches: `position` is
/// a column index for `Top`/`Bottom`, a row index for `Left`/`Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSpec {
    pub side: Side,
    pub position: usize,
}

/// The core-side, I/O-free topology description (§3, §6). The runner crate
/// deserializes its on-disk JSON into this shape before handing it to
/// [`Machine::build`].
#[derive(Debug, Clone)]
pub struct Topology {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Vec<NodeKind>>,
    pub console_in: ConsoleSpec,
    pub console_out: ConsoleSpec,
}

enum Cell {
    Execution(ExecutionNode),
    Stack(StackNode),
}

/// A wired, not-yet-started (or already-started) machine. Built by
/// [`Machine::build`], driven by [`Machine::start`] and [`Machine::stop`].
pub struct Machine {
    cells: Vec<Option<Cell>>,
    stopper: Stopper,
    handles: Vec<JoinHandle<()>>,
}

impl Machine {
    /// Validates `topology`, wires every internal and boundary edge, installs
    /// console endpoints, assembles each execution node's program from
    /// `sources`, and returns the machine together with the console-in
    /// (write-only, from the caller's perspective) and console-out
    /// (read-only) ports the caller drives.
    pub fn build(
        topology: &Topology,
        sources: &HashMap<(usize, usize), String>,
    ) -> Result<(Machine, Port, Port), MachineError> {
        let width = topology.width;
        let height = topology.height;
        if width == 0 || height == 0 {
            return Err(MachineError::EmptyTopology);
        }
        if topology.nodes.len() != height {
            return Err(MachineError::NonRectangular {
                row: topology.nodes.len(),
                actual: topology.nodes.len(),
                expected: height,
            });
        }
        for (row, cells) in topology.nodes.iter().enumerate() {
            if cells.len() != width {
                return Err(MachineError::NonRectangular {
                    row,
                    actual: cells.len(),
                    expected: width,
                });
            }
        }
        validate_console_spec(&topology.console_in, width, height)?;
        validate_console_spec(&topology.console_out, width, height)?;

        let (stopper, stop) = Stopper::new();

        // Vertical edges: vertical[r][c] sits above row r (r in 0..=height).
        // vertical[0] is the top boundary, vertical[height] the bottom one.
        let mut vertical: Vec<Vec<Port>> = (0..=height)
            .map(|_| (0..width).map(|_| Port::new(stop.clone())).collect())
            .collect();
        // Horizontal edges: horizontal[r][c] sits to the left of column c
        // (c in 0..=width). horizontal[..][0] is the left boundary,
        // horizontal[..][width] the right one.
        let mut horizontal: Vec<Vec<Port>> = (0..height)
            .map(|_| (0..=width).map(|_| Port::new(stop.clone())).collect())
            .collect();

        let console_in_port = Port::new(stop.clone());
        let console_out_port = Port::new(stop.clone());
        install_console(
            &topology.console_in,
            &console_in_port,
            &mut vertical,
            &mut horizontal,
            width,
            height,
        );
        install_console(
            &topology.console_out,
            &console_out_port,
            &mut vertical,
            &mut horizontal,
            width,
            height,
        );

        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let edges = Edges {
                    up: vertical[row][col].clone(),
                    down: vertical[row + 1][col].clone(),
                    left: horizontal[row][col].clone(),
                    right: horizontal[row][col + 1].clone(),
                };
                let cell = match topology.nodes[row][col] {
                    NodeKind::Stack => {
                        let bound = bound_directions(
                            row,
                            col,
                            width,
                            height,
                            &topology.console_in,
                            &topology.console_out,
                        );
                        Cell::Stack(StackNode::new(edges, stop.clone(), bound))
                    }
                    NodeKind::Execution => {
                        let source = sources
                            .get(&(row, col))
                            .ok_or(MachineError::MissingNodeSource { row, col })?;
                        let program =
                            parser::assemble(source).map_err(|source| MachineError::Assembly {
                                row,
                                col,
                                source,
                            })?;
                        Cell::Execution(ExecutionNode::new(edges, stop.clone(), program))
                    }
                };
                cells.push(Some(cell));
            }
        }

        let machine = Machine {
            cells,
            stopper,
            handles: Vec::new(),
        };
        Ok((machine, console_in_port, console_out_port))
    }

    /// Spawns one task per stack node and per non-empty execution node.
    pub fn start(&mut self) {
        for slot in self.cells.iter_mut() {
            let Some(cell) = slot.take() else { continue };
            match cell {
                Cell::Execution(node) => {
                    if !node.is_empty() {
                        self.handles.push(thread::spawn(move || node.run()));
                    }
                }
                Cell::Stack(node) => {
                    self.handles.push(thread::spawn(move || node.run()));
                }
            }
        }
    }

    /// Delivers the stop signal and joins every spawned task.
    pub fn stop(mut self) {
        self.stopper.stop();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Which of a stack node's four directions have a genuine neighbor or
/// console binding on the other end, as opposed to a boundary edge nobody
/// else ever touches. A stack node's acceptor and server threads both race
/// all four of its ports concurrently; a direction excluded here is never
/// registered in either race, so the two threads can never rendezvous with
/// *each other* on it instead of with a real peer (§9 "stack node
/// directions with no live peer").
fn bound_directions(
    row: usize,
    col: usize,
    width: usize,
    height: usize,
    console_in: &ConsoleSpec,
    console_out: &ConsoleSpec,
) -> Vec<Direction> {
    let claims = |side: Side, position: usize| {
        (console_in.side == side && console_in.position == position)
            || (console_out.side == side && console_out.position == position)
    };

    let mut bound = Vec::with_capacity(4);
    if row > 0 || claims(Side::Top, col) {
        bound.push(Direction::Up);
    }
    if row + 1 < height || claims(Side::Bottom, col) {
        bound.push(Direction::Down);
    }
    if col > 0 || claims(Side::Left, row) {
        bound.push(Direction::Left);
    }
    if col + 1 < width || claims(Side::Right, row) {
        bound.push(Direction::Right);
    }
    bound
}

fn validate_console_spec(spec: &ConsoleSpec, width: usize, height: usize) -> Result<(), MachineError> {
    let bound = match spec.side {
        Side::Top | Side::Bottom => width,
        Side::Left | Side::Right => height,
    };
    if spec.position >= bound {
        return Err(MachineError::ConsolePositionOutOfRange {
            position: spec.position,
            bound,
        });
    }
    Ok(())
}

fn install_console(
    spec: &ConsoleSpec,
    port: &Port,
    vertical: &mut [Vec<Port>],
    horizontal: &mut [Vec<Port>],
    width: usize,
    height: usize,
) {
    match spec.side {
        Side::Top => vertical[0][spec.position] = port.clone(),
        Side::Bottom => vertical[height][spec.position] = port.clone(),
        Side::Left => horizontal[spec.position][0] = port.clone(),
        Side::Right => horizontal[spec.position][width] = port.clone(),
    }
}
