//! The unbounded LIFO stack node: accepts a value from whichever neighbor
//! offers one first, and offers its top value to whichever neighbor reads
//! first (§4.7).

use crate::number::Number;
use crate::port::{Direction, Edges, StopSignal, Stopped};
use std::sync::Mutex;
use std::thread;

/// A stack node's storage plus its edge ports. Two threads drive it: one
/// accepting incoming values, one offering the top of the stack outward.
pub struct StackNode {
    edges: Edges,
    stop: StopSignal,
    values: Mutex<Vec<Number>>,
    /// Directions with a genuine neighbor or console binding. Both the
    /// acceptor and server race all of these concurrently, so a direction
    /// left out is never offered to or accepted from — if it were, the
    /// acceptor's own read and the server's own write on that same
    /// direction's channel could rendezvous with *each other* instead of a
    /// real peer (§9 "stack node directions with no live peer").
    bound: Vec<Direction>,
}

impl StackNode {
    pub fn new(edges: Edges, stop: StopSignal, bound: Vec<Direction>) -> StackNode {
        StackNode {
            edges,
            stop,
            values: Mutex::new(Vec::new()),
            bound,
        }
    }

    /// Spawns the acceptor and server threads and blocks the calling thread
    /// until both stop. Intended to be run on its own thread by the machine,
    /// the same way an execution node's `run` is.
    pub fn run(self) {
        let node = std::sync::Arc::new(self);
        let acceptor = {
            let node = std::sync::Arc::clone(&node);
            thread::spawn(move || node.accept_loop())
        };
        let server = {
            let node = std::sync::Arc::clone(&node);
            thread::spawn(move || node.serve_loop())
        };
        let _ = acceptor.join();
        let _ = server.join();
    }

    fn accept_loop(&self) {
        loop {
            match self.edges.read_any_in(&self.bound, &self.stop) {
                Ok((value, _direction)) => {
                    self.values.lock().unwrap().push(value);
                }
                Err(Stopped) => return,
            }
        }
    }

    /// Pops the top value under the lock (a single atomic step shared with
    /// the acceptor's push), then races offering that already-popped value
    /// across the four edges outside the lock. This differs from the
    /// original's non-blocking-send fast path, which can lose the value if
    /// no neighbor happens to be ready at that instant (§9 "Stack node fast
    /// path"): popping first and only then blocking on the offer means a
    /// value already removed from the stack is always either delivered or
    /// still waiting to be offered, never dropped.
    fn serve_loop(&self) {
        loop {
            let value = {
                let mut values = self.values.lock().unwrap();
                values.pop()
            };
            let Some(value) = value else {
                // Nothing to offer yet; yield briefly rather than spin.
                if self.wait_or_stop() {
                    return;
                }
                continue;
            };
            if self
                .edges
                .write_any_in(value, &self.bound, &self.stop)
                .is_err()
            {
                return;
            }
        }
    }

    /// Parks briefly so an empty stack doesn't spin the server thread.
    /// Returns `true` if the stop signal fired while waiting.
    fn wait_or_stop(&self) -> bool {
        use crossbeam_channel::select;
        select! {
            default(std::time::Duration::from_millis(1)) => false,
            recv(self.stop.receiver()) -> _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Port, Stopper};
    use std::thread;

    fn node_with_neighbor() -> (StackNode, Stopper, Edges) {
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
        let node = StackNode::new(
            Edges {
                up,
                down,
                left,
                right,
            },
            stop,
            // Only up/down are actually driven by a peer in these tests;
            // left/right are cloned into `neighbor` but never read or
            // written, so they must stay out of the bound set or the
            // acceptor and server would be free to rendezvous with each
            // other on them.
            vec![Direction::Up, Direction::Down],
        );
        (node, stopper, neighbor)
    }

    #[test]
    fn pushed_values_pop_in_lifo_order() {
        let (node, mut stopper, neighbor) = node_with_neighbor();
        let handle = thread::spawn(move || node.run());

        neighbor.up.write(Number::new(1)).unwrap();
        neighbor.up.write(Number::new(2)).unwrap();
        neighbor.up.write(Number::new(3)).unwrap();

        assert_eq!(neighbor.down.read().unwrap(), Number::new(3));
        assert_eq!(neighbor.down.read().unwrap(), Number::new(2));
        assert_eq!(neighbor.down.read().unwrap(), Number::new(1));

        stopper.stop();
        handle.join().unwrap();
    }

    #[test]
    fn empty_stack_blocks_readers_until_a_value_arrives() {
        let (node, mut stopper, neighbor) = node_with_neighbor();
        let handle = thread::spawn(move || node.run());

        let reader = neighbor.down.clone();
        let read_handle = thread::spawn(move || reader.read());
        thread::sleep(std::time::Duration::from_millis(20));
        neighbor.up.write(Number::new(9)).unwrap();
        assert_eq!(read_handle.join().unwrap().unwrap(), Number::new(9));

        stopper.stop();
        handle.join().unwrap();
    }

    #[test]
    fn unbound_directions_never_leak_a_value_back_onto_the_stack() {
        // left/right have a cloned peer but are excluded from `bound`, so
        // the acceptor and server must never rendezvous with each other on
        // them: a value pushed via `up` has to come back out via `down`,
        // not bounce straight back out `up`/`left`/`right`.
        let (node, mut stopper, neighbor) = node_with_neighbor();
        let handle = thread::spawn(move || node.run());

        neighbor.up.write(Number::new(42)).unwrap();
        assert_eq!(neighbor.down.read().unwrap(), Number::new(42));

        stopper.stop();
        handle.join().unwrap();
    }
}
