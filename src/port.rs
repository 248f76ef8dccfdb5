//! The unbuffered rendezvous channel shared by exactly two endpoints (§4.6),
//! plus the cooperative stop signal every suspension point races against.

use crate::number::Number;
use crossbeam_channel::{bounded, select, Receiver, Select, Sender};

/// Raised when a port operation is abandoned because the machine's stop
/// signal fired before a peer showed up. Blocking is the only defined
/// failure mode for a port (§7); this is not a "port error" in the
/// diagnostic sense, just cooperative cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped;

/// A handle to the machine-wide stop signal. Cloning shares the same
/// underlying channel; dropping every `Sender` half (owned solely by the
/// `Machine`) closes the channel, which wakes every blocked `recv` on every
/// cloned `StopSignal` at once — broadcast via channel closure, without a
/// shared counter.
#[derive(Clone)]
pub struct StopSignal(Receiver<()>);

impl StopSignal {
    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.0
    }
}

/// Blocks until the stop signal fires, then reports the operation as
/// abandoned. Used wherever a suspension point has no defined wakeup other
/// than shutdown (e.g. `LAST` read before any `ANY` has resolved a
/// direction).
pub(crate) fn block_forever<T>(stop: &StopSignal) -> Result<T, Stopped> {
    let _ = stop.receiver().recv();
    Err(Stopped)
}

/// Owned by the `Machine`; dropping it (via `stop`) fires every `StopSignal`.
pub struct Stopper(Option<Sender<()>>);

impl Stopper {
    /// Builds a fresh stop channel, returning the owning `Stopper` and one
    /// `StopSignal` handle to clone for each node task.
    pub fn new() -> (Stopper, StopSignal) {
        let (tx, rx) = bounded(0);
        (Stopper(Some(tx)), StopSignal(rx))
    }

    /// Delivers the stop event. Idempotent: calling it more than once is a
    /// no-op, since the sender is already gone after the first call.
    pub fn stop(&mut self) {
        self.0.take();
    }
}

/// An unbuffered, single-slot rendezvous channel. Both `Sender` and
/// `Receiver` halves of a `crossbeam_channel::bounded(0)` channel are MPMC,
/// so sharing clones of the same pair between two node handles gives exactly
/// the "either side may read or write, the other side completes the
/// handshake" semantics §3 describes — no separate directionality needed.
///
/// A "dead" boundary port is simply a `Port` whose channel ends were never
/// handed to a second endpoint: nothing will ever perform the matching
/// operation, so every read or write on it blocks forever.
#[derive(Clone)]
pub struct Port {
    tx: Sender<Number>,
    rx: Receiver<Number>,
    stop: StopSignal,
}

impl Port {
    /// Allocates a fresh rendezvous channel. Clone the returned `Port` to
    /// share it with a second endpoint (a neighboring node, a console
    /// binding); leave it unshared to get dead-stub behavior.
    pub fn new(stop: StopSignal) -> Port {
        let (tx, rx) = bounded(0);
        Port { tx, rx, stop }
    }

    /// Blocks until a peer writes, or the stop signal fires.
    pub fn read(&self) -> Result<Number, Stopped> {
        select! {
            recv(self.rx) -> msg => msg.map_err(|_| Stopped),
            recv(self.stop.receiver()) -> _ => Err(Stopped),
        }
    }

    /// Blocks until a peer reads, or the stop signal fires.
    pub fn write(&self, value: Number) -> Result<(), Stopped> {
        select! {
            send(self.tx, value) -> res => res.map_err(|_| Stopped),
            recv(self.stop.receiver()) -> _ => Err(Stopped),
        }
    }
}

/// The four cardinal directions a node can have a neighbor (or console
/// binding, or dead stub) on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The four edge ports every grid cell owns, plus the `ANY`/`LAST` routing
/// built on top of them. Shared by `ExecutionNode` and `StackNode` — both
/// race the same four directions, just for different reasons (§4.6, §4.7).
pub struct Edges {
    pub up: Port,
    pub down: Port,
    pub left: Port,
    pub right: Port,
}

impl Edges {
    pub fn port(&self, direction: Direction) -> &Port {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Races a read across all four directions. The winner's direction is
    /// returned so the caller can record it as `LAST` (§4.6).
    pub fn read_any(&self, stop: &StopSignal) -> Result<(Number, Direction), Stopped> {
        select! {
            recv(self.up.rx) -> msg => msg.map(|n| (n, Direction::Up)).map_err(|_| Stopped),
            recv(self.down.rx) -> msg => msg.map(|n| (n, Direction::Down)).map_err(|_| Stopped),
            recv(self.left.rx) -> msg => msg.map(|n| (n, Direction::Left)).map_err(|_| Stopped),
            recv(self.right.rx) -> msg => msg.map(|n| (n, Direction::Right)).map_err(|_| Stopped),
            recv(stop.receiver()) -> _ => Err(Stopped),
        }
    }

    /// Races a write of `value` across all four directions. The winner's
    /// direction is returned so the caller can record it as `LAST` — the
    /// original records `LAST` on both read and write (§9), preserved here.
    pub fn write_any(&self, value: Number, stop: &StopSignal) -> Result<Direction, Stopped> {
        select! {
            send(self.up.tx, value) -> res => res.map(|_| Direction::Up).map_err(|_| Stopped),
            send(self.down.tx, value) -> res => res.map(|_| Direction::Down).map_err(|_| Stopped),
            send(self.left.tx, value) -> res => res.map(|_| Direction::Left).map_err(|_| Stopped),
            send(self.right.tx, value) -> res => res.map(|_| Direction::Right).map_err(|_| Stopped),
            recv(stop.receiver()) -> _ => Err(Stopped),
        }
    }

    /// Like [`read_any`](Edges::read_any), but only registers the given
    /// subset of directions. A direction left out never competes for the
    /// operation and is never mistaken as its source.
    ///
    /// Needed by `StackNode`: its acceptor and server threads both hold the
    /// same four `Port`s, one always reading and the other always writing,
    /// so a direction with no real neighbor would otherwise let those two
    /// threads rendezvous with *each other* on that direction's channel —
    /// shuffling a value back onto the stack (or stealing a read that
    /// should have gone to a genuine peer on a different direction) instead
    /// of ever blocking. Restricting the race to directions known to have a
    /// live neighbor or console binding removes that self-pairing.
    pub fn read_any_in(
        &self,
        directions: &[Direction],
        stop: &StopSignal,
    ) -> Result<(Number, Direction), Stopped> {
        if directions.is_empty() {
            return block_forever(stop);
        }
        let mut sel = Select::new();
        for direction in directions {
            sel.recv(&self.port(*direction).rx);
        }
        let stop_index = sel.recv(stop.receiver());
        let oper = sel.select();
        let index = oper.index();
        if index == stop_index {
            let _ = oper.recv(stop.receiver());
            return Err(Stopped);
        }
        let direction = directions[index];
        oper.recv(&self.port(direction).rx)
            .map(|n| (n, direction))
            .map_err(|_| Stopped)
    }

    /// Write-side counterpart of [`read_any_in`](Edges::read_any_in).
    pub fn write_any_in(
        &self,
        value: Number,
        directions: &[Direction],
        stop: &StopSignal,
    ) -> Result<Direction, Stopped> {
        if directions.is_empty() {
            return block_forever(stop);
        }
        let mut sel = Select::new();
        for direction in directions {
            sel.send(&self.port(*direction).tx);
        }
        let stop_index = sel.recv(stop.receiver());
        let oper = sel.select();
        let index = oper.index();
        if index == stop_index {
            let _ = oper.recv(stop.receiver());
            return Err(Stopped);
        }
        let direction = directions[index];
        oper.send(&self.port(direction).tx, value)
            .map(|_| direction)
            .map_err(|_| Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn stop_signal() -> StopSignal {
        Stopper::new().1
    }

    #[test]
    fn write_then_read_rendezvous() {
        let port = Port::new(stop_signal());
        let reader = port.clone();
        let handle = thread::spawn(move || reader.read().unwrap());
        port.write(Number::new(42)).unwrap();
        assert_eq!(handle.join().unwrap(), Number::new(42));
    }

    #[test]
    fn dead_port_blocks_until_stopped() {
        let (mut stopper, signal) = Stopper::new();
        let port = Port::new(signal);
        let reader = port.clone();
        let handle = thread::spawn(move || reader.read());
        thread::sleep(std::time::Duration::from_millis(20));
        stopper.stop();
        assert_eq!(handle.join().unwrap(), Err(Stopped));
    }

    #[test]
    fn any_read_picks_whichever_side_writes() {
        let (_stopper, signal) = Stopper::new();
        let edges = Edges {
            up: Port::new(signal.clone()),
            down: Port::new(signal.clone()),
            left: Port::new(signal.clone()),
            right: Port::new(signal.clone()),
        };
        let right = edges.right.clone();
        let handle = thread::spawn(move || right.write(Number::new(7)));
        let (value, direction) = edges.read_any(&signal).unwrap();
        assert_eq!(value, Number::new(7));
        assert_eq!(direction, Direction::Right);
        handle.join().unwrap().unwrap();
    }
}
