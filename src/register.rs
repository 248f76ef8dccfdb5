//! Local, non-blocking storage: mutable registers, the NIL sink/source, and
//! immediate-literal constant sources. These unify under the `NumberSource`/
//! `NumberSink` capabilities described in §9 ("Registers vs ports vs nil").

use crate::number::Number;

/// A Number source: reading never blocks and never mutates anything outside
/// the source itself.
pub trait NumberSource {
    fn read(&self) -> Number;
}

/// A Number sink: writing never blocks.
pub trait NumberSink {
    fn write(&mut self, value: Number);
}

/// A mutable one-slot register. `ACC` and `BAK` are each one of these.
#[derive(Debug, Clone, Copy, Default)]
pub struct Register(Number);

impl Register {
    pub fn new() -> Register {
        Register(Number::ZERO)
    }
}

impl NumberSource for Register {
    fn read(&self) -> Number {
        self.0
    }
}

impl NumberSink for Register {
    fn write(&mut self, value: Number) {
        self.0 = value;
    }
}

/// The process-wide NIL sink/source: reads always yield zero, writes discard.
/// Has no state of its own, so a single zero-sized constant suffices (§9
/// "Global state").
#[derive(Debug, Clone, Copy)]
pub struct Nil;

pub const NIL: Nil = Nil;

impl NumberSource for Nil {
    fn read(&self) -> Number {
        Number::ZERO
    }
}

impl NumberSink for Nil {
    fn write(&mut self, _value: Number) {}
}

/// An immediate literal, materialized as an immutable constant source.
#[derive(Debug, Clone, Copy)]
pub struct Immediate(pub Number);

impl NumberSource for Immediate {
    fn read(&self) -> Number {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_starts_at_zero() {
        assert_eq!(Register::new().read(), Number::ZERO);
    }

    #[test]
    fn register_write_then_read_round_trips() {
        let mut r = Register::new();
        r.write(Number::new(42));
        assert_eq!(r.read(), Number::new(42));
    }

    #[test]
    fn nil_always_reads_zero_and_discards_writes() {
        let mut nil = NIL;
        assert_eq!(nil.read(), Number::ZERO);
        nil.write(Number::new(500));
        assert_eq!(nil.read(), Number::ZERO);
    }

    #[test]
    fn immediate_is_constant() {
        let imm = Immediate(Number::new(7));
        assert_eq!(imm.read(), Number::new(7));
        assert_eq!(imm.read(), Number::new(7));
    }
}
