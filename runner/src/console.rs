//! Console I/O tasks (§6): stdin lines in, decimal lines out. Neither task
//! is part of the core — the core only ever sees a `Port`.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};
use tis100::number::{self, Number};
use tis100::port::Port;

/// Reads one line of stdin per iteration, parses it as a Number, and writes
/// it to `port`. A malformed or out-of-range line is reported on the
/// diagnostic stream and skipped, per §6's console-input error policy.
/// Stops when stdin reaches EOF or the port is abandoned (machine stopped).
pub fn spawn_input_task(port: Port) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("console input: failed to read a line: {err}");
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value: i32 = match trimmed.parse() {
                Ok(value) => value,
                Err(_) => {
                    log::warn!("console input: '{trimmed}' is not an integer, skipping");
                    continue;
                }
            };
            if !number::in_range(value) {
                log::warn!("console input: {value} is out of the TIS-100 number range, skipping");
                continue;
            }
            if port.write(Number::new(value)).is_err() {
                return;
            }
        }
    })
}

/// Reads values from `port` and prints each as a decimal line on stdout.
/// Stops when the port is abandoned (machine stopped).
pub fn spawn_output_task(port: Port) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdout = io::stdout();
        loop {
            match port.read() {
                Ok(value) => {
                    let mut handle = stdout.lock();
                    if writeln!(handle, "{value}").is_err() {
                        return;
                    }
                }
                Err(_) => return,
            }
        }
    })
}
