//! `tis100-runner`: loads a topology and per-node source files from disk,
//! builds and starts a [`tis100::machine::Machine`], drives real console
//! I/O against it, and stops it on Ctrl-C (§6).

mod console;
mod topology;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tis100::machine::Machine;
use topology::TopologyConfig;

/// Run a TIS-100-style grid program from a topology file and a directory of
/// per-node source files.
#[derive(Parser, Debug)]
#[command(name = "tis100-runner", version, about)]
struct Cli {
    /// Path to the topology JSON document.
    #[arg(long)]
    topology: PathBuf,

    /// Directory containing `node_<row>_<col>.tis` source files.
    #[arg(long)]
    nodes_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = TopologyConfig::load(&cli.topology)?;
    let sources = topology::discover_sources(&cli.nodes_dir, &config.nodes)?;
    let core_topology = config.into_core();

    let (mut machine, console_in, console_out) = Machine::build(&core_topology, &sources)
        .context("failed to build machine from topology")?;
    machine.start();

    let input_handle = console::spawn_input_task(console_in);
    let output_handle = console::spawn_output_task(console_out);

    let stop_requested = Arc::new(AtomicBool::new(false));
    {
        let stop_requested = Arc::clone(&stop_requested);
        ctrlc::set_handler(move || stop_requested.store(true, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    while !stop_requested.load(Ordering::SeqCst)
        && !input_handle.is_finished()
        && !output_handle.is_finished()
    {
        std::thread::sleep(Duration::from_millis(50));
    }

    machine.stop();
    Ok(())
}
