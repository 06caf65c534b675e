//! gridseq - plays grid-controller patterns to a drum module in sync with an
//! external MIDI clock.
//!
//! Connects to the controller, the clock source and the drum module by port
//! name, then runs the engine once per period until Enter is pressed.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;

use gridseq::config::Config;
use gridseq::ports::{self, Connections};
use gridseq::runtime::Runtime;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to gridseq.yaml next to the manifest)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every MIDI input and output port name and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    if args.list_ports {
        let (inputs, outputs) = ports::list_ports(&config.client_name)?;
        println!("Inputs:");
        for name in inputs {
            println!("  {}", name);
        }
        println!("Outputs:");
        for name in outputs {
            println!("  {}", name);
        }
        return Ok(());
    }

    let (connections, inputs) = ports::connect(&config)?;
    let Connections {
        controller_in,
        clock_in,
        drum_in,
        controller_out,
        drum_out,
    } = connections;

    let mut runtime = Runtime::new(&config, inputs, controller_out, drum_out);
    runtime.initialize()?;

    let running = Arc::new(AtomicBool::new(true));
    let stop = Arc::clone(&running);
    thread::Builder::new()
        .name("stdin-quit".to_string())
        .spawn(move || {
            let mut line = String::new();
            let _ = io::stdin().read_line(&mut line);
            stop.store(false, Ordering::Relaxed);
        })
        .context("Failed to spawn stdin watcher")?;

    println!("Press Enter to quit...");
    runtime.run(config.period(), &running);

    log::info!("shutting down");
    drop(drum_in);
    drop(clock_in);
    drop(controller_in);
    Ok(())
}
