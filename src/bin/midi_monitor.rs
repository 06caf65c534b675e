//! MIDI Monitor - Console tool for finding device names and checking how
//! the sequencer reads each incoming message.
//!
//! Usage: cargo run --bin midi_monitor -- [--port <substring>] [--clock] [--duration <secs>]

use chrono::Local;
use clap::Parser;
use midir::{Ignore, MidiInput};
use std::io::{self, Write};

use gridseq::midi::hex;
use gridseq::ports::find_port;
use gridseq::router::{classify_clock, classify_controller};

#[derive(Debug, Parser)]
struct Args {
    /// Substring of the input port to listen on (first port if omitted)
    #[arg(long)]
    port: Option<String>,

    /// Classify messages as clock bytes instead of controller messages
    #[arg(long)]
    clock: bool,

    /// Stop after this many seconds instead of waiting for Enter
    #[arg(long)]
    duration: Option<u64>,
}

fn main() {
    let args = Args::parse();

    println!("=== MIDI Monitor ===");
    println!("Listening for MIDI messages...\n");

    let mut midi_in = match MidiInput::new("midi-monitor") {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to create MIDI input: {}", e);
            return;
        }
    };
    midi_in.ignore(Ignore::None);

    let ports = midi_in.ports();
    if ports.is_empty() {
        eprintln!("No MIDI input ports found!");
        return;
    }

    // List available ports
    println!("Available MIDI input ports:");
    for (i, port) in ports.iter().enumerate() {
        let name = midi_in.port_name(port).unwrap_or_else(|_| "Unknown".to_string());
        println!("  {}: {}", i, name);
    }
    println!();

    let selected = match &args.port {
        Some(needle) => find_port(&midi_in, needle),
        None => ports.first().map(|p| {
            let name = midi_in.port_name(p).unwrap_or_else(|_| "Unknown".to_string());
            (p.clone(), name)
        }),
    };
    let Some((port, port_name)) = selected else {
        eprintln!("No input port matches {:?}", args.port);
        return;
    };

    println!("Connecting to: {}\n", port_name);
    println!("{:<14} {:<14} {:<12} {}", "TIME", "TIMESTAMP", "DATA (HEX)", "EVENT");
    println!("{}", "-".repeat(80));

    let as_clock = args.clock;
    let connection = midi_in.connect(
        &port,
        "midi-monitor-in",
        move |timestamp, message, _| {
            print_midi_message(timestamp, message, as_clock);
        },
        (),
    );

    match connection {
        Ok(conn) => {
            if let Some(secs) = args.duration {
                println!("\nMonitoring for {} seconds...\n", secs);
                std::thread::sleep(std::time::Duration::from_secs(secs));
            } else {
                println!("\nPress Enter to quit (or use --duration <secs>)...\n");
                let mut input = String::new();
                let _ = io::stdin().read_line(&mut input);
            }
            drop(conn);
        }
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
        }
    }
}

fn print_midi_message(timestamp: u64, message: &[u8], as_clock: bool) {
    let event = if as_clock {
        classify_clock(message).map(|e| format!("{:?}", e))
    } else {
        classify_controller(message).map(|e| format!("{:?}", e))
    };
    let event = event.unwrap_or_else(|e| format!("<{}>", e));

    println!(
        "{:<14} {:<14} {:<12} {}",
        Local::now().format("%H:%M:%S%.3f"),
        timestamp,
        hex(message),
        event
    );
    // Flush to ensure immediate output
    let _ = io::stdout().flush();
}
