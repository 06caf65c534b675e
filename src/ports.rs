//! MIDI device discovery and connection.
//!
//! Ports are picked by substring match on their names, first match wins.
//! Input callbacks copy each message into a fixed-size [`RawMessage`] and
//! hand it to the period loop through a bounded channel; they never block.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Sender, TrySendError};
use midir::{Ignore, MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::config::Config;
use crate::midi::RawMessage;
use crate::runtime::Inputs;

/// Destination for a period's outbound messages.
pub trait MidiSink {
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

impl MidiSink for MidiOutputConnection {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        MidiOutputConnection::send(self, message).map_err(|e| anyhow!("Failed to send MIDI: {}", e))
    }
}

type InputConnection = MidiInputConnection<Sender<RawMessage>>;

/// Open connections. Inputs stop delivering when this is dropped.
pub struct Connections {
    pub controller_in: InputConnection,
    pub clock_in: InputConnection,
    pub drum_in: Option<InputConnection>,
    pub controller_out: MidiOutputConnection,
    pub drum_out: MidiOutputConnection,
}

/// Find the first port whose name contains `needle`.
pub fn find_port<T: MidiIO>(io: &T, needle: &str) -> Option<(T::Port, String)> {
    io.ports().into_iter().find_map(|port| {
        let name = io.port_name(&port).ok()?;
        name.contains(needle).then_some((port, name))
    })
}

/// Names of every input and output port currently visible.
pub fn list_ports(client_name: &str) -> Result<(Vec<String>, Vec<String>)> {
    let midi_in = MidiInput::new(&format!("{}-list", client_name))
        .map_err(|e| anyhow!("Failed to create MIDI input: {}", e))?;
    let midi_out = MidiOutput::new(&format!("{}-list", client_name))
        .map_err(|e| anyhow!("Failed to create MIDI output: {}", e))?;

    let inputs = midi_in
        .ports()
        .iter()
        .filter_map(|p| midi_in.port_name(p).ok())
        .collect();
    let outputs = midi_out
        .ports()
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect();
    Ok((inputs, outputs))
}

/// Connect an input port and forward its messages into `tx`.
pub fn connect_input(
    client_name: &str,
    label: &str,
    needle: &str,
    tx: Sender<RawMessage>,
) -> Result<InputConnection> {
    let mut midi_in = MidiInput::new(&format!("{}-{}", client_name, label))
        .map_err(|e| anyhow!("Failed to create MIDI input: {}", e))?;
    midi_in.ignore(Ignore::None);

    let (port, port_name) = find_port(&midi_in, needle)
        .ok_or_else(|| anyhow!("No MIDI input port matching '{}' for {}", needle, label))?;

    let label_owned = label.to_string();
    let connection = midi_in
        .connect(
            &port,
            &format!("{}-{}-in", client_name, label),
            move |_timestamp, message, tx| forward(&label_owned, tx, message),
            tx,
        )
        .map_err(|e| anyhow!("Failed to connect {} input '{}': {}", label, port_name, e))?;

    log::info!("{} input connected to: {}", label, port_name);
    Ok(connection)
}

/// Connect an output port.
pub fn connect_output(client_name: &str, label: &str, needle: &str) -> Result<MidiOutputConnection> {
    let midi_out = MidiOutput::new(&format!("{}-{}", client_name, label))
        .map_err(|e| anyhow!("Failed to create MIDI output: {}", e))?;

    let (port, port_name) = find_port(&midi_out, needle)
        .ok_or_else(|| anyhow!("No MIDI output port matching '{}' for {}", needle, label))?;

    let connection = midi_out
        .connect(&port, &format!("{}-{}-out", client_name, label))
        .map_err(|e| anyhow!("Failed to connect {} output '{}': {}", label, port_name, e))?;

    log::info!("{} output connected to: {}", label, port_name);
    Ok(connection)
}

/// Open every port the sequencer uses. The drum module's input is optional.
pub fn connect(config: &Config) -> Result<(Connections, Inputs)> {
    let capacity = config.max_events_per_period;
    let (controller_tx, controller_rx) = bounded(capacity);
    let (clock_tx, clock_rx) = bounded(capacity);
    let (drum_tx, drum_rx) = bounded(capacity);
    let client = &config.client_name;

    let controller_out = connect_output(client, "controller", &config.controller_device)?;
    let drum_out = connect_output(client, "drum", &config.drum_device)?;
    let controller_in = connect_input(client, "controller", &config.controller_device, controller_tx)?;
    let clock_in = connect_input(client, "clock", &config.clock_device, clock_tx)?;
    let drum_in = match connect_input(client, "drum", &config.drum_device, drum_tx) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::info!("drum module input not connected: {:#}", e);
            None
        }
    };

    let connections = Connections {
        controller_in,
        clock_in,
        drum_in,
        controller_out,
        drum_out,
    };
    let inputs = Inputs {
        controller: controller_rx,
        clock: clock_rx,
        drum: drum_rx,
    };
    Ok((connections, inputs))
}

fn forward(label: &str, tx: &mut Sender<RawMessage>, message: &[u8]) {
    match tx.try_send(RawMessage::from_slice(message)) {
        Ok(()) | Err(TrySendError::Disconnected(_)) => {}
        Err(TrySendError::Full(_)) => log::warn!("{} input queue full, dropping message", label),
    }
}
