//! The period loop that drives the engine.
//!
//! Once per period the loop drains a bounded batch from each input queue,
//! lets the engine handle it, and flushes both output buffers. Batch and
//! output storage is allocated up front and reused every period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;

use crate::config::Config;
use crate::engine::{Engine, Period};
use crate::midi::RawMessage;
use crate::output::Outputs;
use crate::ports::MidiSink;

/// Receiving ends of the input queues filled by the MIDI callbacks.
pub struct Inputs {
    pub controller: Receiver<RawMessage>,
    pub clock: Receiver<RawMessage>,
    pub drum: Receiver<RawMessage>,
}

struct Batches {
    controller: Vec<RawMessage>,
    clock: Vec<RawMessage>,
    drum: Vec<RawMessage>,
}

pub struct Runtime<C, D> {
    engine: Engine,
    inputs: Inputs,
    batches: Batches,
    max_events: usize,
    outputs: Outputs,
    controller_out: C,
    drum_out: D,
}

impl<C: MidiSink, D: MidiSink> Runtime<C, D> {
    pub fn new(config: &Config, inputs: Inputs, controller_out: C, drum_out: D) -> Self {
        let max_events = config.max_events_per_period;
        Self {
            engine: Engine::new(),
            inputs,
            batches: Batches {
                controller: Vec::with_capacity(max_events),
                clock: Vec::with_capacity(max_events),
                drum: Vec::with_capacity(max_events),
            },
            max_events,
            outputs: Outputs::new(config.output_capacity),
            controller_out,
            drum_out,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Reset the controller and draw the initial display.
    pub fn initialize(&mut self) -> Result<()> {
        self.outputs.clear();
        let result = self.engine.initialize(&mut self.outputs);
        self.flush()?;
        result.context("Failed to initialize controller display")
    }

    /// Run one period. Whatever the engine wrote before a failure is still
    /// delivered.
    pub fn run_period(&mut self) -> Result<()> {
        drain(&self.inputs.controller, &mut self.batches.controller, self.max_events);
        drain(&self.inputs.drum, &mut self.batches.drum, self.max_events);
        drain(&self.inputs.clock, &mut self.batches.clock, self.max_events);

        self.outputs.clear();
        let period = Period {
            controller: &self.batches.controller,
            drum: &self.batches.drum,
            clock: &self.batches.clock,
        };
        let result = self.engine.process(&period, &mut self.outputs);
        let flushed = self.flush();
        result.context("Period failed")?;
        flushed
    }

    /// Run periods until `running` is cleared.
    pub fn run(&mut self, period: Duration, running: &AtomicBool) {
        while running.load(Ordering::Relaxed) {
            if let Err(e) = self.run_period() {
                log::error!("{:#}", e);
            }
            thread::sleep(period);
        }
    }

    fn flush(&mut self) -> Result<()> {
        for message in self.outputs.drum.messages() {
            self.drum_out.send(message).context("Failed to write to drum module")?;
        }
        for message in self.outputs.controller.messages() {
            self.controller_out
                .send(message)
                .context("Failed to write to controller")?;
        }
        Ok(())
    }
}

fn drain(rx: &Receiver<RawMessage>, batch: &mut Vec<RawMessage>, max: usize) {
    batch.clear();
    batch.extend(rx.try_iter().take(max));
}
