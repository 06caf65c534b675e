//! The grid sequencer engine.
//!
//! [`Engine`] owns every piece of sequencer state and is driven once per
//! period by the runtime loop: controller events first, then drum-module
//! input, then clock events. All output goes into the period's [`Outputs`].
//!
//! Per-message policy:
//! - malformed messages are logged and skipped, the period continues
//! - unknown message types are ignored
//! - a full output buffer fails the whole period

use crate::clock::Transport;
use crate::codec::{address_to_step, live_velocity, Color, DRUM_NOTE, SEQUENCED_VELOCITY};
use crate::error::EngineError;
use crate::feedback;
use crate::grid::TriggerGrid;
use crate::midi::{hex, RawMessage};
use crate::mode::Mode;
use crate::output::Outputs;
use crate::router::{classify_clock, classify_controller, ClockEvent, ControllerEvent, GridPress};

/// Inbound messages collected for one period.
#[derive(Debug, Clone, Copy, Default)]
pub struct Period<'a> {
    pub controller: &'a [RawMessage],
    pub drum: &'a [RawMessage],
    pub clock: &'a [RawMessage],
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    grid: TriggerGrid,
    mode: Mode,
    transport: Transport,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &TriggerGrid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Reset the controller and draw the initial display.
    pub fn initialize(&mut self, out: &mut Outputs) -> Result<(), EngineError> {
        feedback::reset_controller(&mut out.controller)?;
        feedback::full_refresh(out, &self.grid, self.mode)
    }

    /// Handle every message collected for one period.
    pub fn process(&mut self, period: &Period<'_>, out: &mut Outputs) -> Result<(), EngineError> {
        for raw in period.controller {
            skip_malformed(self.handle_controller(raw.as_bytes(), out))?;
        }
        for raw in period.drum {
            self.handle_drum(raw);
        }
        for raw in period.clock {
            skip_malformed(self.handle_clock(raw.as_bytes(), out))?;
        }
        Ok(())
    }

    /// Handle one controller message.
    pub fn handle_controller(&mut self, raw: &[u8], out: &mut Outputs) -> Result<(), EngineError> {
        match classify_controller(raw)? {
            ControllerEvent::ModeToggle { pressed: true } => self.switch_mode(out),
            ControllerEvent::ModeToggle { pressed: false } => Ok(()),
            ControllerEvent::SceneReserved => Ok(()),
            ControllerEvent::TrackSelect { track } => self.select_track(track, out),
            ControllerEvent::Letter { address } => {
                log::trace!("letter button 0x{:02X}", address);
                Ok(())
            }
            ControllerEvent::Grid(press) => match self.mode {
                Mode::SequencedPlayback => self.toggle_step(press, out),
                Mode::LiveTrigger => self.live_trigger(press, out),
            },
            ControllerEvent::Ignored => {
                log::trace!("ignoring controller message [{}]", hex(raw));
                Ok(())
            }
        }
    }

    /// Handle one clock message.
    pub fn handle_clock(&mut self, raw: &[u8], out: &mut Outputs) -> Result<(), EngineError> {
        match classify_clock(raw)? {
            ClockEvent::Tick => {
                if self.transport.tick() {
                    self.play(out)?;
                }
                Ok(())
            }
            ClockEvent::Start | ClockEvent::Continue => {
                self.transport.restart();
                self.play(out)
            }
            ClockEvent::Stop => Ok(()),
            ClockEvent::Other(status) => {
                log::trace!("ignoring clock byte 0x{:02X}", status);
                Ok(())
            }
        }
    }

    fn handle_drum(&self, raw: &RawMessage) {
        log::debug!("drum module: [{}]", hex(raw.as_bytes()));
    }

    fn switch_mode(&mut self, out: &mut Outputs) -> Result<(), EngineError> {
        self.mode = self.mode.toggled();
        log::debug!("mode -> {:?}", self.mode);
        feedback::full_refresh(out, &self.grid, self.mode)
    }

    fn select_track(&mut self, track: usize, out: &mut Outputs) -> Result<(), EngineError> {
        if !self.grid.select_track(track) {
            return Ok(());
        }
        log::debug!("selected track {}", track);
        if self.mode == Mode::LiveTrigger {
            return Ok(());
        }
        feedback::track_leds(&mut out.controller, &self.grid)?;
        feedback::grid_leds(&mut out.controller, &self.grid)
    }

    fn toggle_step(&mut self, press: GridPress, out: &mut Outputs) -> Result<(), EngineError> {
        if !press.is_down() {
            return Ok(());
        }
        let step = address_to_step(press.address);
        let Some(on) = self.grid.toggle(self.grid.selected_track(), step) else {
            return Ok(());
        };
        out.controller
            .write([press.status, press.address, Color::for_cell(on).byte()])
    }

    fn live_trigger(&mut self, press: GridPress, out: &mut Outputs) -> Result<(), EngineError> {
        let column = press.address % 8;
        out.drum.write([
            press.status.wrapping_add(column),
            DRUM_NOTE,
            live_velocity(press.address),
        ])?;
        out.controller
            .write([press.status, press.address, Color::Live.byte()])
    }

    /// Fire every track that is on at the current step, update the playhead
    /// and advance the cursor.
    fn play(&mut self, out: &mut Outputs) -> Result<(), EngineError> {
        let step = self.transport.current_step();
        for track in self.grid.tracks_at(step) {
            feedback::drum_trigger(&mut out.drum, track, SEQUENCED_VELOCITY)?;
        }

        // In live-trigger mode the grid belongs to the player's hands.
        if self.mode == Mode::SequencedPlayback {
            let lp = &mut out.controller;
            if self.transport.is_first_play() {
                feedback::clear_grid(lp)?;
            } else {
                let previous = self.transport.previous_step();
                feedback::grid_led(lp, previous, Color::for_cell(self.grid.selected_step(previous)))?;
            }
            feedback::grid_led(lp, step, Color::Playhead)?;
        }

        self.transport.advance();
        Ok(())
    }
}

fn skip_malformed(result: Result<(), EngineError>) -> Result<(), EngineError> {
    match result {
        Err(err) if err.is_recoverable() => {
            log::warn!("{}", err);
            Ok(())
        }
        other => other,
    }
}
