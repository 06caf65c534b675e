//! Outbound LED and trigger messages.
//!
//! Every function writes straight into the period's [`Outputs`] and stops at
//! the first write that fails. Steady-state updates touch one or two LEDs;
//! [`full_refresh`] is the only burst that covers the whole surface.

use crate::codec::{
    grid_addresses, step_to_address, Color, CONTROLLER_RESET, DRUM_NOTE, MODE_LED,
    TRACK_LED_BASE,
};
use crate::error::EngineError;
use crate::grid::{TriggerGrid, STEPS, TRACKS};
use crate::midi::{CONTROL_CHANGE, NOTE_OFF, NOTE_ON};
use crate::mode::Mode;
use crate::output::{Outputs, PortBuffer};

/// Set the LED of one grid step.
pub fn grid_led(out: &mut PortBuffer, step: usize, color: Color) -> Result<(), EngineError> {
    out.write([NOTE_ON, step_to_address(step), color.byte()])
}

/// Draw the whole grid from the selected track's pattern.
pub fn grid_leds(out: &mut PortBuffer, grid: &TriggerGrid) -> Result<(), EngineError> {
    for step in 0..STEPS {
        grid_led(out, step, Color::for_cell(grid.selected_step(step)))?;
    }
    Ok(())
}

/// Turn every grid LED off with note-offs.
pub fn clear_grid(out: &mut PortBuffer) -> Result<(), EngineError> {
    for address in grid_addresses() {
        out.write([NOTE_OFF, address, Color::Off.byte()])?;
    }
    Ok(())
}

/// Light the selected track's LED and clear the others.
pub fn track_leds(out: &mut PortBuffer, grid: &TriggerGrid) -> Result<(), EngineError> {
    for track in 0..TRACKS {
        let color = if track == grid.selected_track() {
            Color::TrackSelected
        } else {
            Color::Off
        };
        out.write([CONTROL_CHANGE, TRACK_LED_BASE + track as u8, color.byte()])?;
    }
    Ok(())
}

pub fn mode_led(out: &mut PortBuffer, mode: Mode) -> Result<(), EngineError> {
    out.write([CONTROL_CHANGE, MODE_LED, mode.indicator().byte()])
}

/// Put the controller back into its power-on state.
pub fn reset_controller(out: &mut PortBuffer) -> Result<(), EngineError> {
    out.write([CONTROL_CHANGE, CONTROLLER_RESET, 0])
}

/// Fire one drum-module channel.
pub fn drum_trigger(out: &mut PortBuffer, track: usize, velocity: u8) -> Result<(), EngineError> {
    out.write([NOTE_ON + track as u8, DRUM_NOTE, velocity])
}

/// Redraw grid, track LEDs and mode indicator for `mode`.
pub fn full_refresh(out: &mut Outputs, grid: &TriggerGrid, mode: Mode) -> Result<(), EngineError> {
    let lp = &mut out.controller;
    match mode {
        Mode::LiveTrigger => {
            for step in 0..STEPS {
                grid_led(lp, step, Color::Off)?;
            }
            for track in 0..TRACKS {
                lp.write([CONTROL_CHANGE, TRACK_LED_BASE + track as u8, Color::Off.byte()])?;
            }
        }
        Mode::SequencedPlayback => {
            track_leds(lp, grid)?;
            grid_leds(lp, grid)?;
        }
    }
    mode_led(lp, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs() -> Outputs {
        Outputs::new(128)
    }

    #[test]
    fn test_live_refresh_clears_everything() {
        let mut out = outputs();
        let mut grid = TriggerGrid::new();
        grid.toggle(0, 3);
        full_refresh(&mut out, &grid, Mode::LiveTrigger).unwrap();

        let msgs = out.controller.messages();
        assert_eq!(msgs.len(), STEPS + TRACKS + 1);
        assert!(msgs[..STEPS + TRACKS].iter().all(|m| m[2] == 0));
        assert_eq!(msgs[STEPS + TRACKS], [0xB0, 110, 0x30]);
        assert!(out.drum.is_empty());
    }

    #[test]
    fn test_sequenced_refresh_draws_selected_track() {
        let mut out = outputs();
        let mut grid = TriggerGrid::new();
        grid.toggle(2, 9);
        grid.toggle(0, 1);
        grid.select_track(2);
        full_refresh(&mut out, &grid, Mode::SequencedPlayback).unwrap();

        let msgs = out.controller.messages();
        assert_eq!(msgs.len(), TRACKS + STEPS + 1);
        assert_eq!(msgs[2], [0xB0, 106, 0x30]);
        assert_eq!(msgs[0], [0xB0, 104, 0]);

        let grid_msgs = &msgs[TRACKS..TRACKS + STEPS];
        let lit: Vec<_> = grid_msgs.iter().filter(|m| m[2] != 0).collect();
        assert_eq!(lit, vec![&[0x90u8, 0x11, 0x30]]);
        assert_eq!(msgs[TRACKS + STEPS], [0xB0, 110, 0x33]);
    }

    #[test]
    fn test_clear_grid_uses_note_off() {
        let mut out = outputs();
        clear_grid(&mut out.controller).unwrap();
        assert_eq!(out.controller.len(), STEPS);
        assert!(out.controller.messages().iter().all(|m| m[0] == 0x80 && m[2] == 0));
    }

    #[test]
    fn test_drum_trigger_per_track() {
        let mut out = outputs();
        drum_trigger(&mut out.drum, 0, 127).unwrap();
        drum_trigger(&mut out.drum, 5, 127).unwrap();
        assert_eq!(out.drum.messages(), &[[0x90, 60, 127], [0x95, 60, 127]]);
    }

    #[test]
    fn test_refresh_fails_when_full() {
        let mut out = Outputs::new(10);
        let grid = TriggerGrid::new();
        assert!(full_refresh(&mut out, &grid, Mode::SequencedPlayback).is_err());
        assert_eq!(out.controller.len(), 10);
    }
}
