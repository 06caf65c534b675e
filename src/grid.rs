//! Trigger pattern storage: six tracks of 64 on/off steps plus the track
//! cursor that grid edits and the grid display follow.

/// Steps per track.
pub const STEPS: usize = 64;

/// Independent pattern rows, one per drum-module channel.
pub const TRACKS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerGrid {
    cells: [[bool; STEPS]; TRACKS],
    selected: usize,
}

impl TriggerGrid {
    pub fn new() -> Self {
        Self {
            cells: [[false; STEPS]; TRACKS],
            selected: 0,
        }
    }

    /// Whether `(track, step)` is on. Out-of-range coordinates read as off.
    pub fn get(&self, track: usize, step: usize) -> bool {
        self.cells
            .get(track)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    /// Flip `(track, step)` and return its new value, or `None` if the
    /// coordinates are out of range.
    pub fn toggle(&mut self, track: usize, step: usize) -> Option<bool> {
        let cell = self.cells.get_mut(track)?.get_mut(step)?;
        *cell = !*cell;
        Some(*cell)
    }

    /// Turn every cell off. The selected track is left alone.
    pub fn clear(&mut self) {
        self.cells = [[false; STEPS]; TRACKS];
    }

    pub fn selected_track(&self) -> usize {
        self.selected
    }

    /// Select a track. Returns false (and changes nothing) if out of range.
    pub fn select_track(&mut self, track: usize) -> bool {
        if track < TRACKS {
            self.selected = track;
            true
        } else {
            false
        }
    }

    /// Whether `step` is on in the selected track.
    pub fn selected_step(&self, step: usize) -> bool {
        self.get(self.selected, step)
    }

    /// Tracks with `step` on, in track order.
    pub fn tracks_at(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        (0..TRACKS).filter(move |&track| self.get(track, step))
    }
}

impl Default for TriggerGrid {
    fn default() -> Self {
        Self::new()
    }
}
