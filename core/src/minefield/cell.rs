use serde::{Deserialize, Serialize};

/// Player-visible mark stored per cell by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// Read-only view of a single cell, combining the layout with the player marks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub neighbor_mines: u8,
}

impl Cell {
    pub(crate) const fn new(is_mine: bool, state: CellState, neighbor_mines: u8) -> Self {
        Self {
            is_mine,
            is_revealed: matches!(state, CellState::Revealed),
            is_flagged: matches!(state, CellState::Flagged),
            neighbor_mines,
        }
    }

    /// Single character used by text front ends.
    pub const fn glyph(self) -> char {
        match (self.is_flagged, self.is_revealed, self.is_mine) {
            (true, _, _) => 'F',
            (false, false, _) => '#',
            (false, true, true) => '*',
            (false, true, false) => match self.neighbor_mines {
                0 => '.',
                n => (b'0' + n) as char,
            },
        }
    }
}
