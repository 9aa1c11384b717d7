use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::dim_to_coords;
use crate::*;

/// Everything a presentation layer needs to draw the board after a move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub difficulty: Option<Difficulty>,
    pub status: GameStatus,
    pub flags_remaining: CellCount,
    pub triggered_mine: Option<Coord2>,
    pub cells: Array2<Cell>,
}

impl BoardSnapshot {
    pub fn from_engine(engine: &Minesweeper) -> Self {
        let size = engine.size();
        let cells = Array2::from_shape_fn(size.to_nd_index(), |index| {
            engine.cell_at(dim_to_coords(index))
        });

        Self {
            size,
            difficulty: engine.difficulty(),
            status: engine.status(),
            flags_remaining: engine.flags_remaining(),
            triggered_mine: engine.triggered_mine(),
            cells,
        }
    }

    /// Renders the grid one row per line using [`Cell::glyph`].
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.cells.len() + self.cells.nrows());
        for row in self.cells.rows() {
            text.extend(row.iter().map(|cell| cell.glyph()));
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_engine_maps_revealed_and_flagged_cells() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut engine = Minesweeper::from_layout(layout);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 0)).unwrap();

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.flags_remaining, 0);
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.cells[(1, 1)].neighbor_mines, 1);
        assert!(snapshot.cells[(1, 1)].is_revealed);
        assert!(snapshot.cells[(0, 0)].is_flagged);
        assert_eq!(snapshot.to_text(), "F#\n#1\n");
    }

    #[test]
    fn serializes_to_json() {
        let snapshot = Minesweeper::new(Difficulty::Easy, 4).snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
    }
}
