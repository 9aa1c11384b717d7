use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One minesweeper session: the mine layout plus everything the player has done to it.
///
/// Moves the game does not allow (revealing a flagged cell, flagging a revealed one, anything after the
/// game ended) are absorbed and reported as `NoChange`. Only coordinates outside the board are errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minesweeper {
    difficulty: Option<Difficulty>,
    layout: MineLayout,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl Minesweeper {
    /// Starts a game on a freshly generated board for `difficulty`.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let layout = RandomMinefieldGenerator::new(seed).generate(difficulty.config());
        log::debug!("New {} game, seed {}", difficulty, seed);
        Self {
            difficulty: Some(difficulty),
            ..Self::from_layout(layout)
        }
    }

    /// Starts a game on a custom board size.
    pub fn with_config(config: GameConfig, seed: u64) -> Self {
        Self::from_layout(RandomMinefieldGenerator::new(seed).generate(config))
    }

    /// Starts a game on a known layout.
    pub fn from_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            difficulty: None,
            layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            status: GameStatus::Playing,
            triggered_mine: None,
        }
    }

    /// Throws the current board away and deals a new one with the same size and mine count.
    pub fn reset(&mut self, seed: u64) {
        *self = match self.difficulty {
            Some(difficulty) => Self::new(difficulty, seed),
            None => Self::with_config(self.layout.game_config(), seed),
        };
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty, seed: u64) {
        *self = Self::new(difficulty, seed);
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// Mines minus placed flags, between zero and the total mine count.
    pub fn flags_remaining(&self) -> CellCount {
        self.layout.mine_count() - self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn state_at(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    /// Panics when `coords` is outside the board.
    pub fn cell_at(&self, coords: Coord2) -> Cell {
        Cell::new(
            self.layout.contains_mine(coords),
            self.state_at(coords),
            self.layout.adjacent_mine_count(coords),
        )
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.cell_at(coords))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_engine(self)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.layout.validate_coords(coords)?;
        if self.status.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.board[coords.to_nd_index()] {
            Hidden if self.flags_remaining() == 0 => NoChange,
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        if self.status.is_finished() || self.board[coords.to_nd_index()] != CellState::Hidden {
            return Ok(RevealOutcome::NoChange);
        }
        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals all hidden neighbors of a numbered cell once the flags around it add up, otherwise acts like
    /// [`Self::reveal`].
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        if !self.can_chord_reveal_at(coords) {
            return self.reveal(coords);
        }

        let neighbors: Vec<_> = self.layout.iter_neighbors(coords).collect();
        let mut outcome = RevealOutcome::NoChange;
        for pos in neighbors {
            if self.status.is_finished() {
                break;
            }
            if self.board[pos.to_nd_index()] == CellState::Hidden {
                outcome = outcome | self.reveal_single_cell(pos);
            }
        }
        Ok(outcome)
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        if self.status.is_finished() || self.board[coords.to_nd_index()] != CellState::Revealed {
            return false;
        }
        let count = self.layout.adjacent_mine_count(coords);
        count > 0 && count == self.count_flagged_neighbors(coords)
    }

    /// Reveals a hidden cell, zero-expanding through an explicit work queue.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        self.board[coords.to_nd_index()] = CellState::Revealed;

        if self.layout.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        self.revealed_count += 1;
        log::trace!(
            "Revealed {:?}, neighbor mines: {}",
            coords,
            self.layout.adjacent_mine_count(coords)
        );

        if self.layout.adjacent_mine_count(coords) == 0 {
            // cells are marked when queued, so each one is pushed at most once
            let mut to_visit = VecDeque::from([coords]);
            while let Some(visit_coords) = to_visit.pop_front() {
                for pos in self.layout.iter_neighbors(visit_coords) {
                    if self.board[pos.to_nd_index()] != CellState::Hidden {
                        continue;
                    }
                    self.board[pos.to_nd_index()] = CellState::Revealed;
                    self.revealed_count += 1;

                    let count = self.layout.adjacent_mine_count(pos);
                    log::trace!("Flood revealed {:?}, neighbor mines: {}", pos, count);
                    if count == 0 {
                        to_visit.push_back(pos);
                    }
                }
            }
        }

        if self.revealed_count == self.layout.safe_cell_count() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        if won {
            self.status = GameStatus::Won;
        } else {
            self.status = GameStatus::Lost;
            self.reveal_mines();
        }
        log::debug!(
            "Game ended: {:?}, revealed {} of {} safe cells",
            self.status,
            self.revealed_count,
            self.layout.safe_cell_count()
        );
    }

    /// Shows every unflagged mine; flagged mines keep their flag.
    fn reveal_mines(&mut self) {
        let Self { layout, board, .. } = self;
        for coords in layout.iter_mines() {
            let state = &mut board[coords.to_nd_index()];
            if *state == CellState::Hidden {
                *state = CellState::Revealed;
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.layout
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos.to_nd_index()] == CellState::Flagged)
            .count() as u8
    }
}
