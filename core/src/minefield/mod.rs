use core::fmt;
use core::ops::{BitOr, Index};
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::dim_to_coords;
use crate::*;

pub use cell::*;
pub use engine::*;
pub use generator::*;
pub use snapshot::*;

mod cell;
mod engine;
mod generator;
mod snapshot;

/// Named board preset fixing the grid side and mine count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((9, 9), 10),
            Self::Medium => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((22, 22), 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("expected one of: easy, medium, hard")]
pub struct UnknownDifficulty;

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownDifficulty)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Builds a config, clamping the board to at least one cell and the mines to what fits.
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let total = mult(rows, cols);
        if mines > total {
            log::warn!("Requested {mines} mines but only {total} cells fit, clamping");
        }
        Self::new_unchecked((rows, cols), mines.min(total))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Where the mines are, with the neighbor count of every safe cell precomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 || rows > Coord::MAX.into() || cols > Coord::MAX.into() {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count: CellCount = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyMines)?;

        let mut adjacent = Array2::<u8>::zeros(mine_mask.dim());
        for ((row, col), count) in adjacent.indexed_iter_mut() {
            if mine_mask[[row, col]] {
                continue;
            }
            let coords = dim_to_coords((row, col));
            // at most 8 neighbors, always fits
            *count = mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8;
        }

        Ok(Self {
            mine_mask,
            adjacent,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if mine_coords.len() > usize::from(mult(size.0, size.1)) {
            return Err(GameError::TooManyMines);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        dim_to_coords(self.mine_mask.dim())
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines in the Moore neighborhood of a safe cell; always 0 for mine cells.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|(index, _)| dim_to_coords(index))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merges outcomes of a multi-cell reveal, the most significant one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts mine neighbors by scanning offsets directly, independent of `NeighborIter`.
    fn brute_force_count(layout: &MineLayout, (row, col): Coord2) -> u8 {
        let (rows, cols) = layout.size();
        let mut count = 0;
        for d_row in -1i16..=1 {
            for d_col in -1i16..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let r = i16::from(row) + d_row;
                let c = i16::from(col) + d_col;
                if r < 0 || c < 0 || r >= i16::from(rows) || c >= i16::from(cols) {
                    continue;
                }
                if layout.contains_mine((r as Coord, c as Coord)) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn tiers_match_presets() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new((9, 9), 10));
        assert_eq!(Difficulty::Medium.config(), GameConfig::new((16, 16), 40));
        assert_eq!(Difficulty::Hard.config(), GameConfig::new((22, 22), 99));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Medium".parse(), Ok(Difficulty::Medium));
        assert_eq!(" hard ".parse(), Ok(Difficulty::Hard));
        assert_eq!("expert".parse::<Difficulty>(), Err(UnknownDifficulty));
        assert_eq!(Difficulty::Easy.to_string(), "easy");
    }

    #[test]
    fn unknown_difficulty_is_an_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownDifficulty);
        assert_eq!(err.to_string(), "expected one of: easy, medium, hard");
    }

    #[test]
    fn config_clamps_mines_to_board() {
        let config = GameConfig::new((0, 3), 50);
        assert_eq!(config.size, (1, 3));
        assert_eq!(config.mines, 3);
    }

    #[test]
    fn adjacency_matches_brute_force() {
        let mines = [(0, 0), (0, 4), (1, 2), (2, 2), (3, 0), (4, 4), (4, 3)];
        let layout = MineLayout::from_mine_coords((5, 5), &mines).unwrap();

        assert_eq!(layout.mine_count(), 7);
        assert_eq!(layout.safe_cell_count(), 18);
        for row in 0..5 {
            for col in 0..5 {
                let expected = if layout.contains_mine((row, col)) {
                    0
                } else {
                    brute_force_count(&layout, (row, col))
                };
                assert_eq!(
                    layout.adjacent_mine_count((row, col)),
                    expected,
                    "mismatch at ({row}, {col})"
                );
            }
        }
        assert_eq!(layout.adjacent_mine_count((1, 1)), 3);
        assert_eq!(layout.adjacent_mine_count((3, 3)), 3);
    }

    #[test]
    fn rejects_out_of_range_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            MineLayout::from_mine_coords((1, 1), &[(0, 0), (0, 0)]),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            MineLayout::from_mine_coords((0, 4), &[]),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn iter_mines_lists_every_mine() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(2, 2), (0, 1)]).unwrap();
        let mines: Vec<_> = layout.iter_mines().collect();
        assert_eq!(mines, vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn reveal_outcomes_merge_by_priority() {
        use RevealOutcome::*;
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
