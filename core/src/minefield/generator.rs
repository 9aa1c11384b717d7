use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Places mines uniformly at random by rejection sampling: pick any cell, retry if it already holds a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let config = GameConfig::new(config.size, config.mines);
        let (rows, cols) = config.size;
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        // optimize for full boards, sampling would spend forever on the last few cells
        if config.mines == config.total_cells() {
            mines.fill(true);
        } else {
            let mut rng = SmallRng::seed_from_u64(self.seed);
            let mut mines_placed: CellCount = 0;
            let mut attempts: u64 = 0;
            while mines_placed < config.mines {
                let coords: Coord2 = (rng.random_range(0..rows), rng.random_range(0..cols));
                attempts += 1;
                let cell = &mut mines[coords.to_nd_index()];
                if !*cell {
                    *cell = true;
                    mines_placed += 1;
                }
            }
            log::trace!(
                "Placed {} mines on {}x{} in {} attempts",
                mines_placed,
                rows,
                cols,
                attempts
            );
        }

        match MineLayout::from_mine_mask(mines) {
            Ok(layout) => layout,
            // config is clamped to at least 1x1 above
            Err(err) => unreachable!("generated board has an invalid shape: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_gets_exact_mine_count() {
        for (seed, tier) in Difficulty::ALL.into_iter().enumerate() {
            let config = tier.config();
            let layout = RandomMinefieldGenerator::new(seed as u64).generate(config);

            assert_eq!(layout.size(), config.size);
            assert_eq!(layout.mine_count(), config.mines);
            assert_eq!(layout.iter_mines().count(), usize::from(config.mines));
            assert_eq!(layout.safe_cell_count(), config.total_cells() - config.mines);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = Difficulty::Medium.config();
        let a = RandomMinefieldGenerator::new(7).generate(config);
        let b = RandomMinefieldGenerator::new(7).generate(config);
        let c = RandomMinefieldGenerator::new(8).generate(config);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn full_board_is_all_mines() {
        let layout = RandomMinefieldGenerator::new(0).generate(GameConfig::new((3, 3), 9));
        assert_eq!(layout.mine_count(), 9);
        assert_eq!(layout.safe_cell_count(), 0);
    }

    #[test]
    fn empty_board_has_no_mines() {
        let layout = RandomMinefieldGenerator::new(0).generate(GameConfig::new((4, 4), 0));
        assert_eq!(layout.mine_count(), 0);
    }
}
