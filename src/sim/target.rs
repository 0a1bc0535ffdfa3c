//! Target generation
//!
//! Targets are built by summing a random sample of live blocks, so every
//! target has at least one exact solution when it is generated.

use rand::Rng;
use rand::seq::index;

use super::grid::Grid;
use super::state::BlockId;
use crate::consts::EMPTY_GRID_TARGET;
use crate::rules::Rules;

/// A generated target and the blocks that were sampled to build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub value: u32,
    pub witness: Vec<BlockId>,
}

/// Sample 2..=4 distinct blocks (fewer if the grid is smaller) and sum them
pub fn generate_target<R: Rng + ?Sized>(grid: &Grid, rules: &Rules, rng: &mut R) -> Target {
    if grid.is_empty() {
        return Target {
            value: EMPTY_GRID_TARGET,
            witness: Vec::new(),
        };
    }

    let count = rng
        .random_range(rules.min_samples..=rules.max_samples)
        .min(grid.len());
    let blocks = grid.blocks();
    let witness: Vec<BlockId> = index::sample(rng, blocks.len(), count)
        .into_iter()
        .map(|i| blocks[i].id)
        .collect();

    Target {
        value: grid.sum_of(&witness),
        witness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Block, SequentialIds};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_grid_default_target() {
        let mut rng = Pcg32::seed_from_u64(0);
        let target = generate_target(&Grid::new(), &Rules::default(), &mut rng);
        assert_eq!(target.value, 10);
        assert!(target.witness.is_empty());
    }

    #[test]
    fn test_target_is_sum_of_distinct_sample() {
        let rules = Rules::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut ids = SequentialIds::default();
        let mut grid = Grid::new();
        for row in 6..10 {
            grid.spawn_row(row, &rules, &mut rng, &mut ids);
        }

        for _ in 0..200 {
            let target = generate_target(&grid, &rules, &mut rng);
            assert!((2..=4).contains(&target.witness.len()));

            let mut unique = target.witness.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), target.witness.len());
            assert_eq!(grid.sum_of(&target.witness), target.value);
        }
    }

    #[test]
    fn test_single_block_grid() {
        let grid = Grid::from_blocks(vec![Block {
            id: BlockId(5),
            value: 7,
            row: 9,
            col: 3,
        }]);
        let mut rng = Pcg32::seed_from_u64(9);
        let target = generate_target(&grid, &Rules::default(), &mut rng);
        assert_eq!(target.value, 7);
        assert_eq!(target.witness, vec![BlockId(5)]);
    }
}
