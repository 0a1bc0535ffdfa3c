//! Block grid
//!
//! Rows are only ever added or shifted as a whole, so columns never have
//! gaps below an occupied cell. Blocks keep their id when they move.

use rand::Rng;

use super::state::{Block, BlockId, IdSource};
use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::rules::Rules;

/// Result of trying to push a new row in from the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowInjection {
    /// Everything moved up one row and a fresh bottom row spawned
    Injected,
    /// The top row was occupied; nothing changed
    Overflow,
}

/// All live blocks, kept sorted by id for stable iteration
#[derive(Debug, Clone, Default)]
pub struct Grid {
    blocks: Vec<Block>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.blocks[i])
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Block occupying a cell, if any
    pub fn at(&self, row: usize, col: usize) -> Option<&Block> {
        self.blocks.iter().find(|b| b.row == row && b.col == col)
    }

    /// Highest occupied row (smallest index)
    pub fn top_row(&self) -> Option<usize> {
        self.blocks.iter().map(|b| b.row).min()
    }

    /// True when a block sits in row 0 and another row would overflow
    pub fn reaches_top(&self) -> bool {
        self.top_row() == Some(0)
    }

    /// Sum of the values of the given ids; unknown ids count as zero
    pub fn sum_of(&self, ids: &[BlockId]) -> u32 {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(|b| b.value as u32)
            .sum()
    }

    /// Fill `row` with one fresh random block per column
    pub fn spawn_row<R, I>(&mut self, row: usize, rules: &Rules, rng: &mut R, ids: &mut I)
    where
        R: Rng + ?Sized,
        I: IdSource + ?Sized,
    {
        for col in 0..GRID_WIDTH {
            let block = Block {
                id: ids.next_id(),
                value: rng.random_range(rules.min_value..=rules.max_value),
                row,
                col,
            };
            self.insert(block);
        }
    }

    /// Loss check, then shift every block up and spawn a new bottom row
    pub fn inject_row<R, I>(&mut self, rules: &Rules, rng: &mut R, ids: &mut I) -> RowInjection
    where
        R: Rng + ?Sized,
        I: IdSource + ?Sized,
    {
        if self.reaches_top() {
            return RowInjection::Overflow;
        }
        for block in &mut self.blocks {
            block.row -= 1;
        }
        self.spawn_row(GRID_HEIGHT - 1, rules, rng, ids);
        RowInjection::Injected
    }

    /// Remove the given ids, returning the removed blocks in id order
    pub fn remove(&mut self, ids: &[BlockId]) -> Vec<Block> {
        let mut removed = Vec::with_capacity(ids.len());
        self.blocks.retain(|b| {
            if ids.contains(&b.id) {
                removed.push(*b);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Insert keeping id order. Callers guarantee the id and the cell are free.
    fn insert(&mut self, block: Block) {
        debug_assert!(self.at(block.row, block.col).is_none(), "cell already occupied");
        match self.blocks.binary_search_by_key(&block.id, |b| b.id) {
            Ok(i) => self.blocks[i] = block,
            Err(i) => self.blocks.insert(i, block),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_blocks(mut blocks: Vec<Block>) -> Self {
        blocks.sort_by_key(|b| b.id);
        Self { blocks }
    }
}
