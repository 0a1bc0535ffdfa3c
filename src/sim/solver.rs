//! Auto-play helper
//!
//! Finds a set of live blocks whose values add up to the target. Drives the
//! headless demo and lets tests confirm every generated target is reachable.

use super::state::{Block, BlockId};

/// Find distinct blocks summing exactly to `target`, or `None` if no subset does.
///
/// 0/1 subset-sum over the (small) value range: `reached[s]` remembers the
/// block that first reached sum `s` and the sum it extended.
pub fn find_selection(blocks: &[Block], target: u32) -> Option<Vec<BlockId>> {
    if target == 0 {
        return None;
    }
    let target = target as usize;
    let mut reached: Vec<Option<(usize, usize)>> = vec![None; target + 1];

    for (i, block) in blocks.iter().enumerate() {
        let value = block.value as usize;
        if value == 0 || value > target {
            continue;
        }
        // Descending so each block extends only sums from earlier blocks
        for sum in (value..=target).rev() {
            if reached[sum].is_some() {
                continue;
            }
            let prev = sum - value;
            if prev == 0 || reached[prev].is_some() {
                reached[sum] = Some((i, prev));
            }
        }
        if reached[target].is_some() {
            break;
        }
    }

    let mut selection = Vec::new();
    let mut sum = target;
    while sum > 0 {
        let (i, prev) = reached[sum]?;
        selection.push(blocks[i].id);
        sum = prev;
    }
    Some(selection)
}
