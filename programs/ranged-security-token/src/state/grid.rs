use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::utils::constants::GRID_BASE;

/// Sparse lookup grid over the 48-bit index space.
///
/// For every live range `[start, stop)` the grid holds the value `start` at a
/// small set of cells: `start` itself, `stop - 1`, and one level boundary per
/// skip level walking down from `stop - 1` (a boundary divisible by the next
/// level up is deferred to that level, where it is written exactly once).
/// All other cells read as zero.
///
/// `locate` probes upward from any index, multiplying its stride by 16 each
/// time it crosses a level boundary. At stride `16^k` the probe visits every
/// multiple of `16^k` until one divides `16^(k+1)`, so the highest marked
/// boundary below `stop` at each level is always on the probe's path and the
/// probe resolves in O(log16 N) cell reads without ever leaving the range.
///
/// The cells live in a `BTreeMap` rather than a flat array: the index space
/// is 2^48 wide and the marked set per range is O(log16 N), so a sparse
/// ordered map is the natural host-side representation (absent key = zero).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct PointerGrid {
    cells: BTreeMap<u64, u64>,
}

impl PointerGrid {
    /// Raw cell read; zero means unmarked.
    #[inline(always)]
    pub fn get(&self, index: u64) -> u64 {
        self.cells.get(&index).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn set(&mut self, index: u64, value: u64) {
        if value == 0 {
            self.cells.remove(&index);
        } else {
            self.cells.insert(index, value);
        }
    }

    /// Number of marked cells. Test and bench instrumentation.
    pub fn marked_cells(&self) -> usize {
        self.cells.len()
    }

    /// Resolves the start pointer of the range enclosing `index`.
    ///
    /// Callers must ensure `index` lies inside the allocated space; probing
    /// an index past the last marked range does not terminate.
    pub fn locate(&self, index: u64) -> u64 {
        let mut probe = index;
        let mut increment = 1u64;
        loop {
            let cell = self.get(probe);
            if cell != 0 {
                return cell;
            }
            if probe % (increment * GRID_BASE) == 0 {
                increment *= GRID_BASE;
            }
            probe += increment;
        }
    }

    /// Writes `value` over the marker set of `[start, stop)`; `value == 0`
    /// clears it. Split, merge, and resize must clear with the exact span
    /// they marked with, otherwise stale boundaries survive.
    pub fn set_range_pointers(&mut self, start: u64, stop: u64, value: u64) {
        self.set(start, value);
        let last = stop - 1;
        if start == last {
            return;
        }
        self.set(last, value);

        let mut interval = GRID_BASE;
        loop {
            let boundary = (last / interval) * interval;
            if boundary <= start {
                return;
            }
            let next = interval * GRID_BASE;
            // A boundary divisible by the next level belongs to that level.
            if boundary % next != 0 {
                self.set(boundary, value);
            }
            interval = next;
        }
    }
}
