//! Property coverage for the pointer grid.
//!
//! Random tilings exercise marker layouts across every alignment class: the
//! probe must resolve each index to the range that actually covers it, never
//! to a neighbor, and clearing a tiling must leave no stale markers behind.

use proptest::prelude::*;

use crate::state::grid::PointerGrid;

fn widths_strategy() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(1u64..=700, 1..24)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    /// Every index of a random contiguous tiling resolves to the start of
    /// the range covering it.
    #[test]
    fn locate_resolves_random_tilings(widths in widths_strategy()) {
        let mut grid = PointerGrid::default();
        let mut starts = Vec::new();
        let mut cursor = 1u64;
        for width in &widths {
            grid.set_range_pointers(cursor, cursor + width, cursor);
            starts.push((cursor, cursor + width));
            cursor += width;
        }

        for &(start, stop) in &starts {
            for index in start..stop {
                prop_assert_eq!(grid.locate(index), start, "index {}", index);
            }
        }
    }

    /// Clearing every range of a tiling empties the grid: the writer and the
    /// clearer must compute the same marker set.
    #[test]
    fn set_then_clear_leaves_nothing(widths in widths_strategy()) {
        let mut grid = PointerGrid::default();
        let mut spans = Vec::new();
        let mut cursor = 1u64;
        for width in &widths {
            grid.set_range_pointers(cursor, cursor + width, cursor);
            spans.push((cursor, cursor + width));
            cursor += width;
        }
        for &(start, stop) in &spans {
            grid.set_range_pointers(start, stop, 0);
        }
        prop_assert_eq!(grid.marked_cells(), 0);
    }

    /// Marker count per range is bounded by the level count, not the width.
    #[test]
    fn marker_count_is_logarithmic(start in 1u64..=1_000_000, width in 1u64..=1_000_000) {
        let mut grid = PointerGrid::default();
        grid.set_range_pointers(start, start + width, start);
        prop_assert!(grid.marked_cells() <= 8, "{} markers", grid.marked_cells());
    }

    /// Re-marking a split in place (clear whole, mark halves) preserves
    /// resolution on both sides of the cut.
    #[test]
    fn split_preserves_resolution(width in 2u64..=2_000, cut_offset in 1u64..=1_999) {
        let cut = 1 + (cut_offset % (width - 1).max(1));
        prop_assume!(cut > 1 && cut < 1 + width);
        let mut grid = PointerGrid::default();
        grid.set_range_pointers(1, 1 + width, 1);
        grid.set_range_pointers(1, 1 + width, 0);
        grid.set_range_pointers(1, cut, 1);
        grid.set_range_pointers(cut, 1 + width, cut);

        for index in 1..cut {
            prop_assert_eq!(grid.locate(index), 1);
        }
        for index in cut..1 + width {
            prop_assert_eq!(grid.locate(index), cut);
        }
    }
}
