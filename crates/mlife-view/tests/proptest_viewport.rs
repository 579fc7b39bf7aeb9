//! Property-based tests for viewport rasterisation and view redraws.
//!
//! 1. Panning equals rasterising the rolled grid at the origin.
//! 2. At unit scale every unit maps to the wrapped grid cell.
//! 3. A raster always has exactly the requested extent.
//! 4. Repeated identical updates present once.

use std::cell::RefCell;
use std::rc::Rc;

use mlife_core::Grid;
use mlife_view::{Extent, MemoryLog, MemorySurface, SurfaceView, View, ViewOptions, Viewport};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn grid_strategy() -> impl Strategy<Value = Grid> {
    (1usize..=12, 1usize..=12).prop_flat_map(|(w, h)| {
        proptest::collection::vec(0u8..=1, w * h).prop_map(move |cells| {
            let rows: Vec<&[u8]> = cells.chunks(w).collect();
            Grid::from_rows(&rows).expect("non-empty rectangular rows")
        })
    })
}

fn memory_view(extent: Extent) -> (SurfaceView<MemorySurface>, Rc<RefCell<MemoryLog>>) {
    let surface = MemorySurface::new(extent.width, extent.height);
    let log = surface.log();
    let view = SurfaceView::new(surface, ViewOptions::default()).expect("default options");
    (view, log)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Pan is a roll
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pan_equals_roll(
        grid in grid_strategy(),
        x in -40i64..40,
        y in -40i64..40,
        tw in 0usize..30,
        th in 0usize..30,
    ) {
        let extent = Extent::new(tw, th);
        let panned = Viewport::new((x, y), Some(1.0)).rasterise(&grid, extent);
        let rolled = Viewport::new((0, 0), Some(1.0)).rasterise(&grid.rolled(x, y), extent);
        prop_assert_eq!(panned, rolled);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Unit scale tiles the grid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unit_scale_wraps(grid in grid_strategy(), tw in 1usize..30, th in 1usize..30) {
        let raster = Viewport::new((0, 0), Some(1.0)).rasterise(&grid, Extent::new(tw, th));
        for i in 0..th {
            for j in 0..tw {
                prop_assert_eq!(raster.get(j, i), grid.get(j as i64, i as i64));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Raster extent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn raster_has_requested_extent(
        grid in grid_strategy(),
        tw in 0usize..50,
        th in 0usize..50,
        scale in proptest::option::of(0.125f64..6.0),
    ) {
        let extent = Extent::new(tw, th);
        let raster = Viewport::new((0, 0), scale).rasterise(&grid, extent);
        prop_assert_eq!(raster.extent(), extent);
        prop_assert_eq!(raster.values().len(), tw * th);
        prop_assert!(raster.values().iter().all(|&v| v <= 1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Dirty idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identical_updates_present_once(grid in grid_strategy(), repeats in 1usize..6) {
        let (mut view, log) = memory_view(Extent::new(16, 9));
        for _ in 0..repeats {
            view.update(Some(&grid), true).expect("open view");
        }
        prop_assert_eq!(log.borrow().presents, 1);
    }
}
