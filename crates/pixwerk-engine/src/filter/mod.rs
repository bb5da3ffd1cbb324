// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter module — in-place raster transforms that operate on a `PixelView`:
// block averaging, colour quantisation, grid overlay and multi-region
// composition.

pub mod block_average;
pub mod grid;
pub mod quantize;
pub mod region;

pub use block_average::pixelate_view;
pub use grid::draw_grid;
pub use quantize::quantize_view;
pub use region::RegionCompositor;

/// Work done by a filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Blocks, regions or grid lines visited, depending on the filter.
    pub cells: u64,
    /// Pixels written.
    pub pixels: u64,
}
