// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-channel colour quantisation (posterisation) for pixel-art output.

use pixwerk_core::config::{MAX_COLOR_DEPTH, MIN_COLOR_DEPTH};

use crate::filter::FilterStats;
use crate::raster::buffer::{CHANNELS, PixelView};

/// Lookup table mapping every channel value to its quantised level.
///
/// With `step = 255 / (levels - 1)`, value `v` maps to
/// `round(round(v / step) * step)`. The table is non-decreasing and holds at
/// most `levels` distinct entries.
pub fn level_table(levels: u32) -> [u8; 256] {
    let levels = levels.clamp(MIN_COLOR_DEPTH, MAX_COLOR_DEPTH);
    let step = 255.0 / (levels - 1) as f64;
    let mut table = [0u8; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        let level = (value as f64 / step).round();
        *slot = (level * step).round().clamp(0.0, 255.0) as u8;
    }
    table
}

/// Quantise the R, G and B channels of every pixel in `view` to `levels`
/// discrete values. Alpha is left untouched.
pub fn quantize_view(view: &mut PixelView<'_>, levels: u32) -> FilterStats {
    let table = level_table(levels);
    let mut stats = FilterStats::default();
    for y in 0..view.height() {
        let Some(row) = view.row_mut(y) else { break };
        for px in row.chunks_exact_mut(CHANNELS) {
            for channel in &mut px[..3] {
                *channel = table[*channel as usize];
            }
            stats.pixels += 1;
        }
        stats.cells += 1;
    }
    stats
}
