// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid overlay — 1px lines along block boundaries for the mosaic look.

use image::Rgba;

use crate::filter::FilterStats;
use crate::raster::buffer::{CHANNELS, PixelView};

/// Stroke a 1px line at every column `x = k * block_size` and every row
/// `y = k * block_size` of `view`, compositing `color` over the existing
/// pixels (source-over, straight alpha).
///
/// Only grid pixels are written. Each grid pixel is composited once, so
/// intersections are not darker than the lines through them. Must run after
/// pixelation, otherwise the lines would be averaged into the blocks.
pub fn draw_grid(view: &mut PixelView<'_>, block_size: u32, color: Rgba<u8>) -> FilterStats {
    let block = block_size.max(1);
    let width = view.width();
    let mut stats = FilterStats {
        cells: (width.div_ceil(block) + view.height().div_ceil(block)) as u64,
        pixels: 0,
    };

    for y in 0..view.height() {
        let on_row_line = y % block == 0;
        let Some(row) = view.row_mut(y) else { break };
        for (x, px) in (0..width).zip(row.chunks_exact_mut(CHANNELS)) {
            if on_row_line || x % block == 0 {
                blend_over(px, color.0);
                stats.pixels += 1;
            }
        }
    }
    stats
}

/// Composite `src` over the RGBA pixel `dst` in place.
fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let src_a = src[3] as u32;
    if src_a == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    if src_a == 0 {
        return;
    }

    let dst_a = dst[3] as u32;
    // Output alpha scaled by 255.
    let out_a = src_a * 255 + dst_a * (255 - src_a);
    for c in 0..3 {
        let num = src[c] as u32 * src_a * 255 + dst[c] as u32 * dst_a * (255 - src_a);
        dst[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
