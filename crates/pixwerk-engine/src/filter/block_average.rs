// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block-average pixelation — the primitive behind every Pixwerk operation.

use crate::filter::FilterStats;
use crate::raster::buffer::{CHANNELS, PixelView};

/// Replace every `block_size` x `block_size` cell of `view` with its mean colour.
///
/// The grid starts at the view's own origin, not the parent buffer's. Cells
/// on the right and bottom edges may be smaller than a full block; they are
/// averaged over the pixels actually present. R, G, B and A are averaged
/// independently and rounded half-up to the nearest integer.
///
/// A block size of 1 leaves the view unchanged. Applying the filter twice
/// with a block size above 1 is not guaranteed to be idempotent for
/// sub-views whose grids differ.
pub fn pixelate_view(view: &mut PixelView<'_>, block_size: u32) -> FilterStats {
    let block = block_size.max(1);
    let (width, height) = (view.width(), view.height());
    let area = width as u64 * height as u64;

    if block == 1 {
        return FilterStats {
            cells: area,
            pixels: 0,
        };
    }

    let mut stats = FilterStats::default();
    for cell_y in (0..height).step_by(block as usize) {
        let cell_h = block.min(height - cell_y);
        for cell_x in (0..width).step_by(block as usize) {
            let cell_w = block.min(width - cell_x);
            let mean = cell_mean(view, cell_x, cell_y, cell_w, cell_h);
            fill_cell(view, cell_x, cell_y, cell_w, cell_h, mean);
            stats.cells += 1;
        }
    }
    stats.pixels = area;
    stats
}

fn cell_span(cell_x: u32, cell_w: u32) -> std::ops::Range<usize> {
    let start = cell_x as usize * CHANNELS;
    start..start + cell_w as usize * CHANNELS
}

fn cell_mean(view: &PixelView<'_>, cell_x: u32, cell_y: u32, cell_w: u32, cell_h: u32) -> [u8; 4] {
    let mut sums = [0u64; CHANNELS];
    let mut count = 0u64;

    for y in cell_y..cell_y + cell_h {
        let Some(row) = view.row(y) else { break };
        for px in row[cell_span(cell_x, cell_w)].chunks_exact(CHANNELS) {
            for (sum, &channel) in sums.iter_mut().zip(px) {
                *sum += channel as u64;
            }
            count += 1;
        }
    }

    let mut mean = [0u8; CHANNELS];
    if count > 0 {
        for (out, sum) in mean.iter_mut().zip(sums) {
            *out = ((sum + count / 2) / count) as u8;
        }
    }
    mean
}

fn fill_cell(
    view: &mut PixelView<'_>,
    cell_x: u32,
    cell_y: u32,
    cell_w: u32,
    cell_h: u32,
    color: [u8; 4],
) {
    for y in cell_y..cell_y + cell_h {
        let Some(row) = view.row_mut(y) else { break };
        for px in row[cell_span(cell_x, cell_w)].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::buffer::PixelBuffer;
    use image::Rgba;
    use pixwerk_core::types::Rect;

    /// Deterministic, non-uniform test pattern.
    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            Rgba([
                (x * 37 + y * 11) as u8,
                (x * 5 + y * 53) as u8,
                (x * y * 7) as u8,
                (255 - x * 3 - y) as u8,
            ])
        })
    }

    #[test]
    fn block_size_one_is_identity() {
        let original = gradient(7, 5);
        let mut buffer = original.clone();
        pixelate_view(&mut buffer.full_view(), 1);
        assert_eq!(buffer, original);
    }

    #[test]
    fn four_by_four_yields_four_uniform_blocks() {
        let reds = [
            [10, 20, 50, 60],
            [30, 40, 70, 80],
            [90, 100, 130, 140],
            [110, 120, 150, 160],
        ];
        let mut buffer =
            PixelBuffer::from_fn(4, 4, |x, y| Rgba([reds[y as usize][x as usize], 0, 0, 255]));

        let stats = pixelate_view(&mut buffer.full_view(), 2);
        assert_eq!(stats.cells, 4);

        let expect = |x: u32, y: u32, red: u8| {
            assert_eq!(buffer.get(x, y).ok(), Some(Rgba([red, 0, 0, 255])), "pixel ({x}, {y})");
        };
        for (bx, by, red) in [(0, 0, 25), (2, 0, 65), (0, 2, 105), (2, 2, 145)] {
            expect(bx, by, red);
            expect(bx + 1, by, red);
            expect(bx, by + 1, red);
            expect(bx + 1, by + 1, red);
        }
    }

    #[test]
    fn full_cells_hold_rounded_mean_of_each_channel() {
        let original = gradient(9, 6);
        let mut buffer = original.clone();
        pixelate_view(&mut buffer.full_view(), 3);

        for by in (0..6).step_by(3) {
            for bx in (0..9).step_by(3) {
                let mut sums = [0u32; 4];
                for y in by..by + 3 {
                    for x in bx..bx + 3 {
                        let px = original.get(x, y).expect("in bounds");
                        for c in 0..4 {
                            sums[c] += px.0[c] as u32;
                        }
                    }
                }
                let expected = Rgba(sums.map(|s| ((s as f64) / 9.0).round() as u8));
                for y in by..by + 3 {
                    for x in bx..bx + 3 {
                        assert_eq!(buffer.get(x, y).ok(), Some(expected), "pixel ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn mean_rounds_half_up() {
        let mut buffer = PixelBuffer::from_raw(
            2,
            1,
            vec![1, 0, 10, 255, 2, 1, 11, 254],
        )
        .expect("valid raw buffer");
        pixelate_view(&mut buffer.full_view(), 2);
        // (1+2)/2 = 1.5 -> 2, (0+1)/2 = 0.5 -> 1, (10+11)/2 = 10.5 -> 11, 254.5 -> 255
        assert_eq!(buffer.get(0, 0).ok(), Some(Rgba([2, 1, 11, 255])));
        assert_eq!(buffer.get(1, 0).ok(), Some(Rgba([2, 1, 11, 255])));
    }

    #[test]
    fn edge_cells_average_only_present_pixels() {
        // 3x1 strip with block size 2: the right edge cell is a single pixel
        // and must keep its own value, not be diluted by padding.
        let mut buffer = PixelBuffer::from_raw(
            3,
            1,
            vec![0, 0, 0, 255, 100, 100, 100, 255, 200, 40, 8, 77],
        )
        .expect("valid raw buffer");
        let stats = pixelate_view(&mut buffer.full_view(), 2);
        assert_eq!(stats.cells, 2);
        assert_eq!(buffer.get(0, 0).ok(), Some(Rgba([50, 50, 50, 255])));
        assert_eq!(buffer.get(2, 0).ok(), Some(Rgba([200, 40, 8, 77])));
    }

    #[test]
    fn oversized_block_collapses_to_single_colour() {
        let mut buffer = gradient(5, 3);
        let stats = pixelate_view(&mut buffer.full_view(), 50);
        assert_eq!(stats.cells, 1);
        let first = buffer.get(0, 0).expect("in bounds");
        assert!(buffer.as_image().pixels().all(|px| *px == first));
    }

    #[test]
    fn sub_view_is_tiled_from_its_own_origin() {
        let original = gradient(8, 8);
        let mut buffer = original.clone();
        let region = Rect::new(1, 1, 4, 4);
        {
            let mut view = buffer.view_mut(region).expect("inside");
            pixelate_view(&mut view, 2);
        }
        // The first block covers (1,1)-(2,2), so (1,1) and (2,2) share a colour
        // while (2,2) and (3,3) belong to different blocks.
        assert_eq!(buffer.get(1, 1).ok(), buffer.get(2, 2).ok());
        assert_eq!(buffer.get(3, 3).ok(), buffer.get(4, 4).ok());
        for y in 0..8 {
            for x in 0..8 {
                if !region.contains(x, y) {
                    assert_eq!(buffer.get(x, y).ok(), original.get(x, y).ok(), "pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn reapplying_with_shifted_grid_changes_edges() {
        // Horizontal ramp pixelated with an aligned grid, then again through a
        // view offset by one pixel: the second pass straddles old blocks.
        let mut buffer = PixelBuffer::from_fn(6, 1, |x, _| Rgba([(x * 40) as u8, 0, 0, 255]));
        pixelate_view(&mut buffer.full_view(), 2);
        let once = buffer.clone();
        {
            let mut view = buffer.view_mut(Rect::new(1, 0, 4, 1)).expect("inside");
            pixelate_view(&mut view, 2);
        }
        assert_ne!(buffer, once);
    }
}
