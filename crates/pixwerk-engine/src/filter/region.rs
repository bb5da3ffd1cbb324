// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region composition — pixelate a list of rectangles (faces, number plates,
// sensitive text) instead of the whole raster.

use pixwerk_core::error::Result;
use pixwerk_core::types::Rect;
use tracing::debug;

use crate::filter::block_average::pixelate_view;
use crate::filter::quantize::quantize_view;
use crate::filter::FilterStats;
use crate::raster::buffer::PixelBuffer;

/// Applies block averaging, and optionally quantisation, to rectangles of a
/// buffer.
///
/// Regions are processed in the order given against the same buffer. Where
/// two regions overlap, the later one averages pixels the earlier one has
/// already rewritten. Each region is tiled from its own top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct RegionCompositor {
    block_size: u32,
    levels: Option<u32>,
}

impl RegionCompositor {
    pub fn new(block_size: u32) -> Self {
        Self {
            block_size,
            levels: None,
        }
    }

    /// Quantise each region to `levels` per channel after averaging it.
    pub fn with_quantization(mut self, levels: u32) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Process every region in order. Regions are clamped to the buffer;
    /// those left with no area are skipped.
    ///
    /// `FilterStats::cells` counts the regions actually processed.
    pub fn apply(&self, buffer: &mut PixelBuffer, regions: &[Rect]) -> Result<FilterStats> {
        let (width, height) = buffer.dimensions();
        let mut stats = FilterStats::default();

        for (index, region) in regions.iter().enumerate() {
            let Some(clamped) = region.clamp_to(width, height) else {
                debug!(index, %region, "Region lies outside the image; skipped");
                continue;
            };
            if clamped != *region {
                debug!(index, %region, %clamped, "Region clamped to image bounds");
            }

            let mut view = buffer.view_mut(clamped)?;
            let pass = pixelate_view(&mut view, self.block_size);
            if let Some(levels) = self.levels {
                quantize_view(&mut view, levels);
            }
            stats.cells += 1;
            stats.pixels += pass.pixels;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn stripes() -> PixelBuffer {
        PixelBuffer::from_fn(12, 12, |x, y| {
            Rgba([(x * 20) as u8, (y * 20) as u8, ((x + y) * 9) as u8, 255])
        })
    }

    #[test]
    fn pixels_outside_regions_are_untouched() {
        let original = stripes();
        let mut buffer = original.clone();
        let regions = [Rect::new(0, 0, 4, 4), Rect::new(7, 6, 3, 5)];
        let stats = RegionCompositor::new(2)
            .apply(&mut buffer, &regions)
            .expect("regions are clamped");
        assert_eq!(stats.cells, 2);

        for y in 0..12 {
            for x in 0..12 {
                if !regions.iter().any(|r| r.contains(x, y)) {
                    assert_eq!(buffer.get(x, y).ok(), original.get(x, y).ok(), "pixel ({x}, {y})");
                }
            }
        }
        assert_ne!(buffer, original);
    }

    #[test]
    fn out_of_range_regions_are_clamped_or_skipped() {
        let original = stripes();
        let mut buffer = original.clone();
        let regions = [
            Rect::new(50, 50, 10, 10),
            Rect::new(3, 3, 0, 0),
            Rect::new(10, 10, 100, 100),
        ];
        let stats = RegionCompositor::new(4)
            .apply(&mut buffer, &regions)
            .expect("no OutOfBounds on production path");
        assert_eq!(stats.cells, 1);

        // Only the clamped 2x2 corner changed, collapsed to one colour.
        let corner = buffer.get(10, 10).expect("in bounds");
        for (x, y) in [(11, 10), (10, 11), (11, 11)] {
            assert_eq!(buffer.get(x, y).ok(), Some(corner));
        }
        assert_eq!(buffer.get(9, 9).ok(), original.get(9, 9).ok());
    }

    #[test]
    fn overlapping_regions_compose_sequentially() {
        let original = stripes();
        let first = Rect::new(0, 0, 6, 6);
        let second = Rect::new(3, 3, 6, 6);
        let compositor = RegionCompositor::new(4);

        let mut sequential = original.clone();
        compositor
            .apply(&mut sequential, &[first, second])
            .expect("inside");

        // Independent application: each region against its own pristine copy,
        // merged with the second region winning where they overlap.
        let mut only_first = original.clone();
        compositor.apply(&mut only_first, &[first]).expect("inside");
        let mut only_second = original.clone();
        compositor.apply(&mut only_second, &[second]).expect("inside");
        let merged = PixelBuffer::from_fn(12, 12, |x, y| {
            let source = if second.contains(x, y) {
                &only_second
            } else {
                &only_first
            };
            source.get(x, y).unwrap_or(Rgba([0, 0, 0, 0]))
        });

        assert_ne!(
            sequential, merged,
            "overlap must reflect pixels already rewritten by the first region"
        );
        // Outside the overlap of the second region both agree.
        assert_eq!(sequential.get(0, 0).ok(), merged.get(0, 0).ok());

        // Order matters as well.
        let mut reversed = original.clone();
        compositor
            .apply(&mut reversed, &[second, first])
            .expect("inside");
        assert_ne!(sequential, reversed);
    }

    #[test]
    fn quantization_only_touches_regions() {
        let original = stripes();
        let mut buffer = original.clone();
        let region = Rect::new(2, 2, 6, 6);
        RegionCompositor::new(3)
            .with_quantization(2)
            .apply(&mut buffer, &[region])
            .expect("inside");
        for y in 0..12 {
            for x in 0..12 {
                let px = buffer.get(x, y).expect("in bounds");
                if region.contains(x, y) {
                    assert!(px.0[..3].iter().all(|&c| c == 0 || c == 255));
                } else {
                    assert_eq!(Some(px), original.get(x, y).ok());
                }
            }
        }
    }
}
