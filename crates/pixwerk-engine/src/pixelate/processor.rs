// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixelation pipelines. Each operation filters a caller-owned `PixelBuffer`
// in place and encodes the result, returning the bytes plus metadata.
//
// All five are synchronous and deterministic: the same buffer and config
// always produce byte-identical output.

use std::time::{Duration, Instant};

use image::Rgba;
use pixwerk_core::config::{MosaicConfig, PixelArtConfig, PixelateConfig};
use pixwerk_core::error::Result;
use pixwerk_core::types::{ImageFormat, Rect};
use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument};

use crate::filter::{RegionCompositor, draw_grid, pixelate_view, quantize_view};
use crate::raster::buffer::PixelBuffer;
use crate::raster::codec;

/// Encoded output of one operation.
///
/// Immutable once built. The encoded bytes belong to the caller; use
/// [`ProcessedResult::into_bytes`] to take them.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedResult {
    #[serde(skip)]
    bytes: Vec<u8>,
    format: ImageFormat,
    byte_size: usize,
    width: u32,
    height: u32,
    #[serde(rename = "processing_ms", serialize_with = "as_millis")]
    processing_duration: Duration,
    block_size_used: u32,
    original_width: u32,
    original_height: u32,
}

impl ProcessedResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn processing_duration(&self) -> Duration {
        self.processing_duration
    }

    pub fn block_size_used(&self) -> u32 {
        self.block_size_used
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Download name for the result, e.g. `holiday_pixelated.png`.
    pub fn suggested_file_name(&self, stem: &str) -> String {
        format!("{}_pixelated.{}", stem, self.format.extension())
    }
}

fn as_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

// -- Operations ---------------------------------------------------------------

/// Pixelate the whole image.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn pixelate_image(
    buffer: &mut PixelBuffer,
    config: &PixelateConfig,
) -> Result<ProcessedResult> {
    let started = Instant::now();
    let block_size = effective_block_size(config, config.block_size());

    let stats = pixelate_view(&mut buffer.full_view(), block_size);
    debug!(cells = stats.cells, block_size, "Image pixelated");

    finish(buffer, config, block_size, started)
}

/// Pixelate a single rectangle, leaving everything outside it untouched.
///
/// The rectangle is clamped to the image; a rectangle wholly outside it
/// leaves the image unchanged.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height(), rect = %rect))]
pub fn pixelate_region(
    buffer: &mut PixelBuffer,
    rect: Rect,
    config: &PixelateConfig,
) -> Result<ProcessedResult> {
    let started = Instant::now();
    let block_size = effective_block_size(config, config.block_size());

    let stats = RegionCompositor::new(block_size).apply(buffer, &[rect])?;
    debug!(pixels = stats.pixels, block_size, "Region pixelated");

    finish(buffer, config, block_size, started)
}

/// Censor several rectangles, in order, against the same buffer.
///
/// The block size is raised to at least 5 so small blocks cannot leave the
/// content legible. Overlapping rectangles compose sequentially: a later
/// rectangle averages what earlier ones already produced.
#[instrument(
    skip_all,
    fields(width = buffer.width(), height = buffer.height(), regions = rects.len())
)]
pub fn censor_with_pixels(
    buffer: &mut PixelBuffer,
    rects: &[Rect],
    config: &PixelateConfig,
) -> Result<ProcessedResult> {
    let started = Instant::now();
    let block_size = effective_block_size(config, config.censor_block_size());

    let stats = RegionCompositor::new(block_size).apply(buffer, rects)?;
    info!(
        requested = rects.len(),
        censored = stats.cells,
        block_size,
        "Regions censored"
    );

    finish(buffer, config, block_size, started)
}

/// Pixelate the whole image, then posterise each channel to
/// `color_depth` levels.
#[instrument(
    skip_all,
    fields(
        width = buffer.width(),
        height = buffer.height(),
        color_depth = config.color_depth()
    )
)]
pub fn create_pixel_art(
    buffer: &mut PixelBuffer,
    config: &PixelArtConfig,
) -> Result<ProcessedResult> {
    let started = Instant::now();
    let base = &config.base;
    let block_size = effective_block_size(base, base.block_size());

    let mut view = buffer.full_view();
    pixelate_view(&mut view, block_size);
    quantize_view(&mut view, config.color_depth());
    debug!(block_size, levels = config.color_depth(), "Pixel art rendered");

    finish(buffer, base, block_size, started)
}

/// Pixelate the whole image and optionally overlay block-boundary grid lines.
#[instrument(
    skip_all,
    fields(width = buffer.width(), height = buffer.height(), show_grid = config.show_grid)
)]
pub fn create_mosaic(buffer: &mut PixelBuffer, config: &MosaicConfig) -> Result<ProcessedResult> {
    let started = Instant::now();
    let base = &config.base;
    let block_size = effective_block_size(base, base.block_size());

    let mut view = buffer.full_view();
    pixelate_view(&mut view, block_size);
    if config.show_grid {
        let lines = draw_grid(&mut view, block_size, Rgba(config.grid_color.to_array()));
        debug!(lines = lines.cells, color = %config.grid_color, "Grid drawn");
    }

    finish(buffer, base, block_size, started)
}

// -- Helpers ------------------------------------------------------------------

fn effective_block_size(config: &PixelateConfig, effective: u32) -> u32 {
    let requested = config.requested_block_size();
    if requested != effective {
        debug!(requested, effective, "Block size adjusted");
    }
    effective
}

fn finish(
    buffer: &PixelBuffer,
    config: &PixelateConfig,
    block_size: u32,
    started: Instant,
) -> Result<ProcessedResult> {
    let format = config.format();
    let bytes = codec::encode(buffer, format, config.quality())?;
    let (width, height) = buffer.dimensions();

    let result = ProcessedResult {
        byte_size: bytes.len(),
        bytes,
        format,
        width,
        height,
        processing_duration: started.elapsed(),
        block_size_used: block_size,
        original_width: width,
        original_height: height,
    };
    info!(
        %format,
        width,
        height,
        block_size,
        bytes = result.byte_size,
        duration_ms = result.processing_duration.as_secs_f64() * 1000.0,
        "Image processed"
    );
    Ok(result)
}

// -- Tests --------------------------------------------------------------------
