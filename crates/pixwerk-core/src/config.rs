// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation configuration for the pixelation pipelines.
//
// Callers may supply any value; the accessors return the effective value
// after clamping, so out-of-range settings never reach a filter.

use serde::{Deserialize, Serialize};

use crate::types::{ImageFormat, RgbaColor};

pub const MIN_BLOCK_SIZE: u32 = 1;
pub const MAX_BLOCK_SIZE: u32 = 50;
pub const DEFAULT_BLOCK_SIZE: u32 = 10;
/// Smallest block size that still obscures a censored region.
pub const CENSOR_MIN_BLOCK_SIZE: u32 = 5;

pub const MAX_QUALITY: u8 = 100;
pub const DEFAULT_QUALITY: u8 = 92;

pub const MIN_COLOR_DEPTH: u32 = 2;
pub const MAX_COLOR_DEPTH: u32 = 256;
pub const DEFAULT_COLOR_DEPTH: u32 = 32;

pub const DEFAULT_GRID_COLOR: RgbaColor = RgbaColor::new(0, 0, 0, 0x33);

/// Settings shared by every pixelation operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelateConfig {
    block_size: u32,
    format: ImageFormat,
    quality: u8,
}

impl Default for PixelateConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            format: ImageFormat::Png,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PixelateConfig {
    pub fn new(block_size: u32, format: ImageFormat, quality: u8) -> Self {
        Self {
            block_size,
            format,
            quality,
        }
    }

    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Block size as supplied, before clamping.
    pub fn requested_block_size(&self) -> u32 {
        self.block_size
    }

    /// Effective block size, clamped to `[1, 50]`.
    pub fn block_size(&self) -> u32 {
        self.block_size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)
    }

    /// Effective block size for censorship, with the floor raised to 5.
    pub fn censor_block_size(&self) -> u32 {
        self.block_size().max(CENSOR_MIN_BLOCK_SIZE)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Effective quality in `[0, 100]`.
    pub fn quality(&self) -> u8 {
        self.quality.min(MAX_QUALITY)
    }
}

/// Pixelation followed by per-channel posterisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelArtConfig {
    #[serde(flatten)]
    pub base: PixelateConfig,
    color_depth: u32,
}

impl Default for PixelArtConfig {
    fn default() -> Self {
        Self {
            base: PixelateConfig::default(),
            color_depth: DEFAULT_COLOR_DEPTH,
        }
    }
}

impl PixelArtConfig {
    pub fn new(base: PixelateConfig, color_depth: u32) -> Self {
        Self { base, color_depth }
    }

    pub fn with_color_depth(mut self, color_depth: u32) -> Self {
        self.color_depth = color_depth;
        self
    }

    /// Effective number of levels per channel, clamped to `[2, 256]`.
    pub fn color_depth(&self) -> u32 {
        self.color_depth.clamp(MIN_COLOR_DEPTH, MAX_COLOR_DEPTH)
    }
}

/// Pixelation with an optional grid drawn along block boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    #[serde(flatten)]
    pub base: PixelateConfig,
    pub show_grid: bool,
    pub grid_color: RgbaColor,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            base: PixelateConfig::default(),
            show_grid: false,
            grid_color: DEFAULT_GRID_COLOR,
        }
    }
}

impl MosaicConfig {
    pub fn new(base: PixelateConfig) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn with_grid(mut self, grid_color: RgbaColor) -> Self {
        self.show_grid = true;
        self.grid_color = grid_color;
        self
    }
}
