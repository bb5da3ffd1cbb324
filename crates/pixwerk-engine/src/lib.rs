// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pixwerk-engine — Raster core for the Pixwerk pixelation toolset.
//
// Provides an owned RGBA raster with windowed views, the block-average
// pixelation primitive, colour quantisation, sequential region composition,
// grid overlays, and the image codec boundary (PNG, JPEG, WebP, GIF, BMP).

pub mod filter;
pub mod pixelate;
pub mod raster;

// Re-export the primary entry points so callers can use `pixwerk_engine::PixelBuffer` etc.
pub use filter::FilterStats;
pub use pixelate::processor::{
    ProcessedResult, censor_with_pixels, create_mosaic, create_pixel_art, pixelate_image,
    pixelate_region,
};
pub use raster::buffer::{PixelBuffer, PixelView};
pub use raster::codec;

// Pixel type used throughout the public API.
pub use image::Rgba;
