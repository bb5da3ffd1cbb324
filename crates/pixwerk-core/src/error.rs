// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pixwerk.

use thiserror::Error;

/// Top-level error type for all Pixwerk operations.
#[derive(Debug, Error)]
pub enum PixwerkError {
    // -- Codec errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    // -- Raster errors --
    #[error("pixel ({x}, {y}) is outside the {width}x{height} raster")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("raw RGBA buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    // -- Configuration errors --
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PixwerkError>;
