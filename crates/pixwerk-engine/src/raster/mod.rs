// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — owned RGBA pixel storage and the encode/decode boundary.

pub mod buffer;
pub mod codec;

pub use buffer::{PixelBuffer, PixelView};
