// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixelate module — the public single-shot operations: whole-image
// pixelation, single-region pixelation, multi-region censorship, pixel art
// and mosaic.

pub mod processor;

pub use processor::ProcessedResult;
