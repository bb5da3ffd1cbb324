// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON job files: reusable settings and censorship regions.
//
// ```json
// { "block_size": 12, "format": "jpg", "quality": 80,
//   "regions": [{ "x": 10, "y": 20, "width": 64, "height": 64 }] }
// ```

use std::path::Path;

use pixwerk_core::error::Result;
use pixwerk_core::types::{ImageFormat, Rect, RgbaColor};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Settings loaded from a job file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobFile {
    pub block_size: Option<u32>,
    pub format: Option<ImageFormat>,
    pub quality: Option<u8>,
    pub color_depth: Option<u32>,
    pub show_grid: Option<bool>,
    pub grid_color: Option<RgbaColor>,
    pub regions: Vec<Rect>,
}

impl JobFile {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let job: Self = serde_json::from_str(&text)?;
        debug!(regions = job.regions.len(), "Job file loaded");
        Ok(job)
    }
}
