// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command execution: read the input file, resolve settings (flags, then job
// file, then defaults), run one engine operation and write the result.

use std::fmt;
use std::path::{Path, PathBuf};

use pixwerk_core::config::{
    DEFAULT_BLOCK_SIZE, DEFAULT_COLOR_DEPTH, DEFAULT_GRID_COLOR, DEFAULT_QUALITY,
};
use pixwerk_core::error::{PixwerkError, Result};
use pixwerk_core::types::ImageFormat;
use pixwerk_core::{MosaicConfig, PixelArtConfig, PixelateConfig};
use pixwerk_engine::{
    ProcessedResult, censor_with_pixels, codec, create_mosaic, create_pixel_art, pixelate_image,
    pixelate_region,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::args::{Cli, Command, CommonArgs};
use crate::job::JobFile;

/// Outcome of one CLI invocation.
#[derive(Debug, Serialize)]
pub struct Report {
    pub output: PathBuf,
    #[serde(flatten)]
    pub result: ProcessedResult,
    #[serde(skip)]
    json: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.json {
            let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
            return f.write_str(&text);
        }
        write!(
            f,
            "{}: {}x{} {}, block {}px, {} bytes in {:.1} ms",
            self.output.display(),
            self.result.width(),
            self.result.height(),
            self.result.format(),
            self.result.block_size_used(),
            self.result.byte_size(),
            self.result.processing_duration().as_secs_f64() * 1000.0,
        )
    }
}

#[instrument(skip_all, fields(input = %cli.command.common().input.display()))]
pub fn run(cli: &Cli) -> Result<Report> {
    let common = cli.command.common();
    let job = match &common.job {
        Some(path) => JobFile::load(path)?,
        None => JobFile::default(),
    };

    let data = std::fs::read(&common.input)?;
    let (mut buffer, input_format) = codec::decode_with_format(&data)?;
    info!(
        format = %input_format,
        width = buffer.width(),
        height = buffer.height(),
        "Input loaded"
    );

    let format = resolve_format(common, &job, input_format);
    let config = base_config(common, &job, format);

    let result = match &cli.command {
        Command::Pixelate { .. } => pixelate_image(&mut buffer, &config)?,
        Command::Region { rect, .. } => {
            let rect = rect.or_else(|| job.regions.first().copied()).ok_or_else(|| {
                PixwerkError::InvalidRegion("no rectangle given; use --rect or a job file".into())
            })?;
            pixelate_region(&mut buffer, rect, &config)?
        }
        Command::Censor { rects, .. } => {
            let rects = if rects.is_empty() { &job.regions } else { rects };
            if rects.is_empty() {
                warn!("No regions given; image is re-encoded unchanged");
            }
            censor_with_pixels(&mut buffer, rects, &config)?
        }
        Command::PixelArt { color_depth, .. } => {
            let depth = color_depth
                .or(job.color_depth)
                .unwrap_or(DEFAULT_COLOR_DEPTH);
            create_pixel_art(&mut buffer, &PixelArtConfig::new(config, depth))?
        }
        Command::Mosaic {
            grid, grid_color, ..
        } => {
            let mut mosaic = MosaicConfig::new(config);
            if *grid || grid_color.is_some() || job.show_grid.unwrap_or(false) {
                let color = grid_color.or(job.grid_color).unwrap_or(DEFAULT_GRID_COLOR);
                mosaic = mosaic.with_grid(color);
            }
            create_mosaic(&mut buffer, &mosaic)?
        }
    };

    let output = common
        .output
        .clone()
        .unwrap_or_else(|| default_output(&common.input, &result));
    std::fs::write(&output, result.bytes())?;
    info!(output = %output.display(), bytes = result.byte_size(), "Result written");

    Ok(Report {
        output,
        result,
        json: cli.json,
    })
}

/// Output format: explicit flag, then job file, then the output file's
/// extension, then the input's own format.
fn resolve_format(common: &CommonArgs, job: &JobFile, input_format: ImageFormat) -> ImageFormat {
    common
        .format
        .or(job.format)
        .or_else(|| {
            common
                .output
                .as_deref()
                .and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .unwrap_or(input_format)
}

fn base_config(common: &CommonArgs, job: &JobFile, format: ImageFormat) -> PixelateConfig {
    PixelateConfig::new(
        common
            .block_size
            .or(job.block_size)
            .unwrap_or(DEFAULT_BLOCK_SIZE),
        format,
        common.quality.or(job.quality).unwrap_or(DEFAULT_QUALITY),
    )
}

fn default_output(input: &Path, result: &ProcessedResult) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input.with_file_name(result.suggested_file_name(stem))
}
