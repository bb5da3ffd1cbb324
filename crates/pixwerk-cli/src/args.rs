// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use pixwerk_core::types::{ImageFormat, Rect, RgbaColor};

#[derive(Debug, Parser)]
#[command(
    name = "pixwerk",
    version,
    about = "Pixelate, mosaic, pixel-art and censor images."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the result summary as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pixelate the whole image.
    Pixelate {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Pixelate a single rectangle.
    Region {
        #[command(flatten)]
        common: CommonArgs,
        /// Rectangle as x,y,width,height.
        #[arg(long, value_name = "X,Y,W,H")]
        rect: Option<Rect>,
    },
    /// Censor one or more rectangles (block size at least 5).
    Censor {
        #[command(flatten)]
        common: CommonArgs,
        /// Rectangle as x,y,width,height. Repeat for several regions;
        /// they are applied in the order given.
        #[arg(long = "rect", value_name = "X,Y,W,H")]
        rects: Vec<Rect>,
    },
    /// Pixelate and reduce each channel to a few levels.
    PixelArt {
        #[command(flatten)]
        common: CommonArgs,
        /// Levels per colour channel (2-256).
        #[arg(short = 'c', long)]
        color_depth: Option<u32>,
    },
    /// Pixelate with optional grid lines between blocks.
    Mosaic {
        #[command(flatten)]
        common: CommonArgs,
        /// Draw grid lines along block boundaries.
        #[arg(long)]
        grid: bool,
        /// Grid colour, e.g. "#00000033" or "rgba(0,0,0,0.2)".
        #[arg(long, value_name = "COLOR")]
        grid_color: Option<RgbaColor>,
    },
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Pixelate { common }
            | Self::Region { common, .. }
            | Self::Censor { common, .. }
            | Self::PixelArt { common, .. }
            | Self::Mosaic { common, .. } => common,
        }
    }
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Input image (PNG, JPEG, WebP, GIF or BMP).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file. Defaults to <input>_pixelated.<ext> next to the input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Block size in pixels (clamped to 1-50).
    #[arg(short, long)]
    pub block_size: Option<u32>,

    /// Output format: png, jpg, webp, gif or bmp.
    #[arg(short, long)]
    pub format: Option<ImageFormat>,

    /// Encoder quality for lossy formats (0-100).
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// JSON job file with settings and regions. Flags take precedence.
    #[arg(long, value_name = "FILE")]
    pub job: Option<PathBuf>,
}
