// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Monowerk — threshold-controlled 1-bit conversion of rendered pages.
//
// Entry point. Initialises logging, layers command-line flags over the
// configuration file, and runs the requested command.
//
//   monowerk convert page.png page.bw.png --threshold 200
//   monowerk convert page.png page.bw.png --config monowerk.json --no-invert
//   monowerk convert page.png page.bw.png --auto-threshold --compression best
//   monowerk suggest page.png
//   monowerk config > monowerk.json

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use monowerk_core::error::Result;
use monowerk_core::human_errors::humanize_error;
use monowerk_core::{ConversionConfig, PngColorTarget, PngCompression};
use monowerk_raster::BilevelConverter;

/// Monowerk - convert rendered document pages to 1-bit PNGs
#[derive(Parser, Debug)]
#[command(name = "monowerk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Binarize a page image and write it as a bit-depth-1 PNG
    Convert(ConvertArgs),

    /// Print the Otsu threshold suggested for a page image
    Suggest {
        /// Rendered page image
        input: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config {
        /// JSON configuration file to validate and echo
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Rendered page image (PNG, JPEG, TIFF, ...)
    input: PathBuf,

    /// Output PNG path
    output: PathBuf,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Highest intensity (0-255) that still prints as black
    #[arg(long, allow_negative_numbers = true, conflicts_with = "auto_threshold")]
    threshold: Option<i32>,

    /// Use Otsu's level for this page instead of a fixed threshold
    #[arg(long)]
    auto_threshold: bool,

    /// Swap black and white classification
    #[arg(long, overrides_with = "no_invert")]
    invert: bool,

    /// Keep normal classification even if the config file inverts
    #[arg(long, overrides_with = "invert")]
    no_invert: bool,

    /// Deflate effort for the PNG writer
    #[arg(long, value_enum)]
    compression: Option<CompressionArg>,

    /// Write an indexed PNG with a [white, black] palette instead of grayscale
    #[arg(long)]
    indexed: bool,
}

impl ConvertArgs {
    fn overrides(&self) -> Overrides {
        let invert = match (self.invert, self.no_invert) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Overrides {
            threshold: self.threshold,
            invert,
            compression: self.compression.map(PngCompression::from),
            indexed: self.indexed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Copy, Default)]
struct Overrides {
    threshold: Option<i32>,
    invert: Option<bool>,
    compression: Option<PngCompression>,
    indexed: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        let human = humanize_error(&err);
        tracing::debug!(error = %err, severity = ?human.severity, "Command failed");
        eprintln!("Error ({}): {}", human.severity.label(), human.message);
        eprintln!("  {}", human.suggestion);
        std::process::exit(human.severity.exit_code());
    }
}

fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    match path {
        Some(path) => ConversionConfig::load(path),
        None => Ok(ConversionConfig::default()),
    }
}

/// Layer flag values over `settings` and re-validate the result.
fn apply_overrides(settings: &mut ConversionConfig, overrides: &Overrides) -> Result<()> {
    if let Some(threshold) = overrides.threshold {
        settings.binarization.threshold = threshold;
    }
    if let Some(invert) = overrides.invert {
        settings.binarization.invert = invert;
    }
    if let Some(compression) = overrides.compression {
        settings.png.compression = compression;
    }
    if overrides.indexed {
        settings.png.target = PngColorTarget::Indexed {
            black_index_zero: false,
        };
    }
    settings.validate()
}

/// Convert one page and return the settings that were actually applied.
/// With `auto_threshold` the page is reduced once and binarized at its Otsu
/// level.
fn convert_page(
    input: &Path,
    output: &Path,
    mut settings: ConversionConfig,
    auto_threshold: bool,
) -> Result<ConversionConfig> {
    let converter = BilevelConverter::open(input)?;
    if auto_threshold {
        settings.binarization = converter.save_png_auto(output, &settings)?;
        tracing::info!(threshold = settings.binarization.threshold, "Used Otsu threshold");
    } else {
        converter.save_png(output, &settings)?;
    }
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => {
            let mut settings = load_config(args.config.as_deref())?;
            apply_overrides(&mut settings, &args.overrides())?;

            let applied = convert_page(&args.input, &args.output, settings, args.auto_threshold)?;
            println!(
                "{} -> {} (threshold {}{})",
                args.input.display(),
                args.output.display(),
                applied.binarization.threshold,
                if applied.binarization.invert { ", inverted" } else { "" }
            );
        }

        Commands::Suggest { input } => {
            let level = BilevelConverter::open(&input)?.suggest_threshold()?;
            println!("{level}");
        }

        Commands::Config { config } => {
            let settings = load_config(config.as_deref())?;
            println!("{}", settings.to_json_pretty()?);
        }
    }

    Ok(())
}
