use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mosaic_runtime::{ErrorKind, MosaicCommand, MosaicUpdate, spawn_worker};
use mosaic_tiles::{
    Anchor, ExportPolicy, MosaicConfig, Orientation, PagingProfile, PaperSize, ScalingMode,
    assembly_instructions, calculate_statistics, load_image,
};
use std::path::PathBuf;
use std::time::Duration;

mod logger;

use logger::ConsoleLogger;

#[derive(Parser)]
#[command(name = "mosaic", about = "Split artwork into printable letter-size tiles", version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the page grid for a layout without rendering anything
    Estimate {
        /// Artwork to lay out; without it every grid cell is counted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render the pages and write them as PNG files
    Generate {
        /// Artwork image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Composite pages one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Pause between written files in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u64,

        /// Write only this segment (ROW-COL, e.g. 2-3)
        #[arg(long, value_parser = parse_segment)]
        segment: Option<(usize, usize)>,
    },

    /// Write the effective configuration as JSON
    Config {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Layout options shared by every subcommand. Each flag overrides the
/// value from `--config` (or the default when no file is given).
#[derive(Args, Clone, Default)]
struct LayoutArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Final artwork width in inches
    #[arg(long)]
    width: Option<f64>,

    /// Final artwork height in inches
    #[arg(long)]
    height: Option<f64>,

    /// Paper size of each printed page
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Print resolution
    #[arg(long)]
    dpi: Option<f64>,

    /// Unprintable border on each page edge, in inches
    #[arg(long)]
    margin: Option<f64>,

    /// Overlap between neighbouring pages, in inches
    #[arg(long)]
    overlap: Option<f64>,

    /// How the artwork is scaled onto the canvas
    #[arg(long, value_enum)]
    scaling: Option<ScalingArg>,

    /// Where letterboxed artwork sits on the canvas
    #[arg(long, value_enum)]
    anchor: Option<AnchorArg>,

    /// File name prefix for the pages
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Letter,
    Legal,
    Tabloid,
    A4,
    A3,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    Fit,
    Stretch,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    Center,
    TopLeft,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
            PaperArg::A4 => Self::A4,
            PaperArg::A3 => Self::A3,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<ScalingArg> for ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Fit => Self::Fit,
            ScalingArg::Stretch => Self::Stretch,
        }
    }
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Center => Self::Center,
            AnchorArg::TopLeft => Self::TopLeft,
        }
    }
}

fn parse_segment(value: &str) -> Result<(usize, usize), String> {
    let (row, col) = value
        .split_once('-')
        .ok_or_else(|| format!("expected ROW-COL, got {:?}", value))?;
    let row: usize = row.trim().parse().map_err(|_| format!("bad row in {:?}", value))?;
    let col: usize = col.trim().parse().map_err(|_| format!("bad column in {:?}", value))?;
    if row == 0 || col == 0 {
        return Err("rows and columns start at 1".to_string());
    }
    Ok((row, col))
}

impl LayoutArgs {
    /// Load `--config` if given and apply the flag overrides
    async fn resolve(&self) -> Result<MosaicConfig> {
        let base = match &self.config {
            Some(path) => MosaicConfig::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => MosaicConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut config: MosaicConfig) -> MosaicConfig {
        if self.paper.is_some() || self.orientation.is_some() {
            let paper = self.paper.map(PaperSize::from).unwrap_or_default();
            let orientation = self.orientation.map(Orientation::from).unwrap_or_default();
            let preset = PagingProfile::for_paper(paper, orientation);
            config.profile.paper_width_in = preset.paper_width_in;
            config.profile.paper_height_in = preset.paper_height_in;
        }
        if let Some(dpi) = self.dpi {
            config.profile.dpi = dpi;
        }
        if let Some(margin) = self.margin {
            config.profile.margin_in = margin;
        }
        if let Some(overlap) = self.overlap {
            config.profile.overlap_in = overlap;
        }
        if let Some(width) = self.width {
            config.output.target_width_in = width;
        }
        if let Some(height) = self.height {
            config.output.target_height_in = height;
        }
        if let Some(scaling) = self.scaling {
            config.placement.scaling = scaling.into();
        }
        if let Some(anchor) = self.anchor {
            config.placement.anchor = anchor.into();
        }
        if let Some(prefix) = &self.prefix {
            config.filename_prefix = prefix.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ConsoleLogger::from_flags(cli.verbose, cli.quiet).init()?;

    match cli.command {
        Commands::Estimate { input, layout } => {
            let config = layout.resolve().await?;
            let source_size = match &input {
                Some(path) => {
                    let image = load_image(path).await?;
                    println!("{}", image.describe());
                    Some(image.dimensions())
                }
                None => None,
            };

            let stats = calculate_statistics(&config, source_size)?;
            println!("Mosaic Statistics:");
            for line in stats.to_string().lines() {
                println!("  {}", line);
            }
        }

        Commands::Generate {
            input,
            output,
            layout,
            sequential,
            delay_ms,
            segment,
        } => {
            let mut config = layout.resolve().await?;
            config.parallel = !sequential;
            config.validate()?;
            let policy = ExportPolicy::with_delay(Duration::from_millis(delay_ms));

            run_generate(input, output, config, policy, segment).await?;
        }

        Commands::Config { output, layout } => {
            let config = layout.resolve().await?;
            config.validate()?;
            config.save(&output).await?;
            println!("Configuration → {}", output.display());
        }
    }

    Ok(())
}

/// Drive the worker through load, generate and export, printing progress
async fn run_generate(
    input: PathBuf,
    output: PathBuf,
    config: MosaicConfig,
    policy: ExportPolicy,
    segment: Option<(usize, usize)>,
) -> Result<()> {
    let instructions = assembly_instructions(&config.profile);
    let (worker, mut updates) = spawn_worker();

    worker.send(MosaicCommand::LoadImage { path: input })?;
    worker.send(MosaicCommand::Generate { config })?;
    match segment {
        Some((row, col)) => worker.send(MosaicCommand::ExportSegment {
            row,
            col,
            output_dir: output.clone(),
        })?,
        None => worker.send(MosaicCommand::ExportAll {
            output_dir: output.clone(),
            policy,
        })?,
    }

    let mut failed = false;
    while let Some(update) = updates.recv().await {
        match update {
            MosaicUpdate::ImageLoaded { description, .. } => println!("{}", description),
            MosaicUpdate::Generated {
                catalog,
                statistics,
                ..
            } => {
                println!(
                    "Generated {} pages ({} rows × {} cols)",
                    catalog.len(),
                    statistics.rows,
                    statistics.cols
                );
            }
            MosaicUpdate::Progress {
                operation,
                current,
                total,
            } => log::info!("{}: {}/{}", operation, current, total),
            MosaicUpdate::Exported { filename } => {
                println!("  {}", output.join(&filename).display());
                if segment.is_some() {
                    break;
                }
            }
            MosaicUpdate::ExportFinished { exported, failed: errors } => {
                println!("Exported {} pages → {}", exported, output.display());
                failed |= errors > 0;
                break;
            }
            MosaicUpdate::Error { message, kind } => {
                eprintln!("Error: {}", message);
                failed = true;
                // A single failed page does not stop the export queue
                if segment.is_some() || kind != ErrorKind::Export {
                    break;
                }
            }
            MosaicUpdate::ConfigLoaded { .. }
            | MosaicUpdate::Estimated { .. }
            | MosaicUpdate::Cleared => {}
        }
    }
    worker.shutdown().await;

    if failed {
        bail!("generation did not complete");
    }

    println!();
    println!("Assembly Instructions:");
    for line in instructions {
        println!("  • {}", line);
    }
    Ok(())
}
