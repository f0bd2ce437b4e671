//! burnratio CLI - Normalized Burn Ratio for satellite scenes

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use burnratio_core::io::{GeoTiffOptions, TiffCompression};
use burnratio_core::Raster;
use burnratio_scene::{GeoTiffStore, SceneProcessor, SensorProfile, WriteOutcome};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "burnratio")]
#[command(author, version, about = "Normalized Burn Ratio from NIR and SWIR bands", long_about = None)]
struct Cli {
    /// Scene identifier: band file path without the band suffix
    /// (the pre-fire scene when --after is given)
    scene: PathBuf,

    /// Output GeoTIFF, ending in .tif
    #[arg(value_parser = parse_tif_path)]
    output: PathBuf,

    /// Band naming convention of the scene files
    #[arg(short, long, value_enum, default_value_t = SensorProfile::HlsS30)]
    profile: SensorProfile,

    /// Post-fire scene; switches to dNBR output (scene minus after)
    #[arg(long, value_name = "SCENE")]
    after: Option<PathBuf>,

    /// Also write burn severity classes of the dNBR here
    #[arg(long, value_name = "PATH", requires = "after", value_parser = parse_tif_path)]
    severity: Option<PathBuf>,

    /// Output compression
    #[arg(long, value_enum, default_value_t = CompressionArg::Deflate)]
    compression: CompressionArg,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::Deflate,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn parse_tif_path(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tif") => Ok(path),
        _ => Err(format!("output must end in .tif, got {}", s)),
    }
}

fn report(name: &str, raster: &Raster<f32>, write: &WriteOutcome, elapsed: Duration) {
    let stats = raster.statistics();
    info!("{}: {} x {}", name, raster.cols(), raster.rows());
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        info!("  Min: {:.4}  Max: {:.4}  Mean: {:.4}", min, max, mean);
    }
    info!(
        "  Valid cells: {} ({:.1}%)",
        stats.valid_count,
        stats.valid_percent()
    );

    match write {
        WriteOutcome::Written(path) => done(name, path, elapsed),
        WriteOutcome::Failed { path, reason } => {
            warn!("{} not saved to {}: {}", name, path.display(), reason)
        }
    }
}

fn done(name: &str, path: &Path, elapsed: Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!("Started program.");
    info!("Reading arguments...");
    debug!("{:?}", cli);

    let store = GeoTiffStore::new(GeoTiffOptions {
        compression: cli.compression.into(),
    });
    let processor = SceneProcessor::new(store, cli.profile);
    let start = Instant::now();

    match &cli.after {
        None => {
            let pb = spinner("Computing NBR...");
            let result = processor
                .process(&cli.scene, Some(&cli.output))
                .with_context(|| format!("Failed to process scene {}", cli.scene.display()));
            pb.finish_and_clear();
            let result = result?;

            if let Some(write) = &result.write {
                report("NBR", &result.nbr, write, start.elapsed());
            }
        }

        Some(after) => {
            let pb = spinner("Computing dNBR...");
            let result = processor
                .process_difference(&cli.scene, after, &cli.output, cli.severity.as_deref())
                .with_context(|| {
                    format!(
                        "Failed to difference scenes {} and {}",
                        cli.scene.display(),
                        after.display()
                    )
                });
            pb.finish_and_clear();
            let result = result?;

            report("dNBR", &result.dnbr, &result.write, start.elapsed());
            if let Some(severity) = &result.severity {
                if let WriteOutcome::Written(path) = &severity.write {
                    done("Burn severity", path, start.elapsed());
                }
            }
        }
    }

    info!("Complete!");
    Ok(())
}
