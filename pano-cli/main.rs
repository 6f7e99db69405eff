//! pano: stitch two overlapping images into a panorama.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use pano_cli::convert::{load_image, save_image};
use pano_cli::draw::{detect_and_draw_corners, find_and_draw_inliers, find_and_draw_matches};
use pano_cli::{CompositeStatus, Panorama, PanoramaConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "pano")]
#[command(about = "Harris corners, descriptor matching and RANSAC homography stitching")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stitch the second image onto the first.
    Stitch {
        /// First (reference) image.
        a: PathBuf,
        /// Second image, warped into the first one's frame.
        b: PathBuf,
        /// Output path; the format follows the extension.
        #[arg(short, long, default_value = "panorama.png")]
        out: PathBuf,
        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Mark detected corners on an image.
    Corners {
        image: PathBuf,
        #[arg(short, long, default_value = "corners.png")]
        out: PathBuf,
        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Draw descriptor matches between two images side by side.
    Matches {
        a: PathBuf,
        b: PathBuf,
        #[arg(short, long, default_value = "matches.png")]
        out: PathBuf,
        /// Run RANSAC and draw its inliers in green.
        #[arg(long)]
        inliers: bool,
        #[command(flatten)]
        tuning: TuningArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct TuningArgs {
    /// TOML or JSON configuration file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gaussian scale of the structure tensor.
    #[arg(long)]
    sigma: Option<f32>,

    /// Cornerness threshold (exclusive).
    #[arg(long)]
    threshold: Option<f32>,

    /// Non-max suppression half-width.
    #[arg(long)]
    nms: Option<usize>,

    /// RANSAC inlier distance in pixels.
    #[arg(long)]
    inlier_threshold: Option<f32>,

    /// Maximum RANSAC iterations.
    #[arg(long)]
    iterations: Option<usize>,

    /// Stop RANSAC once a model has more inliers than this.
    #[arg(long)]
    cutoff: Option<usize>,

    /// Random seed for RANSAC sampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (default 1).
    #[arg(long)]
    threads: Option<usize>,
}

impl TuningArgs {
    fn to_config(&self) -> CliResult<PanoramaConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PanoramaConfig::default(),
        };

        if let Some(v) = self.sigma {
            config.harris.sigma = v;
        }
        if let Some(v) = self.threshold {
            config.harris.threshold = v;
        }
        if let Some(v) = self.nms {
            config.harris.nms = v;
        }
        if let Some(v) = self.inlier_threshold {
            config.ransac.inlier_threshold = v;
        }
        if let Some(v) = self.iterations {
            config.ransac.iterations = v;
        }
        if let Some(v) = self.cutoff {
            config.ransac.cutoff = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.threads {
            config.n_threads = v;
        }

        config.validate()?;
        log::debug!("{}", config.summary());
        Ok(config)
    }
}

#[cfg(feature = "serde")]
fn load_config(path: &Path) -> CliResult<PanoramaConfig> {
    log::info!("Loading config: {}", path.display());
    PanoramaConfig::load(path)
}

#[cfg(not(feature = "serde"))]
fn load_config(path: &Path) -> CliResult<PanoramaConfig> {
    Err(format!("cannot read {}: built without the `serde` feature", path.display()).into())
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stitch { a, b, out, tuning } => run_stitch(&a, &b, &out, &tuning),
        Commands::Corners { image, out, tuning } => run_corners(&image, &out, &tuning),
        Commands::Matches {
            a,
            b,
            out,
            inliers,
            tuning,
        } => run_matches(&a, &b, &out, inliers, &tuning),
    }
}

fn run_stitch(a_path: &Path, b_path: &Path, out: &Path, tuning: &TuningArgs) -> CliResult<()> {
    let panorama = Panorama::new(tuning.to_config()?)?;
    let a = load_image(a_path)?;
    let b = load_image(b_path)?;
    log::info!(
        "Stitching {} ({}x{}) with {} ({}x{})",
        a_path.display(),
        a.width(),
        a.height(),
        b_path.display(),
        b.width(),
        b.height()
    );

    let t0 = Instant::now();
    let composite = panorama.stitch(&a, &b)?;
    log::info!("Stitched in {:.2?}", t0.elapsed());

    match composite.status {
        CompositeStatus::Stitched { offset_x, offset_y } => {
            log::info!("First image placed at ({}, {})", -offset_x, -offset_y)
        }
        CompositeStatus::CanvasTooLarge { width, height } => {
            log::warn!("Canvas {}x{} too large, wrote the first image unchanged", width, height)
        }
        CompositeStatus::Degenerate => {
            log::warn!("Degenerate homography, wrote the first image unchanged")
        }
    }

    save_image(&composite.image, out)?;
    println!("Saved {}x{} panorama as {}", composite.image.width(), composite.image.height(), out.display());
    Ok(())
}

fn run_corners(path: &Path, out: &Path, tuning: &TuningArgs) -> CliResult<()> {
    let panorama = Panorama::new(tuning.to_config()?)?;
    let img = load_image(path)?;
    let marked = detect_and_draw_corners(&panorama, &img)?;
    marked.save(out)?;
    println!("Saved corners as {}", out.display());
    Ok(())
}

fn run_matches(a_path: &Path, b_path: &Path, out: &Path, inliers: bool, tuning: &TuningArgs) -> CliResult<()> {
    let panorama = Panorama::new(tuning.to_config()?)?;
    let a = load_image(a_path)?;
    let b = load_image(b_path)?;
    let drawn = if inliers {
        find_and_draw_inliers(&panorama, &a, &b)?
    } else {
        find_and_draw_matches(&panorama, &a, &b)?
    };
    drawn.save(out)?;
    println!("Saved matches as {}", out.display());
    Ok(())
}
