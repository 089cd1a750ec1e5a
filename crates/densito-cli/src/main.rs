//! densito CLI — command-line interface for TLC plate densitometry.

use clap::{Args, Parser, Subcommand, ValueEnum};
use densito::{AnalysisConfig, Analyzer, Profile, Sample, ScanAxis};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "densito")]
#[command(about = "Lane, band and surface analysis of thin-layer chromatography plates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a whole plate image: cut points, lanes, peaks and surfaces.
    Analyze(CliAnalyzeArgs),

    /// Extract one intensity profile from an image.
    Profile(CliProfileArgs),

    /// Search, validate and measure peaks on a stored profile.
    Peaks(CliPeaksArgs),
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the plate image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write analysis results (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Analysis configuration (JSON); missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the cut-point and lane blur sigma.
    #[arg(long)]
    blur_sigma: Option<f32>,
}

#[derive(Debug, Clone, Args)]
struct CliProfileArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Scan axis: one value per row (vertical) or per column (horizontal).
    #[arg(long, value_enum, default_value_t = AxisArg::Vertical)]
    axis: AxisArg,

    /// Scan from the far edge.
    #[arg(long)]
    inverted: bool,

    /// Rescale positions to [0, 1].
    #[arg(long)]
    relative: bool,

    /// Gaussian blur sigma applied before averaging.
    #[arg(long, default_value = "1.0")]
    blur_sigma: f32,

    /// Path to write the profile (tab-separated position/value lines).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct CliPeaksArgs {
    /// Profile file (tab-separated position/value lines).
    #[arg(long)]
    profile: PathBuf,

    /// Analysis configuration (JSON); only the peak and baseline sections apply.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the measured sample (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    Vertical,
    Horizontal,
}

impl AxisArg {
    fn to_core(self) -> ScanAxis {
        match self {
            Self::Vertical => ScanAxis::Vertical,
            Self::Horizontal => ScanAxis::Horizontal,
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<AnalysisConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            Ok(AnalysisConfig::from_json_file(p)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_gray(path: &Path) -> CliResult<image::GrayImage> {
    tracing::info!("Loading image: {}", path.display());
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    Ok(densito::preprocess::grayscale(&img))
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Profile(args) => run_profile(&args),
        Commands::Peaks(args) => run_peaks(&args),
    }
}

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let gray = load_gray(&args.image)?;
    let (w, h) = gray.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(sigma) = args.blur_sigma {
        config.preprocess.cut_blur_sigma = sigma;
        config.preprocess.lane_blur_sigma = sigma;
    }

    let result = Analyzer::with_config(config).analyze(&gray)?;
    let n_peaks: usize = result.samples.iter().map(|s| s.peaks().len()).sum();
    tracing::info!("{} samples, {} peaks", result.samples.len(), n_peaks);
    for s in &result.samples {
        if s.peaks().is_empty() || s.total_surface() == 0.0 {
            tracing::warn!("{}: no usable peaks; pick an integration region manually", s.name);
        }
    }

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());
    Ok(())
}

fn run_profile(args: &CliProfileArgs) -> CliResult<()> {
    let gray = load_gray(&args.image)?;
    let grid = densito::preprocess::profile_grid(&gray, args.blur_sigma);
    let profile =
        densito::compute_profile(&grid, args.axis.to_core(), args.inverted, args.relative)?;
    tracing::info!("Profile: {} samples", profile.len());

    std::fs::write(&args.out, profile.to_tsv())?;
    tracing::info!("Profile written to {}", args.out.display());
    Ok(())
}

fn run_peaks(args: &CliPeaksArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let text = std::fs::read_to_string(&args.profile).map_err(|e| -> CliError {
        format!("Failed to read profile {}: {}", args.profile.display(), e).into()
    })?;
    let profile = Profile::from_tsv(&text)?;

    let areas = densito::search_areas(&profile, &config.peaks);
    tracing::info!("{} peak candidates", areas.len());

    let name = args
        .profile
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "S1".to_string());
    let limits = densito::Interval::new(0.0, profile.max_position());
    let mut sample = Sample::new(name, limits, 0.0, profile.max_position(), profile);
    sample.set_peak_limits(&areas, &config.baseline);

    for p in sample.peaks() {
        tracing::info!(
            "{}: [{:.4}, {:.4}] surface={:.2} ({:.1}%)",
            p.name,
            p.limits.start,
            p.limits.end,
            p.surface,
            p.relative_surface
        );
    }

    let json = serde_json::to_string_pretty(&sample)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Sample written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
