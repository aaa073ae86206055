//! Aura Tarot CLI
//!
//! # Commands
//!
//! - `render`: analyze a dream and write posters, charts and the reading
//! - `analyze`: print the dream analysis as JSON

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use aura_core::{render_dream, AuraConfig, DreamAnalyzer, PosterStyle};

/// Aura Tarot - dream text to aura posters and a tarot-style reading
#[derive(Parser)]
#[command(name = "aura-tarot")]
#[command(version)]
#[command(about = "Turn a dream description into aura posters and a tarot-style reading")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = "config/aura.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render posters, charts and reading.json for a dream
    Render(RenderArgs),
    /// Print the emotion profile and reading as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DreamInput {
    /// Dream description
    #[arg(long)]
    text: Option<String>,

    /// File containing the dream description
    #[arg(long)]
    file: Option<PathBuf>,
}

impl DreamInput {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read dream from {}", path.display())),
            (None, None) => bail!("provide --text or --file"),
        }
    }
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    input: DreamInput,

    /// Poster style: "Aura Focus", "Hybrid" or "Geometric Focus"
    #[arg(long, default_value = "Hybrid")]
    style: String,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Render only the first variation
    #[arg(long)]
    single: bool,

    /// Skip the remote model and use the local rules
    #[arg(long)]
    offline: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: DreamInput,

    /// Skip the remote model and use the local rules
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Render(args) => run_render(args, config),
        Commands::Analyze(args) => run_analyze(args, config),
    }
}

fn load_config(path: &Path) -> Result<AuraConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        return Ok(AuraConfig::default());
    }
    AuraConfig::load_from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn build_analyzer(config: &AuraConfig, offline: bool) -> DreamAnalyzer {
    if offline {
        DreamAnalyzer::rule_based()
    } else {
        DreamAnalyzer::from_config(&config.analyzer)
    }
}

fn run_render(args: RenderArgs, mut config: AuraConfig) -> Result<()> {
    let text = args.input.read()?;
    if args.single {
        config.render.variations = 1;
    }
    let style = PosterStyle::from_selector(&args.style);
    let analyzer = build_analyzer(&config, args.offline);

    let render = render_dream(&text, style, &config, &analyzer)?;
    let written = render
        .save(&args.out)
        .with_context(|| format!("failed to write output to {}", args.out.display()))?;

    let analysis = &render.analysis;
    println!("Model: {}", analysis.model_used);
    println!("Style: {style}  Seed: {}", render.seed);
    for (dimension, value) in analysis.emotions.iter() {
        println!("  {:<15} {:.3}", dimension.name(), value);
    }
    println!();
    println!("Symbolic summary\n  {}", analysis.symbolic_summary);
    println!("Shadow\n  {}", analysis.reading.shadow);
    println!("Energy\n  {}", analysis.reading.energy);
    println!("Guidance\n  {}", analysis.reading.guidance);
    println!();
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn run_analyze(args: AnalyzeArgs, config: AuraConfig) -> Result<()> {
    let text = args.input.read()?;
    let analysis = build_analyzer(&config, args.offline).analyze(&text)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
