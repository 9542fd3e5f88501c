use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadence_core::CadenceConfig;
use cadence_sync::{StartAt, Synchronizer, VirtualAnimation};
use cadence_timeline::{BuiltTimeline, TimelineDocument};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Cadence: compose and synchronize timed animations",
    long_about = "Cadence compiles time-keyed animation descriptions, composes them into groups and sequences,\nand plays them in lockstep on a single logical clock."
)]
struct Cli {
    /// Path to a cadence.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved timing of every effect in a timeline document
    Inspect {
        /// Path to the timeline JSON document
        #[arg()]
        file: PathBuf,

        /// Print the compiled stage as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a timeline document (compile + composition + structural checks)
    Check {
        /// Path to the timeline JSON document
        #[arg()]
        file: PathBuf,
    },

    /// Play a timeline document on the virtual engine and print the stop time
    Play {
        /// Path to the timeline JSON document
        #[arg()]
        file: PathBuf,

        /// Logical milliseconds to play; negative values move backwards
        #[arg(long, allow_hyphen_values = true)]
        dur: f64,

        /// Start label or logical time in ms (default: each effect's own time)
        #[arg(long)]
        start: Option<String>,
    },

    /// Display version info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CadenceConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => CadenceConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { file, json } => cmd_inspect(&file, json),
        Commands::Check { file } => cmd_check(&file),
        Commands::Play { file, dur, start } => {
            run_async(cmd_play(file, dur, start, config))
        }
        Commands::Info => cmd_info(),
    }
}

fn run_async<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(future)
}

fn load_timeline(file: &Path) -> Result<BuiltTimeline> {
    let document = TimelineDocument::load_from_file(file)
        .with_context(|| format!("failed to read timeline: {}", file.display()))?;
    document
        .build()
        .with_context(|| format!("failed to build timeline: {}", file.display()))
}

/// A start argument that parses as a number is a time, anything else a label.
fn parse_start(start: Option<String>) -> StartAt {
    match start {
        None => StartAt::Own,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(ms) if ms.is_finite() => StartAt::from(ms),
            _ => StartAt::Label(raw),
        },
    }
}

fn cmd_inspect(file: &Path, json: bool) -> Result<()> {
    let built = load_timeline(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&built.stage)?);
        return Ok(());
    }

    println!("{}", file.display());
    println!(
        "   {:<16} {:<12} {:<10} {:<10} {:>9} {:>9} {:>6}",
        "effect", "target", "pseudo", "id", "delay", "duration", "steps"
    );
    for (name, key) in &built.effects {
        let effect = built.stage.effect(*key)?;
        println!(
            "   {:<16} {:<12} {:<10} {:<10} {:>9} {:>9} {:>6}",
            name,
            effect.target.to_string(),
            effect.pseudo_element().unwrap_or("-"),
            effect.id().unwrap_or("-"),
            effect.delay().to_string(),
            effect.duration().to_string(),
            effect.steps().len()
        );
    }
    println!("   total: {}", built.stage.end_time());
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let built = load_timeline(file)?;
    println!("Checking {}", file.display());
    println!("   ✓ {} effect(s) compiled and composed", built.stage.len());

    match cadence_timeline::validate_stage(&built.stage) {
        Ok(()) => {
            println!("   ✓ Validation OK");
            Ok(())
        }
        Err(errors) => {
            for err in &errors {
                println!("   ✗ {}", err);
            }
            anyhow::bail!("{} validation error(s)", errors.len())
        }
    }
}

async fn cmd_play(file: PathBuf, dur: f64, start: Option<String>, config: CadenceConfig) -> Result<()> {
    let built = load_timeline(&file)?;
    let mut animations = VirtualAnimation::from_stage(&built.stage);
    let synchronizer = Synchronizer::from_config(config.playback);

    let start = parse_start(start);
    tracing::debug!("playing {} from {:?}", file.display(), start);
    let stop = synchronizer
        .play(&mut animations, dur, start)
        .await
        .context("playback failed")?;

    println!("stopped at {} ({}ms)", stop, stop.as_millis());
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("Cadence");
    println!("   Version:  {}", env!("CARGO_PKG_VERSION"));
    println!("   Engine:   virtual (tokio clock)");
    println!();
    println!("   Repository: https://github.com/cadence-dev/cadence");
    Ok(())
}
