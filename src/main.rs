//! CLI entry point for the ThinkLink gate.
//!
//! Provides commands for configuring, converting vector files, checking single
//! word pairs, and serving the gate over HTTP.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thinklink::io::ExitCode;
use thinklink::vector::CACHE_EXTENSION;
use thinklink::{DecisionEngine, GateError, Settings, StoreError, VectorStore, WordVectors};
use tracing::{debug, info, warn};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic proximity gate for word-association games
#[derive(Parser)]
#[command(
    name = "thinklink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Semantic proximity gate for word-association games",
    long_about = "Decide whether a word is related to, but not a trivial variant of, a target word.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of settings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .thinklink directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display effective settings as TOML")]
    Config,

    /// Run one gate decision
    #[command(
        about = "Check whether a word is an acceptable association for a target",
        after_help = "Examples:\n  thinklink check ocean sea\n  thinklink check ocean sea --score 750 --json\n\nExit status is 0 when the word is accepted and 3 when it is rejected."
    )]
    Check {
        /// Target word
        target: String,

        /// Candidate word
        candidate: String,

        /// Accumulated score so far
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        score: f64,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Convert a GloVe text file to the binary cache
    #[command(about = "Parse a GloVe text file once and write a .tlwv cache")]
    Convert {
        /// GloVe text file
        input: PathBuf,

        /// Cache file to write
        output: PathBuf,

        /// Keep only the first N words
        #[arg(long)]
        max_words: Option<usize>,
    },

    /// Start the HTTP server
    #[command(about = "Serve POST /check over HTTP")]
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Entry point with tokio async runtime.
///
/// Settings are loaded before logging so `logging.level` applies from the
/// first message.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("Configuration error: {message}");
            std::process::exit(ExitCode::ConfigError.into());
        }
    };

    init_logging(&settings, cli.verbose);
    debug!("Settings loaded: {settings:?}");

    let code = match run(cli.command, settings).await {
        Ok(code) => code,
        Err(e) => report(&e),
    };

    std::process::exit(code.into());
}

fn load_settings(config: Option<&Path>) -> Result<Settings, String> {
    match config {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("{} does not exist", path.display()));
            }
            Settings::load_from(path).map_err(|e| format!("loading {}: {e}", path.display()))
        }
        None => Ok(Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        })),
    }
}

fn init_logging(settings: &Settings, verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        settings.logging.max_level()
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(command: Commands, settings: Settings) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Init { force } => {
            let cwd = std::env::current_dir().context("resolving current directory")?;
            let path = Settings::init_config_file(&cwd, force).map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            Ok(ExitCode::Success)
        }

        Commands::Config => {
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            println!("{}", settings.to_toml()?);
            Ok(ExitCode::Success)
        }

        Commands::Check {
            target,
            candidate,
            score,
            json,
        } => {
            let engine = load_engine(&settings)?;
            let (decision, reason) = match engine.evaluate(&target, &candidate, score) {
                Ok(decision) => (decision, None),
                Err(e) => {
                    debug!("{e} ({})", e.status_code());
                    (thinklink::Decision::rejected(), Some(e))
                }
            };

            if json {
                let output = serde_json::json!({
                    "matched": decision.accepted,
                    "score": decision.score,
                    "points": decision.points(),
                    "threshold": engine.policy().threshold(score),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let verdict = if decision.accepted { "accepted" } else { "rejected" };
                println!(
                    "{candidate} -> {target}: {verdict} (similarity {:.4}, threshold {:.4}, {} points)",
                    decision.score,
                    engine.policy().threshold(score),
                    decision.points()
                );
                if let Some(e) = reason {
                    println!("  {e}");
                }
            }

            Ok(ExitCode::from_decision(decision.accepted))
        }

        Commands::Convert {
            input,
            output,
            max_words,
        } => {
            let is_cache_name = output
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CACHE_EXTENSION));
            if !is_cache_name {
                warn!(
                    "{} does not end in .{CACHE_EXTENSION}; it will be read back as GloVe text",
                    output.display()
                );
            }

            let spinner = create_spinner(&format!("Parsing {}", input.display()));
            let store = WordVectors::load_glove(&input, max_words);
            spinner.finish_and_clear();
            let store = store?;

            store.save_cache(&output)?;
            println!(
                "Converted {} words ({}-dimensional) to {}",
                store.len(),
                store.dimension(),
                output.display()
            );
            Ok(ExitCode::Success)
        }

        Commands::Serve { bind } => serve(settings, bind).await,
    }
}

#[cfg(feature = "http-server")]
async fn serve(settings: Settings, bind: Option<String>) -> anyhow::Result<ExitCode> {
    let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
    let engine = load_engine(&settings)?;
    thinklink::server::serve_http(engine, &bind, &settings.server.cors_origins).await?;
    Ok(ExitCode::Success)
}

#[cfg(not(feature = "http-server"))]
async fn serve(_settings: Settings, _bind: Option<String>) -> anyhow::Result<ExitCode> {
    eprintln!("HTTP server support is not compiled in.");
    eprintln!("Rebuild with: cargo build --features http-server");
    Ok(ExitCode::GeneralError)
}

fn load_engine(settings: &Settings) -> anyhow::Result<DecisionEngine<WordVectors>> {
    let policy = settings.gate.policy()?;
    let path = &settings.vectors.path;

    let spinner = create_spinner(&format!("Loading vectors from {}", path.display()));
    let store = WordVectors::open(path, settings.vectors.max_words);
    spinner.finish_and_clear();
    let store = store?;

    info!(
        "Loaded {} words ({}-dimensional)",
        store.len(),
        store.dimension()
    );
    Ok(DecisionEngine::new(Arc::new(store), policy))
}

/// Create a spinner for indeterminate progress.
fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print an error with recovery suggestions and pick the exit code.
fn report(error: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {error:#}");

    let code = error
        .chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<StoreError>() {
                print_suggestions(&e.recovery_suggestions());
                Some(ExitCode::from_store_error(e))
            } else if let Some(e) = cause.downcast_ref::<GateError>() {
                print_suggestions(&e.recovery_suggestions());
                Some(ExitCode::from_gate_error(e))
            } else {
                None
            }
        })
        .unwrap_or(ExitCode::GeneralError);

    eprintln!("
{} (exit code {})", code.description(), i32::from(code));
    code
}

fn print_suggestions(suggestions: &[&str]) {
    if suggestions.is_empty() {
        return;
    }
    eprintln!("\nSuggestions:");
    for suggestion in suggestions {
        eprintln!("  - {suggestion}");
    }
}
