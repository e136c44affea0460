//! spamguard: SMS spam checker
//!
//! # Usage
//!
//! ```bash
//! # Classify a message (remote endpoint if configured, local fallback otherwise)
//! spamguard predict "WINNER! Claim your FREE prize now"
//!
//! # Classify a text file, forcing the local classifier
//! spamguard predict --file sms.txt --mock
//!
//! # Browse and manage history
//! spamguard history list
//! spamguard history show <id>
//! spamguard history clear
//!
//! # Theme preference
//! spamguard theme toggle
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spamguard::app::{load_message_file, GENERIC_FAILURE};
use spamguard::classifier::RemoteClassifier;
use spamguard::constants::{self, SAMPLE_MESSAGES};
use spamguard::render::{self, Renderer};
use spamguard::{App, PredictionSource, SpamGuardConfig, SpamGuardError, ThemeMode};

#[derive(Parser)]
#[command(name = "spamguard", version)]
#[command(about = "Check SMS messages for spam with token-level explanations", long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults to ./spamguard.toml when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a message
    Predict {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Read the message from a text file
        #[arg(short, long, conflicts_with_all = ["text", "sample"])]
        file: Option<PathBuf>,

        /// Use a built-in sample message (1-4, see `samples`)
        #[arg(long, conflicts_with = "text")]
        sample: Option<usize>,

        /// Skip the remote endpoint and use the local classifier
        #[arg(long)]
        mock: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Show each token's score in the analysis
        #[arg(long)]
        scores: bool,

        /// Do not add the result to history
        #[arg(long)]
        no_save: bool,
    },
    /// Browse or clear prediction history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// List sample messages
    Samples,
    /// Model information
    About,
    /// Check the remote endpoint
    Health,
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List stored predictions, most recent first
    List,
    /// Display a stored prediction
    Show {
        /// History item ID
        id: String,
        /// Print JSON instead of the card
        #[arg(long)]
        json: bool,
    },
    /// Remove all stored predictions
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set {
        /// light or dark
        mode: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "spamguard=debug" } else { "spamguard=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_message(
    text: Option<String>,
    file: Option<PathBuf>,
    sample: Option<usize>,
) -> anyhow::Result<String> {
    if let Some(path) = file {
        return load_message_file(&path)
            .with_context(|| format!("Failed to read message file {}", path.display()));
    }

    if let Some(number) = sample {
        let sample = constants::sample(number).with_context(|| {
            format!("No sample {}, choose 1-{}", number, SAMPLE_MESSAGES.len())
        })?;
        return Ok(sample.text.to_string());
    }

    match text {
        Some(text) => Ok(text),
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin"),
    }
}

fn source_note(source: PredictionSource) -> Option<String> {
    match source {
        PredictionSource::Remote => None,
        PredictionSource::Fallback(reason) => {
            Some(format!("(local keyword classifier, reason: {})", reason.as_str()))
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_predict(
    app: &mut App,
    renderer: Renderer,
    message: String,
    mock: bool,
    format: OutputFormat,
    scores: bool,
    no_save: bool,
) -> anyhow::Result<()> {
    let outcome = async {
        let source = app.predict(&message, mock).await?;
        if !no_save {
            app.save_current()?;
        }
        Ok::<_, SpamGuardError>(source)
    }
    .await;

    let source = match outcome {
        Ok(source) => source,
        Err(SpamGuardError::EmptyMessage) => {
            eprintln!("Nothing to analyze: the message is empty.");
            std::process::exit(2);
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            eprintln!("{}", GENERIC_FAILURE);
            std::process::exit(1);
        }
    };

    let result = app
        .current()
        .context("Prediction finished without a result")?;

    match format {
        OutputFormat::Json => println!("{}", render::to_json(result)?),
        OutputFormat::Summary => {
            print!("{}", renderer.prediction_card(result, scores));
            if let Some(note) = source_note(source) {
                println!("\n{}", note);
            }
        }
    }

    Ok(())
}

fn cmd_history(app: &mut App, renderer: Renderer, action: HistoryAction) -> anyhow::Result<()> {
    match action {
        HistoryAction::List => print!("{}", renderer.history_list(app.history())),
        HistoryAction::Show { id, json } => {
            let item = app.select_history(&id)?;
            if json {
                println!("{}", render::to_json(item)?);
            } else {
                print!("{}", renderer.prediction_card(item, false));
            }
        }
        HistoryAction::Clear => {
            let count = app.history().len();
            app.clear_history()?;
            println!("✓ Cleared {} prediction(s)", count);
        }
    }
    Ok(())
}

fn cmd_theme(app: &mut App, action: ThemeAction) -> anyhow::Result<()> {
    match action {
        ThemeAction::Show => println!("{}", app.theme()),
        ThemeAction::Toggle => println!("✓ Theme set to {}", app.toggle_theme()?),
        ThemeAction::Set { mode } => {
            let mode: ThemeMode = mode.parse()?;
            app.set_theme(mode)?;
            println!("✓ Theme set to {}", mode);
        }
    }
    Ok(())
}

fn cmd_samples() {
    for (idx, sample) in SAMPLE_MESSAGES.iter().enumerate() {
        let tag = if sample.expected.is_spam() { "🚨 Spam Ex" } else { "✅ Ham Ex" };
        println!("{}. {:<10} {}", idx + 1, tag, sample.text);
    }
}

async fn cmd_health(config: &SpamGuardConfig) -> anyhow::Result<()> {
    let Some(remote) = RemoteClassifier::from_config(&config.remote)? else {
        println!("No remote endpoint configured; predictions use the local classifier.");
        return Ok(());
    };

    match remote.health().await {
        Ok(report) => {
            println!("Endpoint:     {}", remote.base_url());
            println!("Status:       {}", report.status);
            println!("Model loaded: {}", report.model_loaded);
        }
        Err(e) => {
            println!("✗ {} is unreachable: {}", remote.base_url(), e);
            println!("  Predictions will use the local classifier.");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Open persisted state and a renderer matching its theme
fn open_app(config: &SpamGuardConfig, no_color: bool) -> anyhow::Result<(App, Renderer)> {
    let app = App::from_config(config).context("Failed to open application state")?;
    let color = config.ui.color && !no_color && std::io::stdout().is_terminal();
    let renderer = Renderer::new(app.theme(), color);
    Ok((app, renderer))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = SpamGuardConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!("Starting spamguard v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Predict {
            text,
            file,
            sample,
            mock,
            format,
            scores,
            no_save,
        } => {
            let message = read_message(text, file, sample)?;
            let (mut app, renderer) = open_app(&config, cli.no_color)?;
            cmd_predict(&mut app, renderer, message, mock, format, scores, no_save).await?;
        }
        Commands::History { action } => {
            let (mut app, renderer) = open_app(&config, cli.no_color)?;
            cmd_history(&mut app, renderer, action.unwrap_or(HistoryAction::List))?;
        }
        Commands::Theme { action } => {
            let (mut app, _) = open_app(&config, cli.no_color)?;
            cmd_theme(&mut app, action.unwrap_or(ThemeAction::Show))?;
        }
        Commands::About => {
            let (_, renderer) = open_app(&config, cli.no_color)?;
            print!("{}", renderer.about());
        }
        Commands::Samples => cmd_samples(),
        Commands::Health => cmd_health(&config).await?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}
