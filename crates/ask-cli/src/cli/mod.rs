//! CLI entry and dispatch.

use anyhow::{Context, Result};
use ask_core::{config, logging};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "ask")]
#[command(version)]
#[command(about = "Ask a generative model questions from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the model from config
    #[arg(short, long, global = true)]
    model: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Exec {
        /// The question to send
        #[arg(short, long)]
        prompt: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, model } = cli;

    match command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Some(Commands::Exec { prompt }) => {
            let _log_guard = init_logging();
            let config = load_config(model.as_deref())?;
            commands::exec::run(&prompt, &config).await
        }
        None => {
            let _log_guard = init_logging();
            let config = load_config(model.as_deref())?;
            commands::chat::run(&config).await
        }
    }
}

fn load_config(model_override: Option<&str>) -> Result<config::Config> {
    let mut config = config::Config::load().context("load config")?;
    if let Some(model) = model_override {
        config.model = model.to_string();
    }
    Ok(config)
}

/// Logging problems never stop a command; they are reported once.
fn init_logging() -> Option<logging::WorkerGuard> {
    match logging::init(&config::paths::logs_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    }
}
