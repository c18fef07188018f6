//! A.v.A - Main CLI Entry Point

use anyhow::{Context, Result};
use ava::cli::{Args, Commands, Config};
use ava::memory::{JsonFileStore, LogExporter, StoreBackend};
use ava::repl::{ChatSession, DisplayManager, LineReader, ReplSession, TurnReport};
use ava::telemetry;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Effective configuration after applying CLI overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;

    if let Some(store) = &args.store {
        let store = if store.is_absolute() {
            store.clone()
        } else {
            std::env::current_dir()?.join(store)
        };
        config.paths.store_file = store.to_string_lossy().into_owned();
    }
    if args.seed.is_some() {
        config.agent.rng_seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

/// Run the interactive conversation
fn run_chat(config: &Config) -> Result<()> {
    let chat = ChatSession::from_config(config).context("Failed to open memory store")?;
    let display = DisplayManager::new(config.agent.bot_label.clone());
    let reader = LineReader::with_history(&config.agent.user_label, config.history_path())?;
    let mut repl = ReplSession::new(chat, reader, display);

    repl.show_welcome(env!("CARGO_PKG_VERSION"));
    repl.run()
}

/// Run exactly one turn
fn run_ask(config: &Config, message: &[String]) -> Result<()> {
    let mut chat = ChatSession::from_config(config).context("Failed to open memory store")?;
    let display = DisplayManager::new(config.agent.bot_label.clone());

    match chat.handle_turn(&message.join(" ")) {
        TurnReport::Failed { message, .. } => {
            display.show_error(&message);
            anyhow::bail!("turn failed");
        }
        report => display.show_reply(report.text()),
    }
    Ok(())
}

fn run_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let store = JsonFileStore::new(config.store_path()).load()?;
    let exporter = LogExporter::new(output.unwrap_or_else(|| config.log_path()))
        .with_labels(&config.agent.user_label, &config.agent.bot_label);

    println!("{}", exporter.export(&store)?.green());
    Ok(())
}

fn run_config(config: &Config, write: bool) -> Result<()> {
    println!("{}", config.to_toml()?);

    if write {
        let path = Config::default_path();
        config.save(&path)?;
        println!("{} {}", "Configuration written to".green(), path.display());
    }
    Ok(())
}

fn run_clean(config: &Config, all: bool) -> Result<()> {
    let store = JsonFileStore::new(config.store_path());
    if store.delete()? {
        println!("{} {}", "Removed".yellow(), store.path().display());
    } else {
        println!("{}", "No memory store to remove.".dimmed());
    }

    if all {
        for path in [config.log_path(), config.error_log_path(), config.history_path()] {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                println!("{} {}", "Removed".yellow(), path.display());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    telemetry::init_logging(args.verbosity());
    if args.no_color {
        DisplayManager::set_color(false);
    }

    let config = load_config(&args)?;
    tracing::debug!(verbosity = args.verbosity().as_str(), store = %config.store_path().display(), "starting");

    match args.command() {
        Commands::Chat => run_chat(&config),
        Commands::Ask { message } => run_ask(&config, &message),
        Commands::Export { output } => run_export(&config, output),
        Commands::Config { write } => run_config(&config, write),
        Commands::Clean { all } => run_clean(&config, all),
    }
}
