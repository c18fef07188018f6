//! Command-line argument parsing for A.v.A
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A.v.A - a rule-based terminal companion that remembers you
#[derive(Parser, Debug)]
#[command(name = "ava")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "A rule-based terminal companion that remembers you", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Memory store file (overrides the configured path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Seed for fallback reply selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive conversation
    Chat,

    /// Run a single turn and print the reply
    Ask {
        /// What to say
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Export the conversation log
    Export {
        /// Target file (defaults to the configured log file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display current configuration
    Config {
        /// Also write it to ~/.ava/config.toml
        #[arg(long)]
        write: bool,
    },

    /// Delete the memory store
    Clean {
        /// Also remove logs and input history
        #[arg(long)]
        all: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, `chat` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }
}
