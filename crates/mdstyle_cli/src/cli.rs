//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// mdstyle - Markdown style-consistency linter
#[derive(Parser)]
#[command(name = "mdstyle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files
    Lint {
        /// Files, directories or glob patterns to lint
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Auto-fix problems
        #[arg(long)]
        fix: bool,

        /// Preview fixes without writing them
        #[arg(long, requires = "fix")]
        dry_run: bool,

        /// Report time spent per rule
        #[arg(long)]
        timings: bool,
    },

    /// Write a configuration file with every rule at its defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List built-in rules
    Rules {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}
