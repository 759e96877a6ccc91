//! Command-line arguments

use clap::{ArgAction, Parser, Subcommand};
use glint_common::Config;
use std::path::PathBuf;

/// Glint - run security checks against targets
#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(version)]
#[command(about = "Run security checks against a set of targets", long_about = None)]
pub struct Cli {
    /// Target to check (repeatable)
    #[arg(short = 'u', long = "url")]
    pub urls: Vec<String>,

    /// File with one target per line (repeatable)
    #[arg(short = 'f', long = "file")]
    pub files: Vec<PathBuf>,

    /// Check to load: a name under the checks dir, file:// or http(s):// locator (repeatable)
    #[arg(short = 'p', long = "poc")]
    pub pocs: Vec<String>,

    /// File with one check locator per line (repeatable)
    #[arg(long = "poc-file")]
    pub poc_files: Vec<PathBuf>,

    /// Checks directory (overrides config)
    #[arg(long = "pocs-path")]
    pub pocs_path: Option<PathBuf>,

    /// Output sinks: console, text, json (repeatable or comma separated)
    #[arg(short = 'o', long = "out", value_delimiter = ',')]
    pub out: Vec<String>,

    /// Worker threads (overrides config)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum run time in seconds (overrides config)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Debug mode: detailed logs and full error traces, no progress bar
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show information about loaded checks
    ShowInfo {
        /// Check names to describe
        names: Vec<String>,

        /// Search checks whose type or tags contain this string
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(threads) = self.threads {
            config.engine.threads = threads;
        }
        if let Some(timeout) = self.timeout {
            config.engine.timeout_seconds = timeout;
        }
        if let Some(path) = &self.pocs_path {
            config.checks.path = path.clone();
        }
        if !self.out.is_empty() {
            config.output.sinks = self.out.clone();
        }
        config
    }
}
