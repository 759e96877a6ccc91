//! Glint - security check runner
//!
//! This is the main entry point for the `glint` binary.

mod cli;
mod commands;
mod locate;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use glint_checks::CheckContext;
use glint_common::logging::{init_logging_with_config, LogConfig, LogFormat};
use glint_common::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.debug);
            ExitCode::FAILURE
        }
    };
    println!(
        "{} shutting down at {}",
        "[*]".cyan(),
        chrono::Local::now().format("%H:%M:%S")
    );
    code
}

fn run(cli: &Cli) -> Result<()> {
    let (config, missing) = load_config(cli.config.as_deref())?;
    let config = cli.apply(config.merge_env());
    config.validate()?;

    // Initialize logging
    let log_config = LogConfig::new()
        .level(&config.logging.level)
        .format(LogFormat::from_name(&config.logging.format))
        .verbosity(cli.verbose, cli.debug);
    init_logging_with_config(log_config)?;

    info!("Glint starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = missing {
        warn!("Config file {} not found, using defaults", path.display());
    }

    let context = CheckContext::new(&config.request).context("failed to set up HTTP client")?;
    let (registry, load_report) = commands::load_checks(cli, &config, &context)?;

    match &cli.command {
        Some(Command::ShowInfo { names, kind }) => {
            commands::show_info(&mut std::io::stdout().lock(), &registry, names, kind.as_deref())?;
        }
        None => {
            let report = commands::run_checks(cli, &config, registry)?;
            commands::print_summary(&mut std::io::stdout().lock(), &load_report, &report)?;
        }
    }
    Ok(())
}

/// Read the config file if given; a missing file falls back to defaults
fn load_config(path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    match path {
        Some(path) if path.is_file() => Ok((Config::from_file(path)?, None)),
        Some(path) => Ok((Config::default(), Some(path.to_path_buf()))),
        None => Ok((Config::default(), None)),
    }
}

fn report_error(err: &anyhow::Error, debug: bool) {
    if debug {
        eprintln!("{:?}", err);
        return;
    }
    let code = err
        .downcast_ref::<glint_core::Error>()
        .map(glint_core::Error::code)
        .unwrap_or("ERROR");
    eprintln!("{} Main breakout: {}: {:#}", "[-]".red(), code, err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let (config, missing) = load_config(Some(Path::new("/nonexistent/glint.toml"))).unwrap();
        assert_eq!(config.engine.threads, 10);
        assert_eq!(missing, Some(PathBuf::from("/nonexistent/glint.toml")));
    }

    #[test]
    fn test_config_file_is_read() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let path = tmp_dir.path().join("glint.toml");
        std::fs::write(&path, "[engine]\nthreads = 3\n").unwrap();

        let (config, missing) = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.engine.threads, 3);
        assert!(missing.is_none());
    }

    #[test]
    fn test_error_code_in_summary() {
        let err = anyhow::Error::new(glint_core::Error::Configuration("bad".into()));
        assert_eq!(
            err.downcast_ref::<glint_core::Error>().map(glint_core::Error::code),
            Some("CONFIG_ERROR")
        );
    }
}
