//! The run and show-info commands

use crate::cli::Cli;
use crate::locate::{check_locators, load_targets, CheckSource};
use colored::*;
use glint_checks::{BuiltinCatalog, CheckContext, CheckLoader, CheckRegistry, LoadReport};
use glint_common::Config;
use glint_core::{Check, Result};
use glint_engine::{Completion, Engine, OutputDispatcher, RunOptions, RunReport};
use glint_output::SinkCatalog;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Load checks named on the command line, or the whole checks directory
pub fn load_checks(cli: &Cli, config: &Config, context: &CheckContext) -> Result<(CheckRegistry, LoadReport)> {
    let mut loader = CheckLoader::new(BuiltinCatalog::with_defaults(), context.clone());

    if cli.pocs.is_empty() && cli.poc_files.is_empty() {
        loader.load_dir(&config.checks.path)?;
    } else {
        for locator in check_locators(&cli.pocs, &cli.poc_files)? {
            let source = CheckSource::parse(&locator, &config.checks.path);
            let text = source.read(&context.http);
            loader.add(&source.name, &source.category, text);
        }
    }

    let (registry, report) = loader.finish();
    info!(
        "Loaded {} check(s) ({} instance(s)), {} failed",
        registry.len(),
        registry.instance_count(),
        report.failures.len()
    );
    Ok((registry, report))
}

/// Run every loaded check against the targets given on the command line
pub fn run_checks(cli: &Cli, config: &Config, registry: CheckRegistry) -> Result<RunReport> {
    let targets = load_targets(&cli.urls, &cli.files)?;
    info!("Loaded [{}] targets", targets.len());

    let sinks = SinkCatalog::build(&config.output.sinks, &config.output)?;
    let mut engine = Engine::new(Arc::new(registry), targets, OutputDispatcher::with_sinks(sinks));

    engine.run(&RunOptions {
        threads: config.engine.threads,
        timeout: config.engine.timeout(),
        show_progress: !cli.debug,
    })
}

/// Print the end-of-run summary
pub fn print_summary(out: &mut impl Write, load: &LoadReport, report: &RunReport) -> std::io::Result<()> {
    let stats = &report.stats;
    writeln!(out)?;
    writeln!(
        out,
        "{} loaded {} check instance(s), {} failed to load",
        "[*]".cyan(),
        load.loaded(),
        load.failures.len()
    )?;
    writeln!(
        out,
        "{} {} vulnerable, {} not vulnerable, {} error(s) in {} ms",
        "[*]".cyan(),
        stats.vulnerable,
        stats.not_vulnerable,
        stats.errors,
        stats.elapsed_ms
    )?;
    if let Completion::DeadlineExceeded { pending } = report.completion {
        writeln!(
            out,
            "{} deadline reached: {} task(s) did not finish",
            "[!]".yellow(),
            pending
        )?;
    }
    Ok(())
}

/// Describe checks by name, or search them by type
pub fn show_info(
    out: &mut impl Write,
    registry: &CheckRegistry,
    names: &[String],
    kind: Option<&str>,
) -> std::io::Result<()> {
    if let Some(needle) = kind {
        let found = registry.search_type(needle);
        writeln!(out, "{}", "Search result:".yellow())?;
        if found.is_empty() {
            writeln!(out, "    {}", "No result".red())?;
        } else {
            writeln!(out, "    {}", found.join(", ").as_str().cyan())?;
        }
        return Ok(());
    }

    for name in names {
        match registry.get(name).and_then(|instances| instances.first().map(|c| (c, instances.len()))) {
            Some((check, count)) => describe(out, check.as_ref(), count)?,
            None => writeln!(out, "{} can't find {}", "[-]".red(), name)?,
        }
    }
    Ok(())
}

fn describe(out: &mut impl Write, check: &dyn Check, instances: usize) -> std::io::Result<()> {
    let meta = check.metadata();
    writeln!(out, "{}", check.name().bold())?;
    writeln!(out, "    title:       {}", meta.title)?;
    if !meta.kind.is_empty() {
        writeln!(out, "    type:        {}", meta.kind)?;
    }
    if let Some(author) = &meta.author {
        writeln!(out, "    author:      {}", author)?;
    }
    if let Some(version) = &meta.version {
        writeln!(out, "    version:     {}", version)?;
    }
    if !meta.tags.is_empty() {
        writeln!(out, "    tags:        {}", meta.tags.join(", "))?;
    }
    if !meta.description.is_empty() {
        writeln!(out, "    description: {}", meta.description)?;
    }
    for reference in &meta.references {
        writeln!(out, "    reference:   {}", reference)?;
    }
    if instances > 1 {
        writeln!(out, "    instances:   {}", instances)?;
    }
    Ok(())
}
