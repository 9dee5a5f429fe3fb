mod args;

pub use args::{Cli, ModeArg};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sitewatch_runtime::{Monitor, MonitorConfig, MonitorLogger, WebDriverSession, sink_for};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn run(cli: Cli) -> Result<()> {
    let mut config = MonitorConfig::load_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    let logger = MonitorLogger::open(&config.log_dir)
        .with_context(|| format!("failed to open log directory {}", config.log_dir.display()))?;

    println!("{}", "sitewatch".bold());
    println!("  target:  {}", config.target_url().cyan());
    println!("  mode:    {:?}", config.persistence);
    println!("  records: {}", config.log_dir.display());
    println!("{}", "-".repeat(60));

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install interrupt handler")?;

    let mut driver = WebDriverSession::connect(&config.webdriver_url, cli.headless)
        .with_context(|| format!("failed to start a browser session via {}", config.webdriver_url))?;

    let sink = sink_for(config.persistence, &config.log_dir);
    let mut monitor = Monitor::new(config, logger, sink, cancel);

    monitor.run(&mut driver)?;
    println!("{}", "monitoring stopped".green());
    Ok(())
}

fn apply_overrides(config: &mut MonitorConfig, cli: &Cli) -> Result<()> {
    if let Some(mode) = cli.mode {
        config.persistence = mode.into();
    }
    if let Some(url) = &cli.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }

    config.base_url = match &cli.base_url {
        Some(base) => base.clone(),
        None => prompt_base_url(&config.base_url)?,
    };

    Ok(())
}

/// The one interactive surface: a blocking prompt for the base URL.
/// An empty line (or EOF, when stdin is not a terminal) keeps the default.
fn prompt_base_url(default: &str) -> Result<String> {
    print!("Base URL [{}]: ", default);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}
