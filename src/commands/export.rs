//! Headless export: poll for a while without the dashboard, then write
//! one snapshot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::system_monitor::{MetricsProvider, MetricsRuntime, Surfaces, SysinfoProvider};
use crate::core::Config;

/// Time the monitors get to take their first readings.
pub const DEFAULT_WAIT_MS: u64 = 2000;

pub fn execute(config: &Config, matches: &ArgMatches) -> Result<()> {
    let wait_ms = matches
        .get_one::<u64>("wait-ms")
        .copied()
        .unwrap_or(DEFAULT_WAIT_MS);
    let format = matches.get_one::<String>("format").map(String::as_str);

    let provider: Arc<dyn MetricsProvider> = Arc::new(SysinfoProvider::new());
    let runtime = MetricsRuntime::new(config, provider, Surfaces::detached())
        .context("Failed to start metrics runtime")?;

    println!("{} {}ms...", "Collecting metrics for".cyan(), wait_ms);
    std::thread::sleep(Duration::from_millis(wait_ms));

    let result = runtime.export_now(format);
    runtime.shutdown();

    let path = result.context("Export failed")?;
    println!(
        "{} {}",
        "✓ Exported metrics to".green(),
        path.display().to_string().cyan()
    );
    Ok(())
}
