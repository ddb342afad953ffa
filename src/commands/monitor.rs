//! Dashboard command handler.

use anyhow::{Context, Result};

use crate::core::Config;
use crate::ui::monitor_tui::run_dashboard;

/// Execute the dashboard command
pub fn execute(config: &Config) -> Result<()> {
    log::info!(
        "Starting dashboard (export {})",
        if config.export.enabled { "on" } else { "off" }
    );
    run_dashboard(config).context("Failed to run dashboard")
}
