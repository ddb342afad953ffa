use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle_config(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("sample", _)) => {
            println!("{}", Config::sample());
            Ok(())
        }
        Some(("save", _)) => save_defaults(),
        _ => {
            println!("Use 'gtop config --help' for more information.");
            Ok(())
        }
    }
}

fn save_defaults() -> Result<()> {
    let path = Config::default()
        .save()
        .context("Failed to save configuration")?;

    println!(
        "{} {}",
        "✓ Configuration saved to".green(),
        path.display().to_string().cyan()
    );
    println!("  Edit it and restart gtop to apply changes.");
    Ok(())
}
