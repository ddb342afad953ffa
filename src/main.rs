use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

use gtop::commands;
use gtop::core::config::Config;

/// Matches `commands::export::DEFAULT_WAIT_MS`.
const DEFAULT_WAIT: &str = "2000";

fn main() -> Result<()> {
    let matches = Command::new("gtop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("System monitoring dashboard for the terminal")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Read configuration from PATH instead of searching for .gtoprc")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write log output to PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or write the configuration file")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("sample").about("Print the default configuration"))
                .subcommand(
                    Command::new("save")
                        .about("Write the default configuration to the config file"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Collect metrics without the dashboard and export them once")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Export format: json, csv or prometheus (defaults to the config)"),
                )
                .arg(
                    Arg::new("wait-ms")
                        .short('w')
                        .long("wait-ms")
                        .value_name("MS")
                        .help("How long to collect before exporting")
                        .value_parser(clap::value_parser!(u64))
                        .default_value(DEFAULT_WAIT),
                ),
        )
        .get_matches();

    gtop::init_logging(matches.get_one::<PathBuf>("log-file").map(PathBuf::as_path));

    match matches.subcommand() {
        Some(("config", sub_matches)) => commands::config::handle_config(sub_matches),
        Some(("export", sub_matches)) => commands::export(&load_config(&matches), sub_matches),
        _ => commands::monitor(&load_config(&matches)),
    }
}

fn load_config(matches: &ArgMatches) -> Config {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    }
}
