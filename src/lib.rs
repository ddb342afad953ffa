// gtop library - public API

pub mod error;
pub use error::{GtopError, Result};

pub mod commands;
pub mod core;
pub mod ui;

pub use core::config::Config;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Default log file: `<cache dir>/gtop/gtop.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("gtop").join("gtop.log"))
}

/// Initialize logging.
///
/// The dashboard owns the terminal, so records go to a file rather than
/// stderr. `RUST_LOG` overrides the default `info` level. If no log file
/// can be opened, records are discarded.
pub fn init_logging(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info).parse_default_env();

    let path = log_file.map(Path::to_path_buf).or_else(default_log_path);
    let file = path.and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(&path).ok()
    });

    match file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder
                .filter_level(log::LevelFilter::Off)
                .target(env_logger::Target::Pipe(Box::new(std::io::sink())));
        }
    }

    // A second call (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}
