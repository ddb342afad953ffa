// Core business logic module

pub mod config;
pub mod exporter;
pub mod system_monitor;

// Re-export commonly used items
pub use config::Config;
pub use exporter::{ExportFormat, Exporter, MetricsSnapshot};
