// UI and formatting module

pub mod formatters;
pub mod monitor_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{human_file_size, padded_percent};
