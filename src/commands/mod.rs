// Command handlers module
pub mod config;
pub mod export;
pub mod monitor;

// Re-exports for cleaner imports
pub use export::execute as export;
pub use monitor::execute as monitor;
