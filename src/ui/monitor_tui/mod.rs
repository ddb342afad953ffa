//! Terminal dashboard.
//!
//! Provides the live dashboard using ratatui; the panels in [`surface`] are
//! the display surfaces the monitors draw into.

mod app;
mod event_handler;
mod render;
pub mod surface;
mod widgets;

pub use app::{run_dashboard, DashboardApp, InputMode};
pub use event_handler::{DashboardEvent, KeyBinding, KeyMap};
pub use surface::Panels;
