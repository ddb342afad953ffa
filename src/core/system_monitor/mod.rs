//! Live-metrics pipeline.
//!
//! Per-domain monitors poll a [`MetricsProvider`] on their own schedules,
//! keep fixed-width sample windows, and hand structured data to the display
//! surface. The exporter reads their cached state through [`MetricsSource`].

pub mod display;
mod metrics;
pub mod monitors;
pub mod process_table;
pub mod provider;
pub mod runtime;
pub mod schedule;
pub mod throttle;
pub mod window;

pub use display::{Detached, Donut, DonutSegment, LineChart, Screen, SeriesDescriptor, Sparkline, Table, TableData};
pub use metrics::{CpuLoad, DiskUsage, MemoryUsage, NetworkRates, ProcessRecord};
pub use monitors::{
    CpuMonitor, DiskMonitor, MemMonitor, MetricsSource, Monitor, MonitorKind, NetMonitor,
    ProcMonitor, Shared, SharedSource,
};
pub use process_table::{ProcessTableState, SortKey};
pub use provider::{
    CoreLoad, CurrentLoad, FsEntry, MemInfo, MetricsProvider, NetStats, ProcessList,
    SysinfoProvider,
};
pub use runtime::{MetricsRuntime, MonitorSet, Surfaces};
pub use schedule::Schedule;
pub use throttle::{Throttle, REDRAW_DELAY};
pub use window::{SlidingWindow, WINDOW_SIZE};
