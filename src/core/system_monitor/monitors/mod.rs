//! The monitor family: one monitor per telemetry domain.
//!
//! A monitor owns its schedule, its sliding windows (or table state) and
//! its display handles. Readings come in through [`Monitor::update_data`];
//! the exporter reads the cached state back out through [`MetricsSource`].

mod cpu;
mod disk;
mod memory;
mod network;
mod process;

pub use cpu::CpuMonitor;
pub use disk::DiskMonitor;
pub use memory::MemMonitor;
pub use network::NetMonitor;
pub use process::ProcMonitor;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::metrics::{CpuLoad, DiskUsage, MemoryUsage, NetworkRates, ProcessRecord};

/// A monitor behind the lock its polling task and readers share.
pub type Shared<M> = Arc<Mutex<M>>;

/// Type-erased monitor, as held by the exporter.
pub type SharedSource = Arc<Mutex<dyn MetricsSource>>;

/// Telemetry domain of a monitor, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorKind {
    Cpu,
    Memory,
    Network,
    Disk,
    Process,
}

impl MonitorKind {
    pub const ALL: [MonitorKind; 5] = [
        MonitorKind::Cpu,
        MonitorKind::Memory,
        MonitorKind::Network,
        MonitorKind::Disk,
        MonitorKind::Process,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MonitorKind::Cpu => "cpu",
            MonitorKind::Memory => "memory",
            MonitorKind::Network => "network",
            MonitorKind::Disk => "disk",
            MonitorKind::Process => "process",
        }
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only view of a monitor's cached state.
///
/// Each monitor answers only for its own domain; the defaults say "not
/// mine". Nothing here triggers a provider call.
pub trait MetricsSource: Send {
    fn kind(&self) -> MonitorKind;

    fn exposes_cpu(&self) -> Option<Vec<CpuLoad>> {
        None
    }

    fn exposes_memory(&self) -> Option<MemoryUsage> {
        None
    }

    fn exposes_network(&self) -> Option<NetworkRates> {
        None
    }

    fn exposes_disk(&self) -> Option<DiskUsage> {
        None
    }

    fn exposes_processes(&self) -> Option<Vec<ProcessRecord>> {
        None
    }

    /// Stop polling and drop any pending redraw. Idempotent.
    fn cleanup(&mut self);
}

/// A pollable monitor.
pub trait Monitor: MetricsSource + 'static {
    type Reading: Send + 'static;

    /// Apply the first reading. Returning `false` stops the schedule.
    fn initialize(&mut self, reading: Option<&Self::Reading>) -> bool {
        self.update_data(reading);
        true
    }

    /// Apply a reading. Malformed input is a silent no-op that returns
    /// `false` and leaves state and display untouched.
    fn update_data(&mut self, reading: Option<&Self::Reading>) -> bool;
}
