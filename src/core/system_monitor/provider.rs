//! Source of OS telemetry.
//!
//! Monitors only see the [`MetricsProvider`] trait and the reading shapes
//! below. Every field a monitor relies on is optional so a partial or
//! malformed reading can be detected and skipped instead of trusted.
//! [`SysinfoProvider`] is the real implementation.

use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessesToUpdate, RefreshKind, System};

use super::metrics::ProcessRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentLoad {
    pub cpus: Option<Vec<CoreLoad>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreLoad {
    pub load: Option<f64>,
}

/// Memory figures in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemInfo {
    pub total: Option<f64>,
    pub available: Option<f64>,
    pub swaptotal: Option<f64>,
    pub swapused: Option<f64>,
}

/// Counters for one network interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetStats {
    pub iface: Option<String>,
    pub rx_sec: Option<f64>,
    pub tx_sec: Option<f64>,
    pub rx_bytes: Option<f64>,
    pub tx_bytes: Option<f64>,
}

/// Usage of one mounted filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FsEntry {
    pub fs: Option<String>,
    pub mount: Option<String>,
    /// Percent used.
    #[serde(rename = "use")]
    pub use_percent: Option<f64>,
    pub used: Option<f64>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessList {
    pub list: Option<Vec<ProcessRecord>>,
}

/// Telemetry source polled by the monitors.
///
/// `None` means the call failed outright; monitors treat it the same as a
/// malformed reading.
pub trait MetricsProvider: Send + Sync {
    fn current_load(&self) -> Option<CurrentLoad>;

    fn mem(&self) -> Option<MemInfo>;

    /// Name of the interface carrying default traffic.
    fn network_interface_default(&self) -> Option<String>;

    fn network_stats(&self, iface: &str) -> Option<Vec<NetStats>>;

    /// Mounted filesystems, primary (root) first.
    fn fs_size(&self) -> Option<Vec<FsEntry>>;

    fn processes(&self) -> Option<ProcessList>;
}

struct NetworkState {
    networks: Networks,
    last_refresh: Instant,
}

/// [`MetricsProvider`] backed by `sysinfo`.
pub struct SysinfoProvider {
    system: Mutex<System>,
    networks: Mutex<NetworkState>,
    disks: Mutex<Disks>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        Self {
            system: Mutex::new(System::new_with_specifics(refresh_kind)),
            networks: Mutex::new(NetworkState {
                networks: Networks::new_with_refreshed_list(),
                last_refresh: Instant::now(),
            }),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
        }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn is_loopback(name: &str) -> bool {
    name == "lo" || name.starts_with("lo0") || name.to_lowercase().contains("loopback")
}

impl MetricsProvider for SysinfoProvider {
    fn current_load(&self) -> Option<CurrentLoad> {
        let mut system = self.system.lock();
        system.refresh_cpu_usage();

        let cpus = system
            .cpus()
            .iter()
            .map(|cpu| CoreLoad {
                load: Some(cpu.cpu_usage() as f64),
            })
            .collect();

        Some(CurrentLoad { cpus: Some(cpus) })
    }

    fn mem(&self) -> Option<MemInfo> {
        let mut system = self.system.lock();
        system.refresh_memory();

        Some(MemInfo {
            total: Some(system.total_memory() as f64),
            available: Some(system.available_memory() as f64),
            swaptotal: Some(system.total_swap() as f64),
            swapused: Some(system.used_swap() as f64),
        })
    }

    fn network_interface_default(&self) -> Option<String> {
        let mut state = self.networks.lock();
        state.networks.refresh(true);
        state.last_refresh = Instant::now();

        // Busiest non-loopback interface stands in for the default route
        state
            .networks
            .list()
            .iter()
            .filter(|(name, _)| !is_loopback(name))
            .max_by_key(|(_, data)| data.total_received() + data.total_transmitted())
            .map(|(name, _)| name.clone())
    }

    fn network_stats(&self, iface: &str) -> Option<Vec<NetStats>> {
        let mut state = self.networks.lock();
        state.networks.refresh(true);

        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refresh).as_secs_f64();
        state.last_refresh = now;

        let data = state.networks.list().get(iface)?;
        let per_sec = |bytes: u64| {
            if elapsed > 0.0 {
                bytes as f64 / elapsed
            } else {
                0.0
            }
        };

        Some(vec![NetStats {
            iface: Some(iface.to_string()),
            rx_sec: Some(per_sec(data.received())),
            tx_sec: Some(per_sec(data.transmitted())),
            rx_bytes: Some(data.total_received() as f64),
            tx_bytes: Some(data.total_transmitted() as f64),
        }])
    }

    fn fs_size(&self) -> Option<Vec<FsEntry>> {
        let mut disks = self.disks.lock();
        disks.refresh(true);

        let mut entries: Vec<FsEntry> = disks
            .list()
            .iter()
            .map(|disk| {
                let size = disk.total_space() as f64;
                let used = size - disk.available_space() as f64;
                FsEntry {
                    fs: Some(disk.name().to_string_lossy().to_string()),
                    mount: Some(disk.mount_point().to_string_lossy().to_string()),
                    use_percent: (size > 0.0).then(|| used / size * 100.0),
                    used: Some(used),
                    size: Some(size),
                }
            })
            .collect();

        // Root filesystem first, the way `df` lists it
        entries.sort_by_key(|entry| entry.mount.as_deref() != Some("/"));

        Some(entries)
    }

    fn processes(&self) -> Option<ProcessList> {
        let mut system = self.system.lock();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let total_memory = system.total_memory() as f64;
        let mut list: Vec<ProcessRecord> = system
            .processes()
            .values()
            .map(|process| ProcessRecord {
                pid: process.pid().as_u32(),
                command: process.name().to_string_lossy().to_string(),
                cpu: process.cpu_usage() as f64,
                mem: if total_memory > 0.0 {
                    process.memory() as f64 / total_memory * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        list.sort_by_key(|record| record.pid);

        Some(ProcessList { list: Some(list) })
    }
}
