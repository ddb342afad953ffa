use std::sync::atomic::{AtomicUsize, Ordering};

use gtop::core::system_monitor::{
    CoreLoad, CurrentLoad, FsEntry, MemInfo, MetricsProvider, NetStats, ProcessList,
    ProcessRecord,
};

/// Provider returning the same fixed readings on every call.
#[derive(Default)]
pub struct ScriptedProvider {
    pub broken: bool,
    pub load_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

impl MetricsProvider for ScriptedProvider {
    fn current_load(&self) -> Option<CurrentLoad> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return None;
        }
        Some(CurrentLoad {
            cpus: Some(vec![
                CoreLoad { load: Some(20.0) },
                CoreLoad { load: Some(60.0) },
            ]),
        })
    }

    fn mem(&self) -> Option<MemInfo> {
        if self.broken {
            return Some(MemInfo::default());
        }
        Some(MemInfo {
            total: Some(16e9),
            available: Some(4e9),
            swaptotal: Some(2e9),
            swapused: Some(5e8),
        })
    }

    fn network_interface_default(&self) -> Option<String> {
        if self.broken {
            return None;
        }
        Some("eth0".to_string())
    }

    fn network_stats(&self, iface: &str) -> Option<Vec<NetStats>> {
        Some(vec![NetStats {
            iface: Some(iface.to_string()),
            rx_sec: Some(2048.0),
            tx_sec: Some(1024.0),
            rx_bytes: Some(1e6),
            tx_bytes: Some(5e5),
        }])
    }

    fn fs_size(&self) -> Option<Vec<FsEntry>> {
        if self.broken {
            return Some(Vec::new());
        }
        Some(vec![FsEntry {
            fs: Some("/dev/sda1".to_string()),
            mount: Some("/".to_string()),
            use_percent: Some(50.0),
            used: Some(250e9),
            size: Some(500e9),
        }])
    }

    fn processes(&self) -> Option<ProcessList> {
        if self.broken {
            return Some(ProcessList { list: None });
        }
        Some(ProcessList {
            list: Some(vec![
                ProcessRecord {
                    pid: 1,
                    command: "init".to_string(),
                    cpu: 0.1,
                    mem: 0.2,
                },
                ProcessRecord {
                    pid: 4242,
                    command: "firefox".to_string(),
                    cpu: 35.0,
                    mem: 12.3,
                },
            ]),
        })
    }
}
