//! Tokio runtime and monitor set construction.
//!
//! Every enabled monitor gets its own polling task on a small dedicated
//! runtime; the exporter's timer runs there too. The UI thread only ever
//! touches monitors through their locks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::display::{Detached, Donut, LineChart, Screen, Sparkline, Table};
use super::monitors::{
    CpuMonitor, DiskMonitor, MemMonitor, NetMonitor, ProcMonitor, Shared, SharedSource,
};
use super::provider::MetricsProvider;
use super::MonitorKind;
use crate::core::config::Config;
use crate::core::exporter::Exporter;
use crate::error::Result;

/// Widget handles for every monitor, plus the screen they repaint.
pub struct Surfaces {
    pub screen: Arc<dyn Screen>,
    pub cpu_chart: Box<dyn LineChart>,
    pub mem_chart: Box<dyn LineChart>,
    pub mem_donut: Box<dyn Donut>,
    pub swap_donut: Box<dyn Donut>,
    pub net_sparkline: Box<dyn Sparkline>,
    pub disk_donut: Box<dyn Donut>,
    pub process_table: Box<dyn Table>,
}

impl Surfaces {
    /// Surfaces that draw nothing, for headless runs.
    pub fn detached() -> Self {
        Self {
            screen: Arc::new(Detached),
            cpu_chart: Box::new(Detached),
            mem_chart: Box::new(Detached),
            mem_donut: Box::new(Detached),
            swap_donut: Box::new(Detached),
            net_sparkline: Box::new(Detached),
            disk_donut: Box::new(Detached),
            process_table: Box::new(Detached),
        }
    }
}

/// The live monitors, one per enabled domain.
#[derive(Default)]
pub struct MonitorSet {
    pub cpu: Option<Shared<CpuMonitor>>,
    pub memory: Option<Shared<MemMonitor>>,
    pub network: Option<Shared<NetMonitor>>,
    pub disk: Option<Shared<DiskMonitor>>,
    pub process: Option<Shared<ProcMonitor>>,
}

impl MonitorSet {
    /// Construct and start every monitor `config` enables.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &Config, provider: Arc<dyn MetricsProvider>, surfaces: Surfaces) -> Self {
        let palette = config.palette();
        let screen = surfaces.screen;
        let mut set = MonitorSet::default();

        if config.is_enabled(MonitorKind::Cpu) {
            let monitor = Arc::new(Mutex::new(CpuMonitor::new(
                surfaces.cpu_chart,
                screen.clone(),
                palette.clone(),
            )));
            CpuMonitor::start(monitor.clone(), provider.clone(), config.interval(MonitorKind::Cpu));
            set.cpu = Some(monitor);
        }

        if config.is_enabled(MonitorKind::Memory) {
            let monitor = Arc::new(Mutex::new(MemMonitor::new(
                surfaces.mem_chart,
                surfaces.mem_donut,
                surfaces.swap_donut,
                screen.clone(),
                &palette,
            )));
            MemMonitor::start(
                monitor.clone(),
                provider.clone(),
                config.interval(MonitorKind::Memory),
            );
            set.memory = Some(monitor);
        }

        if config.is_enabled(MonitorKind::Network) {
            let monitor = Arc::new(Mutex::new(NetMonitor::new(surfaces.net_sparkline, screen.clone())));
            NetMonitor::start(
                monitor.clone(),
                provider.clone(),
                config.interval(MonitorKind::Network),
            );
            set.network = Some(monitor);
        }

        if config.is_enabled(MonitorKind::Disk) {
            let monitor = Arc::new(Mutex::new(DiskMonitor::new(
                surfaces.disk_donut,
                screen.clone(),
                &palette,
            )));
            DiskMonitor::start(monitor.clone(), provider.clone(), config.interval(MonitorKind::Disk));
            set.disk = Some(monitor);
        }

        if config.is_enabled(MonitorKind::Process) {
            let monitor = Arc::new(Mutex::new(ProcMonitor::new(
                surfaces.process_table,
                screen,
                &config.process_filter,
            )));
            ProcMonitor::start(monitor.clone(), provider, config.interval(MonitorKind::Process));
            set.process = Some(monitor);
        }

        log::debug!("started {} monitors", set.sources().len());
        set
    }

    /// Type-erased view of every live monitor, for the exporter.
    pub fn sources(&self) -> Vec<SharedSource> {
        let mut sources: Vec<SharedSource> = Vec::new();
        if let Some(m) = &self.cpu {
            sources.push(m.clone());
        }
        if let Some(m) = &self.memory {
            sources.push(m.clone());
        }
        if let Some(m) = &self.network {
            sources.push(m.clone());
        }
        if let Some(m) = &self.disk {
            sources.push(m.clone());
        }
        if let Some(m) = &self.process {
            sources.push(m.clone());
        }
        sources
    }

    /// Cancel every monitor's schedule and pending redraw.
    pub fn cleanup(&self) {
        for source in self.sources() {
            let mut monitor = source.lock();
            monitor.cleanup();
            log::debug!("{} monitor stopped", monitor.kind());
        }
    }
}

/// Owns the metrics runtime, the monitor set and the exporter.
pub struct MetricsRuntime {
    monitors: MonitorSet,
    exporter: Exporter,
    runtime: tokio::runtime::Runtime,
}

impl MetricsRuntime {
    /// Build the runtime, start every enabled monitor and the export timer.
    pub fn new(
        config: &Config,
        provider: Arc<dyn MetricsProvider>,
        surfaces: Surfaces,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("metrics-worker")
            .build()?;

        let (monitors, exporter) = {
            let _guard = runtime.enter();
            let monitors = MonitorSet::start(config, provider, surfaces);
            let exporter = Exporter::new(config.export.clone(), monitors.sources());
            exporter.start();
            (monitors, exporter)
        };

        Ok(Self {
            monitors,
            exporter,
            runtime,
        })
    }

    pub fn monitors(&self) -> &MonitorSet {
        &self.monitors
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// On-demand export of the current cached state.
    pub fn export_now(&self, format: Option<&str>) -> Result<PathBuf> {
        self.exporter.export(format)
    }

    /// Stop all monitors and the export timer, then the runtime.
    pub fn shutdown(self) {
        self.monitors.cleanup();
        self.exporter.cleanup();
        self.runtime.shutdown_timeout(Duration::from_millis(250));
        log::debug!("metrics runtime stopped");
    }
}
