//! Snapshot export to local files.
//!
//! The exporter never polls the metrics provider itself: it reads whatever
//! each live monitor has cached and serializes that as JSON, CSV or
//! Prometheus text exposition.

pub mod csv;
pub mod json;
pub mod prometheus;

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::config::ExportConfig;
use crate::core::system_monitor::{
    CpuLoad, DiskUsage, MemoryUsage, NetworkRates, ProcessRecord, SharedSource,
};
use crate::error::{GtopError, Result};

pub const DEFAULT_FORMAT: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Prometheus,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Prometheus => "prom",
        }
    }

    pub fn render(&self, snapshot: &MetricsSnapshot) -> Result<String> {
        match self {
            ExportFormat::Json => json::render(snapshot),
            ExportFormat::Csv => Ok(csv::render(snapshot)),
            ExportFormat::Prometheus => Ok(prometheus::render(snapshot)),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GtopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "prometheus" => Ok(ExportFormat::Prometheus),
            _ => Err(GtopError::unknown_format(s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Prometheus => "prometheus",
        };
        f.write_str(name)
    }
}

/// Point-in-time read of every live monitor. Built per export, never kept.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// ISO-8601 UTC with milliseconds.
    pub timestamp: String,
    #[serde(skip)]
    pub timestamp_ms: i64,
    pub cpu: Option<Vec<CpuLoad>>,
    pub memory: Option<MemoryUsage>,
    pub network: Option<NetworkRates>,
    pub disk: Option<DiskUsage>,
    pub processes: Option<Vec<ProcessRecord>>,
}

impl MetricsSnapshot {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: iso_timestamp(now),
            timestamp_ms: now.timestamp_millis(),
            cpu: None,
            memory: None,
            network: None,
            disk: None,
            processes: None,
        }
    }

    /// Query each source for the categories it exposes.
    pub fn collect(sources: &[SharedSource], now: DateTime<Utc>) -> Self {
        let mut snapshot = Self::empty(now);

        for source in sources {
            let source = source.lock();
            if let Some(cpu) = source.exposes_cpu() {
                snapshot.cpu = Some(cpu);
            }
            if let Some(memory) = source.exposes_memory() {
                snapshot.memory = Some(memory);
            }
            if let Some(network) = source.exposes_network() {
                snapshot.network = Some(network);
            }
            if let Some(disk) = source.exposes_disk() {
                snapshot.disk = Some(disk);
            }
            if let Some(processes) = source.exposes_processes() {
                snapshot.processes = Some(processes);
            }
        }

        snapshot
    }
}

fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `metrics-2024-05-01T12-30-45-123Z.json` and friends.
pub fn export_filename(now: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "metrics-{}.{}",
        iso_timestamp(now).replace([':', '.'], "-"),
        format.extension()
    )
}

/// Writes snapshots of the monitor set, on a timer and on demand.
#[derive(Clone)]
pub struct Exporter {
    job: ExportConfig,
    sources: Arc<Vec<SharedSource>>,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Exporter {
    pub fn new(job: ExportConfig, sources: Vec<SharedSource>) -> Self {
        Self {
            job,
            sources: Arc::new(sources),
            timer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn job(&self) -> &ExportConfig {
        &self.job
    }

    /// Start the periodic export, if enabled with a non-zero interval.
    ///
    /// Must be called from within a tokio runtime. A failed export is
    /// logged and the next tick still runs.
    pub fn start(&self) {
        if !self.job.enabled || self.job.interval == 0 {
            log::debug!("periodic export disabled");
            return;
        }

        if let Err(e) = fs::create_dir_all(&self.job.path) {
            log::error!("Failed to create export directory {}: {}", self.job.path.display(), e);
        }

        let period = Duration::from_millis(self.job.interval);
        let exporter = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = exporter.export(None) {
                    log::error!("Periodic export failed: {}", e);
                }
            }
        });

        if let Some(previous) = self.timer.lock().replace(handle) {
            previous.abort();
        }
        log::info!(
            "Exporting {} every {}ms to {}",
            self.job.format,
            self.job.interval,
            self.job.path.display()
        );
    }

    /// Export now; `format` falls back to the configured one, then JSON.
    pub fn export(&self, format: Option<&str>) -> Result<PathBuf> {
        self.export_at(format, Utc::now())
    }

    pub fn export_at(&self, format: Option<&str>, now: DateTime<Utc>) -> Result<PathBuf> {
        let requested = format
            .filter(|f| !f.trim().is_empty())
            .or_else(|| Some(self.job.format.as_str()).filter(|f| !f.trim().is_empty()))
            .unwrap_or(DEFAULT_FORMAT);
        let format: ExportFormat = requested.parse()?;

        let snapshot = self.collect_metrics(now);
        let body = format.render(&snapshot)?;

        fs::create_dir_all(&self.job.path)?;
        let path = self.job.path.join(export_filename(now, format));
        fs::write(&path, body)?;

        log::info!("Exported metrics to {}", path.display());
        Ok(path)
    }

    pub fn collect_metrics(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        MetricsSnapshot::collect(&self.sources, now)
    }

    /// Stop the periodic export. Idempotent.
    pub fn cleanup(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.lock().is_some()
    }
}
