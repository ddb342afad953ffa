use std::sync::Arc;
use std::time::Duration;

use super::{MetricsSource, Monitor, MonitorKind, Shared};
use crate::core::system_monitor::display::{LineChart, Screen};
use crate::core::system_monitor::metrics::CpuLoad;
use crate::core::system_monitor::provider::{CurrentLoad, MetricsProvider};
use crate::core::system_monitor::schedule::Schedule;
use crate::core::system_monitor::throttle::{Throttle, REDRAW_DELAY};
use crate::core::system_monitor::window::{palette_color, Series};
use crate::ui::formatters::padded_percent;

/// Per-core load history, one chart line per core.
pub struct CpuMonitor {
    chart: Box<dyn LineChart>,
    redraw: Throttle,
    palette: Vec<String>,
    series: Vec<Series>,
    schedule: Schedule,
}

impl CpuMonitor {
    pub fn new(chart: Box<dyn LineChart>, screen: Arc<dyn Screen>, palette: Vec<String>) -> Self {
        Self {
            chart,
            redraw: Throttle::new(REDRAW_DELAY, move || screen.render()),
            palette,
            series: Vec::new(),
            schedule: Schedule::new(),
        }
    }

    /// Begin polling `provider` every `period`.
    pub fn start(monitor: Shared<Self>, provider: Arc<dyn MetricsProvider>, period: Duration) {
        let schedule = monitor.lock().schedule.clone();
        schedule.start(monitor, period, move || provider.current_load());
    }

    pub fn core_count(&self) -> usize {
        self.series.len()
    }

    /// Validated loads for every known core, or `None` if the reading
    /// cannot be applied as a whole.
    fn extract_loads(&self, reading: Option<&CurrentLoad>) -> Option<Vec<f64>> {
        let cpus = reading?.cpus.as_ref()?;
        if self.series.is_empty() || cpus.len() < self.series.len() {
            return None;
        }

        cpus.iter()
            .take(self.series.len())
            .map(|core| core.load.filter(|load| load.is_finite()))
            .collect()
    }
}

impl MetricsSource for CpuMonitor {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Cpu
    }

    fn exposes_cpu(&self) -> Option<Vec<CpuLoad>> {
        if self.series.is_empty() {
            return None;
        }
        Some(
            self.series
                .iter()
                .map(|series| CpuLoad {
                    title: series.title.clone(),
                    load: series.window.latest().unwrap_or(0.0),
                })
                .collect(),
        )
    }

    fn cleanup(&mut self) {
        self.schedule.cancel();
        self.redraw.cancel();
    }
}

impl Monitor for CpuMonitor {
    type Reading = CurrentLoad;

    /// Size one series per reported core. Without a core list there is
    /// nothing to chart, so polling stops.
    fn initialize(&mut self, reading: Option<&CurrentLoad>) -> bool {
        let core_count = match reading.and_then(|r| r.cpus.as_ref()) {
            Some(cpus) if !cpus.is_empty() => cpus.len(),
            _ => return false,
        };

        self.series = (0..core_count)
            .map(|i| Series::new(format!("CPU{}", i + 1), palette_color(&self.palette, i)))
            .collect();

        if !self.update_data(reading) {
            log::debug!("cpu monitor: first reading had unusable loads, waiting for next poll");
        }
        true
    }

    fn update_data(&mut self, reading: Option<&CurrentLoad>) -> bool {
        let Some(loads) = self.extract_loads(reading) else {
            log::debug!("cpu monitor: skipping malformed reading");
            return false;
        };

        for (i, (series, load)) in self.series.iter_mut().zip(loads).enumerate() {
            series.title = format!("CPU{}{}", i + 1, padded_percent(load));
            series.window.push(load);
        }

        let descriptors: Vec<_> = self.series.iter().map(Series::descriptor).collect();
        self.chart.set_data(&descriptors);
        self.redraw.call();
        true
    }
}
