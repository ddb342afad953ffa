use std::sync::Arc;
use std::time::Duration;

use super::{MetricsSource, Monitor, MonitorKind, Shared};
use crate::core::system_monitor::display::{Donut, DonutSegment, LineChart, Screen};
use crate::core::system_monitor::metrics::MemoryUsage;
use crate::core::system_monitor::provider::{MemInfo, MetricsProvider};
use crate::core::system_monitor::schedule::Schedule;
use crate::core::system_monitor::throttle::{Throttle, REDRAW_DELAY};
use crate::core::system_monitor::window::{palette_color, Series};
use crate::ui::formatters::human_file_size;

/// Percentages derived from one memory reading.
struct MemoryFigures {
    usage: f64,
    swap: f64,
    used_label: String,
    swap_label: String,
}

impl MemoryFigures {
    fn from_reading(info: &MemInfo) -> Option<Self> {
        let total = info.total.filter(|v| v.is_finite() && *v > 0.0)?;
        let available = info.available.filter(|v| v.is_finite())?;
        let used = (total - available).clamp(0.0, total);

        let swap_total = info.swaptotal.filter(|v| v.is_finite()).unwrap_or(0.0);
        let swap_used = info.swapused.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0);
        let swap = if swap_total > 0.0 {
            (100.0 * swap_used / swap_total).min(100.0)
        } else {
            0.0
        };

        Some(Self {
            usage: 100.0 * used / total,
            swap,
            used_label: format!("{} of {}", human_file_size(used, true), human_file_size(total, true)),
            swap_label: format!(
                "{} of {}",
                human_file_size(swap_used, true),
                human_file_size(swap_total, true)
            ),
        })
    }
}

/// Memory and swap: a history chart plus one donut each.
pub struct MemMonitor {
    chart: Box<dyn LineChart>,
    mem_donut: Box<dyn Donut>,
    swap_donut: Box<dyn Donut>,
    redraw: Throttle,
    memory: Series,
    swap: Series,
    latest: Option<MemoryUsage>,
    schedule: Schedule,
}

impl MemMonitor {
    pub fn new(
        chart: Box<dyn LineChart>,
        mem_donut: Box<dyn Donut>,
        swap_donut: Box<dyn Donut>,
        screen: Arc<dyn Screen>,
        palette: &[String],
    ) -> Self {
        Self {
            chart,
            mem_donut,
            swap_donut,
            redraw: Throttle::new(REDRAW_DELAY, move || screen.render()),
            memory: Series::new("Memory", palette_color(palette, 0)),
            swap: Series::new("Swap", palette_color(palette, 1)),
            latest: None,
            schedule: Schedule::new(),
        }
    }

    pub fn start(monitor: Shared<Self>, provider: Arc<dyn MetricsProvider>, period: Duration) {
        let schedule = monitor.lock().schedule.clone();
        schedule.start(monitor, period, move || provider.mem());
    }
}

impl MetricsSource for MemMonitor {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Memory
    }

    fn exposes_memory(&self) -> Option<MemoryUsage> {
        self.latest
    }

    fn cleanup(&mut self) {
        self.schedule.cancel();
        self.redraw.cancel();
    }
}

impl Monitor for MemMonitor {
    type Reading = MemInfo;

    fn update_data(&mut self, reading: Option<&MemInfo>) -> bool {
        let Some(figures) = reading.and_then(MemoryFigures::from_reading) else {
            log::debug!("memory monitor: skipping malformed reading");
            return false;
        };

        self.memory.window.push(figures.usage);
        self.swap.window.push(figures.swap);
        self.latest = Some(MemoryUsage {
            usage: figures.usage,
            swap: figures.swap,
        });

        self.chart
            .set_data(&[self.memory.descriptor(), self.swap.descriptor()]);
        self.mem_donut.set_data(&[DonutSegment {
            percent: figures.usage / 100.0,
            label: figures.used_label,
            color: self.memory.color.clone(),
        }]);
        self.swap_donut.set_data(&[DonutSegment {
            percent: figures.swap / 100.0,
            label: figures.swap_label,
            color: self.swap.color.clone(),
        }]);
        self.redraw.call();
        true
    }
}
