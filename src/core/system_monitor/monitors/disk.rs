use std::sync::Arc;
use std::time::Duration;

use super::{MetricsSource, Monitor, MonitorKind, Shared};
use crate::core::system_monitor::display::{Donut, DonutSegment, Screen};
use crate::core::system_monitor::metrics::DiskUsage;
use crate::core::system_monitor::provider::{FsEntry, MetricsProvider};
use crate::core::system_monitor::schedule::Schedule;
use crate::core::system_monitor::window::palette_color;
use crate::ui::formatters::human_file_size;

/// Usage of the primary filesystem. Polled rarely, so redraws are not
/// throttled.
pub struct DiskMonitor {
    donut: Box<dyn Donut>,
    screen: Arc<dyn Screen>,
    color: String,
    usage: Option<DiskUsage>,
    schedule: Schedule,
}

impl DiskMonitor {
    pub fn new(donut: Box<dyn Donut>, screen: Arc<dyn Screen>, palette: &[String]) -> Self {
        Self {
            donut,
            screen,
            color: palette_color(palette, 5),
            usage: None,
            schedule: Schedule::new(),
        }
    }

    pub fn start(monitor: Shared<Self>, provider: Arc<dyn MetricsProvider>, period: Duration) {
        let schedule = monitor.lock().schedule.clone();
        schedule.start(monitor, period, move || provider.fs_size());
    }
}

fn usable(entry: &FsEntry) -> Option<(f64, f64, f64)> {
    let percent = entry.use_percent.filter(|v| v.is_finite())?;
    let used = entry.used.filter(|v| v.is_finite())?;
    let size = entry.size.filter(|v| v.is_finite())?;
    Some((percent, used, size))
}

impl MetricsSource for DiskMonitor {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Disk
    }

    fn exposes_disk(&self) -> Option<DiskUsage> {
        self.usage.clone()
    }

    fn cleanup(&mut self) {
        self.schedule.cancel();
    }
}

impl Monitor for DiskMonitor {
    type Reading = Vec<FsEntry>;

    fn update_data(&mut self, reading: Option<&Vec<FsEntry>>) -> bool {
        let Some((percent, used, size)) = reading
            .and_then(|entries| entries.first())
            .and_then(usable)
        else {
            log::debug!("disk monitor: skipping malformed reading");
            return false;
        };

        let usage = DiskUsage {
            percent: percent.clamp(0.0, 100.0),
            label: format!("{} of {}", human_file_size(used, true), human_file_size(size, true)),
        };

        self.donut.set_data(&[DonutSegment {
            percent: usage.percent / 100.0,
            label: usage.label.clone(),
            color: self.color.clone(),
        }]);
        self.usage = Some(usage);
        self.screen.render();
        true
    }
}
