use std::sync::Arc;
use std::time::Duration;

use super::{MetricsSource, Monitor, MonitorKind, Shared};
use crate::core::system_monitor::display::{Screen, Sparkline};
use crate::core::system_monitor::metrics::NetworkRates;
use crate::core::system_monitor::provider::{MetricsProvider, NetStats};
use crate::core::system_monitor::schedule::Schedule;
use crate::core::system_monitor::throttle::{Throttle, REDRAW_DELAY};
use crate::core::system_monitor::window::SlidingWindow;
use crate::ui::formatters::human_file_size;

/// Receive/transmit throughput of the default interface.
pub struct NetMonitor {
    sparkline: Box<dyn Sparkline>,
    redraw: Throttle,
    rx: SlidingWindow,
    tx: SlidingWindow,
    labels: [String; 2],
    has_data: bool,
    schedule: Schedule,
}

/// Missing or NaN rates count as idle; counter resets can go negative.
fn rate(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

impl NetMonitor {
    pub fn new(sparkline: Box<dyn Sparkline>, screen: Arc<dyn Screen>) -> Self {
        Self {
            sparkline,
            redraw: Throttle::new(REDRAW_DELAY, move || screen.render()),
            rx: SlidingWindow::new(),
            tx: SlidingWindow::new(),
            labels: [String::new(), String::new()],
            has_data: false,
            schedule: Schedule::new(),
        }
    }

    /// Resolve the default interface once, then poll its counters.
    ///
    /// If no interface can be resolved the monitor stays idle for the rest
    /// of the session.
    pub fn start(monitor: Shared<Self>, provider: Arc<dyn MetricsProvider>, period: Duration) {
        let schedule = monitor.lock().schedule.clone();
        let driver = schedule.clone();

        schedule.spawn(async move {
            let Some(iface) = provider.network_interface_default() else {
                log::error!("network monitor: no default interface, polling stopped");
                return;
            };
            log::debug!("network monitor: using interface {}", iface);

            driver
                .drive(monitor, period, move || {
                    provider
                        .network_stats(&iface)
                        .and_then(|stats| stats.into_iter().next())
                })
                .await;
        });
    }

    pub fn labels(&self) -> &[String; 2] {
        &self.labels
    }
}

impl MetricsSource for NetMonitor {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Network
    }

    fn exposes_network(&self) -> Option<NetworkRates> {
        if !self.has_data {
            return None;
        }
        Some(NetworkRates {
            rx: self.rx.latest().unwrap_or(0.0),
            tx: self.tx.latest().unwrap_or(0.0),
        })
    }

    fn cleanup(&mut self) {
        self.schedule.cancel();
        self.redraw.cancel();
    }
}

impl Monitor for NetMonitor {
    type Reading = NetStats;

    fn update_data(&mut self, reading: Option<&NetStats>) -> bool {
        let Some(stats) = reading else {
            log::debug!("network monitor: skipping empty reading");
            return false;
        };

        let rx_sec = rate(stats.rx_sec);
        let tx_sec = rate(stats.tx_sec);
        self.rx.push(rx_sec);
        self.tx.push(tx_sec);
        self.has_data = true;

        self.labels = [
            format!(
                "Receiving:      {}/s \nTotal received: {}",
                human_file_size(rx_sec, false),
                human_file_size(rate(stats.rx_bytes), false)
            ),
            format!(
                "Transferring:      {}/s \nTotal transferred: {}",
                human_file_size(tx_sec, false),
                human_file_size(rate(stats.tx_bytes), false)
            ),
        ];

        self.sparkline
            .set_data(&self.labels, &[self.rx.values(), self.tx.values()]);
        self.redraw.call();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::display::testing::{CountingScreen, RecordingSparkline};
    use crate::core::system_monitor::window::WINDOW_SIZE;

    fn monitor() -> (NetMonitor, RecordingSparkline, Arc<CountingScreen>) {
        let sparkline = RecordingSparkline::default();
        let screen = Arc::new(CountingScreen::default());
        let monitor = NetMonitor::new(Box::new(sparkline.clone()), screen.clone());
        (monitor, sparkline, screen)
    }

    fn stats(rx_sec: Option<f64>, tx_sec: Option<f64>) -> NetStats {
        NetStats {
            iface: Some("eth0".to_string()),
            rx_sec,
            tx_sec,
            rx_bytes: Some(1024.0 * 1024.0),
            tx_bytes: Some(2048.0),
        }
    }

    #[test]
    fn test_update_pushes_rates_and_labels() {
        let (mut monitor, sparkline, screen) = monitor();
        assert!(monitor.exposes_network().is_none());

        assert!(monitor.update_data(Some(&stats(Some(1536.0), Some(100.0)))));

        let rates = monitor.exposes_network().unwrap();
        assert_eq!(rates.rx, 1536.0);
        assert_eq!(rates.tx, 100.0);
        assert_eq!(
            monitor.labels()[0],
            "Receiving:      1.50 KiB/s \nTotal received: 1.00 MiB"
        );
        assert_eq!(
            monitor.labels()[1],
            "Transferring:      100.00 B/s \nTotal transferred: 2.00 KiB"
        );

        let calls = sparkline.calls.lock();
        let (_, series) = &calls[0];
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].len(), WINDOW_SIZE);
        assert_eq!(*series[0].last().unwrap(), 1536.0);
        assert_eq!(screen.renders(), 1);
    }

    #[test]
    fn test_negative_and_missing_rates_floor_to_zero() {
        let (mut monitor, _, _) = monitor();
        assert!(monitor.update_data(Some(&stats(Some(-50.0), None))));

        let rates = monitor.exposes_network().unwrap();
        assert_eq!(rates.rx, 0.0);
        assert_eq!(rates.tx, 0.0);
    }

    #[test]
    fn test_missing_reading_is_skipped() {
        let (mut monitor, sparkline, screen) = monitor();
        assert!(!monitor.update_data(None));
        assert!(monitor.exposes_network().is_none());
        assert!(sparkline.calls.lock().is_empty());
        assert_eq!(screen.renders(), 0);
    }
}
