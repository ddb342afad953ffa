//! Per-monitor polling task.
//!
//! Each monitor owns one [`Schedule`]: a cancellable repeating poll that
//! fetches a reading, then applies it to the monitor under its lock. A new
//! poll only starts after the previous one has been applied and the period
//! has elapsed, so polls of one monitor never overlap.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::monitors::{Monitor, Shared};

#[derive(Clone)]
pub struct Schedule {
    inner: Arc<ScheduleInner>,
}

struct ScheduleInner {
    active: AtomicBool,
    repoll: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScheduleInner {
                active: AtomicBool::new(true),
                repoll: Notify::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// False once [`Schedule::cancel`] has run.
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Poll again now instead of waiting for the next tick.
    pub fn repoll(&self) {
        if self.is_active() {
            self.inner.repoll.notify_one();
        }
    }

    /// Stop the polling task. Safe to call any number of times; a reading
    /// already being fetched is discarded rather than applied.
    pub fn cancel(&self) {
        self.inner.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.inner.task.lock().take() {
            task.abort();
        }
    }

    /// Spawn `future` as this schedule's task on the current runtime.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.is_active() {
            return;
        }
        let handle = tokio::spawn(future);
        if let Some(previous) = self.inner.task.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Spawn the standard poll loop for `monitor`.
    pub fn start<M, F>(&self, monitor: Shared<M>, period: Duration, fetch: F)
    where
        M: Monitor,
        F: FnMut() -> Option<M::Reading> + Send + 'static,
    {
        let schedule = self.clone();
        self.spawn(async move { schedule.drive(monitor, period, fetch).await });
    }

    /// Initial fetch, then one fetch per period (or per [`Schedule::repoll`]).
    ///
    /// If the monitor rejects the initial reading, polling stops.
    pub async fn drive<M, F>(&self, monitor: Shared<M>, period: Duration, mut fetch: F)
    where
        M: Monitor,
        F: FnMut() -> Option<M::Reading> + Send + 'static,
    {
        let reading = fetch();

        // Activity is checked under the monitor lock: cleanup runs under
        // the same lock, so a reading fetched before it is never applied.
        {
            let mut guard = monitor.lock();
            if !self.is_active() {
                return;
            }
            if !guard.initialize(reading.as_ref()) {
                log::error!("{} monitor: initial reading unusable, polling stopped", guard.kind());
                return;
            }
            log::debug!("{} monitor started ({:?} interval)", guard.kind(), period);
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.inner.repoll.notified() => {}
            }

            if !self.is_active() {
                break;
            }
            let reading = fetch();
            let mut guard = monitor.lock();
            if !self.is_active() {
                break;
            }
            guard.update_data(reading.as_ref());
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedule")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::{MetricsSource, MonitorKind};
    use std::sync::mpsc;

    /// Records every reading it is given.
    struct Recorder {
        schedule: Schedule,
        applied: Vec<u32>,
    }

    impl MetricsSource for Recorder {
        fn kind(&self) -> MonitorKind {
            MonitorKind::Cpu
        }

        fn cleanup(&mut self) {
            self.schedule.cancel();
        }
    }

    impl Monitor for Recorder {
        type Reading = u32;

        fn update_data(&mut self, reading: Option<&u32>) -> bool {
            match reading {
                Some(value) => {
                    self.applied.push(*value);
                    true
                }
                None => false,
            }
        }
    }

    fn recorder(schedule: &Schedule) -> Shared<Recorder> {
        Arc::new(Mutex::new(Recorder {
            schedule: schedule.clone(),
            applied: Vec::new(),
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reading_in_flight_during_cleanup_is_dropped() {
        let schedule = Schedule::new();
        let monitor = recorder(&schedule);

        let mut calls = 0;
        let holder = monitor.clone();
        let fetch = move || {
            calls += 1;
            if calls == 2 {
                // Cleanup takes the monitor lock while this reading is in
                // flight and only releases it after cancelling.
                let (locked_tx, locked_rx) = mpsc::channel();
                let holder = holder.clone();
                std::thread::spawn(move || {
                    let mut guard = holder.lock();
                    let _ = locked_tx.send(());
                    std::thread::sleep(Duration::from_millis(50));
                    guard.cleanup();
                });
                let _ = locked_rx.recv();
            }
            Some(calls)
        };

        schedule.drive(monitor.clone(), Duration::from_millis(100), fetch).await;

        assert!(!schedule.is_active());
        assert_eq!(monitor.lock().applied, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_reading_applies_nothing() {
        let schedule = Schedule::new();
        let monitor = recorder(&schedule);
        let canceller = schedule.clone();

        let fetch = move || {
            canceller.cancel();
            Some(7)
        };
        schedule.drive(monitor.clone(), Duration::from_millis(100), fetch).await;

        assert!(monitor.lock().applied.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repoll_skips_the_wait() {
        let schedule = Schedule::new();
        let monitor = recorder(&schedule);

        let mut next = 0;
        schedule.start(monitor.clone(), Duration::from_secs(60), move || {
            next += 1;
            Some(next)
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.lock().applied, vec![1]);

        schedule.repoll();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.lock().applied, vec![1, 2]);

        monitor.lock().cleanup();
        schedule.repoll();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.lock().applied, vec![1, 2]);
    }
}
