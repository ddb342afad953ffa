use std::sync::Arc;
use std::time::Duration;

use super::{MetricsSource, Monitor, MonitorKind, Shared};
use crate::core::system_monitor::display::{Screen, Table};
use crate::core::system_monitor::metrics::ProcessRecord;
use crate::core::system_monitor::process_table::{ProcessTableState, SortKey};
use crate::core::system_monitor::provider::{MetricsProvider, ProcessList};
use crate::core::system_monitor::schedule::Schedule;

/// Sortable, filterable process table.
///
/// Key handlers mutate the table state and ask for an immediate re-poll, so
/// the new order shows up without waiting for the next tick.
pub struct ProcMonitor {
    table: Box<dyn Table>,
    screen: Arc<dyn Screen>,
    state: ProcessTableState,
    processes: Option<Vec<ProcessRecord>>,
    schedule: Schedule,
}

impl ProcMonitor {
    pub fn new(table: Box<dyn Table>, screen: Arc<dyn Screen>, initial_search: &str) -> Self {
        Self {
            table,
            screen,
            state: ProcessTableState::new(initial_search),
            processes: None,
            schedule: Schedule::new(),
        }
    }

    pub fn start(monitor: Shared<Self>, provider: Arc<dyn MetricsProvider>, period: Duration) {
        let schedule = monitor.lock().schedule.clone();
        schedule.start(monitor, period, move || provider.processes());
    }

    pub fn state(&self) -> &ProcessTableState {
        &self.state
    }

    pub fn handle_sort(&mut self, key: SortKey) {
        self.state.press_sort(key);
        self.schedule.repoll();
    }

    /// Apply a confirmed search prompt. Blank input leaves everything as is.
    pub fn apply_search(&mut self, input: &str) -> bool {
        if !self.state.submit_search(input) {
            return false;
        }
        self.schedule.repoll();
        true
    }

    /// Returns `false` when no search was active, leaving the key to the
    /// caller.
    pub fn clear_search(&mut self) -> bool {
        if !self.state.clear_search() {
            return false;
        }
        self.schedule.repoll();
        true
    }
}

impl MetricsSource for ProcMonitor {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Process
    }

    fn exposes_processes(&self) -> Option<Vec<ProcessRecord>> {
        self.processes.clone()
    }

    fn cleanup(&mut self) {
        self.schedule.cancel();
    }
}

impl Monitor for ProcMonitor {
    type Reading = ProcessList;

    fn update_data(&mut self, reading: Option<&ProcessList>) -> bool {
        let Some(list) = reading.and_then(|r| r.list.as_ref()) else {
            log::debug!("process monitor: skipping malformed reading");
            return false;
        };

        self.table.set_data(self.state.build_view(list));
        self.processes = Some(list.clone());

        if self.state.take_reindex() {
            self.table.select(0);
        }
        self.screen.render();
        true
    }
}
