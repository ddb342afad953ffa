//! Display-surface implementations backing the dashboard.
//!
//! Monitors write into these panels from the metrics runtime; the UI thread
//! reads them back when it draws a frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::system_monitor::{
    Donut, DonutSegment, LineChart, Screen, SeriesDescriptor, Sparkline, Surfaces, Table,
    TableData,
};

/// Set by monitors when they want a repaint, cleared by the draw loop.
#[derive(Debug, Default)]
pub struct RedrawFlag {
    dirty: AtomicBool,
}

impl RedrawFlag {
    /// Returns whether a repaint was requested, and clears the request.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl Screen for RedrawFlag {
    fn render(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartPanel {
    series: Arc<Mutex<Vec<SeriesDescriptor>>>,
}

impl ChartPanel {
    pub fn series(&self) -> Vec<SeriesDescriptor> {
        self.series.lock().clone()
    }
}

impl LineChart for ChartPanel {
    fn set_data(&mut self, series: &[SeriesDescriptor]) {
        *self.series.lock() = series.to_vec();
    }
}

#[derive(Debug, Clone, Default)]
pub struct DonutPanel {
    segment: Arc<Mutex<Option<DonutSegment>>>,
}

impl DonutPanel {
    pub fn segment(&self) -> Option<DonutSegment> {
        self.segment.lock().clone()
    }
}

impl Donut for DonutPanel {
    fn set_data(&mut self, segments: &[DonutSegment]) {
        *self.segment.lock() = segments.first().cloned();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparklineData {
    pub labels: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct SparklinePanel {
    data: Arc<Mutex<SparklineData>>,
}

impl SparklinePanel {
    pub fn data(&self) -> SparklineData {
        self.data.lock().clone()
    }
}

impl Sparkline for SparklinePanel {
    fn set_data(&mut self, labels: &[String], series: &[Vec<f64>]) {
        *self.data.lock() = SparklineData {
            labels: labels.to_vec(),
            series: series.to_vec(),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub data: TableData,
    pub selected: usize,
}

/// Process table contents plus the selection cursor.
#[derive(Debug, Clone, Default)]
pub struct TablePanel {
    view: Arc<Mutex<TableView>>,
}

impl TablePanel {
    pub fn view(&self) -> TableView {
        self.view.lock().clone()
    }

    pub fn move_up(&self) {
        let mut view = self.view.lock();
        view.selected = view.selected.saturating_sub(1);
    }

    pub fn move_down(&self) {
        let mut view = self.view.lock();
        let last = view.data.rows.len().saturating_sub(1);
        view.selected = (view.selected + 1).min(last);
    }
}

impl Table for TablePanel {
    fn set_data(&mut self, data: TableData) {
        let mut view = self.view.lock();
        let last = data.rows.len().saturating_sub(1);
        view.selected = view.selected.min(last);
        view.data = data;
    }

    fn select(&mut self, row: usize) {
        let mut view = self.view.lock();
        view.selected = row.min(view.data.rows.len().saturating_sub(1));
    }
}

/// Every panel on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    pub screen: Arc<RedrawFlag>,
    pub cpu: ChartPanel,
    pub memory: ChartPanel,
    pub mem_donut: DonutPanel,
    pub swap_donut: DonutPanel,
    pub network: SparklinePanel,
    pub disk: DonutPanel,
    pub processes: TablePanel,
}

impl Panels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles for the monitors; they share state with `self`.
    pub fn surfaces(&self) -> Surfaces {
        Surfaces {
            screen: self.screen.clone(),
            cpu_chart: Box::new(self.cpu.clone()),
            mem_chart: Box::new(self.memory.clone()),
            mem_donut: Box::new(self.mem_donut.clone()),
            swap_donut: Box::new(self.swap_donut.clone()),
            net_sparkline: Box::new(self.network.clone()),
            disk_donut: Box::new(self.disk.clone()),
            process_table: Box::new(self.processes.clone()),
        }
    }
}
