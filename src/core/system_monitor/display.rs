//! Contract between monitors and whatever draws them.
//!
//! Monitors push structured data through these traits and then ask the
//! [`Screen`] to repaint. Each monitor owns its own widget handles; no
//! monitor touches another's.

use serde::Serialize;

/// One line in a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub title: String,
    pub color: String,
    /// Fixed, decreasing sample index (`W-1..0`).
    pub x: Vec<u32>,
    pub y: Vec<f64>,
}

/// One filled arc of a donut/gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSegment {
    /// Fraction in `0.0..=1.0`.
    pub percent: f64,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Repaint trigger shared by all widgets on one screen.
pub trait Screen: Send + Sync {
    fn render(&self);
}

pub trait LineChart: Send {
    fn set_data(&mut self, series: &[SeriesDescriptor]);
}

pub trait Donut: Send {
    fn set_data(&mut self, segments: &[DonutSegment]);
}

pub trait Sparkline: Send {
    fn set_data(&mut self, labels: &[String], series: &[Vec<f64>]);
}

pub trait Table: Send {
    fn set_data(&mut self, data: TableData);

    /// Move the selection cursor to `row`.
    fn select(&mut self, row: usize);
}

/// Surface that discards everything, for running monitors without a
/// terminal (headless export).
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Screen for Detached {
    fn render(&self) {}
}

impl LineChart for Detached {
    fn set_data(&mut self, _series: &[SeriesDescriptor]) {}
}

impl Donut for Detached {
    fn set_data(&mut self, _segments: &[DonutSegment]) {}
}

impl Sparkline for Detached {
    fn set_data(&mut self, _labels: &[String], _series: &[Vec<f64>]) {}
}

impl Table for Detached {
    fn set_data(&mut self, _data: TableData) {}

    fn select(&mut self, _row: usize) {}
}
