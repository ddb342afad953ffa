use std::collections::VecDeque;

use super::display::SeriesDescriptor;

/// Samples kept per chart series: one reading per second over a minute.
pub const WINDOW_SIZE: usize = 61;

/// Fixed-width FIFO of numeric samples (for line charts and sparklines).
///
/// Starts zero-filled and never changes length: every push drops the
/// oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow {
    samples: VecDeque<f64>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::with_width(WINDOW_SIZE)
    }

    pub fn with_width(width: usize) -> Self {
        Self {
            samples: std::iter::repeat(0.0).take(width).collect(),
        }
    }

    /// Drop the oldest sample and append `value`.
    pub fn push(&mut self, value: f64) {
        if self.samples.is_empty() {
            return;
        }
        self.samples.pop_front();
        self.samples.push_back(value);
    }

    /// Samples in chronological order, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn width(&self) -> usize {
        self.samples.len()
    }

    /// Chart x-axis for a window: `width-1` down to `0` (seconds ago).
    pub fn x_axis(&self) -> Vec<u32> {
        (0..self.samples.len() as u32).rev().collect()
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// A titled, coloured window: one line in a chart.
#[derive(Debug, Clone)]
pub struct Series {
    pub title: String,
    pub color: String,
    pub window: SlidingWindow,
}

impl Series {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: color.into(),
            window: SlidingWindow::new(),
        }
    }

    pub fn descriptor(&self) -> SeriesDescriptor {
        SeriesDescriptor {
            title: self.title.clone(),
            color: self.color.clone(),
            x: self.window.x_axis(),
            y: self.window.values(),
        }
    }
}

/// Round-robin palette lookup.
pub fn palette_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[index % palette.len()].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_is_constant() {
        let mut window = SlidingWindow::new();
        assert_eq!(window.width(), WINDOW_SIZE);

        for i in 0..500 {
            window.push(i as f64);
            assert_eq!(window.values().len(), WINDOW_SIZE);
        }
    }

    #[test]
    fn test_push_is_fifo() {
        let mut window = SlidingWindow::with_width(3);
        window.push(1.0);
        window.push(2.0);
        assert_eq!(window.values(), vec![0.0, 1.0, 2.0]);

        window.push(3.0);
        window.push(4.0);
        assert_eq!(window.values(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.latest(), Some(4.0));
    }

    #[test]
    fn test_x_axis_counts_down() {
        let window = SlidingWindow::with_width(4);
        assert_eq!(window.x_axis(), vec![3, 2, 1, 0]);
        assert_eq!(SlidingWindow::new().x_axis()[0], 60);
    }

    #[test]
    fn test_zero_width_ignores_pushes() {
        let mut window = SlidingWindow::with_width(0);
        window.push(1.0);
        assert!(window.values().is_empty());
        assert_eq!(window.latest(), None);
    }

    #[test]
    fn test_palette_wraps() {
        let palette: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(palette_color(&palette, 0), "a");
        assert_eq!(palette_color(&palette, 3), "b");
        assert_eq!(palette_color(&[], 3), "");
    }
}
