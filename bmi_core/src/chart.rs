//! Scrollable window over the weight history for the trend chart.

use crate::BmiEntry;
use chrono::{Local, TimeZone};

/// Default number of points shown at once
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Labels and values ready for a line chart
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowView {
    /// Entry dates as `DD.MM.YYYY`
    pub labels: Vec<String>,
    /// Weights in kilograms
    pub values: Vec<f64>,
}

impl WindowView {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Largest valid start index for a list of `len` entries
pub fn max_start(len: usize, window_size: usize) -> usize {
    len.saturating_sub(window_size)
}

/// Slice `entries[start_index..start_index + window_size]` for display,
/// formatting dates in local time. `start_index` is clamped.
pub fn windowed_view(entries: &[BmiEntry], window_size: usize, start_index: usize) -> WindowView {
    windowed_view_in(entries, window_size, start_index, &Local)
}

/// Same as [`windowed_view`] with dates rendered in `tz`
pub fn windowed_view_in<Tz: TimeZone>(
    entries: &[BmiEntry],
    window_size: usize,
    start_index: usize,
    tz: &Tz,
) -> WindowView
where
    Tz::Offset: std::fmt::Display,
{
    let start = start_index.min(max_start(entries.len(), window_size));
    let end = (start + window_size).min(entries.len());
    let shown = &entries[start..end];

    WindowView {
        labels: shown
            .iter()
            .map(|e| e.date.with_timezone(tz).format("%d.%m.%Y").to_string())
            .collect(),
        values: shown.iter().map(|e| e.weight).collect(),
    }
}

/// Scroll position of the chart.
///
/// Starts on the most recent window; shifting saturates at either end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartWindow {
    window_size: usize,
    len: usize,
    start_index: usize,
}

impl ChartWindow {
    pub fn new(len: usize, window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            len,
            start_index: max_start(len, window_size),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Move one entry towards older data
    pub fn shift_left(&mut self) {
        self.start_index = self.start_index.saturating_sub(1);
    }

    /// Move one entry towards newer data
    pub fn shift_right(&mut self) {
        self.start_index = (self.start_index + 1).min(max_start(self.len, self.window_size));
    }

    /// Re-anchor on the latest window after the list was re-read
    pub fn refresh(&mut self, len: usize) {
        self.len = len;
        self.start_index = max_start(len, self.window_size);
    }

    pub fn view(&self, entries: &[BmiEntry]) -> WindowView {
        windowed_view(entries, self.window_size, self.start_index)
    }

    pub fn view_in<Tz: TimeZone>(&self, entries: &[BmiEntry], tz: &Tz) -> WindowView
    where
        Tz::Offset: std::fmt::Display,
    {
        windowed_view_in(entries, self.window_size, self.start_index, tz)
    }
}
