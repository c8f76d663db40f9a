//! Series domain: data points, named series sets and live state.

pub mod smoothing;
pub mod state;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::SeriesId;

pub use smoothing::SmoothingMode;
pub use state::LiveSeries;

/// A single sample on a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// `None` marks a gap (e.g. no trade yet).
    pub value: Option<f64>,
    /// Filled in by the smoothing pass.
    #[serde(default)]
    pub smoothed_value: Option<f64>,
}

impl Point {
    pub fn new(timestamp: i64, value: Option<f64>) -> Self {
        Self {
            timestamp,
            value,
            smoothed_value: None,
        }
    }

    pub fn with_value(timestamp: i64, value: f64) -> Self {
        Self::new(timestamp, Some(value))
    }

    pub fn gap(timestamp: i64) -> Self {
        Self::new(timestamp, None)
    }

    /// Value projected for the requested source.
    pub fn value_for(&self, source: ValueSource) -> Option<f64> {
        match source {
            ValueSource::Original => self.value,
            ValueSource::Smoothed => self.smoothed_value,
        }
    }
}

/// Which field of a [`Point`] a path is projected from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Raw `value`, for interactive rendering.
    Original,
    /// `smoothed_value`, for baseline rendering.
    #[default]
    Smoothed,
}

/// Index of the first point carrying a value.
pub fn first_defined(points: &[Point]) -> Option<usize> {
    points.iter().position(|p| p.value.is_some())
}

/// Index of the last point carrying a value.
pub fn last_defined(points: &[Point]) -> Option<usize> {
    points.iter().rposition(|p| p.value.is_some())
}

/// Clip a requested inclusive `[from, to]` slice to the defined part of the
/// series so leading and trailing gaps are never drawn.
///
/// Returns `None` when the series has no values or the clipped slice is empty.
pub fn defined_range(points: &[Point], from: Option<usize>, to: Option<usize>) -> Option<(usize, usize)> {
    let first = first_defined(points)?;
    let last = last_defined(points)?;
    let from = from.map_or(first, |f| f.max(first));
    let to = to.map_or(last, |t| t.min(last));
    (from <= to).then_some((from, to))
}

// ─── SeriesSet ───────────────────────────────────────────────────────────────

/// Series keyed by id. A plain `Vec<Point>` converts into a set holding the
/// default id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: HashMap<SeriesId, Vec<Point>>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<SeriesId>, points: Vec<Point>) {
        self.series.insert(id.into(), points);
    }

    /// Look up a series; `None` selects the default id.
    pub fn get(&self, id: Option<&SeriesId>) -> Option<&[Point]> {
        let key = id.cloned().unwrap_or_default();
        match self.series.get(&key) {
            Some(points) => Some(points.as_slice()),
            None => {
                let mut known: Vec<&str> = self
                    .series
                    .keys()
                    .filter(|k| !k.is_default())
                    .map(|k| k.as_str())
                    .collect();
                known.sort_unstable();
                tracing::warn!(
                    "Unknown series id \"{}\" (known ids: [{}])",
                    key,
                    known.join(", ")
                );
                None
            }
        }
    }

    pub fn get_mut(&mut self, id: Option<&SeriesId>) -> Option<&mut Vec<Point>> {
        let key = id.cloned().unwrap_or_default();
        self.series.get_mut(&key)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.series.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeriesId, &[Point])> {
        self.series.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// All series as slices, e.g. for domain computation.
    pub fn slices(&self) -> impl Iterator<Item = &[Point]> {
        self.series.values().map(|v| v.as_slice())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Vec<Point>> {
        self.series.values_mut()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl From<Vec<Point>> for SeriesSet {
    fn from(points: Vec<Point>) -> Self {
        let mut set = Self::new();
        set.insert(SeriesId::default(), points);
        set
    }
}

impl From<HashMap<SeriesId, Vec<Point>>> for SeriesSet {
    fn from(series: HashMap<SeriesId, Vec<Point>>) -> Self {
        Self { series }
    }
}
