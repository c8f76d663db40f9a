//! Live series state: app-owned, chart-provided update logic.

use super::smoothing::SmoothingMode;
use super::Point;

/// A series fed by snapshots and streaming updates.
///
/// The app owns instances of this type. Every mutation re-runs the configured
/// smoothing pass and bumps [`update`](Self::update), which elements use to
/// tell "no data pushed yet" apart from real data.
#[derive(Debug, Clone, Default)]
pub struct LiveSeries {
    points: Vec<Point>,
    smoothing: SmoothingMode,
    update: u64,
}

impl LiveSeries {
    pub fn new(smoothing: SmoothingMode) -> Self {
        Self {
            points: Vec::new(),
            smoothing,
            update: 0,
        }
    }

    /// Replace all points.
    pub fn apply_snapshot(&mut self, mut points: Vec<Point>) {
        points.sort_by_key(|p| p.timestamp);
        self.smoothing.apply(&mut points);
        self.points = points;
        self.update += 1;
    }

    /// Append a point, or overwrite the last one when timestamps match.
    ///
    /// Points older than the last one are dropped; the series stays ordered.
    pub fn apply_update(&mut self, point: Point) {
        if let Some(last) = self.points.last_mut() {
            if last.timestamp == point.timestamp {
                last.value = point.value;
                self.resmooth();
                return;
            }
            if point.timestamp < last.timestamp {
                tracing::debug!(
                    "Dropping out-of-order point at {} (last is {})",
                    point.timestamp,
                    last.timestamp
                );
                return;
            }
        }
        self.points.push(point);
        self.resmooth();
    }

    fn resmooth(&mut self) {
        self.smoothing.apply(&mut self.points);
        self.update += 1;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Monotonic mutation counter; `0` until data arrives.
    pub fn update(&self) -> u64 {
        self.update
    }

    pub fn smoothing(&self) -> SmoothingMode {
        self.smoothing
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.update += 1;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
