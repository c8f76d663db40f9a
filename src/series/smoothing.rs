//! Smoothing pass: populates `smoothed_value` for baseline rendering.
//!
//! Gaps stay gaps: a point without a `value` gets no `smoothed_value`, and gap
//! points never contribute to their neighbours' averages.

use serde::{Deserialize, Serialize};

use super::Point;

/// Default kernel radius, in samples.
pub const DEFAULT_RADIUS: f64 = 10.0;

/// Largest radius a chart config accepts.
pub const MAX_RADIUS: f64 = 1_000_000.0;

/// Kernel support in multiples of the radius.
const SUPPORT: f64 = 3.0;

/// How `smoothed_value` is derived from `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Gaussian-weighted local average with the given radius (in samples).
    Kernel { radius: f64 },
    /// `smoothed_value = value`. Used for live series, where smoothing lags
    /// real-time updates.
    PassThrough,
}

impl Default for SmoothingMode {
    fn default() -> Self {
        SmoothingMode::Kernel {
            radius: DEFAULT_RADIUS,
        }
    }
}

impl SmoothingMode {
    pub fn apply(&self, points: &mut [Point]) {
        match *self {
            SmoothingMode::Kernel { radius } => smooth(points, radius),
            SmoothingMode::PassThrough => pass_through(points),
        }
    }
}

/// Copy `value` into `smoothed_value`.
pub fn pass_through(points: &mut [Point]) {
    for p in points.iter_mut() {
        p.smoothed_value = p.value;
    }
}

/// Gaussian kernel smoother over the defined values.
///
/// A non-positive or non-finite radius degrades to [`pass_through`].
pub fn smooth(points: &mut [Point], radius: f64) {
    if !(radius.is_finite() && radius > 0.0) {
        pass_through(points);
        return;
    }

    let reach = ((radius * SUPPORT).ceil() as usize).min(points.len());
    let values: Vec<Option<f64>> = points
        .iter()
        .map(|p| p.value.filter(|v| v.is_finite()))
        .collect();
    let inv_two_sigma_sq = 1.0 / (2.0 * radius * radius);

    for (i, p) in points.iter_mut().enumerate() {
        if values[i].is_none() {
            p.smoothed_value = None;
            continue;
        }
        let lo = i.saturating_sub(reach);
        let hi = i.saturating_add(reach).min(values.len() - 1);

        let mut weighted = 0.0;
        let mut total = 0.0;
        for (j, v) in values[lo..=hi].iter().enumerate() {
            let Some(v) = v else { continue };
            let d = (lo + j) as f64 - i as f64;
            let w = (-d * d * inv_two_sigma_sq).exp();
            weighted += w * v;
            total += w;
        }
        p.smoothed_value = Some(weighted / total);
    }
}
