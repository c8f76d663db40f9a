//! Price and datetime readouts under the cursor.
//!
//! Both readouts interpolate with [`AkimaSpline`] over the pixel positions
//! the path builder uses, so the readout tracks the drawn line.

use serde::{Deserialize, Serialize};

use crate::akima::AkimaSpline;
use crate::cursor::{index_for_x, x_for_index, x_positions, CursorState};
use crate::error::ChartError;
use crate::scale::XDomain;
use crate::series::{first_defined, last_defined, Point};
use crate::shared::fmt::{format_datetime, format_price, DatetimeFormat};

/// Raw and display text. Both are empty when there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readout {
    pub value: String,
    pub formatted: String,
}

impl Readout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Horizontal mapping shared by the readouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutAxis {
    /// Width the path occupies.
    pub width: f64,
    pub x_domain: Option<XDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReadoutOptions {
    /// Decimals in `value`.
    pub precision: u32,
    /// Pin the readout to this point instead of the cursor.
    pub index: Option<usize>,
}

impl Default for PriceReadoutOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            index: None,
        }
    }
}

fn fixed(v: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, v)
}

fn price(value: String) -> Readout {
    let formatted = format_price(&value, None);
    Readout { value, formatted }
}

/// `true` when the point nearest the cursor is a gap.
fn over_gap(points: &[Point], cursor: &CursorState, axis: ReadoutAxis) -> bool {
    index_for_x(points, cursor.current_x, axis.x_domain, axis.width)
        .and_then(|i| points.get(i))
        .is_some_and(|p| p.value.is_none())
}

/// Price at the cursor, or at `options.index` when given.
pub fn price_readout(
    points: &[Point],
    cursor: &CursorState,
    axis: ReadoutAxis,
    options: &PriceReadoutOptions,
) -> Readout {
    if points.is_empty() {
        return Readout::empty();
    }
    if let Some(i) = options.index {
        return match points[i.min(points.len() - 1)].value {
            Some(v) if v.is_finite() => price(fixed(v, options.precision)),
            _ => Readout::empty(),
        };
    }
    if !cursor.is_active || over_gap(points, cursor, axis) {
        return Readout::empty();
    }

    let (Some(first), Some(last)) = (first_defined(points), last_defined(points)) else {
        return Readout::empty();
    };
    let (Some(lo), Some(hi)) = (
        x_for_index(points, first, axis.x_domain, axis.width),
        x_for_index(points, last, axis.x_domain, axis.width),
    ) else {
        return Readout::empty();
    };
    let x = cursor.current_x;
    if !(x >= lo && x <= hi) {
        return Readout::empty();
    }
    if first == last {
        return match points[first].value {
            Some(v) => price(fixed(v, options.precision)),
            None => Readout::empty(),
        };
    }

    match price_spline(points, axis) {
        Ok(spline) => price(fixed(spline.eval(x), options.precision)),
        Err(e) => {
            tracing::debug!("Price readout unavailable: {}", e);
            Readout::empty()
        }
    }
}

/// Spline of the defined values over their pixel x.
///
/// Hosts that query many cursor positions per data update can build this once
/// and call [`AkimaSpline::eval`] directly.
pub fn price_spline(points: &[Point], axis: ReadoutAxis) -> Result<AkimaSpline, ChartError> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let v = p.value?;
            Some((x_for_index(points, i, axis.x_domain, axis.width)?, v))
        })
        .unzip();
    Ok(AkimaSpline::new(xs, ys)?)
}

/// Spline of every timestamp over its pixel x, the datetime counterpart of
/// [`price_spline`].
pub fn datetime_spline(points: &[Point], axis: ReadoutAxis) -> Result<AkimaSpline, ChartError> {
    let xs = x_positions(points, axis.x_domain, axis.width);
    let ys = points.iter().map(|p| p.timestamp as f64).collect();
    Ok(AkimaSpline::new(xs, ys)?)
}

/// Timestamp at the cursor.
///
/// The cursor may overshoot the first and last defined point by half a slot.
pub fn datetime_readout(
    points: &[Point],
    cursor: &CursorState,
    axis: ReadoutAxis,
    format: &DatetimeFormat,
) -> Readout {
    if points.is_empty() || !cursor.is_active || over_gap(points, cursor, axis) {
        return Readout::empty();
    }
    let (Some(first), Some(last)) = (first_defined(points), last_defined(points)) else {
        return Readout::empty();
    };

    let xs = x_positions(points, axis.x_domain, axis.width);
    if xs.iter().any(|x| !x.is_finite()) {
        return Readout::empty();
    }
    let half_slot = if xs.len() > 1 {
        (xs[xs.len() - 1] - xs[0]) / (xs.len() - 1) as f64 / 2.0
    } else {
        0.0
    };
    let x = cursor.current_x;
    if !(x >= xs[first] - half_slot && x <= xs[last] + half_slot) {
        return Readout::empty();
    }

    let timestamp = if points.len() == 1 {
        points[0].timestamp
    } else {
        match datetime_spline(points, axis) {
            Ok(spline) => spline.eval(x).round() as i64,
            Err(e) => {
                tracing::debug!("Datetime readout unavailable: {}", e);
                return Readout::empty();
            }
        }
    };
    Readout {
        value: timestamp.to_string(),
        formatted: format_datetime(timestamp, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[Option<f64>]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(1_704_164_645_000 + i as i64 * 60_000, *v))
            .collect()
    }

    fn axis() -> ReadoutAxis {
        ReadoutAxis {
            width: 100.0,
            x_domain: None,
        }
    }

    #[test]
    fn test_price_at_knot_and_between() {
        let pts = series(&[Some(1000.0), Some(2000.0), Some(3000.0)]);
        let at = price_readout(&pts, &CursorState::active_at(50.0), axis(), &Default::default());
        assert_eq!(at.value, "2000.00");
        assert_eq!(at.formatted, "2,000.00");

        let mid = price_readout(&pts, &CursorState::active_at(25.0), axis(), &Default::default());
        assert_eq!(mid.value, "1500.00");
    }

    #[test]
    fn test_price_inactive_cursor_is_empty() {
        let pts = series(&[Some(1.0), Some(2.0)]);
        assert!(price_readout(&pts, &CursorState::inactive(), axis(), &Default::default()).is_empty());
    }

    #[test]
    fn test_price_index_override() {
        let pts = series(&[Some(1.5), Some(2.25)]);
        let opts = PriceReadoutOptions {
            precision: 3,
            index: Some(9),
        };
        let r = price_readout(&pts, &CursorState::inactive(), axis(), &opts);
        assert_eq!(r.value, "2.250");
    }

    #[test]
    fn test_price_outside_data_or_over_gap_is_empty() {
        let pts = series(&[Some(1.0), Some(2.0), Some(3.0), None, None]);
        let past = price_readout(&pts, &CursorState::active_at(90.0), axis(), &Default::default());
        assert!(past.is_empty());

        let gap = series(&[Some(1.0), None, Some(3.0)]);
        let r = price_readout(&gap, &CursorState::active_at(50.0), axis(), &Default::default());
        assert!(r.is_empty());
    }

    #[test]
    fn test_price_spline_needs_two_values() {
        let pts = series(&[None, Some(1.0), None]);
        assert!(matches!(
            price_spline(&pts, axis()),
            Err(ChartError::Interpolation(_))
        ));
        let pts = series(&[Some(1.0), None, Some(3.0)]);
        let spline = price_spline(&pts, axis()).unwrap();
        assert_eq!(spline.xs(), &[0.0, 100.0]);
    }

    #[test]
    fn test_datetime_readout() {
        let pts = series(&[Some(1.0), Some(2.0), Some(3.0)]);
        let r = datetime_readout(&pts, &CursorState::active_at(0.0), axis(), &DatetimeFormat::default());
        assert_eq!(r.value, "1704164645000");
        assert_eq!(r.formatted, "1/2/2024, 3:04:05 AM");

        let r = datetime_readout(&pts, &CursorState::active_at(25.0), axis(), &DatetimeFormat::default());
        assert_eq!(r.value, (1_704_164_645_000_i64 + 30_000).to_string());
    }

    #[test]
    fn test_gap_check_follows_time_axis() {
        let pts = vec![
            Point::with_value(0, 1.0),
            Point::gap(10),
            Point::with_value(100, 3.0),
        ];
        let axis = ReadoutAxis {
            width: 100.0,
            x_domain: Some((0.0, 100.0)),
        };
        let opts = PriceReadoutOptions::default();
        assert!(price_readout(&pts, &CursorState::active_at(12.0), axis, &opts).is_empty());
        let r = price_readout(&pts, &CursorState::active_at(60.0), axis, &opts);
        assert_eq!(r.value, "2.20");
    }

    #[test]
    fn test_datetime_spline_matches_readout() {
        let pts = series(&[Some(1.0), None, Some(3.0)]);
        let spline = datetime_spline(&pts, axis()).unwrap();
        assert_eq!(spline.xs(), &[0.0, 50.0, 100.0]);
        let r = datetime_readout(&pts, &CursorState::active_at(100.0), axis(), &DatetimeFormat::default());
        assert_eq!(r.value, (spline.eval(100.0).round() as i64).to_string());
        assert!(datetime_spline(&pts[..1], axis()).is_err());
    }

    #[test]
    fn test_datetime_inactive_is_empty() {
        let pts = series(&[Some(1.0), Some(2.0)]);
        let r = datetime_readout(&pts, &CursorState::inactive(), axis(), &DatetimeFormat::default());
        assert_eq!(r, Readout::empty());
    }
}
