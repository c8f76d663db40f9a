//! Cursor state and the pixel ↔ data mapping the cursor relies on.

use serde::{Deserialize, Serialize};

use crate::path::{ParsedPath, Vec2};
use crate::scale::{LinearScale, XDomain};
use crate::series::{first_defined, last_defined, Point};

/// Gesture state supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorState {
    /// Horizontal cursor position in pixels.
    pub current_x: f64,
    pub is_active: bool,
}

impl CursorState {
    pub fn active_at(x: f64) -> Self {
        Self {
            current_x: x,
            is_active: true,
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Pixel x of point `i`, using the same mapping as the path builder.
pub fn x_for_index(points: &[Point], i: usize, x_domain: Option<XDomain>, width: f64) -> Option<f64> {
    let p = points.get(i)?;
    let x = match x_domain {
        Some(domain) => LinearScale::x(domain, width).apply(p.timestamp as f64),
        None => LinearScale::x((0.0, points.len().saturating_sub(1) as f64), width).apply(i as f64),
    };
    x.is_finite().then_some(x)
}

/// Pixel x of every point.
pub fn x_positions(points: &[Point], x_domain: Option<XDomain>, width: f64) -> Vec<f64> {
    (0..points.len())
        .map(|i| x_for_index(points, i, x_domain, width).unwrap_or(f64::NAN))
        .collect()
}

/// Point whose pixel x is nearest to `x`, using the same mapping as
/// [`x_for_index`].
pub fn index_for_x(points: &[Point], x: f64, x_domain: Option<XDomain>, width: f64) -> Option<usize> {
    if !x.is_finite() {
        return None;
    }
    (0..points.len())
        .filter_map(|i| Some((i, (x_for_index(points, i, x_domain, width)? - x).abs())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Where to draw the crosshair for cursor position `x`.
///
/// Inside the defined data the crosshair follows the path. Outside it snaps
/// to the nearest end of the defined data.
pub fn crosshair_position(
    parsed: &ParsedPath,
    points: &[Point],
    x: f64,
    x_domain: Option<XDomain>,
    width: f64,
) -> Option<Vec2> {
    let first = first_defined(points)?;
    let last = last_defined(points)?;
    let lo = x_for_index(points, first, x_domain, width)?;
    let hi = x_for_index(points, last, x_domain, width)?;

    let bounded = x.clamp(0.0, width.max(0.0));
    if bounded >= lo && bounded <= hi {
        if let Some(y) = parsed.y_for_x(bounded) {
            return Some(Vec2::new(bounded, y));
        }
    }

    let snap_x = if bounded < lo { lo } else { hi };
    Some(Vec2::new(snap_x, y_or_rightmost(parsed, snap_x)?))
}

/// Position of a dot marker pinned to curve index `at`, kept inside `width`.
pub fn dot_position(parsed: &ParsedPath, at: usize, width: f64) -> Option<Vec2> {
    let x = parsed.x_position_for_curve(at)?.min(width);
    Some(Vec2::new(x, y_or_rightmost(parsed, x)?))
}

/// Path y at `x`, or the y of the rightmost anchor when `x` is off the path.
fn y_or_rightmost(parsed: &ParsedPath, x: f64) -> Option<f64> {
    parsed.y_for_x(x).or_else(|| {
        parsed
            .curves()
            .iter()
            .map(|c| c.to)
            .max_by(|a, b| a.x.total_cmp(&b.x))
            .map(|p| p.y)
    })
}
