//! Value domains and linear coordinate scales.
//!
//! The y axis is inverted: higher values map to smaller pixel offsets so they
//! sit higher on screen.

use serde::{Deserialize, Serialize};

use crate::series::Point;

/// Min/max over the values of a series. Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YDomain {
    pub min: f64,
    pub max: f64,
}

impl YDomain {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// A zero-width domain has nothing to plot against.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Optional caller-supplied bounds that win over the data-derived ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Time bounds of a time-scaled x axis, in the same unit as point timestamps.
pub type XDomain = (f64, f64);

/// Derive the value domain of one or more series.
///
/// Non-null, finite values only. With no values at all the domain falls back to
/// `0..0`, which callers treat as "nothing renderable".
pub fn compute_y_domain<'a, I>(series: I, range: YRange) -> YDomain
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for points in series {
        for v in points.iter().filter_map(|p| p.value).filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo > hi {
        lo = 0.0;
        hi = 0.0;
    }
    YDomain::new(range.min.unwrap_or(lo), range.max.unwrap_or(hi))
}

/// `(first, last)` timestamps of a series, used as the default time domain.
pub fn time_extent(points: &[Point]) -> Option<XDomain> {
    let first = points.first()?.timestamp as f64;
    let last = points.last()?.timestamp as f64;
    Some((first, last))
}

/// Width the path occupies when the provider declares more x slots than the
/// data currently fills.
pub fn path_width(width: f64, data_len: usize, x_length: Option<usize>) -> f64 {
    match x_length {
        Some(total) if total > data_len && total > 0 => width * data_len as f64 / total as f64,
        _ => width,
    }
}

// ─── LinearScale ─────────────────────────────────────────────────────────────

/// Affine map from `domain` to `range`.
///
/// A zero-width domain maps every input to the middle of the range instead of
/// dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// x scale: time (or index) domain → `[0, width]`.
    pub fn x(domain: (f64, f64), width: f64) -> Self {
        Self::new(domain, (0.0, width))
    }

    /// y scale: value domain → `[height - gutter, gutter]`.
    pub fn y(domain: YDomain, height: f64, gutter: f64) -> Self {
        Self::new((domain.min, domain.max), (height - gutter, gutter))
    }

    #[inline]
    pub fn apply(&self, v: f64) -> f64 {
        let span = self.d1 - self.d0;
        if span == 0.0 {
            return (self.r0 + self.r1) / 2.0;
        }
        self.r0 + (v - self.d0) / span * (self.r1 - self.r0)
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let span = self.r1 - self.r0;
        if span == 0.0 {
            return (self.d0 + self.d1) / 2.0;
        }
        self.d0 + (px - self.r0) / span * (self.d1 - self.d0)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.r0, self.r1)
    }
}
