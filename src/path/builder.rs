//! Path builder: series slice → stroke or area geometry.

use serde::{Deserialize, Serialize};

use super::curve::{CurveShape, PixelPoint};
use super::svg::PathWriter;
use crate::scale::{LinearScale, XDomain, YDomain};
use crate::series::{defined_range, Point, ValueSource};

/// Stroke or filled area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    #[default]
    Stroke,
    Area,
}

/// Everything needed to project one series slice into pixel space.
#[derive(Debug, Clone, Copy)]
pub struct PathRequest<'a> {
    pub points: &'a [Point],
    /// Inclusive slice start; defaults to the first defined point.
    pub from: Option<usize>,
    /// Inclusive slice end; defaults to the last defined point.
    pub to: Option<usize>,
    pub width: f64,
    pub height: f64,
    pub gutter: f64,
    pub shape: CurveShape,
    pub y_domain: YDomain,
    /// Present → time-scaled x axis; absent → index-scaled.
    pub x_domain: Option<XDomain>,
    pub source: ValueSource,
}

impl<'a> PathRequest<'a> {
    pub fn new(points: &'a [Point], width: f64, height: f64, y_domain: YDomain) -> Self {
        Self {
            points,
            from: None,
            to: None,
            width,
            height,
            gutter: 0.0,
            shape: CurveShape::default(),
            y_domain,
            x_domain: None,
            source: ValueSource::default(),
        }
    }

    pub fn range(mut self, from: Option<usize>, to: Option<usize>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn shape(mut self, shape: CurveShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn x_domain(mut self, x_domain: Option<XDomain>) -> Self {
        self.x_domain = x_domain;
        self
    }

    pub fn source(mut self, source: ValueSource) -> Self {
        self.source = source;
        self
    }

    /// The clipped inclusive slice that will actually be drawn.
    pub fn resolved_range(&self) -> Option<(usize, usize)> {
        defined_range(self.points, self.from, self.to)
    }

    pub fn x_scale(&self) -> LinearScale {
        let domain = self
            .x_domain
            .unwrap_or((0.0, self.points.len().saturating_sub(1) as f64));
        LinearScale::x(domain, self.width)
    }

    pub fn y_scale(&self) -> LinearScale {
        LinearScale::y(self.y_domain, self.height, self.gutter)
    }

    /// Runs of contiguous defined points, projected to pixels.
    ///
    /// `None` when the request is malformed: a slice outside the series, a
    /// point whose `value` is present but whose projected value is missing,
    /// or a non-finite projection.
    fn project(&self) -> Option<Vec<Vec<PixelPoint>>> {
        if self.points.is_empty() {
            return None;
        }
        if let Some(from) = self.from {
            if from >= self.points.len() {
                tracing::warn!(
                    "Path slice starts at {} but series has {} points",
                    from,
                    self.points.len()
                );
                return None;
            }
        }
        let (from, to) = self.resolved_range()?;

        let xs = self.x_scale();
        let ys = self.y_scale();
        let mut runs: Vec<Vec<PixelPoint>> = Vec::new();
        let mut run: Vec<PixelPoint> = Vec::new();

        for (i, p) in self.points.iter().enumerate().take(to + 1).skip(from) {
            if p.value.is_none() {
                if !run.is_empty() {
                    runs.push(std::mem::take(&mut run));
                }
                continue;
            }
            let Some(v) = p.value_for(self.source) else {
                tracing::warn!("Point {} has a value but no {:?} projection", i, self.source);
                return None;
            };
            let x_in = match self.x_domain {
                Some(_) => p.timestamp as f64,
                None => i as f64,
            };
            let (x, y) = (xs.apply(x_in), ys.apply(v));
            if !(x.is_finite() && y.is_finite()) {
                tracing::warn!("Point {} projects to a non-finite coordinate", i);
                return None;
            }
            run.push((x, y));
        }
        if !run.is_empty() {
            runs.push(run);
        }
        Some(runs)
    }
}

/// Build the stroke geometry for a request; `""` when nothing is drawable.
pub fn build_path(req: &PathRequest<'_>) -> String {
    let Some(runs) = req.project() else {
        return String::new();
    };
    let mut out = PathWriter::with_capacity(runs.iter().map(Vec::len).sum());
    for run in &runs {
        req.shape.emit(run, &mut out);
    }
    out.finish()
}

/// Build the filled-area geometry: the stroke closed down to `y = height`.
pub fn build_area(req: &PathRequest<'_>) -> String {
    let Some(runs) = req.project() else {
        return String::new();
    };
    let mut out = PathWriter::with_capacity(runs.iter().map(Vec::len).sum::<usize>() + runs.len() * 3);
    for run in &runs {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        req.shape.emit(run, &mut out);
        out.line_to(last.0, req.height);
        out.line_to(first.0, req.height);
        out.close();
    }
    out.finish()
}

/// Dispatch on [`PathKind`].
pub fn build(req: &PathRequest<'_>, kind: PathKind) -> String {
    match kind {
        PathKind::Stroke => build_path(req),
        PathKind::Area => build_area(req),
    }
}
