//! Path interpolation engine: morph one geometry into another.
//!
//! Both paths are parsed once up front. Contours are paired in order; when a
//! pair has different segment counts, segments of the shorter one are
//! subdivided until the counts agree. Each frame is then a plain per-coordinate
//! blend, so per-frame cost is linear in the segment count.

use super::parse::{Curve, ParsedPath, Segment, Vec2};

/// Given a segment's start and end anchors, `true` when the segment should
/// snap to its final shape instead of morphing.
pub type SegmentFilter = fn(Vec2, Vec2) -> bool;

/// A vertical segment: same x, different y.
pub fn vertical_break(from: Vec2, to: Vec2) -> bool {
    from.x == to.x && from.y != to.y
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegKind {
    Line,
    Cubic,
}

#[derive(Debug, Clone)]
struct Contour {
    start: Vec2,
    curves: Vec<(SegKind, Curve)>,
    closed: bool,
}

fn contours(path: &ParsedPath) -> Vec<Contour> {
    let mut out: Vec<Contour> = Vec::new();
    let mut pen = Vec2::default();
    for seg in &path.segments {
        match *seg {
            Segment::Move { to } => {
                out.push(Contour {
                    start: to,
                    curves: Vec::new(),
                    closed: false,
                });
                pen = to;
            }
            Segment::Line { to } | Segment::Cubic { to, .. } => {
                let needs_new = out.last().map_or(true, |c| c.closed);
                if needs_new {
                    out.push(Contour {
                        start: pen,
                        curves: Vec::new(),
                        closed: false,
                    });
                }
                let curve = match *seg {
                    Segment::Cubic { c1, c2, .. } => (
                        SegKind::Cubic,
                        Curve {
                            from: pen,
                            c1,
                            c2,
                            to,
                        },
                    ),
                    _ => (SegKind::Line, Curve::line(pen, to)),
                };
                if let Some(c) = out.last_mut() {
                    c.curves.push(curve);
                }
                pen = to;
            }
            Segment::Close => {
                if let Some(c) = out.last_mut() {
                    c.closed = true;
                    pen = c.start;
                }
            }
        }
    }
    out
}

/// Split segments so the contour has exactly `target` of them.
fn subdivide(contour: &Contour, target: usize) -> Vec<(SegKind, Curve)> {
    let count = contour.curves.len();
    if count >= target {
        return contour.curves.clone();
    }
    if count == 0 {
        let p = contour.start;
        return vec![(SegKind::Line, Curve::line(p, p)); target];
    }

    let extra = target - count;
    let (base, rem) = (extra / count, extra % count);
    let mut out = Vec::with_capacity(target);
    for (i, &(kind, curve)) in contour.curves.iter().enumerate() {
        let pieces = 1 + base + usize::from(i < rem);
        for j in 0..pieces {
            let t0 = j as f64 / pieces as f64;
            let t1 = (j + 1) as f64 / pieces as f64;
            out.push((kind, curve.slice(t0, t1)));
        }
    }
    out
}

#[derive(Debug, Clone)]
struct AlignedSegment {
    kind: SegKind,
    a: Curve,
    b: Curve,
    excluded: bool,
}

#[derive(Debug, Clone)]
struct AlignedContour {
    a_start: Vec2,
    b_start: Vec2,
    segments: Vec<AlignedSegment>,
    closed: bool,
}

fn align(
    previous: &ParsedPath,
    current: &ParsedPath,
    exclude: Option<SegmentFilter>,
) -> Option<Vec<AlignedContour>> {
    let a = contours(previous);
    let b = contours(current);
    if a.len() != b.len() {
        return None;
    }

    let mut aligned = Vec::with_capacity(b.len());
    for (ca, cb) in a.iter().zip(b.iter()) {
        if ca.closed != cb.closed {
            return None;
        }
        let target = ca.curves.len().max(cb.curves.len());
        let sa = subdivide(ca, target);
        let sb = subdivide(cb, target);
        let segments = sa
            .into_iter()
            .zip(sb)
            .map(|((ka, a), (kb, b))| AlignedSegment {
                kind: if ka == SegKind::Line && kb == SegKind::Line {
                    SegKind::Line
                } else {
                    SegKind::Cubic
                },
                a,
                b,
                excluded: exclude.map_or(false, |f| f(b.from, b.to)),
            })
            .collect();
        aligned.push(AlignedContour {
            a_start: ca.start,
            b_start: cb.start,
            segments,
            closed: cb.closed,
        });
    }
    Some(aligned)
}

/// Precomputed morph between two geometries.
///
/// `interpolate(0)` returns `previous` verbatim and `interpolate(1)` returns
/// `current` verbatim. Geometries that cannot be paired (different contour
/// count or closure, or either side unparseable) always yield `current`.
#[derive(Debug, Clone)]
pub struct PathInterpolator {
    previous: String,
    current: String,
    previous_parsed: ParsedPath,
    current_parsed: ParsedPath,
    aligned: Option<Vec<AlignedContour>>,
}

impl PathInterpolator {
    pub fn new(previous: &str, current: &str, exclude: Option<SegmentFilter>) -> Self {
        let current_parsed = match ParsedPath::parse(current) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Current geometry is not a valid path: {}", e);
                ParsedPath::default()
            }
        };
        let previous_parsed = ParsedPath::parse(previous).ok();

        let aligned = previous_parsed
            .as_ref()
            .and_then(|prev| align(prev, &current_parsed, exclude));
        if aligned.is_none() && !previous.is_empty() {
            tracing::debug!("Incompatible path structures; snapping to current geometry");
        }

        Self {
            previous: previous.to_string(),
            current: current.to_string(),
            previous_parsed: previous_parsed.unwrap_or_default(),
            current_parsed,
            aligned,
        }
    }

    /// Whether the two geometries could be paired for morphing.
    pub fn is_compatible(&self) -> bool {
        self.aligned.is_some()
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Geometry string at `progress` (clamped to `[0, 1]`).
    pub fn interpolate(&self, progress: f64) -> String {
        if self.aligned.is_none() || progress >= 1.0 {
            return self.current.clone();
        }
        if progress <= 0.0 || progress.is_nan() {
            return self.previous.clone();
        }
        self.interpolate_parsed(progress).to_svg()
    }

    /// Geometry string and its parsed form at `progress`.
    pub fn sample(&self, progress: f64) -> (String, ParsedPath) {
        if self.aligned.is_none() || progress >= 1.0 {
            return (self.current.clone(), self.current_parsed.clone());
        }
        if progress <= 0.0 || progress.is_nan() {
            return (self.previous.clone(), self.previous_parsed.clone());
        }
        let parsed = self.interpolate_parsed(progress);
        (parsed.to_svg(), parsed)
    }

    /// Parsed geometry at `progress`, for consumers that skip re-parsing.
    pub fn interpolate_parsed(&self, progress: f64) -> ParsedPath {
        let Some(aligned) = &self.aligned else {
            return self.current_parsed.clone();
        };
        if progress >= 1.0 {
            return self.current_parsed.clone();
        }
        if progress <= 0.0 || progress.is_nan() {
            return self.previous_parsed.clone();
        }

        let t = progress;
        let n: usize = aligned.iter().map(|c| c.segments.len() + 2).sum();
        let mut segments = Vec::with_capacity(n);
        for contour in aligned {
            segments.push(Segment::Move {
                to: contour.a_start.lerp(contour.b_start, t),
            });
            for seg in &contour.segments {
                let (c1, c2, to) = if seg.excluded {
                    (seg.b.c1, seg.b.c2, seg.b.to)
                } else {
                    (
                        seg.a.c1.lerp(seg.b.c1, t),
                        seg.a.c2.lerp(seg.b.c2, t),
                        seg.a.to.lerp(seg.b.to, t),
                    )
                };
                segments.push(match seg.kind {
                    SegKind::Line => Segment::Line { to },
                    SegKind::Cubic => Segment::Cubic { c1, c2, to },
                });
            }
            if contour.closed {
                segments.push(Segment::Close);
            }
        }
        ParsedPath { segments }
    }
}
