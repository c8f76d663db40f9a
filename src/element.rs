//! Animated stroke and area elements.
//!
//! An element owns one [`PathCache`] and one [`TransitionController`]. Each
//! frame it picks the geometry for the current [`RenderMode`]:
//!
//! - `Baseline`: smoothed values, looked up in the cache first.
//! - `Interactive`: raw values, rebuilt every frame so the line follows live
//!   updates under the cursor.
//!
//! The chosen geometry becomes the controller's target and the controller
//! returns what to draw.

use std::marker::PhantomData;
use std::time::Instant;

use crate::chart::{ChartConfig, ChartContext};
use crate::path::{build, CurveShape, PathCache, PathFingerprint, PathKind, PathRequest};
use crate::series::{Point, ValueSource};
use crate::transition::{PathFrame, RenderMode, TransitionController};

/// Compile-time stroke/area selector.
pub trait ElementKind {
    const KIND: PathKind;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Stroke;

#[derive(Debug, Clone, Copy, Default)]
pub struct Area;

impl ElementKind for Stroke {
    const KIND: PathKind = PathKind::Stroke;
}

impl ElementKind for Area {
    const KIND: PathKind = PathKind::Area;
}

pub type AnimatedPath = Animated<Stroke>;
pub type AnimatedArea = Animated<Area>;

/// One drawn element of a line chart.
#[derive(Debug, Clone)]
pub struct Animated<K: ElementKind> {
    cache: PathCache,
    transition: TransitionController,
    from: Option<usize>,
    to: Option<usize>,
    time_tolerance: Option<i64>,
    last_shape: Option<CurveShape>,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> Animated<K> {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            cache: PathCache::new(config.cache_capacity),
            transition: TransitionController::new(config.transition_config()),
            from: None,
            to: None,
            time_tolerance: Some(config.time_tolerance_ms),
            last_shape: None,
            _kind: PhantomData,
        }
    }

    /// Draw only `[from, to]` of the series.
    pub fn with_range(mut self, from: Option<usize>, to: Option<usize>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn kind(&self) -> PathKind {
        K::KIND
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    /// Geometry to draw at `now`.
    ///
    /// `update` is the live data counter ([`LiveSeries::update`]); `0` means
    /// no live data yet, so the baseline is shown even while interactive.
    ///
    /// [`LiveSeries::update`]: crate::series::LiveSeries::update
    pub fn frame(&mut self, ctx: &ChartContext, points: &[Point], update: u64, now: Instant) -> PathFrame {
        self.transition.set_cursor_active(ctx.cursor.is_active, now);
        if self.last_shape != Some(ctx.shape) {
            if self.last_shape.is_some() {
                tracing::debug!("Curve shape changed to {}; clearing path cache", ctx.shape);
            }
            self.cache.clear();
            self.last_shape = Some(ctx.shape);
        }

        let geometry = match ctx.render_mode() {
            RenderMode::Interactive if update != 0 => {
                let req = ctx
                    .request(points, ValueSource::Original)
                    .range(self.from, self.to);
                build(&req, K::KIND)
            }
            _ => self.baseline(ctx, points),
        };
        self.transition.set_target(geometry, now);
        self.transition.tick(now)
    }

    fn baseline(&mut self, ctx: &ChartContext, points: &[Point]) -> String {
        let req = ctx
            .request(points, ValueSource::Smoothed)
            .range(self.from, self.to);
        let fingerprint = fingerprint(&req, ctx, self.time_tolerance);
        self.cache.get_or_build(fingerprint, || build(&req, K::KIND))
    }
}

/// Cache key for a baseline request, or `None` when nothing is drawable.
fn fingerprint(req: &PathRequest<'_>, ctx: &ChartContext, tolerance: Option<i64>) -> Option<PathFingerprint> {
    let (from, to) = req.resolved_range()?;
    let first = req.points.get(from)?;
    let last = req.points.get(to)?;
    let fp = PathFingerprint::new(
        from,
        to,
        first.value_for(req.source)?,
        last.value_for(req.source)?,
        req.points.len(),
        &ctx.layout(),
    )?;
    Some(fp.with_times(first.timestamp, last.timestamp, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LineChart;
    use crate::cursor::CursorState;
    use crate::series::SmoothingMode;
    use std::time::Duration;

    fn chart(live: bool) -> LineChart {
        LineChart::builder()
            .size(100.0, 100.0)
            .gutter(0.0)
            .shape(CurveShape::Linear)
            .smoothing(SmoothingMode::PassThrough)
            .live(live)
            .transitions(false)
            .data(vec![
                Point::with_value(0, 1.0),
                Point::with_value(1_000, 2.0),
                Point::with_value(2_000, 3.0),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_baseline_frame_uses_cache() {
        let chart = chart(false);
        let mut path = chart.path_element();
        let ctx = chart.context(None, CursorState::inactive());
        let points = chart.series().get(None).unwrap();
        let now = Instant::now();

        let frame = path.frame(&ctx, points, 0, now);
        assert_eq!(frame.geometry, "M0,100L50,50L100,0");
        assert_eq!(path.cache().len(), 1);

        path.frame(&ctx, points, 0, now + Duration::from_millis(16));
        assert_eq!(path.cache().len(), 1);
    }

    #[test]
    fn test_area_frame() {
        let chart = chart(false);
        let mut area = chart.area_element();
        let ctx = chart.context(None, CursorState::inactive());
        let points = chart.series().get(None).unwrap();
        let frame = area.frame(&ctx, points, 0, Instant::now());
        assert_eq!(frame.geometry, "M0,100L50,50L100,0L100,100L0,100Z");
        assert_eq!(area.kind(), PathKind::Area);
    }

    #[test]
    fn test_interactive_frame_bypasses_cache() {
        let chart = chart(true);
        let mut path = chart.path_element();
        let ctx = chart.context(None, CursorState::active_at(20.0));
        let points = chart.series().get(None).unwrap();

        let frame = path.frame(&ctx, points, 3, Instant::now());
        assert_eq!(frame.geometry, "M0,100L50,50L100,0");
        assert!(path.cache().is_empty());

        // no live data yet: baseline
        path.frame(&ctx, points, 0, Instant::now());
        assert_eq!(path.cache().len(), 1);
    }

    #[test]
    fn test_shape_change_clears_cache() {
        let chart = chart(false);
        let mut path = chart.path_element();
        let mut ctx = chart.context(None, CursorState::inactive());
        let points = chart.series().get(None).unwrap();
        let now = Instant::now();

        path.frame(&ctx, points, 0, now);
        ctx.shape = CurveShape::Step;
        let frame = path.frame(&ctx, points, 0, now);
        assert_eq!(path.cache().len(), 1);
        assert_eq!(frame.geometry, "M0,100L25,100L25,50L50,50L75,50L75,0L100,0");
    }

    #[test]
    fn test_range_limits_drawn_slice() {
        let chart = chart(false);
        let mut path = chart.path_element().with_range(Some(1), None);
        let ctx = chart.context(None, CursorState::inactive());
        let points = chart.series().get(None).unwrap();
        let frame = path.frame(&ctx, points, 0, Instant::now());
        assert_eq!(frame.geometry, "M50,50L100,0");
    }
}
