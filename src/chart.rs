//! Line chart: configuration, builder and the per-frame context.
//!
//! A [`LineChart`] owns its configuration and series. Each frame the host
//! asks it for a [`ChartContext`] (dimensions, domains, cursor) and hands that
//! context to elements and readouts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cursor::CursorState;
use crate::element::{AnimatedArea, AnimatedPath};
use crate::error::ChartError;
use crate::path::{CurveShape, LayoutMeta, PathRequest, DEFAULT_CACHE_CAPACITY};
use crate::readout::ReadoutAxis;
use crate::scale::{compute_y_domain, path_width, LinearScale, XDomain, YDomain, YRange};
use crate::series::smoothing::MAX_RADIUS;
use crate::series::{Point, SeriesSet, SmoothingMode, ValueSource};
use crate::shared::SeriesId;
use crate::transition::{Easing, RenderMode, TransitionConfig};

/// Default vertical padding above and below the line, in pixels.
pub const DEFAULT_GUTTER: f64 = 16.0;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Vertical padding kept free above the max and below the min.
    pub gutter: f64,
    pub shape: CurveShape,
    /// The series receives streaming updates.
    pub is_live: bool,
    pub y_range: YRange,
    /// Time-scaled x axis bounds. `None` spaces points by index.
    pub x_domain: Option<XDomain>,
    /// Total x slots the provider expects; the path fills `len / x_length`
    /// of the width while the chart is partially filled.
    pub x_length: Option<usize>,
    /// Entries per element cache.
    pub cache_capacity: usize,
    /// Allowed endpoint-time drift for cache hits.
    pub time_tolerance_ms: i64,
    pub animation_duration_ms: u64,
    pub easing: Easing,
    /// Delay after the cursor is released before morphing resumes.
    pub morph_reenable_delay_ms: u64,
    pub transitions: bool,
    pub smoothing: SmoothingMode,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            gutter: DEFAULT_GUTTER,
            shape: CurveShape::BumpX,
            is_live: false,
            y_range: YRange::default(),
            x_domain: None,
            x_length: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            time_tolerance_ms: 0,
            animation_duration_ms: 300,
            easing: Easing::InOutQuad,
            morph_reenable_delay_ms: 1_000,
            transitions: true,
            smoothing: SmoothingMode::default(),
        }
    }
}

impl ChartConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn transition_config(&self) -> TransitionConfig {
        TransitionConfig {
            duration: Duration::from_millis(self.animation_duration_ms),
            easing: self.easing,
            enabled: self.transitions,
            morph_reenable_delay: Duration::from_millis(self.morph_reenable_delay_ms),
            ..TransitionConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ChartError::Validation(format!(
                "width must be a positive number, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ChartError::Validation(format!(
                "height must be a positive number, got {}",
                self.height
            )));
        }
        if !(self.gutter.is_finite() && self.gutter >= 0.0 && self.gutter * 2.0 < self.height) {
            return Err(ChartError::Validation(format!(
                "gutter {} does not fit a height of {}",
                self.gutter, self.height
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ChartError::Validation("cache capacity must be at least 1".to_string()));
        }
        if self.time_tolerance_ms < 0 {
            return Err(ChartError::Validation(format!(
                "time tolerance must not be negative, got {}ms",
                self.time_tolerance_ms
            )));
        }
        if let Some(0) = self.x_length {
            return Err(ChartError::Validation("x length must be at least 1".to_string()));
        }
        if let Some((a, b)) = self.x_domain {
            if !(a.is_finite() && b.is_finite()) {
                return Err(ChartError::Validation("x domain must be finite".to_string()));
            }
        }
        if let SmoothingMode::Kernel { radius } = self.smoothing {
            if !(radius.is_finite() && radius > 0.0 && radius <= MAX_RADIUS) {
                return Err(ChartError::Validation(format!(
                    "smoothing radius must be in (0, {}], got {}",
                    MAX_RADIUS, radius
                )));
            }
        }
        Ok(())
    }
}

// ─── Dimensions / context ────────────────────────────────────────────────────

/// Pixel dimensions derived from the config and the series length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub gutter: f64,
    /// Width the path spans.
    pub path_width: f64,
    /// Distance between two neighbouring points.
    pub point_width: f64,
}

impl ChartDimensions {
    pub fn new(config: &ChartConfig, data_len: usize) -> Self {
        let point_width = if data_len > 1 {
            config.width / (data_len - 1) as f64
        } else {
            config.width
        };
        Self {
            width: config.width,
            height: config.height,
            gutter: config.gutter,
            path_width: path_width(config.width, data_len, config.x_length),
            point_width,
        }
    }
}

/// Everything a frame needs besides the points themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartContext {
    pub dimensions: ChartDimensions,
    pub y_domain: YDomain,
    pub x_domain: Option<XDomain>,
    pub shape: CurveShape,
    pub is_live: bool,
    pub cursor: CursorState,
}

impl ChartContext {
    pub fn layout(&self) -> LayoutMeta {
        LayoutMeta {
            path_width: self.dimensions.path_width,
            height: self.dimensions.height,
            gutter: self.dimensions.gutter,
            y_domain: self.y_domain,
            x_domain: self.x_domain,
        }
    }

    /// Path request for `points` with this context's layout.
    pub fn request<'a>(&self, points: &'a [Point], source: ValueSource) -> PathRequest<'a> {
        PathRequest::new(
            points,
            self.dimensions.path_width,
            self.dimensions.height,
            self.y_domain,
        )
        .gutter(self.dimensions.gutter)
        .shape(self.shape)
        .x_domain(self.x_domain)
        .source(source)
    }

    /// Pixel y of a horizontal line at `value`.
    pub fn y_for_value(&self, value: f64) -> Option<f64> {
        let y = LinearScale::y(self.y_domain, self.dimensions.height, self.dimensions.gutter)
            .apply(value);
        y.is_finite().then_some(y)
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::select(self.cursor.is_active, self.is_live)
    }

    pub fn readout_axis(&self) -> ReadoutAxis {
        ReadoutAxis {
            width: self.dimensions.path_width,
            x_domain: self.x_domain,
        }
    }
}

/// Per-chart gradient id allocator.
#[derive(Debug, Clone)]
pub struct GradientIds {
    prefix: String,
    issued: u64,
}

impl GradientIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: 0,
        }
    }

    pub fn allocate(&mut self) -> String {
        self.issued += 1;
        format!("{}-{}", self.prefix, self.issued)
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for GradientIds {
    fn default() -> Self {
        Self::new("line-chart-gradient")
    }
}

// ─── LineChart ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LineChart {
    config: ChartConfig,
    series: SeriesSet,
    gradient_ids: GradientIds,
}

impl LineChart {
    pub fn builder() -> LineChartBuilder {
        LineChartBuilder::default()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    /// Replace every series, running the configured smoothing pass.
    pub fn set_series(&mut self, series: impl Into<SeriesSet>) {
        let mut series = series.into();
        for points in series.values_mut() {
            self.config.smoothing.apply(points);
        }
        self.series = series;
    }

    /// Insert or replace one series.
    pub fn insert_series(&mut self, id: impl Into<SeriesId>, mut points: Vec<Point>) {
        self.config.smoothing.apply(&mut points);
        self.series.insert(id, points);
    }

    /// Resize, e.g. after a layout pass.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), ChartError> {
        let mut next = self.config.clone();
        next.width = width;
        next.height = height;
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// Value domain across every series, with the configured overrides.
    pub fn y_domain(&self) -> YDomain {
        compute_y_domain(self.series.slices(), self.config.y_range)
    }

    pub fn dimensions(&self, id: Option<&SeriesId>) -> ChartDimensions {
        let len = self.series.get(id).map_or(0, |points| points.len());
        ChartDimensions::new(&self.config, len)
    }

    /// Frame context for the series `id` (`None` → default series).
    pub fn context(&self, id: Option<&SeriesId>, cursor: CursorState) -> ChartContext {
        ChartContext {
            dimensions: self.dimensions(id),
            y_domain: self.y_domain(),
            x_domain: self.config.x_domain,
            shape: self.config.shape,
            is_live: self.config.is_live,
            cursor,
        }
    }

    pub fn path_element(&self) -> AnimatedPath {
        AnimatedPath::new(&self.config)
    }

    pub fn area_element(&self) -> AnimatedArea {
        AnimatedArea::new(&self.config)
    }

    /// Fresh gradient id for an area fill.
    pub fn gradient_id(&mut self) -> String {
        self.gradient_ids.allocate()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LineChartBuilder {
    config: ChartConfig,
    series: SeriesSet,
    gradient_prefix: Option<String>,
}

impl LineChartBuilder {
    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn gutter(mut self, gutter: f64) -> Self {
        self.config.gutter = gutter;
        self
    }

    pub fn shape(mut self, shape: CurveShape) -> Self {
        self.config.shape = shape;
        self
    }

    pub fn live(mut self, is_live: bool) -> Self {
        self.config.is_live = is_live;
        self
    }

    pub fn y_range(mut self, range: YRange) -> Self {
        self.config.y_range = range;
        self
    }

    pub fn x_domain(mut self, domain: XDomain) -> Self {
        self.config.x_domain = Some(domain);
        self
    }

    pub fn x_length(mut self, len: usize) -> Self {
        self.config.x_length = Some(len);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn time_tolerance(mut self, tolerance: Duration) -> Self {
        self.config.time_tolerance_ms = i64::try_from(tolerance.as_millis()).unwrap_or(i64::MAX);
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.config.animation_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.config.easing = easing;
        self
    }

    pub fn morph_reenable_delay(mut self, delay: Duration) -> Self {
        self.config.morph_reenable_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn transitions(mut self, enabled: bool) -> Self {
        self.config.transitions = enabled;
        self
    }

    pub fn smoothing(mut self, mode: SmoothingMode) -> Self {
        self.config.smoothing = mode;
        self
    }

    /// Data for the default series.
    pub fn data(mut self, points: Vec<Point>) -> Self {
        self.series.insert(SeriesId::default(), points);
        self
    }

    pub fn series(mut self, id: impl Into<SeriesId>, points: Vec<Point>) -> Self {
        self.series.insert(id, points);
        self
    }

    pub fn gradient_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.gradient_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> Result<LineChart, ChartError> {
        self.config.validate()?;
        let gradient_ids = self
            .gradient_prefix
            .map(GradientIds::new)
            .unwrap_or_default();
        let mut chart = LineChart {
            config: self.config,
            series: SeriesSet::new(),
            gradient_ids,
        };
        chart.set_series(self.series);
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Point::with_value(i as i64 * 1_000, *v))
            .collect()
    }

    #[test]
    fn test_config_defaults() {
        let c = ChartConfig::default();
        assert_eq!(c.gutter, 16.0);
        assert_eq!(c.shape, CurveShape::BumpX);
        assert_eq!(c.cache_capacity, 20);
        assert_eq!(c.time_tolerance_ms, 0);
        let t = c.transition_config();
        assert_eq!(t.duration, Duration::from_millis(300));
        assert_eq!(t.morph_reenable_delay, Duration::from_secs(1));
        assert_eq!(t.easing, Easing::InOutQuad);
        assert!(t.enabled);
    }

    #[test]
    fn test_config_deserializes_partial_json() {
        let c: ChartConfig =
            serde_json::from_str(r#"{"width":300,"height":200,"shape":"linear","isLive":true}"#).unwrap();
        assert_eq!(c.width, 300.0);
        assert_eq!(c.shape, CurveShape::Linear);
        assert!(c.is_live);
        assert_eq!(c.gutter, 16.0);

        assert!(matches!(ChartConfig::from_json("{"), Err(ChartError::Serde(_))));
        assert!(matches!(
            ChartConfig::from_json(r#"{"width":300}"#),
            Err(ChartError::Validation(_))
        ));
    }

    #[test]
    fn test_builder_validates() {
        assert!(matches!(
            LineChart::builder().build(),
            Err(ChartError::Validation(_))
        ));
        assert!(LineChart::builder().size(100.0, 20.0).build().is_err());
        assert!(LineChart::builder().size(100.0, 100.0).cache_capacity(0).build().is_err());
        assert!(LineChart::builder().size(100.0, 100.0).build().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_smoothing_radius() {
        let json = r#"{"width":100,"height":100,"smoothing":{"mode":"kernel","radius":1e20}}"#;
        assert!(matches!(ChartConfig::from_json(json), Err(ChartError::Validation(_))));
        for radius in [0.0, -1.0, f64::NAN] {
            let built = LineChart::builder()
                .size(100.0, 100.0)
                .smoothing(SmoothingMode::Kernel { radius })
                .build();
            assert!(built.is_err(), "radius {}", radius);
        }
        let ok = LineChart::builder()
            .size(100.0, 100.0)
            .smoothing(SmoothingMode::Kernel { radius: 3.0 })
            .data(vec![Point::with_value(0, 1.0), Point::with_value(1, 2.0)])
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_builder_smooths_series() {
        let chart = LineChart::builder()
            .size(100.0, 100.0)
            .smoothing(SmoothingMode::PassThrough)
            .data(points(&[1.0, 2.0, 3.0]))
            .build()
            .unwrap();
        let pts = chart.series().get(None).unwrap();
        assert!(pts.iter().all(|p| p.smoothed_value == p.value));
    }

    #[test]
    fn test_context_and_dimensions() {
        let chart = LineChart::builder()
            .size(300.0, 100.0)
            .gutter(10.0)
            .x_length(6)
            .data(points(&[1.0, 2.0, 3.0]))
            .build()
            .unwrap();
        let ctx = chart.context(None, CursorState::inactive());
        assert_eq!(ctx.dimensions.path_width, 150.0);
        assert_eq!(ctx.dimensions.point_width, 150.0);
        assert_eq!(ctx.y_domain, YDomain::new(1.0, 3.0));
        assert_eq!(ctx.y_for_value(3.0), Some(10.0));
        assert_eq!(ctx.y_for_value(1.0), Some(90.0));
        assert_eq!(ctx.render_mode(), RenderMode::Baseline);
    }

    #[test]
    fn test_render_mode_follows_cursor_on_live_chart() {
        let chart = LineChart::builder()
            .size(100.0, 100.0)
            .live(true)
            .data(points(&[1.0, 2.0]))
            .build()
            .unwrap();
        let ctx = chart.context(None, CursorState::active_at(10.0));
        assert_eq!(ctx.render_mode(), RenderMode::Interactive);
    }

    #[test]
    fn test_gradient_ids_are_per_chart() {
        let mut a = LineChart::builder().size(100.0, 100.0).build().unwrap();
        let mut b = LineChart::builder().size(100.0, 100.0).build().unwrap();
        assert_eq!(a.gradient_id(), "line-chart-gradient-1");
        assert_eq!(a.gradient_id(), "line-chart-gradient-2");
        assert_eq!(b.gradient_id(), "line-chart-gradient-1");
    }

    #[test]
    fn test_resize_rejects_bad_dimensions() {
        let mut chart = LineChart::builder().size(100.0, 100.0).build().unwrap();
        assert!(chart.resize(-1.0, 100.0).is_err());
        assert_eq!(chart.config().width, 100.0);
        chart.resize(200.0, 50.0).unwrap();
        assert_eq!(chart.config().height, 50.0);
    }
}
