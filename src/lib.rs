//! # Lightcone Charts
//!
//! Line chart engine for Lightcone price charts: turns price/time series into
//! SVG path geometry, caches built paths and morphs between them over time.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: series, smoothing, scales and the Akima interpolator
//! 2. **Path engine**: curve shapes, builder, cache, parser and interpolator
//! 3. **Animation**: transition controller and animated elements
//! 4. **Chart**: `LineChart` config/builder, cursor and readouts
//!
//! Rendering, gesture handling and frame scheduling belong to the host. The
//! host calls [`element::Animated::frame`] once per rendered frame with that
//! frame's `Instant`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lightcone_charts::prelude::*;
//!
//! let chart = LineChart::builder()
//!     .size(320.0, 180.0)
//!     .data(points)
//!     .build()?;
//!
//! let mut line = chart.path_element();
//! let ctx = chart.context(None, CursorState::inactive());
//! let frame = line.frame(&ctx, chart.series().get(None).unwrap_or_default(), 0, Instant::now());
//! renderer.draw(&frame.geometry);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting.
pub mod shared;

/// Unified chart error types.
pub mod error;

/// Data points, series sets, smoothing and live state.
pub mod series;

/// Value domains and linear scales.
pub mod scale;

/// Akima interpolation for readouts.
pub mod akima;

// ── Layer 2: Path engine ─────────────────────────────────────────────────────

pub mod path;

// ── Layer 3: Animation ───────────────────────────────────────────────────────

pub mod transition;

/// Animated stroke and area elements.
pub mod element;

// ── Layer 4: Chart ───────────────────────────────────────────────────────────

pub mod chart;
pub mod cursor;
pub mod readout;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes + formatting
    pub use crate::shared::fmt::{format_datetime, format_price, DatetimeFormat};
    pub use crate::shared::SeriesId;

    // Series
    pub use crate::series::{LiveSeries, Point, SeriesSet, SmoothingMode, ValueSource};

    // Scales
    pub use crate::scale::{compute_y_domain, LinearScale, XDomain, YDomain, YRange};

    // Path engine
    pub use crate::path::{
        build_area, build_path, CurveShape, LayoutMeta, ParsedPath, PathCache, PathFingerprint,
        PathInterpolator, PathKind, PathRequest,
    };

    // Interpolation
    pub use crate::akima::{precalculate, AkimaCoefficients, AkimaSpline};

    // Animation
    pub use crate::element::{AnimatedArea, AnimatedPath};
    pub use crate::transition::{
        Easing, PathFrame, RenderMode, TransitionConfig, TransitionController, TransitionPhase,
    };

    // Chart
    pub use crate::chart::{ChartConfig, ChartContext, ChartDimensions, LineChart, LineChartBuilder};
    pub use crate::cursor::{crosshair_position, dot_position, CursorState};
    pub use crate::readout::{
        datetime_readout, datetime_spline, price_readout, price_spline, PriceReadoutOptions,
        Readout, ReadoutAxis,
    };

    // Errors
    pub use crate::error::{ChartError, InterpolationError};
}
