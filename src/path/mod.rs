//! Path engine: build, cache, parse and morph chart geometry.
//!
//! ```text
//! series slice ──build──► geometry string ──parse──► ParsedPath
//!                 │                                      │
//!             PathCache                           PathInterpolator
//! ```

pub mod builder;
pub mod cache;
pub mod curve;
pub mod interpolate;
pub mod parse;
pub mod svg;

pub use builder::{build, build_area, build_path, PathKind, PathRequest};
pub use cache::{LayoutMeta, PathCache, PathFingerprint, DEFAULT_CACHE_CAPACITY};
pub use curve::CurveShape;
pub use interpolate::{vertical_break, PathInterpolator, SegmentFilter};
pub use parse::{Curve, ParsedPath, Segment, Vec2};
pub use svg::PathWriter;
