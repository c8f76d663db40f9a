//! Transition controller: eased morphing between successive geometries.
//!
//! The host drives time. Call [`TransitionController::tick`] once per
//! rendered frame with the frame's timestamp; the controller samples the
//! current morph at that instant. Nothing here spawns timers.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::path::interpolate::{vertical_break, PathInterpolator, SegmentFilter};
use crate::path::ParsedPath;

/// Progress curve applied to linear elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    InOutQuad,
    InOutCubic,
    OutCubic,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Which geometry an element shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Cached, smoothed geometry.
    #[default]
    Baseline,
    /// Raw geometry rebuilt on every data update.
    Interactive,
}

impl RenderMode {
    /// Interactive only while the cursor is down on a live series.
    pub fn select(cursor_active: bool, live: bool) -> Self {
        if cursor_active && live {
            RenderMode::Interactive
        } else {
            RenderMode::Baseline
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    Idle,
    Morphing,
}

/// Timing and gating for transitions.
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    /// Morph length.
    pub duration: Duration,
    pub easing: Easing,
    /// When false every change snaps.
    pub enabled: bool,
    /// Delay after the cursor is released before morphing resumes.
    pub morph_reenable_delay: Duration,
    /// Segments matching this predicate snap instead of morphing.
    pub exclude: Option<SegmentFilter>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::InOutQuad,
            enabled: true,
            morph_reenable_delay: Duration::from_secs(1),
            exclude: Some(vertical_break),
        }
    }
}

/// What to draw this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFrame {
    pub geometry: String,
    pub parsed: ParsedPath,
    /// Eased progress of the running morph; `1.0` when idle or when the
    /// morph is suppressed.
    pub progress: f64,
}

impl PathFrame {
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

/// Holds the current and previous geometry of one element.
#[derive(Debug, Clone)]
pub struct TransitionController {
    config: TransitionConfig,
    current: String,
    current_parsed: ParsedPath,
    previous: String,
    interpolator: Option<PathInterpolator>,
    started_at: Option<Instant>,
    cursor_active: bool,
    morph_allowed: bool,
    reenable_at: Option<Instant>,
}

impl TransitionController {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            current: String::new(),
            current_parsed: ParsedPath::default(),
            previous: String::new(),
            interpolator: None,
            started_at: None,
            cursor_active: false,
            morph_allowed: true,
            reenable_at: None,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn is_morph_allowed(&self) -> bool {
        self.morph_allowed
    }

    /// Replace the target geometry. Returns `false` when unchanged.
    ///
    /// A change during a running morph restarts from the frame visible at
    /// `now`, so the shape never jumps.
    pub fn set_target(&mut self, geometry: String, now: Instant) -> bool {
        if geometry == self.current {
            return false;
        }
        let from = if self.phase(now) == TransitionPhase::Morphing {
            tracing::debug!("Restarting transition from in-progress frame");
            self.visible(now).0
        } else {
            std::mem::take(&mut self.current)
        };

        let interpolator = PathInterpolator::new(&from, &geometry, self.config.exclude);
        self.current_parsed = interpolator.sample(1.0).1;
        self.previous = from;
        self.current = geometry;
        self.interpolator = Some(interpolator);
        self.started_at = Some(now);
        true
    }

    /// Track cursor activity. Any change blocks morphing; releasing the
    /// cursor schedules it to resume after `morph_reenable_delay`.
    pub fn set_cursor_active(&mut self, active: bool, now: Instant) {
        if active == self.cursor_active {
            return;
        }
        self.cursor_active = active;
        self.morph_allowed = false;
        self.reenable_at = if active {
            None
        } else {
            Some(now + self.config.morph_reenable_delay)
        };
    }

    /// Raw (uneased) progress of the running morph.
    fn linear_progress(&self, now: Instant) -> f64 {
        let Some(start) = self.started_at else {
            return 1.0;
        };
        if self.config.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        (elapsed / self.config.duration.as_secs_f64()).min(1.0)
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        self.config.easing.apply(self.linear_progress(now))
    }

    pub fn phase(&self, now: Instant) -> TransitionPhase {
        if self.interpolator.is_some() && self.linear_progress(now) < 1.0 {
            TransitionPhase::Morphing
        } else {
            TransitionPhase::Idle
        }
    }

    fn morph_visible(&self) -> bool {
        self.config.enabled && self.morph_allowed && !self.cursor_active && !self.previous.is_empty()
    }

    fn visible(&self, now: Instant) -> (String, ParsedPath) {
        match &self.interpolator {
            Some(interp) if self.morph_visible() => interp.sample(self.progress(now)),
            _ => (self.current.clone(), self.current_parsed.clone()),
        }
    }

    /// Advance to `now` and return the frame to draw.
    pub fn tick(&mut self, now: Instant) -> PathFrame {
        if let Some(at) = self.reenable_at {
            if now >= at {
                self.morph_allowed = true;
                self.reenable_at = None;
            }
        }
        let progress = if self.morph_visible() {
            self.progress(now)
        } else {
            1.0
        };
        let (geometry, parsed) = self.visible(now);
        if self.phase(now) == TransitionPhase::Idle {
            self.interpolator = None;
            self.started_at = None;
        }
        PathFrame {
            geometry,
            parsed,
            progress,
        }
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "M0,10L10,10";
    const B: &str = "M0,0L10,0";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> TransitionController {
        TransitionController::new(TransitionConfig {
            duration: ms(1000),
            easing: Easing::Linear,
            ..TransitionConfig::default()
        })
    }

    #[test]
    fn test_easing_endpoints() {
        for e in [Easing::Linear, Easing::InOutQuad, Easing::InOutCubic, Easing::OutCubic] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
            assert_eq!(e.apply(2.0), 1.0);
        }
        assert_eq!(Easing::InOutQuad.apply(0.5), 0.5);
        assert_eq!(Easing::InOutQuad.apply(0.25), 0.125);
    }

    #[test]
    fn test_render_mode_select() {
        assert_eq!(RenderMode::select(true, true), RenderMode::Interactive);
        assert_eq!(RenderMode::select(true, false), RenderMode::Baseline);
        assert_eq!(RenderMode::select(false, true), RenderMode::Baseline);
    }

    #[test]
    fn test_first_geometry_snaps() {
        let mut c = controller();
        let t0 = Instant::now();
        assert!(c.set_target(A.to_string(), t0));
        assert_eq!(c.tick(t0).geometry, A);
    }

    #[test]
    fn test_morph_runs_over_duration() {
        let mut c = controller();
        let t0 = Instant::now();
        c.set_target(A.to_string(), t0);
        c.tick(t0);
        c.set_target(B.to_string(), t0);

        assert_eq!(c.phase(t0), TransitionPhase::Morphing);
        assert_eq!(c.tick(t0).geometry, A);
        assert_eq!(c.tick(t0 + ms(500)).geometry, "M0,5L10,5");
        let end = c.tick(t0 + ms(1000));
        assert_eq!(end.geometry, B);
        assert_eq!(end.progress, 1.0);
        assert_eq!(c.phase(t0 + ms(1000)), TransitionPhase::Idle);
    }

    #[test]
    fn test_unchanged_geometry_does_not_restart() {
        let mut c = controller();
        let t0 = Instant::now();
        c.set_target(A.to_string(), t0);
        assert!(!c.set_target(A.to_string(), t0 + ms(10)));
    }

    #[test]
    fn test_restart_from_in_progress_frame() {
        let mut c = controller();
        let t0 = Instant::now();
        c.set_target(A.to_string(), t0);
        c.tick(t0);
        c.set_target(B.to_string(), t0);
        c.set_target("M0,20L10,20".to_string(), t0 + ms(500));
        assert_eq!(c.previous(), "M0,5L10,5");
        assert_eq!(c.tick(t0 + ms(500)).geometry, "M0,5L10,5");
        assert_eq!(c.tick(t0 + ms(1500)).geometry, "M0,20L10,20");
    }

    #[test]
    fn test_cursor_blocks_morph_until_reenabled() {
        let mut c = controller();
        let t0 = Instant::now();
        c.set_target(A.to_string(), t0);
        c.tick(t0);

        c.set_cursor_active(true, t0);
        c.set_target(B.to_string(), t0);
        let blocked = c.tick(t0 + ms(100));
        assert_eq!(blocked.geometry, B);
        assert_eq!(blocked.progress, 1.0);

        c.set_cursor_active(false, t0 + ms(100));
        assert!(!c.is_morph_allowed());
        c.set_target(A.to_string(), t0 + ms(200));
        assert_eq!(c.tick(t0 + ms(250)).geometry, A);

        c.tick(t0 + ms(1200));
        assert!(c.is_morph_allowed());
        c.set_target(B.to_string(), t0 + ms(1200));
        assert_eq!(c.tick(t0 + ms(1700)).geometry, "M0,5L10,5");
    }

    #[test]
    fn test_disabled_transitions_snap() {
        let mut c = TransitionController::new(TransitionConfig {
            enabled: false,
            ..TransitionConfig::default()
        });
        let t0 = Instant::now();
        c.set_target(A.to_string(), t0);
        c.set_target(B.to_string(), t0 + ms(1));
        let frame = c.tick(t0 + ms(2));
        assert_eq!(frame.geometry, B);
        assert_eq!(frame.progress, 1.0);
    }
}
