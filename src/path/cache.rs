//! Path cache: bounded FIFO memo table of built geometries.
//!
//! Keys are [`PathFingerprint`]s: the slice indices, its endpoint values
//! rounded to two decimals, optional endpoint timestamps and the layout the
//! path was built against. One cache per visual element; never shared.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::scale::{XDomain, YDomain};

/// Default number of entries kept per element.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Layout a geometry was built against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMeta {
    pub path_width: f64,
    pub height: f64,
    pub gutter: f64,
    pub y_domain: YDomain,
    pub x_domain: Option<XDomain>,
}

impl LayoutMeta {
    /// Canonical string form used inside fingerprints.
    pub fn canonical(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("Failed to serialize layout metadata: {}", e);
                None
            }
        }
    }
}

/// Semantic identity of a built path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFingerprint {
    pub from: usize,
    pub to: usize,
    pub from_value: Decimal,
    pub to_value: Decimal,
    pub from_time: Option<i64>,
    pub to_time: Option<i64>,
    /// Allowed endpoint-time drift in milliseconds.
    pub time_tolerance: Option<i64>,
    pub total_length: usize,
    pub layout: String,
}

/// Round to two decimals, half away from zero. `None` for non-finite input.
pub fn round_value(v: f64) -> Option<Decimal> {
    if !v.is_finite() {
        return None;
    }
    Decimal::from_f64(v).map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

impl PathFingerprint {
    /// `None` when an endpoint value is not a finite number: such paths are
    /// never looked up or stored.
    pub fn new(
        from: usize,
        to: usize,
        from_value: f64,
        to_value: f64,
        total_length: usize,
        layout: &LayoutMeta,
    ) -> Option<Self> {
        Some(Self {
            from,
            to,
            from_value: round_value(from_value)?,
            to_value: round_value(to_value)?,
            from_time: None,
            to_time: None,
            time_tolerance: None,
            total_length,
            layout: layout.canonical()?,
        })
    }

    pub fn with_times(mut self, from_time: i64, to_time: i64, tolerance: Option<i64>) -> Self {
        self.from_time = Some(from_time);
        self.to_time = Some(to_time);
        self.time_tolerance = tolerance;
        self
    }

    /// Exact match on indices, rounded values, length and layout. Endpoint
    /// times are compared only when both sides carry them, within the larger
    /// of the two tolerances (exact when neither has one).
    pub fn matches(&self, other: &PathFingerprint) -> bool {
        if self.from != other.from
            || self.to != other.to
            || self.total_length != other.total_length
            || self.from_value != other.from_value
            || self.to_value != other.to_value
            || self.layout != other.layout
        {
            return false;
        }
        match (self.from_time, self.to_time, other.from_time, other.to_time) {
            (Some(af), Some(at), Some(bf), Some(bt)) => {
                let tol = self
                    .time_tolerance
                    .unwrap_or(0)
                    .max(other.time_tolerance.unwrap_or(0))
                    .max(0);
                (af - bf).abs() <= tol && (at - bt).abs() <= tol
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: PathFingerprint,
    geometry: String,
}

/// Bounded FIFO cache of geometry strings.
#[derive(Debug, Clone)]
pub struct PathCache {
    entries: VecDeque<CacheEntry>,
    capacity: usize,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PathCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY) + 1),
            capacity,
        }
    }

    pub fn find(&self, fingerprint: &PathFingerprint) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.fingerprint.matches(fingerprint))
            .map(|e| e.geometry.as_str())
    }

    /// Store a geometry. Returns `false` when a matching entry already exists.
    pub fn add(&mut self, fingerprint: PathFingerprint, geometry: String) -> bool {
        if self.find(&fingerprint).is_some() {
            return false;
        }
        self.entries.push_back(CacheEntry {
            fingerprint,
            geometry,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    /// Find, or build and store. A `None` fingerprint bypasses the cache.
    pub fn get_or_build<F>(&mut self, fingerprint: Option<PathFingerprint>, build: F) -> String
    where
        F: FnOnce() -> String,
    {
        let Some(fingerprint) = fingerprint else {
            return build();
        };
        if let Some(hit) = self.find(&fingerprint) {
            tracing::debug!("Path cache hit ({}..={})", fingerprint.from, fingerprint.to);
            return hit.to_string();
        }
        tracing::debug!("Path cache miss ({}..={})", fingerprint.from, fingerprint.to);
        let geometry = build();
        self.add(fingerprint, geometry.clone());
        geometry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
