//! Shared newtypes and utilities used across all chart modules.
//!
//! These types are serialization-transparent: they serialize/deserialize as the
//! raw value the data provider hands over, so provider payloads can be used
//! directly without conversion.

pub mod fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Id used when a chart is fed a single series instead of a named dictionary.
pub const DEFAULT_SERIES_ID: &str = "__LineChartData";

// ─── SeriesId ────────────────────────────────────────────────────────────────

/// Newtype for series identifiers inside a [`SeriesSet`](crate::series::SeriesSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_SERIES_ID
    }
}

impl Default for SeriesId {
    fn default() -> Self {
        Self(DEFAULT_SERIES_ID.to_string())
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for SeriesId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SeriesId(s.to_string()))
    }
}

impl Serialize for SeriesId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SeriesId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SeriesId(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_id_default() {
        let id = SeriesId::default();
        assert!(id.is_default());
        assert_eq!(id.as_str(), DEFAULT_SERIES_ID);
    }

    #[test]
    fn test_series_id_serde() {
        let id = SeriesId::from("btc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"btc\"");
        let back: SeriesId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
