//! Stamps, periods and per-layer key construction

use crate::error::{Error, Result};
use crate::store::{JSON_CONTENT_TYPE, PARQUET_CONTENT_TYPE};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// chrono format of a stamp
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// chrono format of a period
pub const PERIOD_FORMAT: &str = "%Y%m";

// ============================================================================
// Stamp
// ============================================================================

/// `YYYYMMDD_HHMMSS` string tying a bronze snapshot to its silver batch
///
/// Ordering is lexicographic, which for well-formed stamps is chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(String);

impl Stamp {
    /// Wrap a stamp parsed from a key
    ///
    /// Only rejects values that cannot be embedded in a key; legacy files
    /// with odd stamps are still diffed.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.contains('/') {
            return Err(Error::parse(format!("Invalid stamp: {value:?}")));
        }
        Ok(Self(value))
    }

    /// Stamp for a point in time
    pub fn at(time: NaiveDateTime) -> Self {
        Self(time.format(STAMP_FORMAT).to_string())
    }

    /// Stamp for the current local time
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Stamp text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Period
// ============================================================================

/// `YYYYMM` partition segment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(String);

impl Period {
    /// Parse and validate `YYYYMM`
    pub fn parse(value: &str) -> Result<Self> {
        let valid = value.len() == 6
            && value.bytes().all(|b| b.is_ascii_digit())
            && NaiveDate::parse_from_str(&format!("{value}01"), "%Y%m%d").is_ok();
        if !valid {
            return Err(Error::config(format!(
                "Invalid period {value:?}, expected YYYYMM"
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Period of a point in time
    pub fn of(time: NaiveDateTime) -> Self {
        Self(time.format(PERIOD_FORMAT).to_string())
    }

    /// Period of the current local time
    pub fn current() -> Self {
        Self::of(Local::now().naive_local())
    }

    /// Period text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Medallion layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Raw snapshots
    Bronze,
    /// Flattened batches
    Silver,
    /// Curated dataset
    Gold,
}

impl Layer {
    /// File name prefix preceding the stamp
    pub fn artifact_prefix(self) -> &'static str {
        match self {
            Self::Bronze => "monday_raw_",
            Self::Silver => "monday_items_",
            Self::Gold => "monday_gold_",
        }
    }

    /// File name suffix following the stamp
    pub fn extension(self) -> &'static str {
        match self {
            Self::Bronze => ".json",
            Self::Silver | Self::Gold => ".parquet",
        }
    }

    /// Content type of the layer's artifacts
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Bronze => JSON_CONTENT_TYPE,
            Self::Silver | Self::Gold => PARQUET_CONTENT_TYPE,
        }
    }

    /// Artifact file name for a stamp
    pub fn file_name(self, stamp: &Stamp) -> String {
        format!("{}{stamp}{}", self.artifact_prefix(), self.extension())
    }

    /// Stamp embedded in a key's last segment, if the name follows the
    /// layer's convention
    pub fn stamp_of(self, key: &str) -> Option<Stamp> {
        let name = key.rsplit('/').next().unwrap_or(key);
        let stamp = name
            .strip_prefix(self.artifact_prefix())?
            .strip_suffix(self.extension())?;
        Stamp::new(stamp).ok()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bronze => f.write_str("bronze"),
            Self::Silver => f.write_str("silver"),
            Self::Gold => f.write_str("gold"),
        }
    }
}

/// Where one layer lives: bucket plus logical prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerLocation {
    /// Layer stored here
    pub layer: Layer,
    /// Bucket name
    pub bucket: String,
    /// Logical prefix without surrounding slashes
    pub prefix: String,
}

impl LayerLocation {
    /// Create a location
    pub fn new(layer: Layer, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            layer,
            bucket: bucket.into(),
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Same bucket, one segment deeper
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let segment = segment.trim_matches('/');
        let prefix = if self.prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}/{segment}", self.prefix)
        };
        Self::new(self.layer, self.bucket.clone(), prefix)
    }

    /// `{prefix}/{period}/`
    pub fn period_prefix(&self, period: &Period) -> String {
        if self.prefix.is_empty() {
            format!("{period}/")
        } else {
            format!("{}/{period}/", self.prefix)
        }
    }

    /// `{prefix}/{period}/{artifact}`
    pub fn key(&self, period: &Period, stamp: &Stamp) -> String {
        format!("{}{}", self.period_prefix(period), self.layer.file_name(stamp))
    }
}
