//! Reading - one persisted sensor event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sensor measurement.
///
/// This is the storage layout (`{value, timestamp}`). The HTTP layout uses
/// sensor-specific field names and is produced by the ingestion codec.
/// Readings are immutable once persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor-specific measurement (distance, humidity fraction, ...)
    pub value: f64,

    /// When the reading was recorded
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// Requested page of readings (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Create a page request, replacing values below 1 with the defaults
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page >= 1 { page } else { Self::DEFAULT_PAGE },
            limit: if limit >= 1 { limit } else { Self::DEFAULT_LIMIT },
        }
    }

    /// Number of entries to skip: `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
