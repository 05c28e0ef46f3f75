//! Sensor profile: wire field names and threshold predicate

/// Threshold predicate mapping a value to an alerting decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Alerting iff `value > limit`
    Above(f64),
    /// Alerting iff `value < limit`
    Below(f64),
}

impl Threshold {
    pub fn is_alerting(&self, value: f64) -> bool {
        match *self {
            Self::Above(limit) => value > limit,
            Self::Below(limit) => value < limit,
        }
    }

    /// Same direction, new limit
    pub fn with_limit(self, limit: f64) -> Self {
        match self {
            Self::Above(_) => Self::Above(limit),
            Self::Below(_) => Self::Below(limit),
        }
    }
}

/// Everything that differs between sensor types apart from alerting.
#[derive(Debug, Clone)]
pub struct SensorProfile {
    /// Sensor type name, also the store collection name
    pub name: String,
    /// JSON field holding the measurement on the wire
    pub value_field: String,
    /// JSON field holding the RFC 3339 timestamp on the wire
    pub timestamp_field: String,
    pub threshold: Threshold,
}

impl SensorProfile {
    pub const DEFAULT_TIMESTAMP_FIELD: &'static str = "entryDate";

    pub fn new(name: impl Into<String>, value_field: impl Into<String>, threshold: Threshold) -> Self {
        Self {
            name: name.into(),
            value_field: value_field.into(),
            timestamp_field: Self::DEFAULT_TIMESTAMP_FIELD.to_string(),
            threshold,
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    pub fn is_alerting(&self, value: f64) -> bool {
        self.threshold.is_alerting(value)
    }
}
