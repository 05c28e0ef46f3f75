//! Layered error definitions
//!
//! Categorized by source: config / broker / store / notify

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Store Errors =====
    /// Store connection error
    #[error("store '{collection}' connection error: {message}")]
    StoreConnection { collection: String, message: String },

    /// Store append failed
    #[error("store '{collection}' write error: {message}")]
    StoreWrite { collection: String, message: String },

    /// Store page read failed
    #[error("store '{collection}' read error: {message}")]
    StoreRead { collection: String, message: String },

    // ===== Notification Errors =====
    /// Notification delivery failed
    #[error("notifier '{notifier}' delivery error: {message}")]
    NotifyDelivery { notifier: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create store write error
    pub fn store_write(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create store read error
    pub fn store_read(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Create notification delivery error
    pub fn notify_delivery(notifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotifyDelivery {
            notifier: notifier.into(),
            message: message.into(),
        }
    }
}
