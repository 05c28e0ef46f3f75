//! # Config Loader
//!
//! Bridge routing file loading and parsing.
//!
//! Responsibilities:
//! - Parse JSON (primary) / TOML routing files
//! - Validate broker settings and topic → target bindings
//! - Produce a `BridgeConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("config.json")).unwrap();
//! println!("Broker: {}:{}", config.broker.host, config.broker.port);
//! ```

mod parser;
mod validator;

pub use contracts::BridgeConfig;
pub use parser::ConfigFormat;
pub use validator::collect_warnings;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.json / .toml).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<BridgeConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<BridgeConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize BridgeConfig to JSON string
    pub fn to_json(config: &BridgeConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LEGACY_JSON: &str = r#"{
        "broker": { "host": "mosquitto", "port": "1883" },
        "targets": [
            { "topic": "iot/rain", "addr": "rain:6969" },
            { "topic": "iot/door", "addr": "door:6970" }
        ]
    }"#;

    #[test]
    fn test_load_legacy_json() {
        let config = ConfigLoader::load_from_str(LEGACY_JSON, ConfigFormat::Json).unwrap();
        assert_eq!(config.broker.host, "mosquitto");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].topic, "iot/rain");
    }

    #[test]
    fn test_load_toml() {
        let content = r#"
client_id = "bridge-1"

[broker]
host = "localhost"
port = 1883

[[targets]]
topic = "iot/door"
addr = "127.0.0.1:6970"
"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        assert_eq!(config.client_id, "bridge-1");
        assert_eq!(config.targets[0].addr, "127.0.0.1:6970");
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(LEGACY_JSON, ConfigFormat::Json).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let again = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.targets, again.targets);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(LEGACY_JSON.as_bytes()).unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.targets.len(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ContractError::Io(_)));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"{
            "broker": { "host": "localhost", "port": 1883 },
            "targets": [
                { "topic": "iot/door", "addr": "a:1" },
                { "topic": "iot/door", "addr": "b:2" }
            ]
        }"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }
}
