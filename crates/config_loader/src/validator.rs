//! Routing file validation
//!
//! Rules:
//! - declarative field rules (`#[validate]` on the contract types)
//! - topic filters are syntactically valid MQTT filters
//! - each topic appears once
//! - addr is a bare `host:port` (no scheme)

use std::collections::{HashMap, HashSet};

use ::validator::Validate;
use contracts::{BridgeConfig, ContractError};
use rumqttc::mqttbytes::{matches, valid_filter};

/// Validate a BridgeConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &BridgeConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("bridge", e.to_string()))?;
    validate_topic_filters(config)?;
    validate_unique_topics(config)?;
    validate_target_addrs(config)?;
    Ok(())
}

fn validate_topic_filters(config: &BridgeConfig) -> Result<(), ContractError> {
    for (idx, route) in config.targets.iter().enumerate() {
        if !valid_filter(&route.topic) {
            return Err(ContractError::config_validation(
                format!("targets[{idx}].topic"),
                format!("invalid topic filter '{}'", route.topic),
            ));
        }
    }
    Ok(())
}

fn validate_unique_topics(config: &BridgeConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, route) in config.targets.iter().enumerate() {
        if !seen.insert(route.topic.as_str()) {
            return Err(ContractError::config_validation(
                format!("targets[{idx}].topic"),
                format!("duplicate topic '{}'", route.topic),
            ));
        }
    }
    Ok(())
}

fn validate_target_addrs(config: &BridgeConfig) -> Result<(), ContractError> {
    for (idx, route) in config.targets.iter().enumerate() {
        let field = format!("targets[{idx}].addr");

        if route.addr.contains("://") {
            return Err(ContractError::config_validation(
                field,
                format!("addr '{}' must be a bare host:port, without scheme", route.addr),
            ));
        }

        let port_ok = route
            .addr
            .rsplit_once(':')
            .filter(|(host, _)| !host.is_empty())
            .and_then(|(_, port)| port.parse::<u16>().ok())
            .is_some();
        if !port_ok {
            return Err(ContractError::config_validation(
                field,
                format!("addr '{}' must be host:port", route.addr),
            ));
        }
    }
    Ok(())
}

/// Collect non-fatal issues with a valid configuration
pub fn collect_warnings(config: &BridgeConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut by_addr: HashMap<&str, Vec<&str>> = HashMap::new();
    for route in &config.targets {
        by_addr
            .entry(route.addr.as_str())
            .or_default()
            .push(route.topic.as_str());
    }
    let mut shared: Vec<_> = by_addr.into_iter().filter(|(_, t)| t.len() > 1).collect();
    shared.sort();
    for (addr, topics) in shared {
        warnings.push(format!("addr '{addr}' receives several topics: {topics:?}"));
    }

    // A later literal topic that an earlier wildcard already matches never gets traffic
    for (idx, route) in config.targets.iter().enumerate() {
        if let Some(earlier) = config.targets[..idx]
            .iter()
            .find(|e| matches(&route.topic, &e.topic))
        {
            warnings.push(format!(
                "topic '{}' is shadowed by earlier filter '{}'",
                route.topic, earlier.topic
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{BrokerConfig, Route};

    fn minimal_config() -> BridgeConfig {
        BridgeConfig {
            broker: BrokerConfig {
                host: "localhost".into(),
                port: 1883,
            },
            targets: vec![
                Route::new("iot/door", "door:6970"),
                Route::new("iot/rain", "rain:6969"),
            ],
            client_id: "mqtt-redirect".into(),
            queue_capacity: 64,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_empty_host() {
        let mut config = minimal_config();
        config.broker.host = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("broker host cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_port() {
        let mut config = minimal_config();
        config.broker.port = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("port"), "got: {err}");
    }

    #[test]
    fn test_no_targets() {
        let mut config = minimal_config();
        config.targets.clear();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("at least one target"), "got: {err}");
    }

    #[test]
    fn test_empty_topic() {
        let mut config = minimal_config();
        config.targets[0].topic = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_topic() {
        let mut config = minimal_config();
        config.targets[1].topic = "iot/door".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate topic"), "got: {err}");
    }

    #[test]
    fn test_bad_filter() {
        for bad in ["iot/#/door", "iot/do+r", "iot/door#"] {
            let mut config = minimal_config();
            config.targets[0].topic = bad.into();
            let err = validate(&config).unwrap_err().to_string();
            assert!(err.contains("invalid topic filter"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_wildcard_filters_accepted() {
        let mut config = minimal_config();
        config.targets[0].topic = "iot/+/door".into();
        config.targets[1].topic = "home/#".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_addr_with_scheme() {
        let mut config = minimal_config();
        config.targets[0].addr = "http://door:6970".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("without scheme"), "got: {err}");
    }

    #[test]
    fn test_addr_without_port() {
        let mut config = minimal_config();
        config.targets[0].addr = "door".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("host:port"), "got: {err}");
    }

    #[test]
    fn test_warnings() {
        let mut config = minimal_config();
        assert!(collect_warnings(&config).is_empty());

        config.targets = vec![
            Route::new("iot/+", "door:6970"),
            Route::new("iot/door", "door:6970"),
        ];
        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("several topics"));
        assert!(warnings[1].contains("shadowed"));
    }
}
