//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Sensor Relay - MQTT to HTTP bridge and sensor ingestion services
#[derive(Parser, Debug)]
#[command(
    name = "sensor-relay",
    author,
    version,
    about = "MQTT to HTTP bridge and sensor ingestion services",
    long_about = "Relays sensor readings published on an MQTT broker to HTTP ingestion services.\n\n\
                  Each ingestion service stores readings in MongoDB, evaluates a threshold \n\
                  and, for the rain sensor, sends a notification when it starts raining."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENSOR_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SENSOR_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "SENSOR_RELAY_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MQTT to HTTP bridge
    Bridge(BridgeArgs),

    /// Run the door distance ingestion service
    Door(ServiceArgs),

    /// Run the rain ingestion service
    Rain(RainArgs),

    /// Validate a routing file without running
    Validate(ValidateArgs),
}

/// Arguments for the `bridge` command
#[derive(Parser, Debug, Clone)]
pub struct BridgeArgs {
    /// Path to the routing file (JSON or TOML)
    #[arg(
        short,
        long,
        default_value = "config.json",
        env = "SENSOR_RELAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Outbound HTTP timeout in milliseconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "SENSOR_RELAY_FORWARD_TIMEOUT_MS")]
    pub forward_timeout_ms: u64,
}

/// Arguments shared by the ingestion services
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// MongoDB host name
    #[arg(long, env = "MONGO_HOSTNAME")]
    pub mongo_hostname: String,

    /// Listen port (defaults to the sensor's well-known port)
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0", env = "BIND_ADDRESS")]
    pub bind: String,

    /// Override the alerting threshold
    #[arg(long, env = "THRESHOLD")]
    pub threshold: Option<f64>,
}

/// Arguments for the `rain` command
#[derive(Args, Debug, Clone)]
pub struct RainArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Webhook receiving the rain alert (alerts are only logged when unset)
    #[arg(long, env = "ALERT_WEBHOOK_URL")]
    pub alert_webhook_url: Option<String>,

    /// Webhook timeout in milliseconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "NOTIFY_TIMEOUT_MS")]
    pub notify_timeout_ms: u64,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the routing file to validate
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// `0` means "no timeout"
pub fn optional_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_millis() {
        assert_eq!(optional_millis(0), None);
        assert_eq!(optional_millis(250), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_rain_args() {
        let cli = Cli::try_parse_from([
            "sensor-relay",
            "-v",
            "rain",
            "--mongo-hostname",
            "db",
            "--alert-webhook-url",
            "http://hooks.local/x",
            "--threshold",
            "0.7",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Rain(args) => {
                assert_eq!(args.service.mongo_hostname, "db");
                assert_eq!(args.service.threshold, Some(0.7));
                assert_eq!(args.service.port, None);
                assert_eq!(args.alert_webhook_url.as_deref(), Some("http://hooks.local/x"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bridge_defaults() {
        let cli = Cli::try_parse_from(["sensor-relay", "bridge"]).unwrap();
        match cli.command {
            Commands::Bridge(args) => {
                assert_eq!(args.config, PathBuf::from("config.json"));
                assert_eq!(args.forward_timeout_ms, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
