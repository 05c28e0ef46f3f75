//! Named metrics for the ingestion services and the bridge
//!
//! All functions go through the `metrics` facade; without an installed
//! recorder they are no-ops.

use metrics::{counter, histogram};

/// Reading persisted by an ingestion service
pub fn record_reading_stored(sensor: &str) {
    counter!(
        "sensor_relay_readings_stored_total",
        "sensor" => sensor.to_string()
    )
    .increment(1);
}

/// Store operation failed (`op` is `append` or `page`)
pub fn record_store_error(sensor: &str, op: &'static str) {
    counter!(
        "sensor_relay_store_errors_total",
        "sensor" => sensor.to_string(),
        "op" => op
    )
    .increment(1);
}

/// Threshold evaluated for one reading
pub fn record_decision(sensor: &str, alerting: bool) {
    counter!(
        "sensor_relay_decisions_total",
        "sensor" => sensor.to_string(),
        "alerting" => if alerting { "true" } else { "false" }
    )
    .increment(1);
}

/// Alert notification attempted on a rising edge
pub fn record_alert(sensor: &str, success: bool) {
    let status = if success { "sent" } else { "failed" };
    counter!(
        "sensor_relay_alerts_total",
        "sensor" => sensor.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Broker message forwarded (or failed to forward) to its target
pub fn record_message_forwarded(topic: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sensor_relay_messages_forwarded_total",
        "topic" => topic.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Forward round-trip time
pub fn record_forward_latency_ms(topic: &str, latency_ms: f64) {
    histogram!(
        "sensor_relay_forward_latency_ms",
        "topic" => topic.to_string()
    )
    .record(latency_ms);
}

/// Message discarded because the route queue was full
pub fn record_message_dropped(topic: &str) {
    counter!(
        "sensor_relay_messages_dropped_total",
        "topic" => topic.to_string()
    )
    .increment(1);
}

/// Message whose topic matched no route
pub fn record_message_unrouted() {
    counter!("sensor_relay_messages_unrouted_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    fn counter_value(name: &str, f: impl FnOnce()) -> u64 {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, _, _, _)| key.key().name() == name)
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(v) => v,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_alert_counter() {
        let total = counter_value("sensor_relay_alerts_total", || {
            record_alert("rain", true);
            record_alert("rain", false);
        });
        assert_eq!(total, 2);
    }

    #[test]
    fn test_forward_counters() {
        let total = counter_value("sensor_relay_messages_forwarded_total", || {
            record_message_forwarded("iot/door", true);
            record_message_forwarded("iot/door", true);
            record_message_dropped("iot/door");
        });
        assert_eq!(total, 2);
    }

    #[test]
    fn test_no_recorder_is_noop() {
        record_reading_stored("door");
        record_message_unrouted();
    }
}
