//! Translation between the sensor wire layout and [`Reading`]

use chrono::{DateTime, SecondsFormat, Utc};
use contracts::Reading;
use serde_json::{Map, Value};

use crate::error::{IngestionError, Result};
use crate::profile::SensorProfile;

/// Decode a POST body into a reading.
///
/// A missing or null value field decodes as `0.0`; any other non-number is
/// rejected. The timestamp field is optional and falls back to
/// `received_at`. Extra fields are ignored.
pub fn decode_reading(
    profile: &SensorProfile,
    body: &[u8],
    received_at: DateTime<Utc>,
) -> Result<Reading> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| IngestionError::bad_request(format!("invalid JSON body: {e}")))?;
    let Value::Object(fields) = parsed else {
        return Err(IngestionError::bad_request("body must be a JSON object"));
    };

    let value = match fields.get(&profile.value_field) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            IngestionError::bad_request(format!("'{}' is out of range", profile.value_field))
        })?,
        None | Some(Value::Null) => 0.0,
        Some(_) => {
            return Err(IngestionError::bad_request(format!(
                "'{}' must be a number",
                profile.value_field
            )));
        }
    };

    let timestamp = match fields.get(&profile.timestamp_field) {
        None | Some(Value::Null) => received_at,
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| {
                IngestionError::bad_request(format!(
                    "'{}' is not an RFC 3339 timestamp: {e}",
                    profile.timestamp_field
                ))
            })?
            .with_timezone(&Utc),
        Some(_) => {
            return Err(IngestionError::bad_request(format!(
                "'{}' must be a string",
                profile.timestamp_field
            )));
        }
    };

    Ok(Reading::new(value, timestamp))
}

/// Encode one reading in the sensor wire layout
pub fn encode_reading(profile: &SensorProfile, reading: &Reading) -> Value {
    let mut fields = Map::with_capacity(2);
    fields.insert(profile.value_field.clone(), Value::from(reading.value));
    fields.insert(
        profile.timestamp_field.clone(),
        Value::String(reading.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(fields)
}

/// Encode a page of readings as a JSON array
pub fn encode_readings(profile: &SensorProfile, readings: &[Reading]) -> Value {
    Value::Array(readings.iter().map(|r| encode_reading(profile, r)).collect())
}
