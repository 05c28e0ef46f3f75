//! Generic ingestion service: persist, evaluate, alert

use chrono::Utc;
use contracts::{DocumentStore, PageRequest, Reading};
use observability::{record_alert, record_decision, record_reading_stored, record_store_error};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::alert::{AlertOutcome, AlertStrategy};
use crate::codec::{decode_reading, encode_readings};
use crate::error::{IngestionError, Result};
use crate::profile::SensorProfile;

/// One sensor type's ingestion pipeline over a store and an alert strategy
pub struct IngestionService<S, A> {
    profile: SensorProfile,
    store: S,
    alert: A,
}

impl<S, A> IngestionService<S, A>
where
    S: DocumentStore + Sync,
    A: AlertStrategy + Sync,
{
    pub fn new(profile: SensorProfile, store: S, alert: A) -> Self {
        Self {
            profile,
            store,
            alert,
        }
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn alert(&self) -> &A {
        &self.alert
    }

    /// One page of stored readings, in store order
    #[instrument(name = "list_readings", skip(self), fields(sensor = %self.profile.name))]
    pub async fn list(&self, page: PageRequest) -> Result<Vec<Reading>> {
        self.store.page(page).await.map_err(|e| {
            record_store_error(&self.profile.name, "page");
            IngestionError::Store(e)
        })
    }

    /// One page of readings in the sensor wire layout
    pub async fn list_wire(&self, page: PageRequest) -> Result<Value> {
        let readings = self.list(page).await?;
        Ok(encode_readings(&self.profile, &readings))
    }

    /// Decode, persist and evaluate one reading. Returns the alerting decision.
    ///
    /// The reading is persisted before the alert strategy runs, so a failed
    /// notification still leaves it stored.
    #[instrument(name = "ingest_reading", skip(self, body), fields(sensor = %self.profile.name, bytes = body.len()))]
    pub async fn ingest(&self, body: &[u8]) -> Result<bool> {
        let reading = decode_reading(&self.profile, body, Utc::now())?;

        if let Err(e) = self.store.append(&reading).await {
            record_store_error(&self.profile.name, "append");
            return Err(IngestionError::Store(e));
        }
        record_reading_stored(&self.profile.name);

        let alerting = self.profile.is_alerting(reading.value);
        record_decision(&self.profile.name, alerting);
        debug!(value = reading.value, alerting, "Reading evaluated");

        match self.alert.on_decision(alerting).await {
            Ok(AlertOutcome::Notified) => record_alert(&self.profile.name, true),
            Ok(AlertOutcome::Silent) => {}
            Err(e) => {
                record_alert(&self.profile.name, false);
                error!(strategy = self.alert.kind(), error = %e, "Alert notification failed");
                return Err(IngestionError::Notify(e));
            }
        }

        Ok(alerting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latch::LatchState;
    use crate::sensors::{door, rain};
    use document_store::MemoryStore;
    use notifier::MockNotifier;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_door_threshold() {
        let service = door::service(door::profile(), MemoryStore::new("door"));
        assert!(service.ingest(br#"{"distance": 15}"#).await.unwrap());
        assert!(!service.ingest(br#"{"distance": 5}"#).await.unwrap());
        assert_eq!(service.store().len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_body_is_not_stored() {
        let service = door::service(door::profile(), MemoryStore::new("door"));
        let err = service.ingest(br#"{"distance": "open"}"#).await.unwrap_err();
        assert!(matches!(err, IngestionError::BadRequest { .. }));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_rain_debounce_through_service() {
        let mock = MockNotifier::new();
        let service = rain::service(rain::profile(), MemoryStore::new("rain"), mock.clone());

        for level in [0.7, 0.9, 0.1, 0.6] {
            service
                .ingest(format!(r#"{{"humidityLevel": {level}}}"#).as_bytes())
                .await
                .unwrap();
        }

        assert_eq!(mock.sent_count(), 2);
        assert_eq!(mock.sent()[0], rain::ALERT_MESSAGE);
        assert_eq!(service.store().len(), 4);
    }

    #[tokio::test]
    async fn test_notify_failure_keeps_reading() {
        let mock = MockNotifier::new();
        mock.set_failing(true);
        let service = rain::service(rain::profile(), MemoryStore::new("rain"), mock);

        let err = service.ingest(br#"{"humidityLevel": 0.8}"#).await.unwrap_err();
        assert!(matches!(err, IngestionError::Notify(_)));
        assert_eq!(service.store().len(), 1);
        assert_eq!(service.alert().state(), LatchState::Alerting);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rising_edge_notifies_once() {
        let mock = MockNotifier::new().with_delay(Duration::from_millis(20));
        let service = Arc::new(rain::service(
            rain::profile(),
            MemoryStore::new("rain"),
            mock.clone(),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.ingest(br#"{"humidityLevel": 0.9}"#).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().unwrap());
        }

        assert_eq!(mock.sent_count(), 1);
        assert_eq!(service.store().len(), 8);
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let service = door::service(door::profile(), MemoryStore::new("door"));
        for d in 0..3 {
            service
                .ingest(format!(r#"{{"distance": {d}}}"#).as_bytes())
                .await
                .unwrap();
        }
        let first = service.list_wire(PageRequest::default()).await.unwrap();
        let second = service.list_wire(PageRequest::default()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_array().map(Vec::len), Some(3));
    }
}
