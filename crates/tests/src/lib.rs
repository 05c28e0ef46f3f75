//! # Integration Tests
//!
//! End-to-end flows across crates, without a broker or a database.
//!
//! - Routing file -> bridge route table -> ingestion services
//! - Debounced alerting observed through the whole chain

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use bridge::{DispatchOutcome, RouteTable};
    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::BridgeConfig;
    use document_store::MemoryStore;
    use ingestion::sensors::{door, rain};
    use notifier::MockNotifier;
    use tokio::net::TcpListener;

    struct Services {
        door_addr: String,
        rain_addr: String,
        door_store: MemoryStore,
        rain_store: MemoryStore,
        notifier: MockNotifier,
    }

    /// Start door and rain services on ephemeral ports
    async fn start_services() -> Services {
        let door_store = MemoryStore::new("door");
        let rain_store = MemoryStore::new("rain");
        let notifier = MockNotifier::new();

        let door_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let rain_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let door_addr = door_listener.local_addr().unwrap().to_string();
        let rain_addr = rain_listener.local_addr().unwrap().to_string();

        let door_service = Arc::new(door::service(door::profile(), door_store.clone()));
        let rain_service = Arc::new(rain::service(
            rain::profile(),
            rain_store.clone(),
            notifier.clone(),
        ));
        tokio::spawn(ingestion::http::serve(
            door_listener,
            door_service,
            std::future::pending(),
        ));
        tokio::spawn(ingestion::http::serve(
            rain_listener,
            rain_service,
            std::future::pending(),
        ));

        Services {
            door_addr,
            rain_addr,
            door_store,
            rain_store,
            notifier,
        }
    }

    fn routing_file(services: &Services) -> BridgeConfig {
        let content = format!(
            r#"{{
                "broker": {{"host": "localhost", "port": "1883"}},
                "targets": [
                    {{"topic": "home/door", "addr": "{}"}},
                    {{"topic": "home/rain/+", "addr": "{}"}}
                ]
            }}"#,
            services.door_addr, services.rain_addr
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Json).unwrap()
    }

    /// Routing file -> RouteTable -> HTTP -> ingestion -> store
    #[tokio::test]
    async fn test_e2e_bridge_to_ingestion() {
        let services = start_services().await;
        let config = routing_file(&services);
        let table = RouteTable::from_routes(&config.targets, config.queue_capacity, None).unwrap();

        let messages: [(&str, &[u8]); 5] = [
            ("home/door", br#"{"distance": 15, "entryDate": "2024-03-01T10:00:00Z"}"#),
            ("home/door", br#"{"distance": 4, "entryDate": "2024-03-01T10:00:05Z"}"#),
            ("home/rain/garden", br#"{"humidityLevel": 0.8}"#),
            ("home/rain/garden", br#"{"humidityLevel": 0.9}"#),
            ("home/garage", br#"{"distance": 1}"#),
        ];
        let outcomes: Vec<_> = messages
            .iter()
            .map(|(topic, payload)| table.dispatch(topic, Bytes::copy_from_slice(payload)))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                DispatchOutcome::Queued(0),
                DispatchOutcome::Queued(0),
                DispatchOutcome::Queued(1),
                DispatchOutcome::Queued(1),
                DispatchOutcome::Unrouted,
            ]
        );

        let summary = table.shutdown().await;

        // Per-route order is preserved
        let door_values: Vec<f64> = services
            .door_store
            .snapshot()
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(door_values, vec![15.0, 4.0]);
        assert_eq!(services.rain_store.len(), 2);

        // Two consecutive alerting readings raise exactly one notification
        assert_eq!(services.notifier.sent(), vec![rain::ALERT_MESSAGE.to_string()]);
        assert_eq!(summary[0].1.forwarded_count, 2);
        assert_eq!(summary[1].1.forwarded_count, 2);
    }

    /// A malformed payload is rejected by the service and counted as a forward failure
    #[tokio::test]
    async fn test_e2e_rejected_payload_is_failure() {
        let services = start_services().await;
        let config = routing_file(&services);
        let table = RouteTable::from_routes(&config.targets, config.queue_capacity, None).unwrap();

        table.dispatch("home/door", Bytes::from_static(b"not json"));
        table.dispatch("home/door", Bytes::from_static(br#"{"distance": 20}"#));
        let summary = table.shutdown().await;

        assert_eq!(services.door_store.len(), 1);
        assert_eq!(summary[0].1.failure_count, 1);
        assert_eq!(summary[0].1.forwarded_count, 1);
    }

    /// Rain alert re-arms after a dry reading
    #[tokio::test]
    async fn test_e2e_rain_rearm() {
        let services = start_services().await;
        let config = routing_file(&services);
        let table = RouteTable::from_routes(&config.targets, config.queue_capacity, None).unwrap();

        for level in ["0.9", "0.1", "0.95", "0.97"] {
            let payload = format!(r#"{{"humidityLevel": {level}}}"#);
            table.dispatch("home/rain/roof", Bytes::from(payload));
        }
        table.shutdown().await;

        assert_eq!(services.notifier.sent_count(), 2);
        assert_eq!(services.rain_store.len(), 4);
    }
}
