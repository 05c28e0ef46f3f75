//! BridgeRouter - broker subscription and dispatch loop

use std::time::Duration;

use contracts::BridgeConfig;
use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, SubAck,
    SubscribeReasonCode,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::BridgeError;
use crate::metrics::ForwardSnapshot;
use crate::route_table::RouteTable;

/// Upper bound on flushing DISCONNECT during shutdown
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection and forwarding knobs not carried by the routing file
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    pub keep_alive: Duration,
    /// `None` disables the outbound request timeout
    pub forward_timeout: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(30),
            forward_timeout: None,
        }
    }
}

/// Subscribes to every configured topic and forwards each message to its route
pub struct BridgeRouter {
    broker: String,
    client: AsyncClient,
    eventloop: EventLoop,
    table: RouteTable,
    /// Packet id of each subscription, in configuration order
    subscriptions: Vec<(u16, String)>,
}

impl BridgeRouter {
    /// Connect, subscribe and wait until the broker has acknowledged every
    /// subscription.
    ///
    /// A missing or refused ConnAck is [`BridgeError::Connect`]; a rejected
    /// subscription is [`BridgeError::Subscribe`].
    #[instrument(
        name = "bridge_connect",
        skip(config, options),
        fields(broker = %format!("{}:{}", config.broker.host, config.broker.port), routes = config.targets.len())
    )]
    pub async fn connect(config: &BridgeConfig, options: BridgeOptions) -> Result<Self, BridgeError> {
        let broker = format!("{}:{}", config.broker.host, config.broker.port);

        let mut mqtt_options =
            MqttOptions::new(&config.client_id, &config.broker.host, config.broker.port);
        mqtt_options.set_keep_alive(options.keep_alive);
        mqtt_options.set_clean_session(true);

        let request_capacity = config.targets.len().max(10) * 2;
        let (client, mut eventloop) = AsyncClient::new(mqtt_options, request_capacity);

        for route in &config.targets {
            client
                .subscribe(&route.topic, QoS::AtMostOnce)
                .await
                .map_err(|e| BridgeError::subscribe(&route.topic, e.to_string()))?;
        }

        wait_for_connack(&mut eventloop, &broker).await?;
        info!(broker = %broker, client_id = %config.client_id, "Connected to broker");

        // Messages on already-acknowledged topics may arrive before the last SubAck.
        let table =
            RouteTable::from_routes(&config.targets, config.queue_capacity, options.forward_timeout)?;
        let topics: Vec<&str> = config.targets.iter().map(|r| r.topic.as_str()).collect();

        let subscriptions = match wait_for_subacks(&mut eventloop, &broker, &topics, &table).await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                table.shutdown().await;
                return Err(e);
            }
        };
        info!(subscriptions = subscriptions.len(), "All subscriptions acknowledged");

        Ok(Self {
            broker,
            client,
            eventloop,
            table,
            subscriptions,
        })
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Per-route forwarding counters
    pub fn metrics(&self) -> Vec<(String, ForwardSnapshot)> {
        self.table.metrics()
    }

    /// Poll the broker until `shutdown` fires or the connection drops.
    ///
    /// A dropped connection is fatal and returned as
    /// [`BridgeError::ConnectionLost`]. Route workers are drained either way.
    #[instrument(name = "bridge_run", skip(self, shutdown), fields(broker = %self.broker))]
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), BridgeError> {
        info!(routes = self.table.len(), "Bridge router started");

        let result = loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Shutdown signal received");
                    break Ok(());
                }
                event = self.eventloop.poll() => match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let outcome = self.table.dispatch(&publish.topic, publish.payload);
                        trace!(topic = %publish.topic, ?outcome, "Message dispatched");
                    }
                    Ok(Event::Incoming(Packet::SubAck(ack))) => {
                        let topic = topic_for(&self.subscriptions, ack.pkid);
                        if let Err(e) = check_suback(&ack, &topic) {
                            error!(error = %e, "Subscription rejected");
                            break Err(e);
                        }
                    }
                    Ok(event) => trace!(?event, "Broker event"),
                    Err(e) => {
                        error!(error = %e, "Broker connection lost");
                        break Err(BridgeError::ConnectionLost { message: e.to_string() });
                    }
                }
            }
        };

        if result.is_ok() {
            self.disconnect().await;
        }

        for (topic, snapshot) in self.table.shutdown().await {
            info!(
                topic = %topic,
                forwarded = snapshot.forwarded_count,
                failed = snapshot.failure_count,
                dropped = snapshot.dropped_count,
                "Route summary"
            );
        }
        info!("Bridge router stopped");
        result
    }

    /// Queue DISCONNECT and poll until it has been written
    async fn disconnect(&mut self) {
        if let Err(e) = self.client.try_disconnect() {
            debug!(error = %e, "Disconnect request failed");
            return;
        }

        let eventloop = &mut self.eventloop;
        let flushed = tokio::time::timeout(DISCONNECT_TIMEOUT, async {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => return true,
                    Ok(_) => {}
                    Err(_) => return false,
                }
            }
        })
        .await
        .unwrap_or(false);

        if flushed {
            debug!("Disconnected from broker");
        } else {
            warn!("Broker connection closed without a clean DISCONNECT");
        }
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop, broker: &str) -> Result<(), BridgeError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                return if ack.code == ConnectReturnCode::Success {
                    Ok(())
                } else {
                    Err(BridgeError::connect(broker, format!("{:?}", ack.code)))
                };
            }
            Ok(_) => continue,
            Err(e) => return Err(BridgeError::connect(broker, e.to_string())),
        }
    }
}

/// Poll until one SubAck per topic has arrived.
///
/// Outgoing SUBSCRIBE packets leave in request order, which pairs each
/// packet id with its topic.
async fn wait_for_subacks(
    eventloop: &mut EventLoop,
    broker: &str,
    topics: &[&str],
    table: &RouteTable,
) -> Result<Vec<(u16, String)>, BridgeError> {
    let mut unsent = topics.iter();
    let mut subscriptions = Vec::with_capacity(topics.len());
    let mut acked = 0;

    while acked < topics.len() {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Subscribe(pkid))) => {
                if let Some(topic) = unsent.next() {
                    subscriptions.push((pkid, topic.to_string()));
                }
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                let topic = topic_for(&subscriptions, ack.pkid);
                check_suback(&ack, &topic)?;
                debug!(topic = %topic, pkid = ack.pkid, "Subscription acknowledged");
                acked += 1;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                table.dispatch(&publish.topic, publish.payload);
            }
            Ok(_) => {}
            Err(e) => return Err(BridgeError::connect(broker, e.to_string())),
        }
    }
    Ok(subscriptions)
}

fn topic_for(subscriptions: &[(u16, String)], pkid: u16) -> String {
    subscriptions
        .iter()
        .find(|(id, _)| *id == pkid)
        .map(|(_, topic)| topic.clone())
        .unwrap_or_else(|| format!("<pkid {pkid}>"))
}

fn check_suback(ack: &SubAck, topic: &str) -> Result<(), BridgeError> {
    if ack
        .return_codes
        .iter()
        .any(|code| matches!(code, SubscribeReasonCode::Failure))
    {
        return Err(BridgeError::subscribe(topic, "rejected by broker"));
    }
    Ok(())
}
