//! MongoStore - MongoDB-backed collection

use chrono::{DateTime, Utc};
use contracts::{ContractError, DocumentStore, PageRequest, Reading};
use futures::TryStreamExt;
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// MongoDB connection settings
#[derive(Debug, Clone)]
pub struct MongoStoreConfig {
    /// Server host name (port is fixed at 27017)
    pub host: String,
    /// Database name
    pub database: String,
    /// Collection name, one per sensor type
    pub collection: String,
}

impl MongoStoreConfig {
    pub fn new(host: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            database: "iot".to_string(),
            collection: collection.into(),
        }
    }

    pub fn uri(&self) -> String {
        format!("mongodb://{}:27017", self.host)
    }
}

/// Document layout, with `timestamp` as a native BSON date
#[derive(Debug, Serialize, Deserialize)]
struct StoredReading {
    value: f64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    timestamp: DateTime<Utc>,
}

impl From<&Reading> for StoredReading {
    fn from(reading: &Reading) -> Self {
        Self {
            value: reading.value,
            timestamp: reading.timestamp,
        }
    }
}

impl From<StoredReading> for Reading {
    fn from(stored: StoredReading) -> Self {
        Reading::new(stored.value, stored.timestamp)
    }
}

/// Store writing each reading as a `{value, timestamp}` document
#[derive(Clone)]
pub struct MongoStore {
    name: String,
    client: Client,
    collection: Collection<StoredReading>,
}

impl MongoStore {
    /// Connect and ping the server.
    ///
    /// # Errors
    /// Returns `StoreConnection` if the URI is invalid or the ping fails.
    #[instrument(name = "mongo_store_connect", skip(config), fields(host = %config.host, collection = %config.collection))]
    pub async fn connect(config: &MongoStoreConfig) -> Result<Self, ContractError> {
        let connection_error = |e: mongodb::error::Error| ContractError::StoreConnection {
            collection: config.collection.clone(),
            message: e.to_string(),
        };

        let client = Client::with_uri_str(config.uri())
            .await
            .map_err(connection_error)?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;

        info!(database = %config.database, "Connected to MongoDB");

        Ok(Self {
            name: config.collection.clone(),
            collection: database.collection::<StoredReading>(&config.collection),
            client,
        })
    }

    /// Close the client, waiting for in-flight operations
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        debug!(collection = %self.name, "MongoDB client closed");
    }
}

impl DocumentStore for MongoStore {
    fn collection(&self) -> &str {
        &self.name
    }

    #[instrument(name = "mongo_store_append", skip(self, reading), fields(collection = %self.name))]
    async fn append(&self, reading: &Reading) -> Result<(), ContractError> {
        self.collection
            .insert_one(StoredReading::from(reading))
            .await
            .map_err(|e| ContractError::store_write(&self.name, e.to_string()))?;
        Ok(())
    }

    #[instrument(
        name = "mongo_store_page",
        skip(self),
        fields(collection = %self.name, page = request.page, limit = request.limit)
    )]
    async fn page(&self, request: PageRequest) -> Result<Vec<Reading>, ContractError> {
        let read_error = |e: mongodb::error::Error| ContractError::store_read(&self.name, e.to_string());
        let limit = i64::try_from(request.limit).unwrap_or(i64::MAX);

        let cursor = self
            .collection
            .find(doc! {})
            .skip(request.offset())
            .limit(limit)
            .await
            .map_err(read_error)?;

        let stored: Vec<StoredReading> = cursor.try_collect().await.map_err(read_error)?;
        Ok(stored.into_iter().map(Reading::from).collect())
    }
}
