//! Connection registry.
//!
//! Connections are opened lazily and cached per `(host, port, database)`
//! key, so entity types sharing a target share one connection while types
//! declaring different targets get their own. There is no teardown path:
//! once opened, a connection lives as long as the registry.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::RecordResult;
use crate::mongo::MongoConnector;
use crate::store::{Collection, Connector, Database};

/// Identity of a connection target.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ConnectionKey {
    host: String,
    port: u16,
    database: String,
}

impl From<&StoreConfig> for ConnectionKey {
    fn from(config: &StoreConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            database: config.database.clone(),
        }
    }
}

/// Holds at most one connection per distinct target.
pub struct Registry {
    connector: Arc<dyn Connector>,
    connections: Mutex<HashMap<ConnectionKey, Arc<dyn Database>>>,
}

impl Registry {
    /// Create a registry backed by the MongoDB driver.
    pub fn new() -> Self {
        Self::with_connector(Arc::new(MongoConnector))
    }

    /// Create a registry with an explicit connector.
    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide default registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Get the database handle for a target, connecting on first use.
    ///
    /// The map lock is held across connection establishment, so concurrent
    /// callers with the same key cannot open more than one connection.
    pub async fn database(&self, config: &StoreConfig) -> RecordResult<Arc<dyn Database>> {
        let key = ConnectionKey::from(config);
        let mut connections = self.connections.lock().await;

        if let Some(database) = connections.get(&key) {
            return Ok(database.clone());
        }

        debug!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "opening connection"
        );
        let database = self.connector.connect(config).await?;
        connections.insert(key, database.clone());
        Ok(database)
    }

    /// Get a collection handle for a target, connecting on first use.
    pub async fn collection(
        &self,
        config: &StoreConfig,
        name: &str,
    ) -> RecordResult<Arc<dyn Collection>> {
        let database = self.database(config).await?;
        Ok(database.collection(name))
    }

    /// Number of connections currently open.
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
