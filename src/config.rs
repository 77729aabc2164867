//! Connection target configuration.

use mongodb::options::ClientOptions;

use crate::error::{RecordError, RecordResult};

/// Default host when an entity declares none.
pub const DEFAULT_HOST: &str = "localhost";

/// Default MongoDB port.
pub const DEFAULT_PORT: u16 = 27017;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "mongo_record";

/// Application name reported to the server.
const APP_NAME: &str = "mongo-record";

/// Connection target for an entity type.
///
/// Every field has a library-wide default, so an entity that declares
/// nothing binds against `localhost:27017/mongo_record`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Hostname or IP address of the server.
    pub host: String,
    /// Port the server is listening on.
    pub port: u16,
    /// Database name.
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with explicit values.
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Render the connection URI for this target.
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }

    /// Convert to MongoDB ClientOptions.
    pub async fn to_client_options(&self) -> RecordResult<ClientOptions> {
        let mut options = ClientOptions::parse(self.uri())
            .await
            .map_err(|e| RecordError::config(format!("failed to parse URI: {}", e)))?;

        options.app_name = Some(APP_NAME.to_string());

        Ok(options)
    }
}

/// Builder for connection configuration.
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
}

impl StoreConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Build the configuration, falling back to defaults for unset fields.
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            database: self
                .database
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        }
    }
}
