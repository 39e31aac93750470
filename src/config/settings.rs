use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads configuration from ambient state after that.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub ingest: IngestSettings,
    pub log: LogSettings,
}

/// Address the HTTP server binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where the message documents live and how long a query may take.
///
/// `url` selects the backend: `sled://<path>` or `memory://`. Either way the
/// store is opened by this process only; the pipeline writes through the
/// ingest listener.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub url: String,
    pub collection: String,
    pub query_timeout_ms: u64,
}

/// Listener the ingestion pipeline posts documents to.
///
/// Kept apart from the query server so it can stay on a private interface.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

impl StoreSettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl IngestSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from
/// `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub store: Option<PartialStoreSettings>,
    pub ingest: Option<PartialIngestSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStoreSettings {
    pub url: Option<String>,
    pub collection: Option<String>,
    pub query_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialIngestSettings {
    pub enabled: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            store: StoreSettings {
                url: "sled://mqtt_db".to_string(),
                collection: "mqtt".to_string(),
                query_timeout_ms: 5000,
            },
            ingest: IngestSettings {
                enabled: true,
                host: "127.0.0.1".to_string(),
                port: 8001,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
