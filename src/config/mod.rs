mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{IngestSettings, LogSettings, ServerSettings, Settings, StoreSettings};

/// Path (without extension) of the optional settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Prefix of the environment variables that override file settings,
/// e.g. `MQTT_LATEST_STORE__URL`.
pub const ENV_PREFIX: &str = "MQTT_LATEST";

/// Loads the configuration from `config/default` and the environment.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Loads the configuration from an optional file at `path`, a `.env` file in
/// the working directory and `MQTT_LATEST_*` environment variables, in
/// increasing priority. Values not provided anywhere keep their defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        store: StoreSettings {
            url: partial
                .store
                .as_ref()
                .and_then(|s| s.url.clone())
                .unwrap_or(default.store.url),
            collection: partial
                .store
                .as_ref()
                .and_then(|s| s.collection.clone())
                .unwrap_or(default.store.collection),
            query_timeout_ms: partial
                .store
                .as_ref()
                .and_then(|s| s.query_timeout_ms)
                .unwrap_or(default.store.query_timeout_ms),
        },
        ingest: IngestSettings {
            enabled: partial
                .ingest
                .as_ref()
                .and_then(|i| i.enabled)
                .unwrap_or(default.ingest.enabled),
            host: partial
                .ingest
                .as_ref()
                .and_then(|i| i.host.clone())
                .unwrap_or(default.ingest.host),
            port: partial
                .ingest
                .as_ref()
                .and_then(|i| i.port)
                .unwrap_or(default.ingest.port),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}
