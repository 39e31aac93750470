//! CLI for mqtt-latest
//!
//! Subcommands:
//! - `serve`: run the HTTP server and the ingest listener
//! - `latest`: query the store once and print the response body (useful for smoke tests)

use clap::Parser;
use mqtt_latest::config::{DEFAULT_CONFIG_PATH, Settings, load_config_from};
use mqtt_latest::presentation::render;
use mqtt_latest::startup::{self, Listeners};
use mqtt_latest::utils::error::ServerError;
use mqtt_latest::utils::logging;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "mqtt-latest", about = "Serves the most recently received MQTT message")]
enum Command {
    /// Start the HTTP server and the ingest listener
    Serve {
        /// Settings file path, without extension
        #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "MQTT_LATEST_CONFIG")]
        config: String,
    },
    /// Fetch the latest document once and print the response body
    Latest {
        /// Settings file path, without extension
        #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "MQTT_LATEST_CONFIG")]
        config: String,
    },
}

#[tokio::main]
async fn main() {
    let cmd = Command::parse();

    let result = match cmd {
        Command::Serve { config } => run_server(&config).await,
        Command::Latest { config } => run_latest(&config).await,
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_settings(path: &str) -> Result<Settings, ServerError> {
    let settings = load_config_from(path)?;
    logging::init(&settings.log.level);
    info!(config = %path, "loaded config");
    Ok(settings)
}

async fn run_server(config_path: &str) -> Result<bool, ServerError> {
    let settings = load_settings(config_path)?;
    let connection = startup::connect(&settings.store).await?;
    let listeners = Listeners::bind(&settings).await?;

    startup::run(listeners, connection, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received. Exiting gracefully.");
    })
    .await?;
    Ok(true)
}

async fn run_latest(config_path: &str) -> Result<bool, ServerError> {
    let settings = load_settings(config_path)?;
    let connection = startup::connect(&settings.store).await?;

    let rendered = render(connection.service.get_latest().await);
    let json = serde_json::to_string_pretty(&rendered.body)?;
    println!("{json}");

    connection.store.reader.flush().await?;
    Ok(rendered.status.is_success())
}
