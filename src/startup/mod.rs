//! The `startup` module wires the process together: open the store, make sure
//! it answers, bind the listeners and serve until shutdown.
//!
//! Any failure before the listeners are up aborts startup with a
//! [`ServerError`]; the binary turns that into a non-zero exit.

use std::future::Future;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::config::{Settings, StoreSettings};
use crate::persistence::{StoreHandle, open_store};
use crate::retrieval::RetrievalService;
use crate::transport;
use crate::utils::error::ServerError;

/// An opened, reachable store and the service reading from it.
#[derive(Debug)]
pub struct Connection {
    pub service: RetrievalService,
    pub store: StoreHandle,
}

/// Opens the store named by `settings.url` and checks that it answers.
pub async fn connect(settings: &StoreSettings) -> Result<Connection, ServerError> {
    let store = open_store(settings).await?;
    connect_with(store, settings).await
}

/// Like [`connect`], for a store that is already open.
pub async fn connect_with(
    store: StoreHandle,
    settings: &StoreSettings,
) -> Result<Connection, ServerError> {
    // Fail fast: an unreachable store aborts startup.
    store.reader.ping().await?;
    info!(
        backend = store.reader.backend(),
        collection = %settings.collection,
        query_timeout_ms = settings.query_timeout_ms,
        "store connected"
    );
    let service = RetrievalService::from_settings(store.reader.clone(), settings);
    Ok(Connection { service, store })
}

/// Bound sockets for the query server and, unless disabled, the ingest
/// listener.
#[derive(Debug)]
pub struct Listeners {
    pub http: TcpListener,
    pub ingest: Option<TcpListener>,
}

impl Listeners {
    pub async fn bind(settings: &Settings) -> Result<Self, ServerError> {
        let http = TcpListener::bind(settings.server.bind_addr()).await?;
        let ingest = if settings.ingest.enabled {
            Some(TcpListener::bind(settings.ingest.bind_addr()).await?)
        } else {
            None
        };
        Ok(Self { http, ingest })
    }
}

/// Serves both listeners until `shutdown` resolves, lets in-flight requests
/// finish, then flushes the store.
pub async fn run<F>(
    listeners: Listeners,
    connection: Connection,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let Connection { service, store } = connection;
    let Listeners { http, ingest } = listeners;

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown.await;
        let _ = stop_tx.send(true);
    });

    info!(
        addr = %http.local_addr()?,
        path = transport::LATEST_DOCUMENT_PATH,
        "http server listening"
    );
    let query = transport::serve(http, service, stopped(stop_rx.clone()));

    let sink = store.sink.clone();
    let ingest = async move {
        match ingest {
            Some(listener) => {
                info!(
                    addr = %listener.local_addr()?,
                    path = transport::INGEST_PATH,
                    "ingest listener ready"
                );
                transport::serve_ingest(listener, sink, stopped(stop_rx)).await
            }
            None => {
                info!("ingest listener disabled");
                Ok(())
            }
        }
    };

    tokio::try_join!(query, ingest)?;

    store.reader.flush().await?;
    info!("shutdown complete");
    Ok(())
}

async fn stopped(mut stop: watch::Receiver<bool>) {
    // a dropped sender ends the wait too
    let _ = stop.wait_for(|stop| *stop).await;
}
