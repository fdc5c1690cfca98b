//! Server execution logic.

use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use irori_shared::time::SystemClock;
use tokio::{net::TcpListener, sync::Mutex, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::{
        greeting::FileGreetingProvider, message_pusher::ChannelMessagePusher,
        persister::FileLogPersister, repository::InMemoryChatHubRepository,
    },
};

use super::{
    handler::{
        http::{health_check, hub_status},
        session::handle_connection,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Pause after a failed `accept` (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Grouped TCP chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(&config);
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server around already wired state
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Wire the production adapters described by `config`:
    /// in-memory hub, per-connection queues, file chat log and file greeting.
    pub fn from_config(config: &ServerConfig) -> Self {
        let hub = Arc::new(Mutex::new(config.build_hub()));
        let repository = Arc::new(InMemoryChatHubRepository::new(hub));
        let message_pusher = Arc::new(ChannelMessagePusher::new());
        let log_persister = Arc::new(FileLogPersister::new(&config.chat_log_path));
        let greeting_provider = Arc::new(FileGreetingProvider::new(&config.greeting_path));

        Self::new(AppState::new(
            repository,
            message_pusher,
            log_persister,
            greeting_provider,
            Arc::new(SystemClock),
        ))
    }

    /// Bind the chat listener and, if requested, the status API listener.
    pub async fn bind(self, chat_addr: &str, http_addr: Option<&str>) -> io::Result<BoundServer> {
        let listener = TcpListener::bind(chat_addr).await?;
        let http_listener = match http_addr {
            Some(addr) => Some(TcpListener::bind(addr).await?),
            None => None,
        };

        Ok(BoundServer {
            state: self.state,
            listener,
            http_listener,
        })
    }

    /// Run the chat server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if a listener fails to bind.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let bound = self
            .bind(&config.chat_addr(), config.http_addr().as_deref())
            .await?;

        let local_addr = bound.local_addr()?;
        tracing::info!("Chat server listening on {}", local_addr);
        tracing::info!("Connect with: nc {} {}", local_addr.ip(), local_addr.port());
        if let Some(addr) = bound.http_local_addr() {
            tracing::info!("Status API listening on http://{}/api/hub", addr);
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        bound.serve(shutdown_signal()).await;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// A server whose listeners are bound and ready to accept.
pub struct BoundServer {
    state: Arc<AppState>,
    listener: TcpListener,
    http_listener: Option<TcpListener>,
}

impl BoundServer {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn http_local_addr(&self) -> Option<SocketAddr> {
        self.http_listener
            .as_ref()
            .and_then(|listener| listener.local_addr().ok())
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Each connection runs in its own task; sessions already running are
    /// left to finish on their own.
    pub async fn serve<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let (stop_tx, stop_rx) = watch::channel(false);

        if let Some(http_listener) = self.http_listener {
            let app = status_router(self.state.clone());
            let mut stop_rx = stop_rx.clone();
            tokio::spawn(async move {
                let result = axum::serve(http_listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = stop_rx.changed().await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!("Status API error: {}", e);
                }
            });
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_connection(stream, peer, self.state.clone()));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        let _ = stop_tx.send(true);
    }
}

/// Status API routes
fn status_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/hub", get(hub_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
