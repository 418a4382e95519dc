//! `GambitServer` builder and accept loop.
//!
//! Ties the layers together: transport -> protocol -> relay.

use std::future::Future;
use std::net::SocketAddr;

use gambit_protocol::{Codec, JsonCodec};
use gambit_room::{DEFAULT_CHANNEL_SIZE, RelayHandle, RoomStore, spawn_relay};
use gambit_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{GambitError, ServerConfig};

/// Builder for configuring and starting a Gambit server.
///
/// # Example
///
/// ```rust,no_run
/// use gambit::prelude::*;
///
/// # async fn start() -> Result<(), GambitError> {
/// let server = GambitServer::builder()
///     .config(ServerConfig::from_env()?)
///     .build()
///     .await?;
/// server.run_until(tokio::signal::ctrl_c()).await
/// # }
/// ```
pub struct GambitServerBuilder {
    bind_addr: String,
    channel_size: usize,
}

impl GambitServerBuilder {
    /// Creates a new builder listening on [`ServerConfig::default`].
    pub fn new() -> Self {
        Self {
            bind_addr: ServerConfig::default().bind_addr(),
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds to the host and port of `config`.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.bind_addr = config.bind_addr();
        self
    }

    /// Sets the relay's command queue size.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }

    /// Binds the listener and starts the relay with an empty room store.
    ///
    /// # Errors
    /// Returns [`GambitError::Transport`] if the address cannot be bound.
    pub async fn build(self) -> Result<GambitServer<JsonCodec>, GambitError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let relay = spawn_relay(RoomStore::new(), self.channel_size);

        Ok(GambitServer {
            transport,
            relay,
            codec: JsonCodec,
        })
    }
}

impl Default for GambitServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gambit server.
///
/// Call [`run`](Self::run) or [`run_until`](Self::run_until) to start
/// accepting connections.
pub struct GambitServer<C: Codec> {
    transport: WebSocketTransport,
    relay: RelayHandle,
    codec: C,
}

impl GambitServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GambitServerBuilder {
        GambitServerBuilder::new()
    }
}

impl<C: Codec + Clone> GambitServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, GambitError> {
        Ok(self.transport.local_addr()?)
    }

    /// A handle to the relay, for inspecting rooms from outside.
    pub fn relay(&self) -> RelayHandle {
        self.relay.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), GambitError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the accept loop until `signal` resolves, then stops the relay.
    ///
    /// Connections already accepted keep their tasks; once the relay is
    /// gone their next dispatch fails and they close.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(), GambitError>
    where
        F: Future,
    {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "gambit server running");
        tokio::pin!(signal);

        loop {
            tokio::select! {
                _ = &mut signal => {
                    tracing::info!("shutdown signal received");
                    break;
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let relay = self.relay.clone();
                        let codec = self.codec.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, relay, codec).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        // Already stopped counts as stopped.
        let _ = self.relay.shutdown().await;
        Ok(())
    }
}
