//! `QuorumServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session → room. The
//! registry is created once here and handed to every connection handler
//! through `Arc<ServerState>` — there is no ambient global state.

use std::sync::Arc;

use quorum_protocol::JsonCodec;
use quorum_room::Registry;
use quorum_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::QuorumError;

/// Shared server state passed to each connection handler task.
///
/// All room mutation goes through the registry mutex: a command handler
/// holds it for the whole mutation, including the projection pushes the
/// mutation fires, so commands never interleave mid-mutation.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Quorum server.
///
/// # Example
///
/// ```rust,ignore
/// let server = QuorumServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuorumServerBuilder {
    bind_addr: String,
}

impl QuorumServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds the server: binds the WebSocket transport and creates the
    /// (empty) room registry.
    pub async fn build(self) -> Result<QuorumServer, QuorumError> {
        let transport =
            WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(Registry::new()),
            codec: JsonCodec,
        });

        Ok(QuorumServer { transport, state })
    }
}

impl Default for QuorumServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Quorum server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct QuorumServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl QuorumServer {
    /// Creates a new builder.
    pub fn builder() -> QuorumServerBuilder {
        QuorumServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), QuorumError> {
        tracing::info!("Quorum server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
