//! TCP listener for switch agents, with backpressure.
//!
//! # Responsibilities
//! - Accept agent connections
//! - Enforce max_connections limit via semaphore
//! - Run one session task per connection until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, OwnedSemaphorePermit, Semaphore};

use crate::config::SouthboundConfig;
use crate::controller::Controller;
use crate::southbound::session::run_session;
use crate::southbound::SouthboundError;

/// A bounded TCP listener that limits concurrent agent sessions.
///
/// When the limit is reached, new connections wait until a slot frees up.
pub struct Listener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind to the configured address with connection limits.
    pub async fn bind(config: &SouthboundConfig) -> Result<Self, SouthboundError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            SouthboundError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;
        let listener = TcpListener::bind(addr).await.map_err(SouthboundError::Bind)?;
        Ok(Self::from_listener(listener, config.max_connections))
    }

    /// Wrap an already-bound listener.
    pub fn from_listener(inner: TcpListener, max_connections: usize) -> Self {
        if let Ok(addr) = inner.local_addr() {
            tracing::info!(address = %addr, max_connections, "Southbound listener bound");
        }
        Self {
            inner,
            connection_limit: Arc::new(Semaphore::new(max_connections.max(1))),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Accept a connection once a slot is free.
    /// The permit must be held for the session's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, OwnedSemaphorePermit), SouthboundError> {
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SouthboundError::Closed)?;

        let (stream, addr) = self.inner.accept().await.map_err(SouthboundError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "Agent connected"
        );
        Ok((stream, addr, permit))
    }

    /// Accept sessions until shutdown.
    pub async fn serve(self, controller: Arc<Controller>, mut shutdown: broadcast::Receiver<()>) {
        loop {
            let accepted = tokio::select! {
                res = self.accept() => res,
                _ = shutdown.recv() => {
                    tracing::info!("Southbound listener received shutdown signal");
                    break;
                }
            };

            let (stream, peer, permit) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Southbound accept failed");
                    continue;
                }
            };

            let controller = controller.clone();
            tokio::spawn(async move {
                let _permit = permit;
                let (read_half, write_half) = stream.into_split();
                match run_session(&controller, BufReader::new(read_half), write_half).await {
                    Ok(stats) => tracing::info!(
                        peer = %peer,
                        events = stats.events,
                        malformed = stats.malformed,
                        intents = stats.intents,
                        "Agent session closed"
                    ),
                    Err(e) => tracing::warn!(peer = %peer, error = %e, "Agent session failed"),
                }
            });
        }
    }
}
