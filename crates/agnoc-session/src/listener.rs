use std::net::SocketAddr;
use std::sync::Arc;

use agnoc_protocol::{Codec, JsonCodec};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::connection::{Connection, ConnectionEvent, ConnectionHandle};
use crate::error::Result;

/// Accepts device links over TCP and spawns a [`Connection`] for each.
pub struct SessionListener {
    listener: TcpListener,
    codec: Arc<dyn Codec>,
    config: SessionConfig,
}

impl SessionListener {
    /// Bind with the JSON codec and default session config.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            codec: Arc::new(JsonCodec),
            config: SessionConfig::default(),
        })
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept the next link. Its events go to `events`.
    pub async fn accept(
        &self,
        events: &mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Result<ConnectionHandle> {
        let (stream, peer) = self.listener.accept().await?;
        stream.set_nodelay(true)?;

        let handle = Connection::spawn(
            stream,
            Some(peer),
            Arc::clone(&self.codec),
            &self.config,
            events.clone(),
        );
        info!(connection_id = %handle.id(), %peer, "accepted connection");
        Ok(handle)
    }

    /// Accept links until `cancel` fires. Accept errors are logged and
    /// skipped.
    pub async fn serve(
        &self,
        events: mpsc::UnboundedSender<ConnectionEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                accepted = self.accept(&events) => {
                    if let Err(err) = accepted {
                        warn!(error = %err, "accept failed");
                    }
                }
            }
        }
    }
}
