use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

use crate::config::Config;
use crate::error::ServeError;
use crate::http::connection::Connection;
use crate::server::pipeline::Pipeline;

/// Pending connections beyond the one being served are not queued deeply.
const BACKLOG: u32 = 1;

pub struct Server {
    listener: TcpListener,
    pipeline: Arc<Pipeline>,
}

impl Server {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr = tokio::net::lookup_host(&cfg.listen_addr)
            .await?
            .next()
            .with_context(|| format!("no address for {}", cfg.listen_addr))?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(BACKLOG)?;

        info!("making a server on {}", listener.local_addr()?);

        Ok(Self::new(listener, Arc::new(Pipeline::from_config(cfg))))
    }

    pub fn new(listener: TcpListener, pipeline: Arc<Pipeline>) -> Self {
        Self { listener, pipeline }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections one at a time, in accept order, forever.
    ///
    /// A failing connection or accept is logged and the loop moves on.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            info!("waiting for a connection");

            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Accept failed: {}", e);
                    continue;
                }
            };
            info!("connection - {}", peer);

            let mut conn = Connection::new(socket, Arc::clone(&self.pipeline));
            if let Err(e) = conn.run().await {
                error!(code = fault_code(&e), "Connection error from {}: {:#}", peer, e);
            }
        }
    }
}

/// Error code for a failed connection; plain I/O faults from the socket
/// layer carry no `ServeError` and are reported as such.
fn fault_code(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<ServeError>() {
        Some(serve) => serve.code(),
        None if e.downcast_ref::<std::io::Error>().is_some() => "SRV005",
        None => "SRV999",
    }
}
