//! UDP transport on a connected tokio socket.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{constants, QueryError, Result};
use crate::transport::Transport;
use crate::utils::timeout::with_timeout;

/// A UDP socket connected to one server.
///
/// Each `receive` returns exactly one datagram. Datagrams longer than
/// `max_datagram_size` are cut to that size by the OS.
#[derive(Debug)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    remote: SocketAddr,
    send_timeout: Duration,
    receive_timeout: Duration,
    max_datagram_size: usize,
}

impl UdpTransport {
    /// Bind the configured local address and connect to `remote`
    #[instrument(skip(config), fields(local = %config.local_address))]
    pub async fn connect(remote: SocketAddr, config: &ClientConfig) -> Result<Self> {
        let local: SocketAddr = config.local_address.parse().map_err(|_| {
            QueryError::InvalidArgument(format!(
                "Invalid local address '{}'",
                config.local_address
            ))
        })?;

        let socket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        debug!(local = %socket.local_addr()?, %remote, "UDP socket connected");

        Ok(Self {
            socket: Some(socket),
            remote,
            send_timeout: config.send_timeout,
            receive_timeout: config.receive_timeout,
            max_datagram_size: config.max_datagram_size,
        })
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn socket(&self) -> Result<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| QueryError::TransportError(constants::ERR_NOT_CONNECTED.to_string()))
    }
}

impl Transport for UdpTransport {
    fn send<'a>(&'a mut self, datagram: &'a [u8]) -> BoxFuture<'a, Result<usize>> {
        Box::pin(async move {
            let socket = self.socket()?;
            with_timeout(self.send_timeout, "send", async {
                socket.send(datagram).await.map_err(QueryError::from)
            })
            .await
        })
    }

    fn receive(&mut self) -> BoxFuture<'_, Result<Bytes>> {
        Box::pin(async move {
            let socket = self.socket()?;
            let mut buf = vec![0u8; self.max_datagram_size];
            let len = with_timeout(self.receive_timeout, "receive", async {
                socket.recv(&mut buf).await.map_err(QueryError::from)
            })
            .await?;
            buf.truncate(len);
            Ok(Bytes::from(buf))
        })
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!(remote = %self.remote, "UDP socket closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }
}
