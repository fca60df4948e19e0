//! # Transport Layer
//!
//! Datagram plumbing between a query session and a server.
//!
//! The session only ever sends one request and waits for one reply, so the
//! [`Transport`] trait is a plain send/receive pair. [`UdpTransport`] is the
//! network implementation; tests substitute scripted transports.
//!
//! Timeouts belong to the transport: a send or receive that exceeds its
//! configured duration resolves to [`QueryError::Timeout`](crate::error::QueryError::Timeout).

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::error::Result;

pub mod address;
pub mod udp;

pub use address::ServerAddress;
pub use udp::UdpTransport;

/// One request/response datagram channel to a single server
pub trait Transport: Send {
    /// Send one datagram, returning the number of bytes written
    fn send<'a>(&'a mut self, datagram: &'a [u8]) -> BoxFuture<'a, Result<usize>>;

    /// Wait for the next datagram
    fn receive(&mut self) -> BoxFuture<'_, Result<Bytes>>;

    /// Release the underlying socket. Later calls fail.
    fn close(&mut self);

    fn is_connected(&self) -> bool;
}
