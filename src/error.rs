//! # Error Types
//!
//! Error handling for every query operation.
//!
//! This module defines all error variants that can occur while talking to a
//! game server, from socket failures to responses that do not match the
//! record schema they are decoded against.
//!
//! ## Error Categories
//! - **Argument errors**: malformed `host:port` strings, unresolvable hosts
//! - **Timeouts**: a send or receive exceeded the configured duration
//! - **Decode errors**: truncated responses, enum values outside their domain
//! - **Empty responses**: a datagram arrived but carried no payload
//!
//! None of these are retried inside the crate. Callers decide, and
//! [`QueryError::is_retryable`] tells them which ones are worth another try.
//!
//! ## Example Usage
//! ```rust
//! use source_query::error::{QueryError, Result};
//! use source_query::transport::ServerAddress;
//! use tracing::{error, info};
//!
//! fn parse(input: &str) -> Result<ServerAddress> {
//!     ServerAddress::parse(input)
//! }
//!
//! match parse("127.0.0.1:27015") {
//!     Ok(addr) => info!(host = %addr.host, port = addr.port, "parsed"),
//!     Err(e) => error!(error = %e, "bad address"),
//! }
//! assert!(matches!(parse("host:65536"), Err(QueryError::InvalidArgument(_))));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Address errors
    pub const ERR_EMPTY_ADDRESS: &str = "Server address cannot be empty";
    pub const ERR_MISSING_PORT: &str = "Server address is missing a port";
    pub const ERR_HOST_UNREACHABLE: &str = "Could not resolve the host name";

    /// Response errors
    pub const ERR_SPLIT_PACKET: &str = "Split (multi-packet) responses are not supported";
    pub const ERR_LEGACY_INFO: &str = "Legacy GoldSource info responses are not supported";
    pub const ERR_BAD_MARKER: &str = "Response does not start with a packet marker";

    /// Transport errors
    pub const ERR_NOT_CONNECTED: &str = "Transport is closed";
}

/// QueryError is the error type for all query operations
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Truncated response while reading `{field}`: needed {needed} bytes, {available} available")]
    TruncatedResponse {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid value {value:#04x} for field `{field}`")]
    InvalidFieldValue { field: &'static str, value: u64 },

    #[error("Server did not respond with data")]
    EmptyResponse,

    #[error("Field `{field}` received a value of the wrong wire kind")]
    SchemaMismatch { field: &'static str },

    #[error("Server rejected the challenge for a {kind} query; renew it and retry")]
    ChallengeRejected { kind: &'static str },

    #[error("Unsupported response: {0}")]
    UnsupportedResponse(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl QueryError {
    /// Whether the failure came from the transport timing out
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueryError::Timeout)
    }

    /// Whether the whole operation may reasonably be issued again.
    ///
    /// Only timeouts qualify; decode failures will repeat on the same server.
    pub fn is_retryable(&self) -> bool {
        self.is_timeout()
    }

    /// Whether the failure was a malformed or short response
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            QueryError::TruncatedResponse { .. }
                | QueryError::InvalidFieldValue { .. }
                | QueryError::SchemaMismatch { .. }
        )
    }
}

/// Type alias for Results using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;
