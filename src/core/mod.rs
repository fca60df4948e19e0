//! # Core Protocol Components
//!
//! Low-level datagram handling: byte primitives, request construction and
//! response header inspection.
//!
//! ## Wire Format
//! ```text
//! [Marker(4) = FF FF FF FF] [Kind(1)] [Payload(N)]
//! ```
//!
//! Integers are little-endian, strings are NUL-terminated UTF-8.

pub mod request;
pub mod response;
pub mod wire;

pub use request::{build_request, RequestKind};
pub use response::ResponseHeader;
