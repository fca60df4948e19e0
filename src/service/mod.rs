//! # Query Services
//!
//! Public entry points: the async [`ServerQuery`] session and its blocking
//! counterpart [`BlockingServerQuery`].

pub mod blocking;
pub mod query;

pub use blocking::BlockingServerQuery;
pub use query::ServerQuery;
