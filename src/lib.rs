//! # source-query
//!
//! Client for the Valve Source Engine server query protocol (A2S).
//!
//! Ask a game server for its metadata, its connected players and its rules
//! over UDP, and get typed records back.
//!
//! ## Layers
//! - [`core`]: wire primitives, request datagrams, response headers
//! - [`protocol`]: schema-driven decoding, record types, challenge state
//! - [`transport`]: the datagram channel and address handling
//! - [`service`]: query sessions, async and blocking
//!
//! ## Example
//! ```no_run
//! use source_query::{QueryConfig, ServerQuery};
//!
//! # async fn run() -> source_query::Result<()> {
//! let mut query = ServerQuery::connect("127.0.0.1:27015", &QueryConfig::default()).await?;
//! let info = query.info().await?;
//! println!("{} on {} ({}/{})", info.name, info.map, info.players(), info.max_players);
//!
//! for player in query.players().await? {
//!     println!("{} {}", player.name, player.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use protocol::{Player, Rule, ServerInfo};
pub use service::{BlockingServerQuery, ServerQuery};
pub use transport::{ServerAddress, Transport, UdpTransport};
