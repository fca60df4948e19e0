//! Blocking entry points.
//!
//! [`BlockingServerQuery`] owns a current-thread tokio runtime and drives the
//! async [`ServerQuery`] operations to completion on the calling thread. Both
//! paths share the same request building and decoding.
//!
//! Do not call these from inside an async runtime; use [`ServerQuery`] there.

use tokio::runtime::{Builder, Runtime};

use crate::config::QueryConfig;
use crate::error::Result;
use crate::protocol::challenge::ChallengeState;
use crate::protocol::models::{Player, Rule, ServerInfo};
use crate::service::query::ServerQuery;
use crate::transport::{Transport, UdpTransport};

/// Synchronous wrapper around a [`ServerQuery`]
pub struct BlockingServerQuery<T: Transport = UdpTransport> {
    runtime: Runtime,
    inner: ServerQuery<T>,
}

impl BlockingServerQuery<UdpTransport> {
    /// Resolve `address` and open a UDP session, blocking until done
    pub fn connect(address: &str, config: &QueryConfig) -> Result<Self> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(ServerQuery::connect(address, config))?;
        Ok(Self { runtime, inner })
    }
}

impl<T: Transport> BlockingServerQuery<T> {
    /// Wrap a transport; it must not depend on another runtime's reactor
    pub fn with_transport(transport: T) -> Result<Self> {
        Ok(Self {
            runtime: build_runtime()?,
            inner: ServerQuery::with_transport(transport),
        })
    }

    pub fn info(&mut self) -> Result<ServerInfo> {
        self.runtime.block_on(self.inner.info())
    }

    pub fn players(&mut self) -> Result<Vec<Player>> {
        self.runtime.block_on(self.inner.players())
    }

    pub fn rules(&mut self) -> Result<Vec<Rule>> {
        self.runtime.block_on(self.inner.rules())
    }

    pub fn renew_challenge(&mut self) -> Result<i32> {
        self.runtime.block_on(self.inner.renew_challenge())
    }

    pub fn challenge(&self) -> ChallengeState {
        self.inner.challenge()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Hand back the async session; the runtime is dropped
    pub fn into_inner(self) -> ServerQuery<T> {
        self.inner
    }
}

fn build_runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
