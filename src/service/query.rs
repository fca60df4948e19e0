//! Query session: challenge bookkeeping plus the request/response sequence
//! for each query.
//!
//! ```text
//! challenge unset? ──yes──▶ renew ─┐
//!        │ no                      │
//!        ▼                         ▼
//!   build request ─▶ send ─▶ receive ─▶ decode ─▶ record
//! ```
//!
//! ## Concurrency
//! A session owns one socket and one challenge. Every query takes
//! `&mut self`, so a session cannot be driven by two callers at once.
//! To share one between tasks, wrap it in a `tokio::sync::Mutex`; nothing
//! inside the session locks.

use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::config::QueryConfig;
use crate::core::request::{build_request, RequestKind};
use crate::core::response::{ResponseHeader, S2A_INFO, S2A_PLAYER, S2A_RULES};
use crate::error::{QueryError, Result};
use crate::protocol::challenge::{parse_challenge, ChallengeState};
use crate::protocol::list::{decode_list, ListRecord};
use crate::protocol::models::{Player, Rule, ServerInfo};
use crate::protocol::schema::{decode_record, DecodeOptions};
use crate::transport::{ServerAddress, Transport, UdpTransport};
use crate::utils::metrics::{global_metrics, Timer};

/// A query session against one server
#[derive(Debug)]
pub struct ServerQuery<T: Transport = UdpTransport> {
    transport: T,
    challenge: ChallengeState,
}

impl ServerQuery<UdpTransport> {
    /// Parse `address`, resolve it and open a UDP session.
    ///
    /// Accepts `host:port`, `host,port` and `steam://connect/host:port`.
    /// Malformed input or an unresolvable host is an `InvalidArgument` error.
    #[instrument(skip(config))]
    pub async fn connect(address: &str, config: &QueryConfig) -> Result<Self> {
        let remote = ServerAddress::parse(address)?.resolve().await?;
        let transport = UdpTransport::connect(remote, &config.client).await?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> ServerQuery<T> {
    /// Start a session over an existing transport, with no challenge
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            challenge: ChallengeState::Unset,
        }
    }

    /// Current session challenge
    pub fn challenge(&self) -> ChallengeState {
        self.challenge
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Close the transport. Any later query fails.
    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Fetch a fresh challenge and make it the session challenge.
    ///
    /// Always performs the round trip, whatever the current state.
    #[instrument(skip(self))]
    pub async fn renew_challenge(&mut self) -> Result<i32> {
        let response = self.exchange(RequestKind::Challenge).await?;
        let value = parse_challenge(&response).inspect_err(|_| global_metrics().decode_error())?;

        if let Ok(header) = ResponseHeader::parse(&response) {
            if !header.is_challenge() {
                debug!(kind = header.kind, "Challenge reply with unexpected kind");
            }
        }

        global_metrics().challenge_renewed();
        debug!(challenge = value, "Challenge renewed");
        Ok(self.challenge.renew(value))
    }

    /// Query server metadata.
    ///
    /// Renews the challenge first if the session has none. `latency` is the
    /// measured time of the INFO round trip.
    #[instrument(skip(self))]
    pub async fn info(&mut self) -> Result<ServerInfo> {
        global_metrics().query_started();
        self.ensure_challenge().await?;

        let started = Instant::now();
        let response = self.exchange(RequestKind::Info).await?;
        let latency = started.elapsed();
        if response.is_empty() {
            return Err(QueryError::EmptyResponse);
        }

        let header = ResponseHeader::parse(&response)?;
        header.expect(S2A_INFO, "info")?;

        let (mut info, _) = decode_record::<ServerInfo>(
            &response,
            DecodeOptions::response(ServerInfo::EDF_FIELD),
        )
        .inspect_err(|_| global_metrics().decode_error())?;
        info.latency = latency;

        global_metrics().query_succeeded();
        Ok(info)
    }

    /// Query the connected players
    #[instrument(skip(self))]
    pub async fn players(&mut self) -> Result<Vec<Player>> {
        self.list_query(RequestKind::Player, S2A_PLAYER).await
    }

    /// Query the server rules (cvars).
    ///
    /// Some games never answer this, or answer with nothing once the rule
    /// set grows past a size limit; that surfaces as `Timeout` or `EmptyResponse`.
    #[instrument(skip(self))]
    pub async fn rules(&mut self) -> Result<Vec<Rule>> {
        self.list_query(RequestKind::Rules, S2A_RULES).await
    }

    async fn list_query<R: ListRecord>(&mut self, kind: RequestKind, expected: u8) -> Result<Vec<R>> {
        global_metrics().query_started();
        self.ensure_challenge().await?;

        let response = self.exchange(kind).await?;
        if response.is_empty() {
            return Err(QueryError::EmptyResponse);
        }

        let header = ResponseHeader::parse(&response)?;
        header.expect(expected, kind.name())?;

        let records = decode_list::<R>(&response).inspect_err(|_| global_metrics().decode_error())?;
        debug!(query = kind.name(), count = records.len(), "List decoded");

        global_metrics().query_succeeded();
        Ok(records)
    }

    async fn ensure_challenge(&mut self) -> Result<()> {
        if !self.challenge.is_set() {
            self.renew_challenge().await?;
        }
        Ok(())
    }

    /// Send the request for `kind` with the session challenge and wait for one reply
    async fn exchange(&mut self, kind: RequestKind) -> Result<Bytes> {
        let _timer = Timer::start(kind.name());
        let request = build_request(kind, self.challenge.get());

        let sent = self
            .transport
            .send(&request)
            .await
            .inspect_err(record_transport_error)?;
        global_metrics().datagram_sent(sent as u64);

        let response = self
            .transport
            .receive()
            .await
            .inspect_err(record_transport_error)?;
        global_metrics().datagram_received(response.len() as u64);

        debug!(
            query = kind.name(),
            sent,
            received = response.len(),
            "Exchange complete"
        );
        Ok(response)
    }
}

fn record_transport_error(err: &QueryError) {
    if err.is_timeout() {
        global_metrics().timeout();
    }
}
