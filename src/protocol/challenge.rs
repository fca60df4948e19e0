//! Challenge session state.
//!
//! Servers hand out a 32-bit challenge that must accompany PLAYER, RULES and
//! (on current builds) INFO requests. A session starts without one; the only
//! way to obtain or replace it is an explicit renewal round trip.
//!
//! ```text
//!            renew                 renew
//!   Unset ───────────▶ Valid(c) ───────────▶ Valid(c')
//! ```
//!
//! Nothing moves the state back to `Unset`. A challenge the server stopped
//! accepting stays in place until the caller renews it.

use crate::core::response::RESPONSE_PAYLOAD_OFFSET;
use crate::core::wire::WireReader;
use crate::error::{QueryError, Result};

/// Current challenge of a query session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeState {
    #[default]
    Unset,
    Valid(i32),
}

impl ChallengeState {
    /// Wrap a raw value; `0` is the unset sentinel
    pub fn from_raw(value: i32) -> Self {
        if value == 0 {
            ChallengeState::Unset
        } else {
            ChallengeState::Valid(value)
        }
    }

    /// Raw value, `0` while unset
    pub fn raw(&self) -> i32 {
        match self {
            ChallengeState::Unset => 0,
            ChallengeState::Valid(value) => *value,
        }
    }

    pub fn get(&self) -> Option<i32> {
        match self {
            ChallengeState::Unset => None,
            ChallengeState::Valid(value) => Some(*value),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ChallengeState::Valid(_))
    }

    /// Store the value returned by a renewal round trip
    pub fn renew(&mut self, value: i32) -> i32 {
        *self = Self::from_raw(value);
        value
    }
}

/// Extract the challenge from a renewal reply.
///
/// The value is the i32 right after the 5-byte header.
pub fn parse_challenge(data: &[u8]) -> Result<i32> {
    if data.is_empty() {
        return Err(QueryError::EmptyResponse);
    }
    let mut reader = WireReader::new(data);
    reader.skip("header", RESPONSE_PAYLOAD_OFFSET)?;
    reader.read_i32("challenge")
}
