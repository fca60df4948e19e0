//! Response header inspection.
//!
//! Every response starts with the same 4-byte marker a request does, then a
//! single byte naming what kind of reply it is. Payload decoding starts at
//! [`RESPONSE_HEADER_LEN`].

use tracing::warn;

use crate::core::request::SIMPLE_PACKET_MARKER;
use crate::error::{constants, QueryError, Result};

/// Marker + kind byte
pub const RESPONSE_HEADER_LEN: usize = 5;

/// Offset of the first payload byte, which is also the count byte of list replies
pub const RESPONSE_PAYLOAD_OFFSET: usize = 5;

/// Marker of a split response; only the first fragment would carry it
pub const SPLIT_PACKET_MARKER: [u8; 4] = [0xFE, 0xFF, 0xFF, 0xFF];

pub const S2A_INFO: u8 = 0x49;
pub const S2A_INFO_GOLDSOURCE: u8 = 0x6D;
pub const S2A_PLAYER: u8 = 0x44;
pub const S2A_RULES: u8 = 0x45;
pub const S2C_CHALLENGE: u8 = 0x41;

/// Parsed response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub kind: u8,
}

impl ResponseHeader {
    /// Read the header of `data`.
    ///
    /// Split responses and buffers that do not start with a marker are rejected.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < RESPONSE_HEADER_LEN {
            return Err(QueryError::TruncatedResponse {
                field: "header",
                needed: RESPONSE_HEADER_LEN,
                available: data.len(),
            });
        }

        let marker = &data[..4];
        if marker == SPLIT_PACKET_MARKER {
            return Err(QueryError::UnsupportedResponse(
                constants::ERR_SPLIT_PACKET.to_string(),
            ));
        }
        if marker != SIMPLE_PACKET_MARKER {
            return Err(QueryError::UnsupportedResponse(
                constants::ERR_BAD_MARKER.to_string(),
            ));
        }

        Ok(Self { kind: data[4] })
    }

    pub fn is_challenge(&self) -> bool {
        self.kind == S2C_CHALLENGE
    }

    /// Check that a challenge-gated reply carries `expected`.
    ///
    /// A challenge packet in place of the data means the server no longer
    /// accepts the session challenge. Any other mismatch is logged and
    /// tolerated; some servers echo odd kind bytes but still send valid data.
    pub fn expect(&self, expected: u8, query: &'static str) -> Result<()> {
        if self.kind == expected {
            return Ok(());
        }
        if self.is_challenge() {
            return Err(QueryError::ChallengeRejected { kind: query });
        }
        if query == "info" && self.kind == S2A_INFO_GOLDSOURCE {
            return Err(QueryError::UnsupportedResponse(
                constants::ERR_LEGACY_INFO.to_string(),
            ));
        }
        warn!(
            query,
            expected = expected,
            received = self.kind,
            "Unexpected response kind"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let header = ResponseHeader::parse(&[0xFF, 0xFF, 0xFF, 0xFF, 0x49, 0x11]).unwrap();
        assert_eq!(header.kind, S2A_INFO);
        assert!(header.expect(S2A_INFO, "info").is_ok());
    }

    #[test]
    fn test_split_rejected() {
        let err = ResponseHeader::parse(&[0xFE, 0xFF, 0xFF, 0xFF, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedResponse(_)));
    }

    #[test]
    fn test_short_header_truncated() {
        let err = ResponseHeader::parse(&[0xFF, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::TruncatedResponse {
                field: "header",
                needed: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_challenge_in_place_of_data() {
        let header = ResponseHeader { kind: S2C_CHALLENGE };
        assert!(matches!(
            header.expect(S2A_PLAYER, "player"),
            Err(QueryError::ChallengeRejected { kind: "player" })
        ));
    }

    #[test]
    fn test_goldsource_info_detected() {
        let header = ResponseHeader {
            kind: S2A_INFO_GOLDSOURCE,
        };
        assert!(matches!(
            header.expect(S2A_INFO, "info"),
            Err(QueryError::UnsupportedResponse(_))
        ));
    }

    #[test]
    fn test_other_mismatch_tolerated() {
        let header = ResponseHeader { kind: 0x55 };
        assert!(header.expect(S2A_RULES, "rules").is_ok());
    }
}
