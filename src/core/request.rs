//! Request datagram construction.
//!
//! ```text
//! [FF FF FF FF] [Header(1)] [Payload(N)]
//! ```
//!
//! | Kind      | Header | Payload                                         |
//! |-----------|--------|-------------------------------------------------|
//! | Info      | `0x54` | `"Source Engine Query\0"` + optional challenge  |
//! | Player    | `0x55` | challenge (i32 LE)                              |
//! | Rules     | `0x56` | challenge (i32 LE)                              |
//! | Challenge | `0x55` | `-1` (i32 LE)                                   |

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::wire::put_cstring;

/// Marker that starts every non-split datagram
pub const SIMPLE_PACKET_MARKER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Payload of every INFO request
pub const INFO_QUERY_STRING: &str = "Source Engine Query";

/// Challenge value that asks the server to issue a new one
pub const CHALLENGE_REQUEST: i32 = -1;

pub const A2S_INFO: u8 = 0x54;
pub const A2S_PLAYER: u8 = 0x55;
pub const A2S_RULES: u8 = 0x56;

/// The four request kinds a client can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Info,
    Player,
    Rules,
    /// Challenge renewal rides on the PLAYER header with a `-1` payload
    Challenge,
}

impl RequestKind {
    /// Header byte written after the packet marker
    pub fn header(self) -> u8 {
        match self {
            RequestKind::Info => A2S_INFO,
            RequestKind::Player | RequestKind::Challenge => A2S_PLAYER,
            RequestKind::Rules => A2S_RULES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RequestKind::Info => "info",
            RequestKind::Player => "player",
            RequestKind::Rules => "rules",
            RequestKind::Challenge => "challenge",
        }
    }
}

/// Build the datagram for `kind`.
///
/// `challenge` is ignored for [`RequestKind::Challenge`]. For INFO it is
/// appended only when present; PLAYER and RULES fall back to `-1` when it is
/// `None`, which makes the server answer with a fresh challenge.
pub fn build_request(kind: RequestKind, challenge: Option<i32>) -> Bytes {
    let mut buf = BytesMut::with_capacity(SIMPLE_PACKET_MARKER.len() + 1 + 24);
    buf.put_slice(&SIMPLE_PACKET_MARKER);
    buf.put_u8(kind.header());

    match kind {
        RequestKind::Info => {
            put_cstring(&mut buf, INFO_QUERY_STRING);
            if let Some(challenge) = challenge {
                buf.put_i32_le(challenge);
            }
        }
        RequestKind::Player | RequestKind::Rules => {
            buf.put_i32_le(challenge.unwrap_or(CHALLENGE_REQUEST));
        }
        RequestKind::Challenge => buf.put_i32_le(CHALLENGE_REQUEST),
    }

    buf.freeze()
}
