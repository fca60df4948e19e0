//! Decoding of repeated-record replies (players, rules).
//!
//! ```text
//! [Header(5)] [Count(1|2)] [Record] [Record] ...
//! ```
//!
//! The count starts at offset 5. Records follow back to back with no
//! separator, each decoded by the generic schema walk.

use crate::core::response::RESPONSE_HEADER_LEN;
use crate::core::wire::WireReader;
use crate::error::Result;
use crate::protocol::schema::{decode_record, DecodeOptions, Record};

/// A record that arrives as a counted list
pub trait ListRecord: Record {
    /// Width of the leading count in bytes (1 or 2)
    const COUNT_WIDTH: usize = 1;
}

/// Decode every record of a list reply.
///
/// Fails with a truncated-response error if the buffer runs out before the
/// stated count is reached; a partial list is never returned.
pub fn decode_list<R: ListRecord>(data: &[u8]) -> Result<Vec<R>> {
    decode_list_with_remainder(data).map(|(records, _)| records)
}

/// Like [`decode_list`], also returning the bytes after the last record
pub fn decode_list_with_remainder<R: ListRecord>(data: &[u8]) -> Result<(Vec<R>, &[u8])> {
    let mut reader = WireReader::new(data);
    reader.skip("header", RESPONSE_HEADER_LEN)?;

    let count = match R::COUNT_WIDTH {
        2 => usize::from(reader.read_u16("count")?),
        _ => usize::from(reader.read_u8("count")?),
    };

    // a record is at least one byte, so the buffer bounds the allocation
    let mut records = Vec::with_capacity(count.min(reader.remaining().len()));
    let mut rest = reader.remaining();

    for _ in 0..count {
        let (record, next) = decode_record::<R>(rest, DecodeOptions::default())?;
        records.push(record);
        rest = next;
    }

    Ok((records, rest))
}
