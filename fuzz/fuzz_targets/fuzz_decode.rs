#![no_main]

use libfuzzer_sys::fuzz_target;
use source_query::core::response::ResponseHeader;
use source_query::protocol::challenge::parse_challenge;
use source_query::protocol::schema::{decode_record, DecodeOptions};
use source_query::protocol::{decode_list, Player, Rule, ServerInfo};

fuzz_target!(|data: &[u8]| {
    // Untrusted datagrams must only ever produce errors, never panics
    let _ = ResponseHeader::parse(data);
    let _ = parse_challenge(data);
    let _ = decode_record::<ServerInfo>(data, DecodeOptions::response(ServerInfo::EDF_FIELD));
    let _ = decode_list::<Player>(data);
    let _ = decode_list::<Rule>(data);
});
