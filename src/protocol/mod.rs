//! # Query Protocol
//!
//! Response decoding and session state for the A2S queries.
//!
//! ## Components
//! - **Schema**: field descriptors and the generic record decoder
//! - **List**: counted lists of records (players, rules)
//! - **Models**: `ServerInfo`, `Player`, `Rule` and their enums
//! - **Challenge**: the per-session anti-spoofing token

pub mod challenge;
pub mod list;
pub mod models;
pub mod schema;

pub use challenge::ChallengeState;
pub use list::{decode_list, ListRecord};
pub use models::{AntiCheat, EdfFlags, Environment, Player, Rule, ServerInfo, ServerType, Visibility};
pub use schema::{decode_record, DecodeOptions, FieldDescriptor, FieldMode, FieldValue, Record, WireKind};
