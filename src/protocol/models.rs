//! Typed records returned by the three queries, with their wire schemas.

use std::time::Duration;

use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::protocol::list::ListRecord;
use crate::protocol::schema::{FieldDescriptor, FieldValue, Record, WireKind};

/// Extra data flag bits of an INFO reply
pub struct EdfFlags;

impl EdfFlags {
    pub const PORT: u8 = 0x80;
    pub const STEAM_ID: u8 = 0x10;
    /// Gates both the SourceTV port and the SourceTV name
    pub const SOURCE_TV: u8 = 0x40;
    pub const KEYWORDS: u8 = 0x20;
    pub const GAME_ID: u8 = 0x01;
}

/// Kind of server answering the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ServerType {
    #[default]
    Dedicated,
    NonDedicated,
    SourceTv,
}

impl ServerType {
    pub const DOMAIN: &'static [u8] = &[b'd', b'l', b'p'];
}

impl TryFrom<u8> for ServerType {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            b'd' => Ok(ServerType::Dedicated),
            b'l' => Ok(ServerType::NonDedicated),
            b'p' => Ok(ServerType::SourceTv),
            _ => Err(QueryError::InvalidFieldValue {
                field: "server_type",
                value: u64::from(value),
            }),
        }
    }
}

/// Operating system of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Environment {
    #[default]
    Linux,
    Windows,
    Mac,
}

impl Environment {
    /// `m` and `o` both denote macOS
    pub const DOMAIN: &'static [u8] = &[b'l', b'w', b'm', b'o'];
}

impl TryFrom<u8> for Environment {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            b'l' => Ok(Environment::Linux),
            b'w' => Ok(Environment::Windows),
            b'm' | b'o' => Ok(Environment::Mac),
            _ => Err(QueryError::InvalidFieldValue {
                field: "environment",
                value: u64::from(value),
            }),
        }
    }
}

/// Whether the server requires a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub const DOMAIN: &'static [u8] = &[0, 1];
}

impl TryFrom<u8> for Visibility {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Visibility::Public),
            1 => Ok(Visibility::Private),
            _ => Err(QueryError::InvalidFieldValue {
                field: "visibility",
                value: u64::from(value),
            }),
        }
    }
}

/// Whether the server runs Valve Anti-Cheat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AntiCheat {
    #[default]
    Unsecured,
    Secured,
}

impl AntiCheat {
    pub const DOMAIN: &'static [u8] = &[0, 1];
}

impl TryFrom<u8> for AntiCheat {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(AntiCheat::Unsecured),
            1 => Ok(AntiCheat::Secured),
            _ => Err(QueryError::InvalidFieldValue {
                field: "anti_cheat",
                value: u64::from(value),
            }),
        }
    }
}

/// Reply to an INFO query.
///
/// Fields after `edf` are present only when the matching [`EdfFlags`] bit is
/// set; otherwise they hold their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerInfo {
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    /// Steam application id, truncated to 16 bits on the wire
    pub app_id: i16,
    /// Player count as sent, bots included. See [`ServerInfo::players`].
    pub raw_players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: ServerType,
    pub environment: Environment,
    pub visibility: Visibility,
    pub anti_cheat: AntiCheat,
    pub version: String,
    pub edf: u8,
    pub port: i16,
    pub steam_id: i64,
    pub source_tv_port: i16,
    pub source_tv_name: String,
    pub keywords: String,
    /// Full game id; its low 24 bits are the untruncated app id
    pub game_id: i64,
    /// Measured round trip of the INFO exchange
    pub latency: Duration,
}

impl ServerInfo {
    /// Name of the field that carries the extra data flags
    pub const EDF_FIELD: &'static str = "edf";

    /// Human players: the wire count minus bots
    pub fn players(&self) -> u8 {
        self.raw_players.saturating_sub(self.bots)
    }

    pub fn has_edf(&self, flag: u8) -> bool {
        self.edf & flag != 0
    }
}

impl Record for ServerInfo {
    const SCHEMA: &'static [FieldDescriptor] = &[
        FieldDescriptor::wire("protocol", WireKind::Byte),
        FieldDescriptor::wire("name", WireKind::CString),
        FieldDescriptor::wire("map", WireKind::CString),
        FieldDescriptor::wire("folder", WireKind::CString),
        FieldDescriptor::wire("game", WireKind::CString),
        FieldDescriptor::wire("app_id", WireKind::Int16),
        FieldDescriptor::wire("raw_players", WireKind::Byte),
        FieldDescriptor::wire("max_players", WireKind::Byte),
        FieldDescriptor::wire("bots", WireKind::Byte),
        FieldDescriptor::wire("server_type", WireKind::Enum(ServerType::DOMAIN)),
        FieldDescriptor::wire("environment", WireKind::Enum(Environment::DOMAIN)),
        FieldDescriptor::wire("visibility", WireKind::Enum(Visibility::DOMAIN)),
        FieldDescriptor::wire("anti_cheat", WireKind::Enum(AntiCheat::DOMAIN)),
        // The Ship (app 2400) inserts mode/witnesses/duration here
        FieldDescriptor::custom("ship"),
        FieldDescriptor::wire("version", WireKind::CString),
        FieldDescriptor::wire("edf", WireKind::Byte),
        FieldDescriptor::wire("port", WireKind::Int16).when_edf(EdfFlags::PORT),
        FieldDescriptor::wire("steam_id", WireKind::Int64).when_edf(EdfFlags::STEAM_ID),
        FieldDescriptor::wire("source_tv_port", WireKind::Int16).when_edf(EdfFlags::SOURCE_TV),
        FieldDescriptor::wire("source_tv_name", WireKind::CString).when_edf(EdfFlags::SOURCE_TV),
        FieldDescriptor::wire("keywords", WireKind::CString).when_edf(EdfFlags::KEYWORDS),
        FieldDescriptor::wire("game_id", WireKind::Int64).when_edf(EdfFlags::GAME_ID),
        FieldDescriptor::derived("latency", WireKind::Int64),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<()> {
        match field {
            "protocol" => self.protocol = value.into_u8(field)?,
            "name" => self.name = value.into_string(field)?,
            "map" => self.map = value.into_string(field)?,
            "folder" => self.folder = value.into_string(field)?,
            "game" => self.game = value.into_string(field)?,
            "app_id" => self.app_id = value.into_i16(field)?,
            "raw_players" => self.raw_players = value.into_u8(field)?,
            "max_players" => self.max_players = value.into_u8(field)?,
            "bots" => self.bots = value.into_u8(field)?,
            "server_type" => self.server_type = ServerType::try_from(value.into_u8(field)?)?,
            "environment" => self.environment = Environment::try_from(value.into_u8(field)?)?,
            "visibility" => self.visibility = Visibility::try_from(value.into_u8(field)?)?,
            "anti_cheat" => self.anti_cheat = AntiCheat::try_from(value.into_u8(field)?)?,
            "version" => self.version = value.into_string(field)?,
            "edf" => self.edf = value.into_u8(field)?,
            "port" => self.port = value.into_i16(field)?,
            "steam_id" => self.steam_id = value.into_i64(field)?,
            "source_tv_port" => self.source_tv_port = value.into_i16(field)?,
            "source_tv_name" => self.source_tv_name = value.into_string(field)?,
            "keywords" => self.keywords = value.into_string(field)?,
            "game_id" => self.game_id = value.into_i64(field)?,
            _ => return Err(QueryError::SchemaMismatch { field }),
        }
        Ok(())
    }

    /// More bots than players cannot come from a conforming server
    fn validate(&self) -> Result<()> {
        if self.bots > self.raw_players {
            return Err(QueryError::InvalidFieldValue {
                field: "bots",
                value: u64::from(self.bots),
            });
        }
        Ok(())
    }
}

/// One connected player
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Player {
    /// Slot index; servers commonly send 0 for everyone
    pub index: u8,
    pub name: String,
    pub score: i32,
    /// Seconds connected
    pub duration: f32,
}

impl Record for Player {
    const SCHEMA: &'static [FieldDescriptor] = &[
        FieldDescriptor::wire("index", WireKind::Byte),
        FieldDescriptor::wire("name", WireKind::CString),
        FieldDescriptor::wire("score", WireKind::Int32),
        FieldDescriptor::wire("duration", WireKind::Float32),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<()> {
        match field {
            "index" => self.index = value.into_u8(field)?,
            "name" => self.name = value.into_string(field)?,
            "score" => self.score = value.into_i32(field)?,
            "duration" => self.duration = value.into_f32(field)?,
            _ => return Err(QueryError::SchemaMismatch { field }),
        }
        Ok(())
    }
}

impl ListRecord for Player {
    const COUNT_WIDTH: usize = 1;
}

/// One server cvar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub value: String,
}

impl Record for Rule {
    const SCHEMA: &'static [FieldDescriptor] = &[
        FieldDescriptor::wire("name", WireKind::CString),
        FieldDescriptor::wire("value", WireKind::CString),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<()> {
        match field {
            "name" => self.name = value.into_string(field)?,
            "value" => self.value = value.into_string(field)?,
            _ => return Err(QueryError::SchemaMismatch { field }),
        }
        Ok(())
    }
}

impl ListRecord for Rule {
    /// Rule counts are 16-bit on the wire
    const COUNT_WIDTH: usize = 2;
}
