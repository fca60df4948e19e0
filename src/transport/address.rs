//! Server address parsing and resolution.
//!
//! Accepted forms:
//! - `host:port`
//! - `host,port`
//! - `steam://connect/host:port`
//! - `[v6addr]:port`

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use tracing::debug;

use crate::error::{constants, QueryError, Result};

const STEAM_CONNECT_PREFIX: &str = "steam://connect/";

/// A host and port as written by the user, not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse one of the accepted address forms.
    ///
    /// The port must be an integer in `0..=65535`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix(STEAM_CONNECT_PREFIX).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(QueryError::InvalidArgument(
                constants::ERR_EMPTY_ADDRESS.to_string(),
            ));
        }

        let (host, port) = trimmed
            .rsplit_once(',')
            .or_else(|| trimmed.rsplit_once(':'))
            .ok_or_else(|| {
                QueryError::InvalidArgument(format!("{}: '{input}'", constants::ERR_MISSING_PORT))
            })?;

        let host = host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(QueryError::InvalidArgument(format!(
                "Missing host in '{input}'"
            )));
        }

        Ok(Self::new(host, parse_port(port.trim())?))
    }

    /// Resolve to a socket address, taking the first DNS answer
    pub async fn resolve(&self) -> Result<SocketAddr> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                QueryError::InvalidArgument(format!(
                    "{} '{}': {e}",
                    constants::ERR_HOST_UNREACHABLE,
                    self.host
                ))
            })?;

        let addr = addrs.next().ok_or_else(|| {
            QueryError::InvalidArgument(format!("Invalid host address {}", self.host))
        })?;
        debug!(host = %self.host, resolved = %addr, "Resolved server address");
        Ok(addr)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl std::str::FromStr for ServerAddress {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| QueryError::InvalidArgument(format!("Invalid port '{raw}'")))?;
    u16::try_from(value).map_err(|_| {
        QueryError::InvalidArgument(format!("Port {value} out of range [0, 65535]"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_forms() {
        for input in [
            "127.0.0.1:27015",
            "127.0.0.1,27015",
            "steam://connect/127.0.0.1:27015",
        ] {
            let addr = ServerAddress::parse(input).unwrap();
            assert_eq!(addr, ServerAddress::new("127.0.0.1", 27015), "{input}");
        }

        let addr = ServerAddress::parse("localhost,27015").unwrap();
        assert_eq!(addr.host, "localhost");
    }

    #[test]
    fn test_ipv6_brackets() {
        let addr = ServerAddress::parse("[::1]:27015").unwrap();
        assert_eq!(addr.host, "::1");
        assert_eq!(addr.to_string(), "[::1]:27015");
    }

    #[test]
    fn test_rejects_bad_ports() {
        for input in [
            "invalidHost:-1",
            "invalidHost,-1",
            "invalidHost:65536",
            "invalidHost,65536",
            "host:abc",
            "host",
            ":27015",
            "",
        ] {
            assert!(
                matches!(
                    ServerAddress::parse(input),
                    Err(QueryError::InvalidArgument(_))
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn test_port_bounds() {
        assert_eq!(ServerAddress::parse("h:0").unwrap().port, 0);
        assert_eq!(ServerAddress::parse("h:65535").unwrap().port, 65535);
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let addr = ServerAddress::new("127.0.0.1", 27015).resolve().await.unwrap();
        assert_eq!(addr, "127.0.0.1:27015".parse::<SocketAddr>().unwrap());
    }
}
