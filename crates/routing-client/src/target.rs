//! Parsing of engine endpoint addresses.

use std::fmt;
use std::str::FromStr;

use crate::error::RoutingError;

/// A routing engine endpoint, `tcp://host:port` or bare `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address suitable for `TcpStream::connect`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for Target {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| RoutingError::InvalidTarget {
            target: s.to_string(),
            message: message.to_string(),
        };

        let rest = match s.split_once("://") {
            Some(("tcp", rest)) => rest,
            Some((scheme, _)) => return Err(invalid(&format!("unsupported scheme '{}'", scheme))),
            None => s,
        };

        let (host, port) = rest
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected host:port"))?;

        // [::1]:6000
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| invalid(&format!("invalid port '{}'", port)))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "tcp://[{}]:{}", self.host, self.port)
        } else {
            write!(f, "tcp://{}:{}", self.host, self.port)
        }
    }
}
