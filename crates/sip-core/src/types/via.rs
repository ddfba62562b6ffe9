//! The Via header (RFC 3261 §20.42).
//!
//! ```text
//! Via: SIP/2.0/UDP pc33.atlanta.example.com:5060;branch=z9hG4bK776asdhds
//! ```
//!
//! Records the hop a request took so a response can be routed back; also
//! carries NAT-traversal parameters (`received`, `rport`) that a transport's
//! Via-based response routing reads.

use std::fmt;

use nom::bytes::complete::is_not;
use nom::character::complete::{char, space1};
use nom::sequence::{terminated, tuple};
use serde::{Deserialize, Serialize};

use crate::params::ParamList;
use crate::parser::separators::split_first;
use crate::parser::ParseResult;
use crate::types::uri::parse_hostport;

/// The RFC 3261 magic cookie every outbound branch parameter must begin with.
pub const MAGIC_COOKIE: &str = "z9hG4bK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    pub protocol: String,
    pub transport: String,
    pub host: String,
    pub port: Option<u16>,
    pub params: ParamList,
}

impl Default for Via {
    fn default() -> Self {
        Via {
            protocol: "SIP/2.0".to_string(),
            transport: "UDP".to_string(),
            host: String::new(),
            port: None,
            params: ParamList::default(),
        }
    }
}

/// `sent-protocol` (RFC 3261 §20.42): `protocol-name "/" protocol-version
/// "/" transport`, e.g. `SIP/2.0/UDP`, followed by `SWS`.
fn sent_protocol(input: &str) -> ParseResult<(&str, &str, &str)> {
    tuple((
        terminated(is_not("/ \t"), char('/')),
        terminated(is_not("/ \t"), char('/')),
        terminated(is_not(" \t"), space1),
    ))(input)
}

impl Via {
    pub fn new(transport: &str, host: &str, port: Option<u16>, branch: impl Into<String>) -> Via {
        let mut via = Via {
            transport: transport.to_ascii_uppercase(),
            host: host.to_string(),
            port,
            ..Via::default()
        };
        via.params.insert("branch".to_string(), Some(branch.into()));
        via
    }

    pub fn parse(s: &str) -> Via {
        let s = s.trim();
        let mut via = Via::default();

        let rest = match sent_protocol(s) {
            Ok((rest, (name, version, transport))) => {
                via.protocol = format!("{}/{}", name, version);
                via.transport = transport.to_ascii_uppercase();
                rest
            }
            Err(_) => s,
        };

        let (sentby, param_str) = split_first(rest, ';');
        if let Some(params) = param_str {
            via.params = ParamList::parse(params);
        }

        parse_hostport(sentby.trim(), &mut via.host, &mut via.port);

        via
    }

    pub fn branch(&self) -> Option<String> {
        self.params.get("branch")
    }

    pub fn received(&self) -> Option<String> {
        self.params.get("received")
    }

    /// The `rport` value, distinguishing "absent", "flag" (`Some(None)`), and
    /// "has a value" (`Some(Some(_))`) the way RFC 3261 §18.2.1 requires for
    /// response routing.
    pub fn rport_raw(&self) -> Option<Option<String>> {
        if !self.params.contains("rport") {
            return None;
        }
        Some(self.params.get("rport"))
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.protocol, self.transport, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        for (key, val) in self.params.iter() {
            match val {
                Some(v) => write!(f, ";{}={}", key, v)?,
                None => write!(f, ";{}", key)?,
            }
        }
        Ok(())
    }
}
