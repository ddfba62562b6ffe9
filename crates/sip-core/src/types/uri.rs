//! SIP and SIPS URIs (RFC 3261 §19.1).
//!
//! ```text
//! sip:alice@atlanta.example.com
//! sips:bob@biloxi.example.com:5061;transport=tls
//! sip:[2001:db8::1]:5060
//! ```

use std::fmt;
use std::str::FromStr;

use nom::bytes::complete::tag_no_case;
use serde::{Deserialize, Serialize};

use crate::params::ParamList;
use crate::parser::separators::split_first;
use crate::parser::uri::header_pairs;
use crate::parser::uri::hostport as parse_hostport_str;
use crate::parser::ParseResult;

/// URI scheme: `sip` or `sips`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    Sip,
    Sips,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
        })
    }
}

impl FromStr for Scheme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sip" => Ok(Scheme::Sip),
            "sips" => Ok(Scheme::Sips),
            _ => Err(()),
        }
    }
}

/// A parsed SIP or SIPS URI.
///
/// Parameters and URI-headers preserve insertion order so that a value
/// produced by [`SipUri::parse`] round-trips through [`ToString`] unchanged
/// in structure (though not necessarily byte-for-byte, since whitespace
/// around `;`/`&` separators is not preserved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipUri {
    pub scheme: Scheme,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub params: ParamList,
    pub headers: ParamList,
}

impl Default for SipUri {
    fn default() -> Self {
        SipUri {
            scheme: Scheme::Sip,
            user: None,
            host: String::new(),
            port: None,
            params: ParamList::default(),
            headers: ParamList::default(),
        }
    }
}

/// `"sip:"` / `"sips:"`, case-insensitively.
fn scheme_tag(input: &str) -> ParseResult<Scheme> {
    nom::branch::alt((
        nom::combinator::value(Scheme::Sips, tag_no_case("sips:")),
        nom::combinator::value(Scheme::Sip, tag_no_case("sip:")),
    ))(input)
}

impl SipUri {
    /// Parse a URI string, tolerating malformed parameter/port sections.
    ///
    /// A bad port (non-numeric text after the last `:`) is not an error:
    /// the whole host:port run is kept as the host, matching the tolerant
    /// behavior the rest of this codec follows.
    pub fn parse(s: &str) -> SipUri {
        let s = s.trim();
        let mut uri = SipUri::default();

        let rest = match scheme_tag(s) {
            Ok((rest, scheme)) => {
                uri.scheme = scheme;
                rest
            }
            Err(_) => s,
        };

        // URI headers after '?'
        let (rest, header_part) = split_first(rest, '?');
        if let Some(hdrs) = header_part {
            for (k, v) in header_pairs(hdrs) {
                uri.headers.insert(k, Some(v));
            }
        }

        // Parameters after the first ';' that follows the hostport.
        let (rest, param_part) = split_first(rest, ';');
        if let Some(params) = param_part {
            uri.params = ParamList::parse(params);
        }

        // user@hostport
        let (hostport, user) = match split_first(rest, '@') {
            (user, Some(hostport)) => (hostport, Some(user)),
            (hostport, None) => (hostport, None),
        };
        uri.user = user.map(|u| u.to_string());

        let (host, port) = parse_hostport_str(hostport);
        uri.host = host;
        uri.port = port;

        uri
    }
}

/// Split a `host[:port]` run, honoring bracketed IPv6 literals (RFC 3261
/// §19.1 `hostport`). Delegates to [`crate::parser::uri::hostport`].
pub(crate) fn parse_hostport(hostport_str: &str, host: &mut String, port: &mut Option<u16>) {
    let (h, p) = parse_hostport_str(hostport_str);
    *host = h;
    *port = p;
}

impl fmt::Display for SipUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(user) = &self.user {
            write!(f, "{}@", user)?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        for (key, val) in self.params.iter() {
            match val {
                Some(v) => write!(f, ";{}={}", key, v)?,
                None => write!(f, ";{}", key)?,
            }
        }
        if !self.headers.is_empty() {
            f.write_str("?")?;
            let mut first = true;
            for (key, val) in self.headers.iter() {
                if !first {
                    f.write_str("&")?;
                }
                first = false;
                write!(f, "{}={}", key, val.as_deref().unwrap_or(""))?;
            }
        }
        Ok(())
    }
}

impl FromStr for SipUri {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SipUri::parse(s))
    }
}
