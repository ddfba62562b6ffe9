//! Name-addr / addr-spec address values (RFC 3261 §20.10), used by From, To,
//! and Contact.
//!
//! ```text
//! "Alice" <sip:alice@atlanta.example.com>;tag=1928301774
//! sip:bob@biloxi.example.com;tag=a6c85cf
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::ParamList;
use crate::types::uri::SipUri;

/// A parsed From/To/Contact value.
///
/// Address-level parameters (of which `tag` is the only one this codec
/// currently special-cases) are kept separate from the URI's own
/// parameters, since in addr-spec form the two are syntactically ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: Option<String>,
    pub uri: SipUri,
    pub params: ParamList,
}

impl Default for Address {
    fn default() -> Self {
        Address {
            display_name: None,
            uri: SipUri::default(),
            params: ParamList::default(),
        }
    }
}

impl Address {
    pub fn parse(s: &str) -> Address {
        let s = s.trim();
        let mut addr = Address::default();

        if let (Some(lt), Some(gt)) = (s.find('<'), s.find('>')) {
            if gt > lt {
                let display = s[..lt].trim();
                let display = display.strip_prefix('"').and_then(|d| d.strip_suffix('"')).unwrap_or(display);
                if !display.is_empty() {
                    addr.display_name = Some(display.to_string());
                }
                addr.uri = SipUri::parse(&s[lt + 1..gt]);
                let after = s[gt + 1..].trim();
                if let Some(stripped) = after.strip_prefix(';') {
                    addr.params = ParamList::parse(stripped);
                }
                return addr;
            }
        }

        // addr-spec: no angle brackets. `tag` is pulled out as an address
        // param; everything else belongs to the URI (it shares `;` syntax
        // with URI params and there is no unambiguous way to tell them
        // apart beyond this heuristic).
        if let Some(idx) = s.find(';') {
            let (base, param_str) = s.split_at(idx);
            let param_str = &param_str[1..];
            let mut uri_parts = vec![base];
            let mut addr_parts = Vec::new();
            for part in param_str.split(';') {
                let key = part.split('=').next().unwrap_or("").trim().to_ascii_lowercase();
                if key == "tag" {
                    addr_parts.push(part);
                } else {
                    uri_parts.push(part);
                }
            }
            addr.uri = SipUri::parse(&uri_parts.join(";"));
            if !addr_parts.is_empty() {
                addr.params = ParamList::parse(&addr_parts.join(";"));
            }
        } else {
            addr.uri = SipUri::parse(s);
        }

        addr
    }

    pub fn tag(&self) -> Option<String> {
        self.params.get("tag")
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.params.insert("tag".to_string(), Some(tag.into()));
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "\"{}\" <{}>", name, self.uri)?,
            None => write!(f, "<{}>", self.uri)?,
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
