//! WWW-Authenticate / Authorization-style header values.
//!
//! Out of scope for this core is the actual challenge/response flow (the
//! upstream proxy owns authentication, see the crate-level docs) but the
//! value grammar is still needed to pass an auth header through a
//! parse/modify/serialize round-trip intact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed auth header value: a scheme token plus `key=value` params.
///
/// Used for both challenges (`WWW-Authenticate`, `Proxy-Authenticate`) and
/// credentials (`Authorization`, `Proxy-Authorization`) — the grammar is
/// identical, only the direction of use differs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub scheme: String,
    pub params: Vec<(String, String)>,
}

impl Auth {
    pub fn parse(s: &str) -> Auth {
        let s = s.trim();
        let (scheme, param_str) = match s.split_once(' ') {
            Some((scheme, rest)) => (scheme, rest),
            None => (s, ""),
        };

        let mut params = Vec::new();
        for part in split_auth_params(param_str) {
            let part = part.trim();
            if let Some((key, val)) = part.split_once('=') {
                let val = val.trim();
                let val = val.strip_prefix('"').and_then(|v| v.strip_suffix('"')).unwrap_or(val);
                params.push((key.trim().to_string(), val.to_string()));
            }
        }

        Auth { scheme: scheme.to_string(), params }
    }
}

/// Split on commas, respecting quoted strings (auth param values may contain
/// commas inside quotes, e.g. a `qop` list or an opaque nonce).
fn split_auth_params(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in s.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.scheme)?;
        let rendered: Vec<String> = self
            .params
            .iter()
            .map(|(key, val)| {
                let is_bare = !val.is_empty()
                    && (val.chars().all(|c| c.is_ascii_digit())
                        || val.eq_ignore_ascii_case("true")
                        || val.eq_ignore_ascii_case("false"));
                if is_bare {
                    format!("{}={}", key, val)
                } else {
                    format!("{}=\"{}\"", key, val)
                }
            })
            .collect();
        f.write_str(&rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digest_challenge() {
        let auth = Auth::parse(
            r#"Digest realm="atlanta.example.com", nonce="84a4cc6f3082121f32b42a2187831a9e", qop="auth""#,
        );
        assert_eq!(auth.scheme, "Digest");
        assert_eq!(
            auth.params.iter().find(|(k, _)| k == "realm").map(|(_, v)| v.as_str()),
            Some("atlanta.example.com")
        );
    }

    #[test]
    fn numeric_values_are_not_requoted() {
        let auth = Auth::parse(r#"Digest stale=true, nc=1"#);
        let rendered = auth.to_string();
        assert!(rendered.contains("stale=true"));
        assert!(rendered.contains("nc=1"));
        assert!(!rendered.contains("nc=\"1\""));
    }
}
