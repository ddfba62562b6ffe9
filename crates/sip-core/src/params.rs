//! Ordered, case-insensitive-by-key parameter lists (`;key=value` / `?key=value&...`).
//!
//! Shared by [`crate::types::uri::SipUri`] (URI params + URI headers), by
//! [`crate::types::via::Via`] (branch/received/rport/...), and by
//! [`crate::types::address::Address`] (the `tag` param). Keys are folded to
//! lowercase on insert; a bare token (no `=`) is stored with value `None`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamList(Vec<(String, Option<String>)>);

impl ParamList {
    /// Parse a `;`-separated parameter run (no leading `;`).
    pub fn parse(s: &str) -> ParamList {
        let mut list = ParamList::default();
        for part in s.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((k, v)) => list.insert(k.trim().to_string(), Some(v.trim().to_string())),
                None => list.insert(part.to_string(), None),
            }
        }
        list
    }

    pub fn insert(&mut self, key: String, value: Option<String>) {
        let key = key.to_ascii_lowercase();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) {
        let key = key.to_ascii_lowercase();
        self.0.retain(|(k, _)| *k != key);
    }

    /// The value of `key`, or `None` if absent *or* present as a bare flag.
    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.to_ascii_lowercase();
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.clone())
    }

    /// True if `key` is present at all (flag or valued).
    pub fn contains(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.0.iter().any(|(k, _)| *k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Option<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
