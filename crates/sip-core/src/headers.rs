//! A case-insensitive, order-preserving, multi-valued header container.
//!
//! Lookups fold on the header name; insertion order is preserved for
//! serialization, and the first-seen casing of a name is kept for display
//! even though lookups never care about it.

use serde::{Deserialize, Serialize};

use crate::parser::separators::split_top_level_commas;
use crate::types::header_name::is_multi_instance;

/// One header line as stored internally: the casing it was first seen with,
/// and its raw (unparsed) value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    name: String,
    value: String,
}

/// An ordered multimap of header name to value, case-insensitive on name.
///
/// Headers that RFC 3261 allows to repeat (Via, Contact, Route, ...) keep
/// every instance; headers that don't are expected to have at most one
/// entry, but this container does not enforce that — callers that split a
/// comma-joined line do so themselves (see [`crate::message::split_header_values`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMap {
    entries: Vec<Entry>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    /// Append a header, keeping prior entries of the same name (used for
    /// headers that are allowed to repeat, or to accumulate header lines
    /// while parsing before any multi-value splitting happens).
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Entry { name: name.into(), value: value.into() });
    }

    /// Set a header to a single value, replacing every existing instance.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let lower = name.to_ascii_lowercase();
        self.entries.retain(|e| e.name.to_ascii_lowercase() != lower);
        self.entries.push(Entry { name, value: value.into() });
    }

    pub fn remove(&mut self, name: &str) {
        let lower = name.to_ascii_lowercase();
        self.entries.retain(|e| e.name.to_ascii_lowercase() != lower);
    }

    /// The first value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        let lower = name.to_ascii_lowercase();
        self.entries.iter().find(|e| e.name.to_ascii_lowercase() == lower).map(|e| e.value.as_str())
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        let lower = name.to_ascii_lowercase();
        self.entries.iter().filter(|e| e.name.to_ascii_lowercase() == lower).map(|e| e.value.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.entries.iter().any(|e| e.name.to_ascii_lowercase() == lower)
    }

    /// Split any comma-joined values for headers RFC 3261 allows to repeat
    /// (Via, Contact, Route, ...) into separate entries, respecting `<>`
    /// and `""` nesting so a comma inside a quoted display name or a URI
    /// header list doesn't split a single value in two.
    pub fn normalize_multi_values(&mut self) {
        let mut normalized = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            let lower = entry.name.to_ascii_lowercase();
            if is_multi_instance(&lower) {
                for piece in split_respecting_nesting(&entry.value) {
                    normalized.push(Entry { name: entry.name.clone(), value: piece });
                }
            } else {
                normalized.push(entry);
            }
        }
        self.entries = normalized;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Split `s` on top-level commas, treating `<...>` and `"..."` runs as
/// opaque (a comma inside either is not a separator).
pub fn split_respecting_nesting(s: &str) -> Vec<String> {
    split_top_level_commas(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_but_preserves_first_casing() {
        let mut map = HeaderMap::new();
        map.append("Call-ID", "abc123@atlanta.example.com");
        assert_eq!(map.get("call-id"), Some("abc123@atlanta.example.com"));
        assert_eq!(map.iter().next().unwrap().0, "Call-ID");
    }

    #[test]
    fn multi_value_via_splits_on_comma() {
        let mut map = HeaderMap::new();
        map.append("Via", "SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/UDP b.example.com;branch=z9hG4bK2");
        map.normalize_multi_values();
        assert_eq!(map.get_all("via").len(), 2);
    }

    #[test]
    fn comma_inside_angle_brackets_does_not_split() {
        let parts = split_respecting_nesting("<sip:proxy.example.com;lr>, <sip:proxy2.example.com;lr>");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "<sip:proxy.example.com;lr>");
    }

    #[test]
    fn comma_inside_quotes_does_not_split() {
        let parts = split_respecting_nesting(r#""Smith, John" <sip:j@example.com>"#);
        assert_eq!(parts.len(), 1);
    }
}
