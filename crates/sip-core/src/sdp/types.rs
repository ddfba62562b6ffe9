//! SDP data model (RFC 4566).

use serde::{Deserialize, Serialize};

/// An ordered multimap of `a=` attribute name to its values, preserving both
/// key insertion order and, for a repeated key, value order. A flag
/// attribute (no `:value`) is stored with an empty value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap(Vec<(String, Vec<String>)>);

impl AttributeMap {
    pub fn add(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        let entry = self.0.iter_mut().find(|(k, _)| *k == key);
        match entry {
            Some((_, values)) => {
                if let Some(v) = value {
                    values.push(v);
                }
            }
            None => {
                let values = value.into_iter().collect();
                self.0.push((key, values));
            }
        }
    }

    /// Ensure `key` exists (as a flag) without adding a value if already present.
    pub fn ensure(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.0.iter().any(|(k, _)| *k == key) {
            self.0.push((key, Vec::new()));
        }
    }

    pub fn get(&self, key: &str) -> &[String] {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// SDP `o=` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub username: String,
    pub session_id: String,
    pub session_version: String,
    pub net_type: String,
    pub addr_type: String,
    pub address: String,
}

impl Default for Origin {
    fn default() -> Self {
        Origin {
            username: "-".to_string(),
            session_id: "0".to_string(),
            session_version: "0".to_string(),
            net_type: "IN".to_string(),
            addr_type: "IP4".to_string(),
            address: "0.0.0.0".to_string(),
        }
    }
}

/// SDP `c=` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub net_type: String,
    pub addr_type: String,
    pub address: String,
}

impl Default for ConnectionData {
    fn default() -> Self {
        ConnectionData { net_type: "IN".to_string(), addr_type: "IP4".to_string(), address: "0.0.0.0".to_string() }
    }
}

/// SDP `b=` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandwidth {
    pub bwtype: String,
    pub bandwidth: u64,
}

/// SDP `t=` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingField {
    pub start_time: u64,
    pub stop_time: u64,
}

/// A codec extracted from `a=rtpmap`/`a=fmtp` attributes, or synthesized
/// from the RFC 3551 static payload type table when no `rtpmap` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codec {
    pub payload_type: u8,
    pub encoding_name: String,
    pub clock_rate: u32,
    pub channels: Option<u8>,
    pub fmtp: Option<String>,
}

/// An `m=` section and the fields that belong to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescription {
    pub media: String,
    pub port: u16,
    pub proto: String,
    pub formats: Vec<String>,
    pub connection: Option<ConnectionData>,
    pub bandwidths: Vec<Bandwidth>,
    pub attributes: AttributeMap,
    pub codecs: Vec<Codec>,
}

impl MediaDescription {
    /// Media direction, per the first of these four attributes present;
    /// `sendrecv` is the RFC 3264 default when none are given.
    pub fn direction(&self) -> &'static str {
        for d in ["sendrecv", "sendonly", "recvonly", "inactive"] {
            if self.attributes.contains(d) {
                return d;
            }
        }
        "sendrecv"
    }
}

/// A complete SDP session description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpMessage {
    pub version: u32,
    pub origin: Origin,
    pub session_name: String,
    pub connection: Option<ConnectionData>,
    pub bandwidths: Vec<Bandwidth>,
    pub timing: TimingField,
    pub attributes: AttributeMap,
    pub media: Vec<MediaDescription>,
}

impl SdpMessage {
    /// The first audio media section, if any.
    pub fn audio(&self) -> Option<&MediaDescription> {
        self.media.iter().find(|m| m.media == "audio")
    }

    /// `(address, port)` for the first audio stream: media-level `c=` takes
    /// priority over the session-level one.
    pub fn rtp_address(&self) -> Option<(&str, u16)> {
        let audio = self.audio()?;
        let conn = audio.connection.as_ref().or(self.connection.as_ref())?;
        Some((conn.address.as_str(), audio.port))
    }
}
