//! Error types produced by this crate.

use thiserror::Error;

/// Result alias for fallible operations in `sip-core`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing, serializing, or negotiating SIP/SDP data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The start line of a SIP message could not be parsed.
    #[error("invalid SIP start line: {0}")]
    InvalidStartLine(String),

    /// A message carried no recognizable start line at all.
    #[error("empty SIP message")]
    EmptyMessage,

    /// Negotiation could not find a common audio media section in the offer.
    #[error("offer contains no audio media")]
    NoAudio,

    /// Negotiation could not find any offered codec in the supported set.
    #[error("no matching codec found: offered {offered:?}, supported {supported:?}")]
    NoCommonCodec {
        /// Encoding names (or payload types when unnamed) offered by the peer.
        offered: Vec<String>,
        /// Payload types this endpoint is willing to use.
        supported: Vec<u8>,
    },
}
