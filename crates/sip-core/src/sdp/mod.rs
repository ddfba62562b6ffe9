//! SDP (RFC 4566) parsing, serialization, building, and RFC 3264
//! offer/answer negotiation.

mod build;
mod codec_table;
mod negotiate;
mod parse;
mod serialize;
pub mod types;

pub use build::{build_sdp, BuildParams};
pub use negotiate::{negotiate_sdp, NegotiateParams};
pub use parse::parse_sdp;
pub use serialize::serialize_sdp;
pub use types::{AttributeMap, Bandwidth, Codec, ConnectionData, MediaDescription, Origin, SdpMessage, TimingField};
