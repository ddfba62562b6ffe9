//! Structured header and grammar types shared across request/response parsing.

pub mod address;
pub mod auth;
pub mod cseq;
pub mod header_name;
pub mod method;
pub mod uri;
pub mod via;

pub use address::Address;
pub use auth::Auth;
pub use cseq::CSeq;
pub use method::Method;
pub use uri::{Scheme, SipUri};
pub use via::Via;
