//! Grammar combinators shared by the header, URI, and message parsers.
//!
//! This mirrors the grounding corpus's `parser/` module (`whitespace.rs`,
//! `separators.rs`, `uri/`) but over `&str` rather than `&[u8]`, since every
//! type in this codec stores its fields as `String`.

pub mod message;
pub mod sdp;
pub mod separators;
pub mod uri;

use nom::IResult;

pub type ParseResult<'a, O> = IResult<&'a str, O>;
