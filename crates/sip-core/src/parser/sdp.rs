//! Line- and field-splitting combinators for SDP (RFC 4566 §5), ported from
//! the grounding corpus's `parser/` whitespace- and separator-handling style.

use nom::character::complete::{anychar, char, space1};
use nom::combinator::rest;
use nom::multi::separated_list1;
use nom::bytes::complete::is_not;
use nom::sequence::tuple;

use super::separators::split_first;
use super::ParseResult;

/// `type "=" value` (RFC 4566 §5): a single-letter field type immediately
/// followed by `=`, with no intervening whitespace.
pub fn type_line(line: &str) -> Option<(char, &str)> {
    tuple((anychar, char('='), rest))(line).ok().map(|(_, (t, _, v))| (t, v))
}

fn token(input: &str) -> ParseResult<&str> {
    is_not(" \t")(input)
}

/// Split `value` on runs of whitespace into tokens, the shape most SDP
/// field bodies (`o=`, `c=`, `t=`, `m=`) share.
pub fn whitespace_fields(value: &str) -> Vec<&str> {
    match separated_list1(space1, token)(value) {
        Ok((_, fields)) => fields,
        Err(_) => vec![value],
    }
}

/// `key ":" value`, as used by `b=` lines and colon-valued `a=` attributes.
pub fn colon_pair(value: &str) -> (&str, Option<&str>) {
    split_first(value, ':')
}
