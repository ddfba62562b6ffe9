//! Separator combinators, ported from the grounding corpus's
//! `parser/separators.rs` (SWS-wrapped delimiters) to the nesting-aware
//! comma split RFC 3261 multi-value headers need: a comma inside `<...>`
//! or `"..."` is not a separator (RFC 3261 §7.3.1, §20 header ABNF).

use nom::branch::alt;
use nom::bytes::complete::{is_not, take_till};
use nom::character::complete::char;
use nom::combinator::{recognize, rest};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, separated_pair};

use super::ParseResult;

/// Split `input` at the first occurrence of `delim`, consuming it; `None`
/// in the second slot if `delim` never appears in `input`.
pub fn split_first(input: &str, delim: char) -> (&str, Option<&str>) {
    match separated_pair(take_till(move |c| c == delim), char(delim), rest)(input) {
        Ok((_, (before, after))) => (before, Some(after)),
        Err(_) => (input, None),
    }
}

/// One top-level run between commas: a `<...>` span, a `"..."` span, or a
/// stretch of plain characters, repeated until a top-level comma.
fn piece(input: &str) -> ParseResult<&str> {
    recognize(many0(alt((
        recognize(delimited(char('<'), is_not(">"), char('>'))),
        recognize(delimited(char('"'), is_not("\""), char('"'))),
        is_not("<\","),
    ))))(input)
}

/// Split `s` on top-level commas, treating `<...>` and `"..."` runs as
/// opaque so a comma inside a quoted display name or a URI header list
/// doesn't split a single value in two.
pub fn split_top_level_commas(s: &str) -> Vec<String> {
    match separated_list1(char(','), piece)(s) {
        Ok((_, parts)) => parts.iter().map(|p| p.trim().to_string()).collect(),
        Err(_) => vec![s.trim().to_string()],
    }
}
