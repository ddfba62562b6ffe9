//! Start-line and header-section/body combinators (RFC 3261 §7), ported from
//! the grounding corpus's `parser/response.rs` splitn-on-whitespace style.

use nom::bytes::complete::{tag, take_till1, take_until};
use nom::character::complete::space1;
use nom::combinator::rest;
use nom::sequence::{terminated, tuple};

use super::separators::split_first;
use super::ParseResult;

/// Split on the first blank line (`CRLF CRLF` or bare `LF LF`), the boundary
/// RFC 3261 §7 draws between the header section and the body.
pub fn split_header_body(data: &str) -> (&str, &str) {
    if let Ok((body, headers)) = terminated(take_until("\r\n\r\n"), tag("\r\n\r\n"))(data) {
        return (headers, body);
    }
    if let Ok((body, headers)) = terminated(take_until("\n\n"), tag("\n\n"))(data) {
        return (headers, body);
    }
    (data, "")
}

/// `name ":" value`, trimmed on both sides (RFC 3261 §7.3.1 HCOLON is
/// whitespace-tolerant on either side of the colon).
pub fn header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = split_first(line, ':');
    value.map(|v| (name.trim(), v.trim()))
}

/// Three whitespace-separated fields, the shape both the request-line
/// (`method SP request-uri SP sip-version`) and status-line
/// (`sip-version SP status-code SP reason-phrase`) share, with the third
/// field kept intact (a reason phrase may itself contain spaces).
fn three_fields(input: &str) -> ParseResult<(&str, &str, &str)> {
    let (input, (first, _, second, _)) =
        tuple((take_till1(char::is_whitespace), space1, take_till1(char::is_whitespace), space1))(input)?;
    let (input, third) = rest(input)?;
    Ok((input, (first, second, third)))
}

/// Split a start line into its three fields, tolerating a missing third
/// field (e.g. a status line with an empty reason phrase).
pub fn split_start_line(line: &str) -> (&str, &str, &str) {
    match three_fields(line) {
        Ok((_, parts)) => parts,
        Err(_) => match tuple::<_, _, nom::error::Error<&str>, _>((take_till1(char::is_whitespace), space1, rest))(line) {
            Ok((_, (first, _, second))) => (first, second, ""),
            Err(_) => (line, "", ""),
        },
    }
}
