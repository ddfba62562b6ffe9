//! Host/port combinators (RFC 3261 §19.1 `hostport`), ported from the
//! corpus's `parser/uri/` bracketed-IPv6 handling.

use nom::bytes::complete::is_not;
use nom::character::complete::{char, digit1};
use nom::combinator::recognize;
use nom::sequence::{delimited, preceded, separated_pair};

use super::ParseResult;

fn bracketed_ipv6(input: &str) -> ParseResult<&str> {
    recognize(delimited(char('['), nom::bytes::complete::is_not("]"), char(']')))(input)
}

/// `host [ ":" port ]` (RFC 3261 §19.1 `hostport`). A colon inside `[...]`
/// is never a port separator; a trailing port that isn't a valid `u16` is
/// tolerated by folding the whole run back into the host, matching the
/// tolerant-parsing mode this codec uses throughout.
pub fn hostport(input: &str) -> (String, Option<u16>) {
    if let Ok((rest, host)) = bracketed_ipv6(input) {
        let port = preceded(char(':'), digit1)(rest)
            .ok()
            .filter(|(remaining, _): &(&str, &str)| remaining.is_empty())
            .and_then(|(_, digits): (&str, &str)| digits.parse().ok());
        return (host.to_string(), port);
    }

    match input.rsplit_once(':') {
        Some((host, port_str)) => match port_str.parse() {
            Ok(port) => (host.to_string(), Some(port)),
            Err(_) => (input.to_string(), None),
        },
        None => (input.to_string(), None),
    }
}

/// One `hname "=" hvalue` pair within a URI's header list (RFC 3261 §19.1
/// `headers`). Pairs with no `=` are dropped rather than erroring, matching
/// this codec's tolerant-parsing mode.
fn header_pair(input: &str) -> ParseResult<(&str, &str)> {
    separated_pair(is_not("&="), char('='), is_not("&"))(input)
}

/// Split a URI's `?h1=v1&h2=v2` header section into `(name, value)` pairs,
/// dropping any `&`-separated piece that isn't itself a valid pair.
pub fn header_pairs(s: &str) -> Vec<(String, String)> {
    s.split('&').filter_map(|piece| header_pair(piece).ok()).map(|(_, (k, v))| (k.to_string(), v.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_host_and_port() {
        assert_eq!(hostport("atlanta.example.com:5060"), ("atlanta.example.com".to_string(), Some(5060)));
    }

    #[test]
    fn host_without_port() {
        assert_eq!(hostport("atlanta.example.com"), ("atlanta.example.com".to_string(), None));
    }

    #[test]
    fn bracketed_ipv6_keeps_brackets() {
        assert_eq!(hostport("[2001:db8::1]:5060"), ("[2001:db8::1]".to_string(), Some(5060)));
        assert_eq!(hostport("[2001:db8::1]"), ("[2001:db8::1]".to_string(), None));
    }

    #[test]
    fn malformed_port_folds_back_into_host() {
        assert_eq!(hostport("example.com:notaport"), ("example.com:notaport".to_string(), None));
    }

    #[test]
    fn header_pairs_splits_on_ampersand() {
        let pairs = header_pairs("subject=hi&priority=urgent");
        assert_eq!(pairs, vec![("subject".to_string(), "hi".to_string()), ("priority".to_string(), "urgent".to_string())]);
    }

    #[test]
    fn header_pairs_drops_pieces_without_equals() {
        let pairs = header_pairs("subject=hi&bogus&priority=urgent");
        assert_eq!(pairs, vec![("subject".to_string(), "hi".to_string()), ("priority".to_string(), "urgent".to_string())]);
    }
}
