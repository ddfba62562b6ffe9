//! The CSeq header (RFC 3261 §20.16).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CSeq {
    pub seq: u32,
    pub method: String,
}

impl CSeq {
    pub fn parse(s: &str) -> CSeq {
        let s = s.trim();
        match s.split_once(char::is_whitespace) {
            Some((seq, method)) => CSeq {
                seq: seq.parse().unwrap_or(0),
                method: method.trim().to_string(),
            },
            None => CSeq::default(),
        }
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seq_and_method() {
        let cseq = CSeq::parse("314159 INVITE");
        assert_eq!(cseq.seq, 314159);
        assert_eq!(cseq.method, "INVITE");
    }
}
