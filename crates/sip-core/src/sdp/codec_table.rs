//! The RFC 3551 static payload type table this codec knows about without an
//! explicit `a=rtpmap` line.

/// `(payload_type, encoding_name, clock_rate, channels)`.
pub const WELL_KNOWN_CODECS: &[(u8, &str, u32, Option<u8>)] = &[
    (0, "PCMU", 8000, Some(1)),
    (3, "GSM", 8000, Some(1)),
    (4, "G723", 8000, Some(1)),
    (8, "PCMA", 8000, Some(1)),
    (9, "G722", 8000, Some(1)),
    (18, "G729", 8000, Some(1)),
];

pub fn lookup(payload_type: u8) -> Option<(&'static str, u32, Option<u8>)> {
    WELL_KNOWN_CODECS.iter().find(|(pt, ..)| *pt == payload_type).map(|(_, name, rate, ch)| (*name, *rate, *ch))
}
