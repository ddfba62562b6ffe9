//! Compact header expansion and canonical-casing lookup (RFC 3261 §7.3.3 /
//! §20).

/// Single-letter compact forms, lower-cased, mapping to their full header name.
const COMPACT_HEADERS: &[(&str, &str)] = &[
    ("i", "call-id"),
    ("m", "contact"),
    ("e", "content-encoding"),
    ("l", "content-length"),
    ("c", "content-type"),
    ("f", "from"),
    ("s", "subject"),
    ("k", "supported"),
    ("t", "to"),
    ("v", "via"),
];

/// Expand a possibly-compact header name to its full lowercase form.
///
/// Non-compact names and unrecognized single letters pass through
/// unchanged (still lower-cased by the caller's own folding, not here).
pub fn expand_compact(name: &str) -> String {
    if name.len() == 1 {
        let lower = name.to_ascii_lowercase();
        if let Some((_, full)) = COMPACT_HEADERS.iter().find(|(c, _)| *c == lower) {
            return (*full).to_string();
        }
    }
    name.to_string()
}

/// Canonical mixed-case forms for well-known headers, keyed by lowercase name.
const PRETTY_NAMES: &[(&str, &str)] = &[
    ("accept", "Accept"),
    ("accept-encoding", "Accept-Encoding"),
    ("accept-language", "Accept-Language"),
    ("alert-info", "Alert-Info"),
    ("allow", "Allow"),
    ("authentication-info", "Authentication-Info"),
    ("authorization", "Authorization"),
    ("call-id", "Call-ID"),
    ("call-info", "Call-Info"),
    ("contact", "Contact"),
    ("content-disposition", "Content-Disposition"),
    ("content-encoding", "Content-Encoding"),
    ("content-language", "Content-Language"),
    ("content-length", "Content-Length"),
    ("content-type", "Content-Type"),
    ("cseq", "CSeq"),
    ("date", "Date"),
    ("error-info", "Error-Info"),
    ("event", "Event"),
    ("expires", "Expires"),
    ("from", "From"),
    ("in-reply-to", "In-Reply-To"),
    ("max-forwards", "Max-Forwards"),
    ("mime-version", "MIME-Version"),
    ("min-expires", "Min-Expires"),
    ("organization", "Organization"),
    ("path", "Path"),
    ("priority", "Priority"),
    ("proxy-authenticate", "Proxy-Authenticate"),
    ("proxy-authorization", "Proxy-Authorization"),
    ("proxy-require", "Proxy-Require"),
    ("record-route", "Record-Route"),
    ("refer-to", "Refer-To"),
    ("reply-to", "Reply-To"),
    ("require", "Require"),
    ("retry-after", "Retry-After"),
    ("route", "Route"),
    ("server", "Server"),
    ("subject", "Subject"),
    ("supported", "Supported"),
    ("timestamp", "Timestamp"),
    ("to", "To"),
    ("unsupported", "Unsupported"),
    ("user-agent", "User-Agent"),
    ("via", "Via"),
    ("warning", "Warning"),
    ("www-authenticate", "WWW-Authenticate"),
];

/// Return the canonical casing for a known header, or a Title-Case fallback
/// for anything not in the table (split on `-`, capitalize each word).
pub fn prettify(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if let Some((_, pretty)) = PRETTY_NAMES.iter().find(|(n, _)| *n == lower) {
        return (*pretty).to_string();
    }
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Headers permitted to carry multiple comma-separated values on one line.
pub const MULTI_INSTANCE_HEADERS: &[&str] = &[
    "via",
    "contact",
    "route",
    "record-route",
    "path",
    "allow",
    "supported",
    "require",
    "proxy-require",
    "unsupported",
    "accept",
    "accept-encoding",
    "accept-language",
    "warning",
];

pub fn is_multi_instance(name_lower: &str) -> bool {
    MULTI_INSTANCE_HEADERS.contains(&name_lower)
}
