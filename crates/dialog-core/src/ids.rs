//! Identifier generation: Call-ID, Via branch, and tag values.

use rand::RngCore;

/// Generate a unique Call-ID in the form `{uuid4}@{domain}`.
pub fn generate_call_id(domain: &str) -> String {
    format!("{}@{}", uuid::Uuid::new_v4(), domain)
}

/// Generate a Via branch parameter with the RFC 3261 magic cookie prefix.
pub fn generate_branch() -> String {
    format!("{}{}", sip_core::types::via::MAGIC_COOKIE, random_hex(8))
}

/// Generate a random tag for From/To headers.
pub fn generate_tag() -> String {
    random_hex(8)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{:02x}", b)).collect()
}
