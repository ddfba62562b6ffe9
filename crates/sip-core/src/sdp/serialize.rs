//! SDP serialization (RFC 4566 §5), fixed field order.

use super::types::{AttributeMap, SdpMessage};

pub fn serialize_sdp(sdp: &SdpMessage) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("v={}", sdp.version));

    let o = &sdp.origin;
    lines.push(format!("o={} {} {} {} {} {}", o.username, o.session_id, o.session_version, o.net_type, o.addr_type, o.address));

    lines.push(format!("s={}", sdp.session_name));

    if let Some(c) = &sdp.connection {
        lines.push(format!("c={} {} {}", c.net_type, c.addr_type, c.address));
    }

    for bw in &sdp.bandwidths {
        lines.push(format!("b={}:{}", bw.bwtype, bw.bandwidth));
    }

    lines.push(format!("t={} {}", sdp.timing.start_time, sdp.timing.stop_time));

    serialize_attributes(&sdp.attributes, &mut lines);

    for m in &sdp.media {
        let fmt_str = m.formats.join(" ");
        lines.push(format!("m={} {} {} {}", m.media, m.port, m.proto, fmt_str));

        if let Some(c) = &m.connection {
            lines.push(format!("c={} {} {}", c.net_type, c.addr_type, c.address));
        }

        for bw in &m.bandwidths {
            lines.push(format!("b={}:{}", bw.bwtype, bw.bandwidth));
        }

        serialize_attributes(&m.attributes, &mut lines);
    }

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn serialize_attributes(attrs: &AttributeMap, lines: &mut Vec<String>) {
    for (key, values) in attrs.iter() {
        if values.is_empty() {
            lines.push(format!("a={}", key));
        } else {
            for val in values {
                lines.push(format!("a={}:{}", key, val));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::parse_sdp;
    use super::*;

    #[test]
    fn round_trip_preserves_structure() {
        let raw = "v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=-\r\nc=IN IP4 10.0.0.1\r\nt=0 0\r\nm=audio 49170 RTP/AVP 0\r\na=rtpmap:0 PCMU/8000\r\na=sendrecv\r\n";
        let sdp = parse_sdp(raw);
        let again = parse_sdp(&serialize_sdp(&sdp));
        assert_eq!(sdp, again);
    }
}
