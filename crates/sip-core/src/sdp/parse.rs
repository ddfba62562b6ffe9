//! SDP parsing (RFC 4566 §5).

use crate::parser::sdp::{colon_pair, type_line, whitespace_fields};
use crate::parser::separators::split_first;

use super::codec_table;
use super::types::{Bandwidth, Codec, ConnectionData, MediaDescription, Origin, SdpMessage, TimingField};

/// Parse an SDP body into an [`SdpMessage`]. Unrecognized or malformed
/// lines are skipped rather than rejected, matching the tolerant parsing
/// this codec uses throughout.
pub fn parse_sdp(data: &str) -> SdpMessage {
    let mut sdp = SdpMessage::default();
    let mut current_media: Option<MediaDescription> = None;

    for raw_line in data.lines() {
        let line = raw_line.trim();
        let Some((field_type, value)) = type_line(line) else { continue };

        if field_type == 'm' {
            if let Some(mut media) = current_media.take() {
                media.codecs = extract_codecs(&media);
                sdp.media.push(media);
            }
            current_media = Some(parse_media_line(value));
        } else if let Some(media) = current_media.as_mut() {
            match field_type {
                'c' => media.connection = Some(parse_connection(value)),
                'b' => media.bandwidths.push(parse_bandwidth(value)),
                'a' => add_attribute(&mut media.attributes, value),
                _ => {}
            }
        } else {
            match field_type {
                'v' => sdp.version = value.parse().unwrap_or(0),
                'o' => sdp.origin = parse_origin(value),
                's' => sdp.session_name = value.to_string(),
                'c' => sdp.connection = Some(parse_connection(value)),
                'b' => sdp.bandwidths.push(parse_bandwidth(value)),
                't' => sdp.timing = parse_timing(value),
                'a' => add_attribute(&mut sdp.attributes, value),
                _ => {}
            }
        }
    }

    if let Some(mut media) = current_media {
        media.codecs = extract_codecs(&media);
        sdp.media.push(media);
    }

    sdp
}

fn parse_origin(value: &str) -> Origin {
    let parts = whitespace_fields(value);
    if parts.len() >= 6 {
        Origin {
            username: parts[0].to_string(),
            session_id: parts[1].to_string(),
            session_version: parts[2].to_string(),
            net_type: parts[3].to_string(),
            addr_type: parts[4].to_string(),
            address: parts[5].to_string(),
        }
    } else {
        Origin::default()
    }
}

fn parse_connection(value: &str) -> ConnectionData {
    let parts = whitespace_fields(value);
    if parts.len() >= 3 {
        ConnectionData { net_type: parts[0].to_string(), addr_type: parts[1].to_string(), address: parts[2].to_string() }
    } else {
        ConnectionData::default()
    }
}

fn parse_bandwidth(value: &str) -> Bandwidth {
    match colon_pair(value) {
        (bwtype, Some(bw)) => Bandwidth { bwtype: bwtype.to_string(), bandwidth: bw.parse().unwrap_or(0) },
        (_, None) => Bandwidth::default(),
    }
}

fn parse_timing(value: &str) -> TimingField {
    let parts = whitespace_fields(value);
    if parts.len() >= 2 {
        TimingField { start_time: parts[0].parse().unwrap_or(0), stop_time: parts[1].parse().unwrap_or(0) }
    } else {
        TimingField::default()
    }
}

fn parse_media_line(value: &str) -> MediaDescription {
    let parts = whitespace_fields(value);
    if parts.len() >= 4 {
        MediaDescription {
            media: parts[0].to_string(),
            port: parts[1].parse().unwrap_or(0),
            proto: parts[2].to_string(),
            formats: parts[3..].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    } else if parts.len() >= 3 {
        MediaDescription {
            media: parts[0].to_string(),
            port: parts[1].parse().unwrap_or(0),
            proto: parts[2].to_string(),
            ..Default::default()
        }
    } else {
        MediaDescription::default()
    }
}

fn add_attribute(attrs: &mut super::types::AttributeMap, line: &str) {
    match colon_pair(line) {
        (key, Some(val)) => attrs.add(key.to_string(), Some(val.to_string())),
        (key, None) => attrs.ensure(key.to_string()),
    }
}

/// Build the ordered codec list for a media section's `m=` format list,
/// matching each format to an `a=rtpmap`/`a=fmtp` pair or the static table.
pub fn extract_codecs(media: &MediaDescription) -> Vec<Codec> {
    let mut by_pt: std::collections::HashMap<u8, Codec> = std::collections::HashMap::new();

    for val in media.attributes.get("rtpmap") {
        let (pt_str, Some(encoding_part)) = split_first(val, ' ') else { continue };
        let Ok(pt) = pt_str.parse::<u8>() else { continue };
        let fields: Vec<&str> = encoding_part.split('/').collect();
        let mut codec = Codec { payload_type: pt, encoding_name: fields[0].to_string(), ..Default::default() };
        if fields.len() >= 2 {
            codec.clock_rate = fields[1].parse().unwrap_or(0);
        }
        if fields.len() >= 3 {
            codec.channels = fields[2].parse().ok();
        }
        by_pt.insert(pt, codec);
    }

    for val in media.attributes.get("fmtp") {
        let (pt_str, Some(fmtp_str)) = split_first(val, ' ') else { continue };
        let Ok(pt) = pt_str.parse::<u8>() else { continue };
        if let Some(codec) = by_pt.get_mut(&pt) {
            codec.fmtp = Some(fmtp_str.to_string());
        }
    }

    let mut codecs = Vec::with_capacity(media.formats.len());
    for fmt in &media.formats {
        let Ok(pt) = fmt.parse::<u8>() else { continue };
        if let Some(codec) = by_pt.get(&pt) {
            codecs.push(codec.clone());
        } else if let Some((name, rate, channels)) = codec_table::lookup(pt) {
            codecs.push(Codec { payload_type: pt, encoding_name: name.to_string(), clock_rate: rate, channels, fmtp: None });
        } else {
            codecs.push(Codec { payload_type: pt, ..Default::default() });
        }
    }
    codecs
}
