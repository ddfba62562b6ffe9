//! Build a complete [`SdpMessage`] from scratch, for an outgoing offer.

use super::parse::extract_codecs;
use super::types::{ConnectionData, MediaDescription, Origin, SdpMessage, TimingField};

/// Parameters for [`build_sdp`]. `session_id` defaults to the current time
/// if not supplied by the caller (this crate never reads the clock itself,
/// see the crate-level docs on determinism).
pub struct BuildParams<'a> {
    pub local_ip: &'a str,
    pub rtp_port: u16,
    pub payload_type: u8,
    pub codec_name: &'a str,
    pub sample_rate: u32,
    pub dtmf_payload_type: u8,
    pub ptime: u32,
    pub session_id: String,
}

impl<'a> BuildParams<'a> {
    pub fn new(local_ip: &'a str, rtp_port: u16, payload_type: u8, codec_name: &'a str, session_id: impl Into<String>) -> Self {
        BuildParams {
            local_ip,
            rtp_port,
            payload_type,
            codec_name,
            sample_rate: 8000,
            dtmf_payload_type: 101,
            ptime: 20,
            session_id: session_id.into(),
        }
    }
}

/// Build a one-audio-media-section offer for `payload_type`/`codec_name`,
/// with an optional telephone-event format for DTMF.
pub fn build_sdp(params: &BuildParams) -> SdpMessage {
    let mut formats = vec![params.payload_type.to_string()];
    if params.dtmf_payload_type > 0 {
        formats.push(params.dtmf_payload_type.to_string());
    }

    let mut media = MediaDescription {
        media: "audio".to_string(),
        port: params.rtp_port,
        proto: "RTP/AVP".to_string(),
        formats,
        ..Default::default()
    };
    media.attributes.add("rtpmap", Some(format!("{} {}/{}", params.payload_type, params.codec_name, params.sample_rate)));
    if params.dtmf_payload_type > 0 {
        media.attributes.add("rtpmap", Some(format!("{} telephone-event/8000", params.dtmf_payload_type)));
        media.attributes.add("fmtp", Some(format!("{} 0-16", params.dtmf_payload_type)));
    }
    media.attributes.add("ptime", Some(params.ptime.to_string()));
    media.attributes.ensure("sendrecv");
    media.codecs = extract_codecs(&media);

    SdpMessage {
        version: 0,
        origin: Origin {
            username: "-".to_string(),
            session_id: params.session_id.clone(),
            session_version: params.session_id.clone(),
            net_type: "IN".to_string(),
            addr_type: "IP4".to_string(),
            address: params.local_ip.to_string(),
        },
        session_name: "-".to_string(),
        connection: Some(ConnectionData { net_type: "IN".to_string(), addr_type: "IP4".to_string(), address: params.local_ip.to_string() }),
        timing: TimingField { start_time: 0, stop_time: 0 },
        media: vec![media],
        ..Default::default()
    }
}
