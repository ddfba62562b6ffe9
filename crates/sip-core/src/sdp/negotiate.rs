//! RFC 3264 offer/answer negotiation.

use tracing::debug;

use crate::error::{Error, Result};

use super::parse::extract_codecs;
use super::types::{Codec, ConnectionData, MediaDescription, Origin, SdpMessage, TimingField};

/// Direction the answer should use for a given offered direction, per
/// RFC 3264 §6.1.
fn answer_direction(offered: &str) -> &'static str {
    match offered {
        "sendonly" => "recvonly",
        "recvonly" => "sendonly",
        "inactive" => "inactive",
        _ => "sendrecv",
    }
}

/// Parameters for [`negotiate_sdp`].
pub struct NegotiateParams<'a> {
    pub local_ip: &'a str,
    pub rtp_port: u16,
    pub supported_codecs: &'a [u8],
    pub dtmf_payload_type: u8,
    pub ptime: u32,
    pub session_id: String,
}

impl<'a> NegotiateParams<'a> {
    pub fn new(local_ip: &'a str, rtp_port: u16, session_id: impl Into<String>) -> Self {
        NegotiateParams {
            local_ip,
            rtp_port,
            supported_codecs: &[0, 8],
            dtmf_payload_type: 101,
            ptime: 20,
            session_id: session_id.into(),
        }
    }
}

/// Build an SDP answer to `offer`. Codec selection follows the offerer's
/// preference order: the first offered codec whose payload type is in
/// `params.supported_codecs` wins.
///
/// Returns the answer and the chosen payload type.
pub fn negotiate_sdp(offer: &SdpMessage, params: &NegotiateParams) -> Result<(SdpMessage, u8)> {
    let offer_audio = offer.audio().ok_or(Error::NoAudio)?;

    let chosen = offer_audio
        .codecs
        .iter()
        .find(|c| params.supported_codecs.contains(&c.payload_type))
        .cloned()
        .ok_or_else(|| Error::NoCommonCodec {
            offered: offer_audio.codecs.iter().map(|c| if c.encoding_name.is_empty() { c.payload_type.to_string() } else { c.encoding_name.clone() }).collect(),
            supported: params.supported_codecs.to_vec(),
        })?;

    debug!(payload_type = chosen.payload_type, encoding = %chosen.encoding_name, "negotiated codec");

    let offer_dtmf_pt = offer_audio.codecs.iter().find(|c| c.encoding_name.eq_ignore_ascii_case("telephone-event")).map(|c| c.payload_type);

    let answer_ptime = offer_audio
        .attributes
        .get("ptime")
        .first()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(params.ptime);

    let direction = answer_direction(offer_audio.direction());

    let mut formats = vec![chosen.payload_type.to_string()];
    let mut media = MediaDescription {
        media: "audio".to_string(),
        port: params.rtp_port,
        proto: offer_audio.proto.clone(),
        ..Default::default()
    };

    let mut codec_name = chosen.encoding_name.clone();
    let mut codec_rate = if chosen.clock_rate > 0 { chosen.clock_rate } else { 8000 };
    if codec_name.is_empty() {
        if let Some((name, rate, _)) = super::codec_table::lookup(chosen.payload_type) {
            codec_name = name.to_string();
            codec_rate = rate;
        }
    }
    media.attributes.add("rtpmap", Some(format!("{} {}/{}", chosen.payload_type, codec_name, codec_rate)));

    let include_dtmf = offer_dtmf_pt.is_some() && params.dtmf_payload_type > 0;
    if include_dtmf {
        formats.push(params.dtmf_payload_type.to_string());
        media.attributes.add("rtpmap", Some(format!("{} telephone-event/8000", params.dtmf_payload_type)));
        media.attributes.add("fmtp", Some(format!("{} 0-16", params.dtmf_payload_type)));
    }

    media.attributes.add("ptime", Some(answer_ptime.to_string()));
    media.attributes.ensure(direction);
    media.formats = formats;
    media.codecs = extract_codecs(&media);

    let answer = SdpMessage {
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
    };

    Ok((answer, chosen.payload_type))
}

#[cfg(test)]
mod tests {
    use super::super::parse::parse_sdp;
    use super::*;

    fn offer_with(formats: &str, extra: &str) -> SdpMessage {
        let raw = format!(
            "v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=-\r\nc=IN IP4 10.0.0.1\r\nt=0 0\r\nm=audio 49170 RTP/AVP {formats}\r\n{extra}"
        );
        parse_sdp(&raw)
    }

    #[test]
    fn selects_first_offered_codec_in_supported_set() {
        let offer = offer_with("9 0 8", "a=rtpmap:9 G722/8000\r\na=rtpmap:0 PCMU/8000\r\na=rtpmap:8 PCMA/8000\r\n");
        let params = NegotiateParams::new("10.0.0.2", 40000, "1");
        let (answer, pt) = negotiate_sdp(&offer, &params).unwrap();
        assert_eq!(pt, 0);
        assert_eq!(answer.audio().unwrap().formats[0], "0");
    }

    #[test]
    fn no_common_codec_is_an_error() {
        let offer = offer_with("9", "a=rtpmap:9 G722/8000\r\n");
        let params = NegotiateParams::new("10.0.0.2", 40000, "1");
        let err = negotiate_sdp(&offer, &params).unwrap_err();
        assert!(matches!(err, Error::NoCommonCodec { .. }));
    }

    #[test]
    fn no_audio_media_is_an_error() {
        let offer = parse_sdp("v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=-\r\nt=0 0\r\n");
        let params = NegotiateParams::new("10.0.0.2", 40000, "1");
        assert!(matches!(negotiate_sdp(&offer, &params).unwrap_err(), Error::NoAudio));
    }

    #[test]
    fn dtmf_carried_through_when_offered() {
        let offer = offer_with("0 101", "a=rtpmap:0 PCMU/8000\r\na=rtpmap:101 telephone-event/8000\r\na=fmtp:101 0-16\r\n");
        let params = NegotiateParams::new("10.0.0.2", 40000, "1");
        let (answer, _) = negotiate_sdp(&offer, &params).unwrap();
        assert_eq!(answer.audio().unwrap().formats, vec!["0", "101"]);
    }

    #[test]
    fn direction_flips_sendonly_to_recvonly() {
        let offer = offer_with("0", "a=rtpmap:0 PCMU/8000\r\na=sendonly\r\n");
        let params = NegotiateParams::new("10.0.0.2", 40000, "1");
        let (answer, _) = negotiate_sdp(&offer, &params).unwrap();
        assert_eq!(answer.audio().unwrap().direction(), "recvonly");
    }
}
