//! Property-based round-trip tests for invariants 1 and 2 of the message
//! and SDP codecs.

use proptest::prelude::*;

use sip_core::message::{SipMessage, SipRequest, SipResponse};
use sip_core::sdp::{build_sdp, parse_sdp, serialize_sdp, BuildParams};
use sip_core::types::Method;

fn arb_token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.-]{1,20}".prop_map(|s| s)
}

fn arb_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Invite),
        Just(Method::Ack),
        Just(Method::Bye),
        Just(Method::Cancel),
        Just(Method::Options),
        Just(Method::Info),
        Just(Method::Register),
    ]
}

proptest! {
    #[test]
    fn request_round_trip_preserves_structured_accessors(
        method in arb_method(),
        user in arb_token(),
        host in arb_token(),
        call_id in arb_token(),
        seq in 1u32..1_000_000,
        branch_suffix in arb_token(),
        body in "[a-zA-Z0-9 =/\n]{0,40}",
    ) {
        let uri = format!("sip:{}@{}", user, host);
        let mut req = SipRequest::new(method.clone(), uri.clone());
        req.set_call_id(call_id.clone());
        req.set_cseq(&sip_core::types::CSeq { seq, method: method.as_str().to_string() });
        req.add_header("Via", format!("SIP/2.0/UDP {};branch=z9hG4bK{}", host, branch_suffix));
        req.body = body.clone();

        let wire = req.serialize();
        let parsed = SipMessage::parse(&wire).unwrap();

        match parsed {
            SipMessage::Request(parsed_req) => {
                prop_assert_eq!(parsed_req.method, method);
                prop_assert_eq!(parsed_req.uri, uri);
                prop_assert_eq!(parsed_req.call_id().map(|s| s.to_string()), Some(call_id));
                prop_assert_eq!(parsed_req.cseq().unwrap().seq, seq);
                prop_assert_eq!(parsed_req.via().len(), 1);
                prop_assert_eq!(parsed_req.body, body);
            }
            SipMessage::Response(_) => prop_assert!(false, "expected a request"),
        }
    }

    #[test]
    fn response_round_trip_preserves_status_and_via(
        status in 100u16..700,
        reason in "[a-zA-Z]{1,10}( [a-zA-Z]{1,10}){0,2}",
        host_a in arb_token(),
        host_b in arb_token(),
    ) {
        let mut resp = SipResponse::new(status, reason.clone());
        resp.add_header("Via", format!("SIP/2.0/UDP {};branch=z9hG4bK1", host_a));
        resp.add_header("Via", format!("SIP/2.0/UDP {};branch=z9hG4bK2", host_b));

        let wire = resp.serialize();
        let parsed = SipMessage::parse(&wire).unwrap();

        match parsed {
            SipMessage::Response(parsed_resp) => {
                prop_assert_eq!(parsed_resp.status_code, status);
                prop_assert_eq!(parsed_resp.reason_phrase, reason);
                let vias = parsed_resp.via();
                prop_assert_eq!(vias.len(), 2);
                prop_assert_eq!(vias[0].host.clone(), host_a);
                prop_assert_eq!(vias[1].host.clone(), host_b);
            }
            SipMessage::Request(_) => prop_assert!(false, "expected a response"),
        }
    }

    #[test]
    fn sdp_round_trip_preserves_media_and_codec_fields(
        local_ip in "10\\.0\\.[0-9]{1,3}\\.[0-9]{1,3}",
        rtp_port in 1024u16..65000,
        payload_type in prop_oneof![Just(0u8), Just(8u8)],
        session_id in "[0-9]{3,10}",
    ) {
        let codec_name = if payload_type == 0 { "PCMU" } else { "PCMA" };
        let params = BuildParams::new(&local_ip, rtp_port, payload_type, codec_name, session_id.clone());
        let sdp = build_sdp(&params);

        let wire = serialize_sdp(&sdp);
        let parsed = parse_sdp(&wire);

        prop_assert_eq!(parsed.version, sdp.version);
        prop_assert_eq!(parsed.origin, sdp.origin);
        prop_assert_eq!(parsed.connection, sdp.connection);

        let orig_audio = sdp.audio().unwrap();
        let parsed_audio = parsed.audio().unwrap();
        prop_assert_eq!(parsed_audio.port, orig_audio.port);
        prop_assert_eq!(&parsed_audio.proto, &orig_audio.proto);
        prop_assert_eq!(&parsed_audio.formats, &orig_audio.formats);

        for (orig_codec, parsed_codec) in orig_audio.codecs.iter().zip(parsed_audio.codecs.iter()) {
            prop_assert_eq!(orig_codec.payload_type, parsed_codec.payload_type);
            prop_assert_eq!(&orig_codec.encoding_name, &parsed_codec.encoding_name);
            prop_assert_eq!(orig_codec.clock_rate, parsed_codec.clock_rate);
        }
    }
}
