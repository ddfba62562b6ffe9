//! Black-box end-to-end scenarios from the dialog/routing spec (S1, S5, S6).

use std::cell::RefCell;
use std::rc::Rc;

use dialog_core::dialog::{create_dialog_from_request, DialogState};
use dialog_core::transport::{response_destination, Addr, Transport};
use dialog_core::uac;
use dialog_core::uas::{SharedTransport, Uas};
use sip_core::message::{SipMessage, SipRequest};

#[derive(Default)]
struct InMemoryTransport {
    sent: Vec<(SipMessage, Addr)>,
}

impl Transport for InMemoryTransport {
    fn local_addr(&self) -> Addr {
        ("10.0.0.1".to_string(), 5060)
    }

    fn start(&mut self) -> dialog_core::errors::Result<()> {
        Ok(())
    }

    fn send(&mut self, message: &SipMessage, addr: &Addr) -> dialog_core::errors::Result<()> {
        self.sent.push((message.clone(), addr.clone()));
        Ok(())
    }

    fn stop(&mut self) -> dialog_core::errors::Result<()> {
        Ok(())
    }

    fn set_on_message(&mut self, _callback: Box<dyn FnMut(SipMessage, Addr)>) {}
}

fn parse_request(raw: &str) -> SipRequest {
    match SipMessage::parse(raw).unwrap() {
        SipMessage::Request(r) => r,
        _ => panic!("expected a request"),
    }
}

/// S1 - Basic INVITE/200/ACK/BYE: a 100 Trying is emitted immediately, the
/// application's `accept()` produces a 200 OK carrying the dialog's
/// local_tag, an ACK carrying that tag confirms the dialog, and an
/// in-dialog BYE tears the call down and removes it from the call table.
#[test]
fn s1_invite_200_ack_bye_lifecycle() {
    let transport = Rc::new(RefCell::new(InMemoryTransport::default()));
    let shared: SharedTransport = transport.clone();
    let mut uas = Uas::new(shared);
    uas.callbacks.on_invite = Some(Box::new(|call| {
        call.accept(None).unwrap();
    }));

    let call_id = "a84b4c76e66710@pc33.atlanta.example.com";
    let from_addr: Addr = ("pc33.atlanta.example.com".to_string(), 5060);

    let invite = parse_request(&format!(
        "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds\r\n\
         To: Bob <sip:bob@biloxi.example.com>\r\n\
         From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
         Contact: <sip:alice@pc33.atlanta.example.com>\r\n\
         Call-ID: {call_id}\r\n\
         CSeq: 314159 INVITE\r\n\
         Content-Length: 0\r\n\
         \r\n"
    ));
    uas.handle_request(invite, from_addr.clone()).unwrap();

    let responses: Vec<_> = transport
        .borrow()
        .sent
        .iter()
        .filter_map(|(m, _)| match m {
            SipMessage::Response(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(responses.len(), 2, "expected a 100 Trying then a 200 OK");
    assert_eq!(responses[0].status_code, 100);
    assert_eq!(responses[1].status_code, 200);

    let local_tag = uas.get_dialog(call_id).unwrap().local_tag.clone();
    assert!(responses[1].get_header("to").unwrap().contains(&format!("tag={}", local_tag)));
    // `accept()` dispatches the 2xx and confirms the dialog in the same step
    // (RFC 3261 §12.1.1: "moves to Confirmed on dispatch of a 2xx (UAS) or
    // on receipt of ACK" — the two are not mutually exclusive here).
    assert_eq!(uas.get_dialog(call_id).unwrap().state, DialogState::Confirmed);

    let ack = parse_request(&format!(
        "ACK sip:bob@biloxi.example.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhde\r\n\
         To: Bob <sip:bob@biloxi.example.com>;tag={local_tag}\r\n\
         From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
         Call-ID: {call_id}\r\n\
         CSeq: 314159 ACK\r\n\
         Content-Length: 0\r\n\
         \r\n"
    ));
    uas.handle_request(ack, from_addr.clone()).unwrap();
    assert_eq!(uas.get_dialog(call_id).unwrap().state, DialogState::Confirmed);

    let bye = parse_request(&format!(
        "BYE sip:alice@pc33.atlanta.example.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhdf\r\n\
         To: Bob <sip:bob@biloxi.example.com>;tag={local_tag}\r\n\
         From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
         Call-ID: {call_id}\r\n\
         CSeq: 314160 BYE\r\n\
         Content-Length: 0\r\n\
         \r\n"
    ));
    uas.handle_request(bye, from_addr).unwrap();

    let last = transport.borrow().sent.last().unwrap().0.clone();
    match last {
        SipMessage::Response(r) => assert_eq!(r.status_code, 200),
        _ => panic!("expected a 200 OK to the BYE"),
    }
    assert!(uas.get_call(call_id).is_none());
}

/// S5 - Response routing via received/rport: the top Via's `received`
/// overrides the host and a valued `rport` overrides the port.
#[test]
fn s5_response_routing_uses_received_and_rport() {
    let raw = "SIP/2.0 200 OK\r\n\
               Via: SIP/2.0/UDP 10.0.0.1:5060;received=203.0.113.5;rport=54321;branch=z9hG4bK1\r\n\
               CSeq: 1 INVITE\r\n\
               Call-ID: a@b\r\n\
               Content-Length: 0\r\n\
               \r\n";
    let resp = match SipMessage::parse(raw).unwrap() {
        SipMessage::Response(r) => r,
        _ => panic!("expected a response"),
    };

    assert_eq!(response_destination(&resp), Some(("203.0.113.5".to_string(), 54321)));
}

/// S6 - Record-Route reversal and in-dialog BYE routing: Route headers on
/// a UAC-sent BYE appear in the reverse of the INVITE's Record-Route order,
/// and the request-URI is the Contact URI from the original INVITE.
#[test]
fn s6_record_route_reversal_drives_bye_routing() {
    let invite = parse_request(
        "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds\r\n\
         Record-Route: <sip:proxy1@10.0.0.10;lr>\r\n\
         Record-Route: <sip:proxy2@10.0.0.20;lr>\r\n\
         To: Bob <sip:bob@biloxi.example.com>\r\n\
         From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
         Contact: <sip:bob@192.168.1.2:5060>\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.example.com\r\n\
         CSeq: 314159 INVITE\r\n\
         Content-Length: 0\r\n\
         \r\n",
    );

    let mut dialog = create_dialog_from_request(&invite, Some("localtag".to_string()), None);
    dialog.confirm();
    assert_eq!(dialog.route_set, vec!["<sip:proxy2@10.0.0.20;lr>", "<sip:proxy1@10.0.0.10;lr>"]);

    let mut transport = InMemoryTransport::default();
    let addr: Addr = ("192.168.1.2".to_string(), 5060);
    let bye = uac::send_bye(&mut dialog, &mut transport, &addr, "10.0.0.1", 5060, "UDP").unwrap();

    assert_eq!(bye.uri, "sip:bob@192.168.1.2:5060");
    assert_eq!(
        bye.get_header_values("route"),
        vec!["<sip:proxy2@10.0.0.20;lr>", "<sip:proxy1@10.0.0.10;lr>"]
    );
    assert_eq!(dialog.state, DialogState::Terminated);
}
