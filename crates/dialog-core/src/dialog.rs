//! The dialog state machine (RFC 3261 §12).

use serde::{Deserialize, Serialize};
use tracing::debug;

use sip_core::message::{SipRequest, SipResponse};
use sip_core::types::{Address, CSeq, Method, Via};

use crate::ids::{generate_branch, generate_tag};

/// Dialog lifecycle states (RFC 3261 §12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogState {
    Early,
    Confirmed,
    Terminated,
}

/// A SIP dialog: a persistent relationship between two UAs established by
/// an INVITE transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    pub call_id: String,
    pub local_tag: String,
    pub remote_tag: String,
    pub local_uri: String,
    pub remote_uri: String,
    pub remote_target: String,
    pub route_set: Vec<String>,
    pub local_cseq: u32,
    pub remote_cseq: u32,
    pub state: DialogState,
}

impl Dialog {
    /// Dialog identity: `(call_id, local_tag, remote_tag)`.
    pub fn id(&self) -> (&str, &str, &str) {
        (&self.call_id, &self.local_tag, &self.remote_tag)
    }

    /// Early → Confirmed. No-op in any other state.
    pub fn confirm(&mut self) {
        if self.state == DialogState::Early {
            self.state = DialogState::Confirmed;
            debug!("Dialog {} Early -> Confirmed", self.call_id);
        }
    }

    /// Any state → Terminated.
    pub fn terminate(&mut self) {
        debug!("Dialog {} {:?} -> Terminated", self.call_id, self.state);
        self.state = DialogState::Terminated;
    }

    /// Pre-increment and return the next local CSeq number.
    pub fn next_cseq(&mut self) -> u32 {
        self.local_cseq += 1;
        self.local_cseq
    }

    /// Build an in-dialog request: request-URI from the remote target,
    /// a fresh Via branch, From/To/Call-ID/CSeq from dialog state,
    /// `Max-Forwards: 70`, and a `Route` header per route-set entry.
    pub fn create_request(&mut self, method: Method, via_host: &str, via_port: u16, via_transport: &str) -> SipRequest {
        let cseq_num = self.next_cseq();
        let branch = generate_branch();

        let request_uri = if self.remote_target.is_empty() { self.remote_uri.clone() } else { self.remote_target.clone() };
        let mut req = SipRequest::new(method.clone(), request_uri);

        let via = Via::new(via_transport, via_host, Some(via_port), branch);
        req.add_header("Via", via.to_string());

        req.set_header("From", format!("<{}>;tag={}", self.local_uri, self.local_tag));

        let to_val = if self.remote_tag.is_empty() {
            format!("<{}>", self.remote_uri)
        } else {
            format!("<{}>;tag={}", self.remote_uri, self.remote_tag)
        };
        req.set_header("To", to_val);

        req.set_call_id(self.call_id.clone());
        req.set_cseq(&CSeq { seq: cseq_num, method: method.as_str().to_string() });
        req.set_header("Max-Forwards", "70");

        for route in &self.route_set {
            req.add_header("Route", route.clone());
        }

        req
    }

    /// Build a response to an in-dialog request: copies Via, From, Call-ID,
    /// and CSeq verbatim; To is copied and gets `local_tag` appended if not
    /// already present.
    pub fn create_response(&self, request: &SipRequest, status_code: u16, reason_phrase: &str, contact: Option<&str>) -> SipResponse {
        let reason = if reason_phrase.is_empty() { default_reason(status_code) } else { reason_phrase.to_string() };
        let mut resp = SipResponse::new(status_code, reason);

        for via in request.get_header_values("via") {
            resp.add_header("Via", via.to_string());
        }

        if let Some(from_val) = request.get_header("from") {
            resp.set_header("From", from_val.to_string());
        }

        if let Some(to_val) = request.get_header("to") {
            let has_tag = !self.local_tag.is_empty() && to_val.contains(&format!("tag={}", self.local_tag));
            let to_val = if !self.local_tag.is_empty() && !has_tag {
                format!("{};tag={}", to_val, self.local_tag)
            } else {
                to_val.to_string()
            };
            resp.set_header("To", to_val);
        }

        resp.set_call_id(self.call_id.clone());

        if let Some(cseq_val) = request.get_header("cseq") {
            resp.set_header("CSeq", cseq_val.to_string());
        }

        if let Some(contact) = contact {
            resp.set_header("Contact", contact.to_string());
        }

        resp
    }
}

/// Create a UAS dialog from an incoming INVITE: Call-ID, From tag (remote),
/// To URI (local, unless overridden), Contact (remote target), and
/// Record-Route (reversed for the UAS route set per RFC 3261 §12.1.1).
pub fn create_dialog_from_request(request: &SipRequest, local_tag: Option<String>, local_uri: Option<String>) -> Dialog {
    let local_tag = local_tag.unwrap_or_else(generate_tag);

    let from_addr = request.from_addr();
    let remote_tag = from_addr.as_ref().and_then(Address::tag).unwrap_or_default();
    let remote_uri = from_addr.as_ref().map(|a| a.uri.to_string()).unwrap_or_default();

    let local_uri = local_uri.unwrap_or_else(|| {
        request
            .to_addr()
            .map(|a| a.uri.to_string())
            .unwrap_or_else(|| request.uri.clone())
    });

    let remote_target = request.contact().first().map(|c| c.uri.to_string()).unwrap_or_default();

    let mut route_set: Vec<String> = request.get_header_values("record-route").into_iter().map(String::from).collect();
    route_set.reverse();

    let remote_cseq = request.cseq().map(|c| c.seq).unwrap_or(1);

    Dialog {
        call_id: request.call_id().unwrap_or_default().to_string(),
        local_tag,
        remote_tag,
        local_uri,
        remote_uri,
        remote_target,
        route_set,
        local_cseq: 0,
        remote_cseq,
        state: DialogState::Early,
    }
}

/// Default reason phrase for common status codes; unknown codes yield "".
pub fn default_reason(status_code: u16) -> String {
    match status_code {
        100 => "Trying",
        180 => "Ringing",
        183 => "Session Progress",
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        480 => "Temporarily Unavailable",
        481 => "Call/Transaction Does Not Exist",
        486 => "Busy Here",
        487 => "Request Terminated",
        488 => "Not Acceptable Here",
        500 => "Server Internal Error",
        503 => "Service Unavailable",
        603 => "Decline",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sip_core::message::SipMessage;

    fn sample_invite() -> SipRequest {
        let raw = "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n\
                   Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds\r\n\
                   Record-Route: <sip:proxy1@10.0.0.10;lr>\r\n\
                   Record-Route: <sip:proxy2@10.0.0.20;lr>\r\n\
                   To: Bob <sip:bob@biloxi.example.com>\r\n\
                   From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
                   Contact: <sip:alice@192.168.1.2:5060>\r\n\
                   Call-ID: a84b4c76e66710@pc33.atlanta.example.com\r\n\
                   CSeq: 314159 INVITE\r\n\
                   Content-Length: 0\r\n\
                   \r\n";
        match SipMessage::parse(raw).unwrap() {
            SipMessage::Request(r) => r,
            _ => unreachable!(),
        }
    }

    #[test]
    fn dialog_from_invite_reverses_record_route() {
        let invite = sample_invite();
        let dialog = create_dialog_from_request(&invite, None, None);
        assert_eq!(dialog.remote_tag, "1928301774");
        assert_eq!(dialog.route_set, vec!["<sip:proxy2@10.0.0.20;lr>", "<sip:proxy1@10.0.0.10;lr>"]);
        assert_eq!(dialog.remote_target, "sip:alice@192.168.1.2:5060");
        assert_eq!(dialog.state, DialogState::Early);
    }

    #[test]
    fn create_request_increments_cseq_and_sets_branch() {
        let invite = sample_invite();
        let mut dialog = create_dialog_from_request(&invite, Some("localtag".to_string()), None);
        let bye = dialog.create_request(Method::Bye, "10.0.0.1", 5060, "UDP");
        assert_eq!(dialog.local_cseq, 1);
        assert_eq!(bye.cseq().unwrap().seq, 1);
        assert!(bye.via()[0].branch().unwrap().starts_with("z9hG4bK"));
        assert_eq!(bye.get_header_values("route").len(), 2);
    }

    #[test]
    fn create_response_appends_local_tag_to_to_header() {
        let invite = sample_invite();
        let dialog = create_dialog_from_request(&invite, Some("localtag".to_string()), None);
        let resp = dialog.create_response(&invite, 200, "", None);
        assert!(resp.get_header("to").unwrap().contains("tag=localtag"));
        assert_eq!(resp.via().len(), 1);
    }

    #[test]
    fn confirm_is_noop_once_terminated() {
        let mut dialog = create_dialog_from_request(&sample_invite(), None, None);
        dialog.terminate();
        dialog.confirm();
        assert_eq!(dialog.state, DialogState::Terminated);
    }
}
