//! SIP User Agent Server — the request-dispatch loop (§4.7).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sip_core::message::{SipRequest, SipResponse};
use sip_core::sdp::{parse_sdp, serialize_sdp, SdpMessage};
use tracing::{debug, info, warn};

use crate::dialog::{create_dialog_from_request, default_reason, Dialog, DialogState};
use crate::errors::Result;
use crate::ids::generate_tag;
use crate::transport::{Addr, Transport};

/// A shared handle to the transport a UAS dispatches over, so an
/// [`IncomingCall`] can send its own responses without the UAS lending out
/// `&mut self` for the lifetime of a callback.
pub type SharedTransport = Rc<RefCell<dyn Transport>>;

/// An incoming SIP call: a view over (Dialog, INVITE, parsed SDP offer,
/// source address). The unit handed to application callbacks.
pub struct IncomingCall {
    pub dialog: Dialog,
    pub invite: SipRequest,
    pub sdp_offer: Option<SdpMessage>,
    pub source_addr: Addr,
    transport: Option<SharedTransport>,
    answered: bool,
}

impl IncomingCall {
    pub fn call_id(&self) -> &str {
        &self.dialog.call_id
    }

    /// The caller URI (From header).
    pub fn caller(&self) -> &str {
        &self.dialog.remote_uri
    }

    /// The callee URI (To header / request URI).
    pub fn callee(&self) -> &str {
        &self.dialog.local_uri
    }

    /// `X-Room-ID` header, if present.
    pub fn room_id(&self) -> Option<&str> {
        self.invite.get_header("x-room-id")
    }

    /// `X-Session-ID` header, if present.
    pub fn session_id(&self) -> Option<&str> {
        self.invite.get_header("x-session-id")
    }

    /// All `X-*` headers on the INVITE, first value per name.
    pub fn x_headers(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for (name, value) in self.invite.headers.iter() {
            if name.to_ascii_lowercase().starts_with("x-") {
                result.entry(name.clone()).or_insert_with(|| value.to_string());
            }
        }
        result
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    /// Send a bare 100 Trying.
    pub fn trying(&mut self) -> Result<()> {
        self.send_response(100, "Trying", "", "")
    }

    /// Send a 180 Ringing, optionally with early-media SDP.
    pub fn ringing(&mut self, early_sdp: Option<&SdpMessage>) -> Result<()> {
        match early_sdp {
            Some(sdp) => self.send_response(180, "Ringing", &serialize_sdp(sdp), "application/sdp"),
            None => self.send_response(180, "Ringing", "", ""),
        }
    }

    /// Send a 200 OK, confirm the dialog, and mark the call answered (so a
    /// racing CANCEL no longer sends a 487).
    pub fn accept(&mut self, sdp_answer: Option<&SdpMessage>) -> Result<()> {
        match sdp_answer {
            Some(sdp) => self.send_response(200, "OK", &serialize_sdp(sdp), "application/sdp")?,
            None => self.send_response(200, "OK", "", "")?,
        }
        self.dialog.confirm();
        self.answered = true;
        Ok(())
    }

    /// Reject the call with an error response and terminate the dialog.
    pub fn reject(&mut self, status_code: u16, reason: Option<&str>) -> Result<()> {
        let reason = reason.map(str::to_string).unwrap_or_else(|| default_reason(status_code));
        self.send_response(status_code, &reason, "", "")?;
        self.dialog.terminate();
        Ok(())
    }

    /// Send a BYE to terminate an established call. Returns `None` if the
    /// dialog was not Confirmed.
    pub fn hangup(&mut self) -> Result<Option<SipRequest>> {
        if self.dialog.state != DialogState::Confirmed {
            return Ok(None);
        }

        let local_addr = self.transport.as_ref().map(|t| t.borrow().local_addr()).unwrap_or(("0.0.0.0".to_string(), 5060));
        let bye = self.dialog.create_request(sip_core::types::Method::Bye, &local_addr.0, local_addr.1, "UDP");

        self.dialog.terminate();

        if let Some(transport) = &self.transport {
            transport.borrow_mut().send(&sip_core::message::SipMessage::Request(bye.clone()), &self.source_addr)?;
        }

        Ok(Some(bye))
    }

    fn send_response(&mut self, status_code: u16, reason: &str, body: &str, content_type: &str) -> Result<()> {
        let contact = self.transport.as_ref().map(|t| {
            let addr = t.borrow().local_addr();
            format!("<sip:{}:{}>", addr.0, addr.1)
        });

        let mut resp = self.dialog.create_response(&self.invite, status_code, reason, contact.as_deref());

        if !body.is_empty() {
            resp.body = body.to_string();
        }
        if !content_type.is_empty() {
            resp.set_content_type(content_type);
        }

        if let Some(transport) = &self.transport {
            transport.borrow_mut().send_reply(&resp)?;
        }
        Ok(())
    }
}

/// Optional application callbacks invoked by the dispatch loop (§6.3).
#[derive(Default)]
pub struct UasCallbacks {
    pub on_invite: Option<Box<dyn FnMut(&mut IncomingCall)>>,
    pub on_reinvite: Option<Box<dyn FnMut(&mut IncomingCall)>>,
    pub on_bye: Option<Box<dyn FnMut(&IncomingCall, &SipRequest)>>,
    pub on_cancel: Option<Box<dyn FnMut(&SipRequest, &Addr)>>,
    pub on_options: Option<Box<dyn FnMut(&SipRequest, &Addr)>>,
}

/// Listens for incoming requests and dispatches INVITE/ACK/BYE/CANCEL/
/// OPTIONS through [`UasCallbacks`]. Automatically sends 100 Trying for new
/// INVITEs.
pub struct Uas {
    transport: SharedTransport,
    calls: HashMap<String, IncomingCall>,
    pub callbacks: UasCallbacks,
}

impl Uas {
    pub fn new(transport: SharedTransport) -> Uas {
        Uas { transport, calls: HashMap::new(), callbacks: UasCallbacks::default() }
    }

    pub fn get_call(&self, call_id: &str) -> Option<&IncomingCall> {
        self.calls.get(call_id)
    }

    pub fn get_dialog(&self, call_id: &str) -> Option<&Dialog> {
        self.calls.get(call_id).map(|c| &c.dialog)
    }

    /// Dispatch an incoming request, routing by method.
    pub fn handle_request(&mut self, request: SipRequest, addr: Addr) -> Result<()> {
        match request.method {
            sip_core::types::Method::Invite => self.handle_invite(request, addr),
            sip_core::types::Method::Ack => self.handle_ack(request),
            sip_core::types::Method::Bye => self.handle_bye(request),
            sip_core::types::Method::Cancel => self.handle_cancel(request, addr),
            sip_core::types::Method::Options => self.handle_options(request, addr),
            _ => self.send_error(&request, 405, "Method Not Allowed"),
        }
    }

    fn handle_invite(&mut self, request: SipRequest, addr: Addr) -> Result<()> {
        let call_id = request.call_id().unwrap_or("").to_string();

        if let Some(existing) = self.calls.get_mut(&call_id) {
            if existing.dialog.state == DialogState::Confirmed {
                debug!("Re-INVITE for call {}", call_id);
                existing.invite = request.clone();
                if !request.body.is_empty() && request.content_type().as_deref() == Some("application/sdp") {
                    existing.sdp_offer = Some(parse_sdp(&request.body));
                }
                if let Some(cb) = &mut self.callbacks.on_reinvite {
                    cb(existing);
                }
                return Ok(());
            }
        }

        info!("Incoming INVITE for call {} from {:?}", call_id, addr);
        let dialog = create_dialog_from_request(&request, None, None);

        let sdp_offer = if !request.body.is_empty() && request.content_type().as_deref() == Some("application/sdp") {
            Some(parse_sdp(&request.body))
        } else {
            None
        };

        let mut call = IncomingCall {
            dialog,
            invite: request,
            sdp_offer,
            source_addr: addr,
            transport: Some(self.transport.clone()),
            answered: false,
        };

        call.trying()?;
        debug!("Sent 100 Trying for call {}", call_id);

        self.calls.insert(call_id.clone(), call);
        let call = self.calls.get_mut(&call_id).unwrap();
        if let Some(cb) = &mut self.callbacks.on_invite {
            cb(call);
        }
        Ok(())
    }

    fn handle_ack(&mut self, request: SipRequest) -> Result<()> {
        let call_id = request.call_id().unwrap_or("").to_string();
        if let Some(call) = self.calls.get_mut(&call_id) {
            call.dialog.confirm();
            debug!("Call {} confirmed by ACK", call_id);
        }
        Ok(())
    }

    fn handle_bye(&mut self, request: SipRequest) -> Result<()> {
        let call_id = request.call_id().unwrap_or("").to_string();

        let Some(call) = self.calls.get_mut(&call_id) else {
            warn!("BYE for unknown call {}", call_id);
            return self.send_error(&request, 481, "Call/Transaction Does Not Exist");
        };

        let resp = call.dialog.create_response(&request, 200, "OK", None);
        self.transport.borrow_mut().send_reply(&resp)?;

        let mut call = self.calls.remove(&call_id).unwrap();
        call.dialog.terminate();
        info!("Call {} terminated by BYE", call_id);

        if let Some(cb) = &mut self.callbacks.on_bye {
            cb(&call, &request);
        }
        Ok(())
    }

    fn handle_cancel(&mut self, request: SipRequest, addr: Addr) -> Result<()> {
        let call_id = request.call_id().unwrap_or("").to_string();

        let Some(call) = self.calls.get_mut(&call_id) else {
            warn!("CANCEL for unknown call {}", call_id);
            return self.send_error(&request, 481, "Call/Transaction Does Not Exist");
        };

        let resp = call.dialog.create_response(&request, 200, "OK", None);
        self.transport.borrow_mut().send_reply(&resp)?;

        if !call.answered {
            call.reject(487, Some("Request Terminated"))?;
        }

        self.calls.remove(&call_id);
        info!("Call {} cancelled", call_id);

        if let Some(cb) = &mut self.callbacks.on_cancel {
            cb(&request, &addr);
        }
        Ok(())
    }

    fn handle_options(&mut self, request: SipRequest, addr: Addr) -> Result<()> {
        if let Some(cb) = &mut self.callbacks.on_options {
            cb(&request, &addr);
            return Ok(());
        }

        let local_tag = generate_tag();
        let mut resp = SipResponse::new(200, "OK".to_string());

        for via in request.get_header_values("via") {
            resp.add_header("Via", via.to_string());
        }
        if let Some(from_val) = request.get_header("from") {
            resp.set_header("From", from_val.to_string());
        }
        if let Some(to_val) = request.get_header("to") {
            resp.set_header("To", format!("{};tag={}", to_val, local_tag));
        }
        if let Some(call_id) = request.call_id() {
            resp.set_call_id(call_id.to_string());
        }
        if let Some(cseq_val) = request.get_header("cseq") {
            resp.set_header("CSeq", cseq_val.to_string());
        }
        resp.set_header("Allow", "INVITE, ACK, BYE, CANCEL, OPTIONS");

        self.transport.borrow_mut().send_reply(&resp)
    }

    /// Build and send an error response for a request with no dialog
    /// context: copy Via, From, Call-ID, CSeq; append a fresh tag to To.
    fn send_error(&mut self, request: &SipRequest, status_code: u16, reason: &str) -> Result<()> {
        let mut resp = SipResponse::new(status_code, reason.to_string());

        for via in request.get_header_values("via") {
            resp.add_header("Via", via.to_string());
        }
        if let Some(from_val) = request.get_header("from") {
            resp.set_header("From", from_val.to_string());
        }
        if let Some(to_val) = request.get_header("to") {
            let local_tag = generate_tag();
            resp.set_header("To", format!("{};tag={}", to_val, local_tag));
        }
        if let Some(call_id) = request.call_id() {
            resp.set_call_id(call_id.to_string());
        }
        if let Some(cseq_val) = request.get_header("cseq") {
            resp.set_header("CSeq", cseq_val.to_string());
        }

        self.transport.borrow_mut().send_reply(&resp)
    }
}
