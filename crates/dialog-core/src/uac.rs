//! In-dialog UAC helpers (§4.8): BYE, re-INVITE, CANCEL, and INFO.
//!
//! These are stateless functions, not a struct with internal state — each
//! call takes the [`Dialog`] and destination address it needs, builds the
//! request via [`Dialog::create_request`], sends it through a [`Transport`],
//! and advances dialog state on success. A precondition violation (wrong
//! dialog state for the operation) is returned as a [`DialogStateError`]
//! and leaves the dialog untouched.

use sip_core::message::{SipMessage, SipRequest};
use sip_core::sdp::SdpMessage;
use sip_core::types::Method;

use crate::dialog::{Dialog, DialogState};
use crate::errors::{DialogStateError, Result};
use crate::transport::{Addr, Transport};

fn state_name(state: DialogState) -> &'static str {
    match state {
        DialogState::Early => "Early",
        DialogState::Confirmed => "Confirmed",
        DialogState::Terminated => "Terminated",
    }
}

fn require_state(dialog: &Dialog, expected: DialogState, action: &str) -> Result<()> {
    if dialog.state != expected {
        return Err(DialogStateError::WrongState {
            action: action.to_string(),
            actual: state_name(dialog.state),
            expected: state_name(expected),
        }
        .into());
    }
    Ok(())
}

/// Terminate an established call. Precondition: Confirmed.
///
/// On success, the dialog moves to Terminated.
pub fn send_bye(
    dialog: &mut Dialog,
    transport: &mut dyn Transport,
    addr: &Addr,
    via_host: &str,
    via_port: u16,
    via_transport: &str,
) -> Result<SipRequest> {
    require_state(dialog, DialogState::Confirmed, "BYE")?;

    let mut req = dialog.create_request(Method::Bye, via_host, via_port, via_transport);
    req.set_header("Contact", format!("<sip:{}:{}>", via_host, via_port));

    transport.send(&SipMessage::Request(req.clone()), addr)?;
    dialog.terminate();
    Ok(req)
}

/// Send a re-INVITE carrying a new SDP offer. Precondition: Confirmed.
///
/// Dialog state does not change on a re-INVITE; the caller drives any
/// subsequent state change from the eventual response.
pub fn send_reinvite(
    dialog: &mut Dialog,
    sdp: &SdpMessage,
    transport: &mut dyn Transport,
    addr: &Addr,
    via_host: &str,
    via_port: u16,
    via_transport: &str,
) -> Result<SipRequest> {
    require_state(dialog, DialogState::Confirmed, "re-INVITE")?;

    let mut req = dialog.create_request(Method::Invite, via_host, via_port, via_transport);
    req.set_content_type("application/sdp");
    req.body = sip_core::sdp::serialize_sdp(sdp);

    transport.send(&SipMessage::Request(req.clone()), addr)?;
    Ok(req)
}

/// Cancel a call still ringing. Precondition: Early.
///
/// On success, the dialog moves to Terminated — the eventual 487 response
/// to the original INVITE is handled by the UAS side, not here.
pub fn send_cancel(
    dialog: &mut Dialog,
    transport: &mut dyn Transport,
    addr: &Addr,
    via_host: &str,
    via_port: u16,
    via_transport: &str,
) -> Result<SipRequest> {
    require_state(dialog, DialogState::Early, "CANCEL")?;

    let req = dialog.create_request(Method::Cancel, via_host, via_port, via_transport);
    transport.send(&SipMessage::Request(req.clone()), addr)?;
    dialog.terminate();
    Ok(req)
}

/// Send an INFO request with an application-chosen body. Precondition: Confirmed.
pub fn send_info(
    dialog: &mut Dialog,
    body: &str,
    content_type: &str,
    transport: &mut dyn Transport,
    addr: &Addr,
    via_host: &str,
    via_port: u16,
    via_transport: &str,
) -> Result<SipRequest> {
    require_state(dialog, DialogState::Confirmed, "INFO")?;

    let mut req = dialog.create_request(Method::Info, via_host, via_port, via_transport);
    req.set_content_type(content_type);
    req.body = body.to_string();

    transport.send(&SipMessage::Request(req.clone()), addr)?;
    Ok(req)
}
