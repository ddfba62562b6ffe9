//! The `Transport` collaborator contract (§6.1).
//!
//! The core never implements a concrete socket. A UDP datagram transport or
//! a TCP stream transport with Content-Length framing are both valid
//! collaborators; this trait is the seam between them and the dialog/UAS/UAC
//! layer, which only ever deals in parsed [`SipMessage`]s.

use sip_core::message::{SipMessage, SipResponse};

use crate::errors::{Result, TransportError};

/// A network address: host (name or literal, brackets kept for IPv6) and port.
pub type Addr = (String, u16);

/// Delivers and accepts framed SIP messages.
///
/// `send`/`send_reply` are fallible, synchronous operations — per the
/// concurrency model, the core has no background tasks and surfaces
/// back-pressure directly to the caller rather than queuing.
pub trait Transport {
    /// The local address this transport is bound to, used to fill in
    /// Via/Contact headers on outbound requests.
    fn local_addr(&self) -> Addr;

    /// Bind and start listening.
    fn start(&mut self) -> Result<()>;

    /// Send a SIP message to the given address.
    fn send(&mut self, message: &SipMessage, addr: &Addr) -> Result<()>;

    /// Send a response using Via-based routing (RFC 3261 §18.2.2).
    fn send_reply(&mut self, response: &SipResponse) -> Result<()> {
        let dest = response_destination(response).ok_or(TransportError::NoViaHeader)?;
        self.send(&SipMessage::Response(response.clone()), &dest)
    }

    /// Close the transport.
    fn stop(&mut self) -> Result<()>;

    /// Install the callback invoked with every parsed inbound message and
    /// its source address.
    fn set_on_message(&mut self, callback: Box<dyn FnMut(SipMessage, Addr)>);
}

/// Determine where to send a response using Via-based routing (RFC 3261
/// §18.2.2): the topmost Via's `received` parameter overrides the host,
/// and a valued `rport` parameter overrides the port. Returns `None` if
/// the response carries no Via header.
pub fn response_destination(response: &SipResponse) -> Option<Addr> {
    let top_via = response.via().into_iter().next()?;

    let host = top_via.received().unwrap_or_else(|| top_via.host.clone());

    let port = match top_via.rport_raw() {
        Some(Some(rport_str)) => rport_str.parse::<u16>().unwrap_or_else(|_| top_via.port.unwrap_or(5060)),
        _ => top_via.port.unwrap_or(5060),
    };

    Some((host, port))
}
