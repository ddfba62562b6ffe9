//! The `MediaBridge` collaborator contract (§6.2).
//!
//! Given a negotiated SDP, the bridge produces and consumes audio/DTMF
//! events. The core only calls [`sip_core::sdp::negotiate_sdp`] and hands the
//! answer back to the application; it never touches an RTP socket itself.

use sip_core::sdp::SdpMessage;

use crate::errors::Result;
use crate::transport::Addr;

/// Creates and owns an RTP session bound to a negotiated SDP answer.
///
/// An application plugs in its own RTP engine by implementing this trait;
/// the core depends only on the trait, never on a concrete media stack.
pub trait MediaBridge {
    /// Bind the session to `(local_ip, rtp_port)` for the already-negotiated
    /// payload type and clock rate, and begin receiving media.
    fn start(&mut self, local_ip: &str, rtp_port: u16, remote_addr: &Addr, payload_type: u8, clock_rate: u32) -> Result<()>;

    /// Send an already RTP-payload-encoded audio frame.
    fn send_audio(&mut self, payload: &[u8], timestamp: u32) -> Result<()>;

    /// Send raw PCM audio, encoded with the negotiated codec before sending.
    fn send_audio_pcm(&mut self, pcm: &[u8], timestamp: u32) -> Result<()>;

    /// Send a DTMF digit via RTP telephone-event (RFC 4733).
    fn send_dtmf(&mut self, digit: char, duration_ms: u32) -> Result<()>;

    /// Update the remote RTP address, e.g. after a re-INVITE changes `c=`/`m=`.
    fn update_remote(&mut self, addr: &Addr) -> Result<()>;

    /// Install the callback invoked with each decoded audio frame and its
    /// RTP timestamp.
    fn set_on_audio(&mut self, callback: Box<dyn FnMut(Vec<u8>, u32)>);

    /// Install the callback invoked with each DTMF digit and its duration.
    fn set_on_dtmf(&mut self, callback: Box<dyn FnMut(char, u32)>);

    /// Release resources. Idempotent.
    fn close(&mut self) -> Result<()>;
}

/// The clock rate of the negotiated codec, defaulting to 8000 (RFC 3551) if
/// the answer omits one for the chosen payload type.
pub fn clock_rate_for(answer: &SdpMessage, payload_type: u8) -> u32 {
    answer
        .audio()
        .and_then(|media| media.codecs.iter().find(|c| c.payload_type == payload_type))
        .map(|c| c.clock_rate)
        .filter(|&rate| rate > 0)
        .unwrap_or(8000)
}
