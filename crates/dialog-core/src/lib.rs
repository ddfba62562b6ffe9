//! # dialog-core
//!
//! The stateful layer of a SIP user-agent: the dialog state machine (RFC
//! 3261 §12), a simplified transaction table, the UAS request-dispatch
//! loop, and in-dialog UAC helpers.
//!
//! ## Overview
//!
//! This crate consumes [`sip_core`] for wire parsing/serialization and SDP
//! negotiation but owns no socket itself — it depends on a [`transport::Transport`]
//! collaborator supplied by the embedding application, and optionally a
//! [`media::MediaBridge`] for the RTP/DTMF side of a call. There are no
//! background tasks: dispatch is synchronous, single-threaded, and the
//! upstream SIP proxy is assumed to own retransmission reliability (see
//! [`transaction`]).
//!
//! - [`dialog`]: the Dialog state machine and in-dialog request/response builders
//! - [`transaction`]: the simplified client/server transaction table
//! - [`uas`]: the request-dispatch loop, `IncomingCall`, and application callbacks
//! - [`uac`]: stateless in-dialog client helpers (BYE, re-INVITE, CANCEL, INFO)
//! - [`transport`]: the `Transport` collaborator contract and response routing
//! - [`media`]: the `MediaBridge` collaborator contract
//! - [`ids`]: Call-ID, branch, and tag generation
//! - [`errors`]: this crate's error type

pub mod dialog;
pub mod errors;
pub mod ids;
pub mod media;
pub mod transaction;
pub mod uac;
pub mod uas;
pub mod transport;

pub use dialog::{Dialog, DialogState};
pub use errors::{DialogError, Result};
pub use transaction::{Transaction, TransactionState, TransactionTable};
pub use uas::{IncomingCall, Uas, UasCallbacks};
