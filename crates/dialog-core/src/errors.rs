//! Errors produced by this crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DialogError>;

/// A Dialog precondition failed (the caller tried to send something a
/// dialog in its current state cannot send).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogStateError {
    #[error("cannot send {action}: dialog is {actual}, expected {expected}")]
    WrongState { action: String, actual: &'static str, expected: &'static str },
}

/// Failure to deliver a message through a [`crate::transport::Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport not started")]
    NotStarted,

    #[error("no connection to {0}:{1}")]
    NoConnection(String, u16),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("cannot route response: no Via header")]
    NoViaHeader,
}

/// Top-level error for the dialog/transaction/UAS/UAC layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error(transparent)]
    State(#[from] DialogStateError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request has no Via branch parameter")]
    MissingBranch,

    #[error(transparent)]
    Sip(#[from] sip_core::Error),
}
