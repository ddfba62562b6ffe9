//! Simplified SIP transaction layer (RFC 3261 §17).
//!
//! No retransmission timers — the transport below is expected to handle
//! that. This layer only matches responses to requests by Via branch +
//! CSeq method.

use std::collections::HashMap;

use sip_core::message::{SipRequest, SipResponse};

use crate::errors::{DialogError, Result};

/// SIP transaction states (simplified — no Calling/Confirmed split).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Trying,
    Proceeding,
    Completed,
    Terminated,
}

/// A SIP transaction: a request and its associated response, if any.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub branch: String,
    pub method: String,
    pub state: TransactionState,
    pub request: SipRequest,
    pub response: Option<SipResponse>,
}

impl Transaction {
    fn new(branch: String, method: String, request: SipRequest) -> Transaction {
        Transaction { branch, method, state: TransactionState::Trying, request, response: None }
    }

    /// Transaction key: `(branch, method)`.
    pub fn key(&self) -> (String, String) {
        (self.branch.clone(), self.method.clone())
    }

    /// Advance state based on a response status code.
    ///
    /// - 1xx → Proceeding
    /// - 2xx → Completed for INVITE, Terminated for everything else
    /// - 3xx-6xx → Completed
    pub fn update_state(&mut self, status_code: u16) {
        match status_code {
            100..=199 => self.state = TransactionState::Proceeding,
            200..=299 => {
                self.state = if self.method.eq_ignore_ascii_case("INVITE") {
                    TransactionState::Completed
                } else {
                    TransactionState::Terminated
                };
            }
            300..=699 => self.state = TransactionState::Completed,
            _ => {}
        }
    }

    pub fn terminate(&mut self) {
        self.state = TransactionState::Terminated;
    }
}

fn extract_branch_req(request: &SipRequest) -> Option<String> {
    request.via().first().and_then(|v| v.branch())
}

fn extract_branch_resp(response: &SipResponse) -> Option<String> {
    response.via().first().and_then(|v| v.branch())
}

fn extract_cseq_method(response: &SipResponse) -> Option<String> {
    response.cseq().map(|c| c.method)
}

/// Matches responses to requests by Via branch + CSeq method.
///
/// Client transactions are created with [`create_client`](TransactionTable::create_client)
/// when sending a request. Server transactions are created with
/// [`create_server`](TransactionTable::create_server) when receiving one.
#[derive(Debug, Default)]
pub struct TransactionTable {
    client: HashMap<(String, String), Transaction>,
    server: HashMap<(String, String), Transaction>,
}

impl TransactionTable {
    pub fn new() -> TransactionTable {
        TransactionTable::default()
    }

    /// Create a client transaction for an outgoing request.
    pub fn create_client(&mut self, request: SipRequest) -> Result<(String, String)> {
        let branch = extract_branch_req(&request).ok_or(DialogError::MissingBranch)?;
        let method = request.method.as_str().to_string();
        let key = (branch.clone(), method.clone());
        self.client.insert(key.clone(), Transaction::new(branch, method, request));
        Ok(key)
    }

    /// Find the client transaction matching an incoming response, by
    /// topmost Via branch + CSeq method (RFC 3261 §17.1.3), and advance
    /// its state.
    pub fn match_response(&mut self, response: &SipResponse) -> Option<&mut Transaction> {
        let branch = extract_branch_resp(response)?;
        let method = extract_cseq_method(response)?;
        let txn = self.client.get_mut(&(branch, method))?;
        txn.response = Some(response.clone());
        txn.update_state(response.status_code);
        Some(txn)
    }

    /// Create a server transaction for an incoming request.
    pub fn create_server(&mut self, request: SipRequest) -> Result<(String, String)> {
        let branch = extract_branch_req(&request).ok_or(DialogError::MissingBranch)?;
        let method = request.method.as_str().to_string();
        let key = (branch.clone(), method.clone());
        self.server.insert(key.clone(), Transaction::new(branch, method, request));
        Ok(key)
    }

    /// Find an existing server transaction for a (re)transmitted request —
    /// useful for detecting retransmissions.
    pub fn match_request(&self, request: &SipRequest) -> Option<&Transaction> {
        let branch = extract_branch_req(request)?;
        let method = request.method.as_str().to_string();
        self.server.get(&(branch, method))
    }

    pub fn remove(&mut self, key: &(String, String)) {
        self.client.remove(key);
        self.server.remove(key);
    }

    pub fn client_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.client.values()
    }

    pub fn server_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.server.values()
    }

    /// Remove all terminated transactions. Returns the count removed.
    pub fn prune_terminated(&mut self) -> usize {
        let mut count = 0;
        for store in [&mut self.client, &mut self.server] {
            let dead: Vec<_> = store
                .iter()
                .filter(|(_, txn)| txn.state == TransactionState::Terminated)
                .map(|(k, _)| k.clone())
                .collect();
            for key in dead {
                store.remove(&key);
                count += 1;
            }
        }
        count
    }
}
