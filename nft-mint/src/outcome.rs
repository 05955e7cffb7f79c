//! Uniform reporting of mint results.

use serde::Serialize;

use crate::attempt::{MintAttempt, MintState};
use crate::error::MintError;
use crate::ledger::Address;

/// Structured result of one mint attempt, identical in shape for success and
/// failure so callers never have to branch on exception-like control flow to
/// discover a partially created mint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintOutcome {
    pub state: MintState,
    pub mint_address: Option<Address>,
    pub last_error: Option<MintError>,
}

impl MintOutcome {
    /// Pure mapping from the attempt record; performs no I/O.
    pub fn from_attempt(attempt: &MintAttempt) -> Self {
        Self {
            state: attempt.state(),
            mint_address: attempt.mint_address().cloned(),
            last_error: attempt.last_error().cloned(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == MintState::Finalized
    }
}
