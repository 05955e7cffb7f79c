//! State machine for a single mint attempt.
//!
//! States move strictly forward. A failed attempt is never reused: steps that
//! already executed on chain cannot be un-executed, so a retry of the whole
//! mint gets a fresh attempt.

use core::fmt;

use serde::Serialize;

use crate::error::MintError;
use crate::ledger::Address;

/// Progress of a mint attempt.
///
/// Every observed sequence is a prefix of
/// `Validated -> MintCreated -> MetadataAttached -> Finalized`,
/// optionally ending in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MintState {
    Validated,
    MintCreated,
    MetadataAttached,
    Finalized,
    Failed,
}

impl MintState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MintState::Finalized | MintState::Failed)
    }
}

/// The three on-chain steps of a mint, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MintStep {
    CreateMint,
    AttachMetadata,
    Finalize,
}

impl fmt::Display for MintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintStep::CreateMint => "create-mint",
            MintStep::AttachMetadata => "attach-metadata",
            MintStep::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Mutable record of one orchestration run.
///
/// Created when orchestration begins and discarded once the outcome has been
/// reported. The mint address is set at most once and survives any later
/// failure.
#[derive(Debug, Clone)]
pub struct MintAttempt {
    state: MintState,
    mint_address: Option<Address>,
    last_error: Option<MintError>,
}

impl MintAttempt {
    pub(crate) fn new() -> Self {
        Self {
            state: MintState::Validated,
            mint_address: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> MintState {
        self.state
    }

    pub fn mint_address(&self) -> Option<&Address> {
        self.mint_address.as_ref()
    }

    pub fn last_error(&self) -> Option<&MintError> {
        self.last_error.as_ref()
    }

    pub(crate) fn record_mint_created(&mut self, address: Address) {
        if self.mint_address.is_none() {
            self.mint_address = Some(address);
        }
        self.advance(MintState::MintCreated);
    }

    pub(crate) fn record_metadata_attached(&mut self) {
        self.advance(MintState::MetadataAttached);
    }

    pub(crate) fn record_finalized(&mut self) {
        self.advance(MintState::Finalized);
    }

    /// Terminal failure. Keeps any mint address already recorded.
    pub(crate) fn record_failure(&mut self, error: MintError) {
        if !self.state.is_terminal() {
            self.state = MintState::Failed;
        }
        self.last_error = Some(error);
    }

    /// Only forward moves are possible; terminal states never change.
    fn advance(&mut self, next: MintState) {
        if !self.state.is_terminal() && next > self.state {
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_through_the_full_sequence() {
        let mut attempt = MintAttempt::new();
        assert_eq!(attempt.state(), MintState::Validated);

        attempt.record_mint_created(Address::from("M1"));
        assert_eq!(attempt.state(), MintState::MintCreated);

        attempt.record_metadata_attached();
        assert_eq!(attempt.state(), MintState::MetadataAttached);

        attempt.record_finalized();
        assert_eq!(attempt.state(), MintState::Finalized);
    }

    #[test]
    fn state_never_regresses() {
        let mut attempt = MintAttempt::new();
        attempt.record_mint_created(Address::from("M1"));
        attempt.record_metadata_attached();

        // A stale mint-created event cannot move the state backwards.
        attempt.record_mint_created(Address::from("M2"));
        assert_eq!(attempt.state(), MintState::MetadataAttached);
    }

    #[test]
    fn mint_address_is_set_once() {
        let mut attempt = MintAttempt::new();
        attempt.record_mint_created(Address::from("M1"));
        attempt.record_mint_created(Address::from("M2"));
        assert_eq!(attempt.mint_address(), Some(&Address::from("M1")));
    }

    #[test]
    fn failure_keeps_the_mint_address() {
        let mut attempt = MintAttempt::new();
        attempt.record_mint_created(Address::from("M1"));
        attempt.record_failure(MintError::StepRejected {
            step: MintStep::AttachMetadata,
            reason: "insufficient funds".to_owned(),
        });

        assert_eq!(attempt.state(), MintState::Failed);
        assert_eq!(attempt.mint_address(), Some(&Address::from("M1")));
        assert!(attempt.last_error().is_some());
    }

    #[test]
    fn terminal_states_are_final() {
        let mut attempt = MintAttempt::new();
        attempt.record_mint_created(Address::from("M1"));
        attempt.record_failure(MintError::Cancelled {
            next_step: MintStep::AttachMetadata,
        });

        attempt.record_metadata_attached();
        attempt.record_finalized();
        assert_eq!(attempt.state(), MintState::Failed);
    }
}
