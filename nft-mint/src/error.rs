//! Error taxonomy for mint orchestration.
//!
//! Every failure is a structured value: validation problems never reach the
//! ledger, transient failures are retried internally, and anything that
//! happens after the mint account exists is reported together with the mint
//! address so no on-chain side effect is ever lost in a log line.

use serde::Serialize;
use thiserror::Error;

use crate::attempt::MintStep;
use crate::ledger::Address;
use crate::validate::MAX_SELLER_FEE_BASIS_POINTS;

/// Domain-invariant violations in the caller-supplied mint parameters.
///
/// Always surfaced before any network interaction and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    #[error("seller fee of {0} basis points is outside 0..={MAX_SELLER_FEE_BASIS_POINTS}")]
    FeeOutOfRange(u16),
    #[error("creator list is empty")]
    EmptyCreatorList,
    #[error("creator {address} holds share {share}, outside 0..=100")]
    ShareOutOfRange { address: Address, share: u8 },
    #[error("creator shares sum to {0}, expected exactly 100")]
    SharesDoNotSumTo100(u32),
    #[error("creator address {0} appears more than once")]
    DuplicateCreatorAddress(Address),
    #[error("symbol is empty and the builder policy does not allow that")]
    EmptySymbol,
    #[error("symbol is {length} characters, longer than the {max} the ledger accepts")]
    SymbolTooLong { length: usize, max: usize },
}

/// What a [`LedgerConnection`](crate::ledger::LedgerConnection) reports for a
/// single submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Broadcast or confirmation did not complete; the transaction may still
    /// land, so the step is eligible for retry.
    #[error("transient ledger failure: {0}")]
    Transient(String),
    /// The ledger definitively rejected the transaction. Never retried.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// Terminal failure of a mint attempt.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum MintError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A step saw only transient failures and ran out of retries.
    #[error("{step} saw only transient failures across {attempts} submissions: {reason}")]
    TransientNetwork {
        step: MintStep,
        attempts: u32,
        reason: String,
    },
    /// The ledger confirmed a rejection for one step.
    #[error("ledger rejected the {step} transaction: {reason}")]
    StepRejected { step: MintStep, reason: String },
    /// The mint account exists on chain but a later step failed for good.
    ///
    /// The address is part of the error because the account cannot be
    /// deallocated; the caller can resume, abandon or complete it manually.
    #[error("mint {mint_address} exists on chain but {failed_at_step} did not complete")]
    PartialMint {
        mint_address: Address,
        failed_at_step: MintStep,
        #[source]
        source: Box<MintError>,
    },
    /// Cancellation was observed between steps and the attempt was abandoned.
    #[error("attempt cancelled before {next_step}")]
    Cancelled { next_step: MintStep },
}
