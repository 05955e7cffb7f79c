//! NFT mint orchestration.
//!
//! Minting an NFT is a sequence of irreversible on-chain transactions: create
//! the token mint, attach the metadata account, finalize. Any step can fail
//! after earlier steps have already spent money, so this crate keeps the
//! orchestration logic (validation, retry policy, partial-failure reporting)
//! separate from the network plumbing, which callers supply through the
//! [`LedgerConnection`] and [`Signer`] capability traits.

pub mod attempt;
pub mod error;
pub mod ledger;
pub mod market;
pub mod orchestrator;
pub mod outcome;
pub mod sim;
pub mod spec;
pub mod validate;

pub use attempt::{MintAttempt, MintState, MintStep};
pub use error::{MintError, SubmitError, ValidationError};
pub use ledger::{
    Address, LedgerConnection, SignedTransaction, Signer, Transaction, TransactionReceipt,
};
pub use market::{settle_sale, Listing, Payout, SaleError, Settlement};
pub use orchestrator::{MintOrchestrator, RetryPolicy};
pub use outcome::MintOutcome;
pub use sim::{MetadataRecord, SimulatedLedger, SimulatedSigner, StepBehavior};
pub use spec::{BuilderPolicy, Creator, MintSpec, RawMintParams};
pub use validate::validate;
