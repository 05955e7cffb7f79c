//! Ledger capability traits and the transaction model the orchestrator
//! submits through them.
//!
//! Connection establishment, wire serialization and key custody are external
//! collaborators; the orchestrator only needs to sign a transaction payload
//! and submit it for a definitive confirmed-or-rejected answer.

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::attempt::MintStep;
use crate::error::SubmitError;
use crate::spec::Creator;

/// An on-chain account address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// Payload of one orchestration step, before signing.
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    /// Allocate the mint account. NFTs use 0 decimals and supply 1.
    CreateMint {
        mint_authority: Address,
        decimals: u8,
    },
    /// Create the metadata account bound to an existing mint.
    AttachMetadata {
        mint: Address,
        symbol: String,
        metadata_uri: String,
        seller_fee_basis_points: u16,
        creators: Vec<Creator>,
    },
    /// Disable further minting so the token becomes canonical.
    Finalize {
        mint: Address,
        mint_authority: Address,
    },
}

impl Transaction {
    /// The orchestration step this payload belongs to.
    pub fn step(&self) -> MintStep {
        match self {
            Transaction::CreateMint { .. } => MintStep::CreateMint,
            Transaction::AttachMetadata { .. } => MintStep::AttachMetadata,
            Transaction::Finalize { .. } => MintStep::Finalize,
        }
    }
}

/// A transaction payload together with the address that signed it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub payload: Transaction,
    pub signer: Address,
}

/// Confirmation data for a submitted transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionReceipt {
    /// Address of the account the transaction allocated, if any.
    /// Set for [`Transaction::CreateMint`] confirmations.
    pub new_account: Option<Address>,
}

/// Write access to the ledger. Implementations must be safe for concurrent
/// use by independent mint attempts.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Submit a signed transaction and wait for a definitive outcome.
    async fn submit(&self, tx: SignedTransaction) -> Result<TransactionReceipt, SubmitError>;
}

/// Stateless signing capability derived from a wallet.
pub trait Signer: Send + Sync {
    fn public_address(&self) -> Address;
    fn sign(&self, tx: Transaction) -> SignedTransaction;
}

#[async_trait]
impl<L: LedgerConnection + ?Sized> LedgerConnection for Arc<L> {
    async fn submit(&self, tx: SignedTransaction) -> Result<TransactionReceipt, SubmitError> {
        (**self).submit(tx).await
    }
}

impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn public_address(&self) -> Address {
        (**self).public_address()
    }

    fn sign(&self, tx: Transaction) -> SignedTransaction {
        (**self).sign(tx)
    }
}
