//! Deterministic in-memory ledger and signer.
//!
//! Used by the test suite and by the `minter` role's dry-run mode to rehearse
//! a mint configuration without spending anything. Per-step behavior can be
//! scripted to inject rejections and transient failures, and every
//! submission is logged for later inspection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::attempt::MintStep;
use crate::error::SubmitError;
use crate::ledger::{
    Address, LedgerConnection, SignedTransaction, Signer, Transaction, TransactionReceipt,
};
use crate::spec::Creator;

/// Scripted reaction of the simulated ledger to one step's submissions.
#[derive(Debug, Clone)]
pub enum StepBehavior {
    /// Confirm every submission.
    Confirm,
    /// Definitively reject every submission.
    Reject { reason: String },
    /// Fail transiently the first `failures` submissions, then confirm.
    TransientThenConfirm { failures: u32 },
    /// Never reach a confirmation; every submission fails transiently.
    AlwaysTransient,
    /// Confirm, but only after sitting on the submission for `delay_ms`.
    /// Pushes a submission past the orchestrator's step timeout.
    DelayThenConfirm { delay_ms: u64 },
}

impl Default for StepBehavior {
    fn default() -> Self {
        StepBehavior::Confirm
    }
}

/// Contents of a simulated metadata account.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub symbol: String,
    pub metadata_uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
}

#[derive(Debug, Default)]
struct SimAccount {
    metadata: Option<MetadataRecord>,
    minting_disabled: bool,
}

/// In-memory [`LedgerConnection`] with scripted per-step behavior.
///
/// Account state is enforced the way a real ledger would: metadata can only
/// be attached once and only to an existing mint, and finalizing requires
/// the metadata account. Safe for concurrent use by independent attempts.
pub struct SimulatedLedger {
    plan: HashMap<MintStep, StepBehavior>,
    accounts: Mutex<HashMap<Address, SimAccount>>,
    transient_seen: Mutex<HashMap<MintStep, u32>>,
    submissions: Mutex<Vec<SignedTransaction>>,
    next_account: AtomicU64,
}

impl SimulatedLedger {
    /// A ledger that confirms every step.
    pub fn new() -> Self {
        Self {
            plan: HashMap::new(),
            accounts: Mutex::new(HashMap::new()),
            transient_seen: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            next_account: AtomicU64::new(0),
        }
    }

    /// Script the reaction to one step's submissions.
    pub fn with_behavior(mut self, step: MintStep, behavior: StepBehavior) -> Self {
        self.plan.insert(step, behavior);
        self
    }

    /// Every submission seen so far, in order.
    pub async fn submissions(&self) -> Vec<SignedTransaction> {
        self.submissions.lock().await.clone()
    }

    /// How many submissions one step has seen.
    pub async fn submission_count(&self, step: MintStep) -> usize {
        self.submissions
            .lock()
            .await
            .iter()
            .filter(|tx| tx.payload.step() == step)
            .count()
    }

    /// The metadata account attached to `mint`, if any.
    pub async fn metadata(&self, mint: &Address) -> Option<MetadataRecord> {
        self.accounts
            .lock()
            .await
            .get(mint)
            .and_then(|account| account.metadata.clone())
    }

    /// Whether `mint` has been finalized.
    pub async fn minting_disabled(&self, mint: &Address) -> bool {
        self.accounts
            .lock()
            .await
            .get(mint)
            .map(|account| account.minting_disabled)
            .unwrap_or(false)
    }

    fn allocate_address(&self) -> Address {
        let n = self.next_account.fetch_add(1, Ordering::Relaxed) + 1;
        Address::new(format!("SIMINT{n:08}"))
    }

    async fn scripted_failure(&self, step: MintStep) -> Result<(), SubmitError> {
        match self.plan.get(&step).cloned().unwrap_or_default() {
            StepBehavior::Confirm => Ok(()),
            StepBehavior::Reject { reason } => Err(SubmitError::Rejected(reason)),
            StepBehavior::AlwaysTransient => Err(SubmitError::Transient(
                "injected connectivity failure".to_owned(),
            )),
            StepBehavior::TransientThenConfirm { failures } => {
                let mut seen = self.transient_seen.lock().await;
                let count = seen.entry(step).or_insert(0);
                if *count < failures {
                    *count += 1;
                    Err(SubmitError::Transient(format!(
                        "injected transient failure {count} of {failures}"
                    )))
                } else {
                    Ok(())
                }
            }
            StepBehavior::DelayThenConfirm { delay_ms } => {
                sleep(Duration::from_millis(delay_ms)).await;
                Ok(())
            }
        }
    }
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerConnection for SimulatedLedger {
    async fn submit(&self, tx: SignedTransaction) -> Result<TransactionReceipt, SubmitError> {
        let step = tx.payload.step();
        self.submissions.lock().await.push(tx.clone());
        self.scripted_failure(step).await?;

        let mut accounts = self.accounts.lock().await;
        match tx.payload {
            Transaction::CreateMint { .. } => {
                let address = self.allocate_address();
                accounts.insert(address.clone(), SimAccount::default());
                debug!(%address, "simulated mint account allocated");
                Ok(TransactionReceipt {
                    new_account: Some(address),
                })
            }
            Transaction::AttachMetadata {
                mint,
                symbol,
                metadata_uri,
                seller_fee_basis_points,
                creators,
            } => {
                let account = accounts
                    .get_mut(&mint)
                    .ok_or_else(|| SubmitError::Rejected(format!("unknown mint account {mint}")))?;
                if account.metadata.is_some() {
                    return Err(SubmitError::Rejected(format!(
                        "metadata account already exists for {mint}"
                    )));
                }
                account.metadata = Some(MetadataRecord {
                    symbol,
                    metadata_uri,
                    seller_fee_basis_points,
                    creators,
                });
                Ok(TransactionReceipt::default())
            }
            Transaction::Finalize { mint, .. } => {
                let account = accounts
                    .get_mut(&mint)
                    .ok_or_else(|| SubmitError::Rejected(format!("unknown mint account {mint}")))?;
                if account.metadata.is_none() {
                    return Err(SubmitError::Rejected(format!(
                        "no metadata account for {mint}"
                    )));
                }
                if account.minting_disabled {
                    return Err(SubmitError::Rejected(format!("{mint} is already final")));
                }
                account.minting_disabled = true;
                Ok(TransactionReceipt::default())
            }
        }
    }
}

/// Signer backed by nothing but a configured address. Signing is a pure
/// wrapping of the payload, matching the stateless contract of the trait.
pub struct SimulatedSigner {
    address: Address,
}

impl SimulatedSigner {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Signer for SimulatedSigner {
    fn public_address(&self) -> Address {
        self.address.clone()
    }

    fn sign(&self, tx: Transaction) -> SignedTransaction {
        SignedTransaction {
            payload: tx,
            signer: self.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(tx: Transaction) -> SignedTransaction {
        SimulatedSigner::new(Address::from("W1")).sign(tx)
    }

    fn create_mint_tx() -> Transaction {
        Transaction::CreateMint {
            mint_authority: Address::from("W1"),
            decimals: 0,
        }
    }

    fn metadata_tx(mint: &Address) -> Transaction {
        Transaction::AttachMetadata {
            mint: mint.clone(),
            symbol: "NFT".to_owned(),
            metadata_uri: String::new(),
            seller_fee_basis_points: 500,
            creators: vec![Creator {
                address: Address::from("W1"),
                share: 100,
            }],
        }
    }

    #[tokio::test]
    async fn create_mint_allocates_fresh_addresses() {
        let ledger = SimulatedLedger::new();
        let first = ledger.submit(signed(create_mint_tx())).await.unwrap();
        let second = ledger.submit(signed(create_mint_tx())).await.unwrap();
        assert_ne!(first.new_account, None);
        assert_ne!(first.new_account, second.new_account);
    }

    #[tokio::test]
    async fn metadata_cannot_be_attached_twice() {
        let ledger = SimulatedLedger::new();
        let receipt = ledger.submit(signed(create_mint_tx())).await.unwrap();
        let mint = receipt.new_account.unwrap();

        ledger.submit(signed(metadata_tx(&mint))).await.unwrap();
        let err = ledger.submit(signed(metadata_tx(&mint))).await.unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
    }

    #[tokio::test]
    async fn finalize_requires_metadata() {
        let ledger = SimulatedLedger::new();
        let receipt = ledger.submit(signed(create_mint_tx())).await.unwrap();
        let mint = receipt.new_account.unwrap();

        let finalize = Transaction::Finalize {
            mint: mint.clone(),
            mint_authority: Address::from("W1"),
        };
        let err = ledger.submit(signed(finalize.clone())).await.unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));

        ledger.submit(signed(metadata_tx(&mint))).await.unwrap();
        ledger.submit(signed(finalize)).await.unwrap();
        assert!(ledger.minting_disabled(&mint).await);
    }

    #[tokio::test]
    async fn transient_then_confirm_counts_failures() {
        let ledger = SimulatedLedger::new().with_behavior(
            MintStep::CreateMint,
            StepBehavior::TransientThenConfirm { failures: 2 },
        );
        for _ in 0..2 {
            let err = ledger.submit(signed(create_mint_tx())).await.unwrap_err();
            assert!(matches!(err, SubmitError::Transient(_)));
        }
        assert!(ledger.submit(signed(create_mint_tx())).await.is_ok());
        assert_eq!(ledger.submission_count(MintStep::CreateMint).await, 3);
    }
}
