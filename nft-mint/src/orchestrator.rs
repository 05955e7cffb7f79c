//! Drives the multi-step on-chain creation sequence.
//!
//! One attempt is a strict sequence: create the token mint, attach metadata,
//! finalize. Transient failures are retried per step with bounded exponential
//! backoff; confirmed rejections are not. Once the mint account exists its
//! address is never discarded, whatever happens afterwards.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::attempt::{MintAttempt, MintStep};
use crate::error::{MintError, SubmitError};
use crate::ledger::{Address, LedgerConnection, Signer, Transaction, TransactionReceipt};
use crate::outcome::MintOutcome;
use crate::spec::MintSpec;

/// Per-step retry and timeout policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional submissions after the first, per step.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on each subsequent one.
    pub initial_backoff_ms: u64,
    /// How long to wait for one submission to confirm. Exceeding this is a
    /// transient failure, not a rejection: the ledger may still confirm late.
    pub step_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 250,
            step_timeout_ms: 5000,
        }
    }
}

/// Executes mint attempts against caller-supplied ledger capabilities.
///
/// Holds no mutable state of its own; independent attempts may run
/// concurrently as long as the capabilities tolerate it.
pub struct MintOrchestrator<L, S> {
    ledger: L,
    signer: S,
    policy: RetryPolicy,
    cancel: Option<watch::Receiver<bool>>,
}

impl<L: LedgerConnection, S: Signer> MintOrchestrator<L, S> {
    pub fn new(ledger: L, signer: S, policy: RetryPolicy) -> Self {
        Self {
            ledger,
            signer,
            policy,
            cancel: None,
        }
    }

    /// Attach a cancellation signal. It is honored only between steps; a
    /// submitted transaction always runs to a definitive outcome first.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run the full sequence and report the outcome, failing with the
    /// attempt's terminal error when it did not finalize.
    pub async fn mint(&self, spec: &MintSpec) -> Result<MintOutcome, MintError> {
        let attempt = self.execute(spec).await;
        match attempt.last_error() {
            None => Ok(MintOutcome::from_attempt(&attempt)),
            Some(err) => Err(err.clone()),
        }
    }

    /// Run the full sequence and return the raw attempt record.
    ///
    /// Useful when the caller wants the uniform [`MintOutcome`] view of both
    /// success and failure instead of a `Result` branch.
    pub async fn execute(&self, spec: &MintSpec) -> MintAttempt {
        let mut attempt = MintAttempt::new();
        info!(
            symbol = %spec.symbol(),
            authority = %spec.mint_authority(),
            "starting mint attempt"
        );

        if self.cancelled() {
            attempt.record_failure(MintError::Cancelled {
                next_step: MintStep::CreateMint,
            });
            return attempt;
        }

        let create = Transaction::CreateMint {
            mint_authority: spec.mint_authority().clone(),
            decimals: 0,
        };
        let mint_address = match self.run_step(MintStep::CreateMint, create).await {
            Ok(TransactionReceipt {
                new_account: Some(address),
            }) => {
                info!(%address, "token mint created");
                attempt.record_mint_created(address.clone());
                address
            }
            Ok(TransactionReceipt { new_account: None }) => {
                attempt.record_failure(MintError::StepRejected {
                    step: MintStep::CreateMint,
                    reason: "ledger confirmed the transaction without allocating a mint account"
                        .to_owned(),
                });
                return attempt;
            }
            Err(err) => {
                error!(%err, "mint account was never created");
                attempt.record_failure(err);
                return attempt;
            }
        };

        let metadata = Transaction::AttachMetadata {
            mint: mint_address.clone(),
            symbol: spec.symbol().to_owned(),
            metadata_uri: spec.metadata_uri().to_owned(),
            seller_fee_basis_points: spec.seller_fee_basis_points(),
            creators: spec.creators().to_vec(),
        };
        if !self
            .run_follow_up_step(&mut attempt, &mint_address, MintStep::AttachMetadata, metadata)
            .await
        {
            return attempt;
        }
        attempt.record_metadata_attached();

        let finalize = Transaction::Finalize {
            mint: mint_address.clone(),
            mint_authority: spec.mint_authority().clone(),
        };
        if !self
            .run_follow_up_step(&mut attempt, &mint_address, MintStep::Finalize, finalize)
            .await
        {
            return attempt;
        }
        attempt.record_finalized();

        info!(%mint_address, "mint finalized");
        attempt
    }

    /// Run a step that comes after the mint account exists. Returns `false`
    /// when the attempt terminated; the failure is already recorded and the
    /// mint address is preserved.
    async fn run_follow_up_step(
        &self,
        attempt: &mut MintAttempt,
        mint_address: &Address,
        step: MintStep,
        tx: Transaction,
    ) -> bool {
        if self.cancelled() {
            warn!(%step, %mint_address, "cancellation observed, abandoning attempt between steps");
            attempt.record_failure(MintError::Cancelled { next_step: step });
            return false;
        }

        match self.run_step(step, tx).await {
            Ok(_) => true,
            Err(err) => {
                // Retry exhaustion after step 1 means real on-chain state
                // exists; surface the address together with the cause.
                let err = match err {
                    MintError::TransientNetwork { .. } => MintError::PartialMint {
                        mint_address: mint_address.clone(),
                        failed_at_step: step,
                        source: Box::new(err),
                    },
                    other => other,
                };
                error!(%step, %mint_address, %err, "mint left partially created");
                attempt.record_failure(err);
                false
            }
        }
    }

    /// Sign and submit one step, retrying transient failures with
    /// exponential backoff until the policy's bound is hit.
    async fn run_step(
        &self,
        step: MintStep,
        tx: Transaction,
    ) -> Result<TransactionReceipt, MintError> {
        let signed = self.signer.sign(tx);
        let step_timeout = Duration::from_millis(self.policy.step_timeout_ms);
        let mut backoff = Duration::from_millis(self.policy.initial_backoff_ms);
        let mut submissions = 0u32;

        loop {
            submissions += 1;
            debug!(%step, submissions, "submitting transaction");

            let reason = match timeout(step_timeout, self.ledger.submit(signed.clone())).await {
                Ok(Ok(receipt)) => {
                    debug!(%step, "transaction confirmed");
                    return Ok(receipt);
                }
                Ok(Err(SubmitError::Rejected(reason))) => {
                    return Err(MintError::StepRejected { step, reason });
                }
                Ok(Err(SubmitError::Transient(reason))) => reason,
                Err(_) => format!(
                    "no confirmation within {}ms",
                    self.policy.step_timeout_ms
                ),
            };

            if submissions > self.policy.max_retries {
                return Err(MintError::TransientNetwork {
                    step,
                    attempts: submissions,
                    reason,
                });
            }

            warn!(
                %step,
                submissions,
                backoff_ms = backoff.as_millis() as u64,
                %reason,
                "transient failure, backing off before retry"
            );
            sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|cancel| *cancel.borrow())
            .unwrap_or(false)
    }
}
