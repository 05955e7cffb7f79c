//! Mint rehearsal role.
//!
//! Loads a TOML mint configuration, validates it, and drives the full
//! orchestration sequence against the deterministic simulated ledger. The
//! structured outcome is printed as JSON, so a configuration can be checked
//! end to end (royalty accounting, creator shares, retry behavior) before a
//! real ledger connection and wallet are put behind the same orchestrator.

mod args;
mod config;

use std::sync::Arc;

use anyhow::Context;
use args::Args;
use config::MinterConfig;
use nft_mint::{
    Address, MintOrchestrator, MintOutcome, MintSpec, MintStep, SimulatedLedger, SimulatedSigner,
    Signer, StepBehavior,
};
use tracing::{error, info};

fn process_cli_args() -> anyhow::Result<MinterConfig> {
    let args = Args::from_args().map_err(|help| {
        error!("{}", help);
        anyhow::anyhow!("bad CLI arguments")
    })?;

    let config_path = args
        .config_path
        .to_str()
        .context("invalid configuration path")?;

    MinterConfig::from_path(config_path)
        .with_context(|| format!("failed to load config from {config_path}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut config = process_cli_args()?;

    // override config file with env var for improved devex configurability
    if let Ok(address_override) = std::env::var("MINTER_SIGNER_ADDRESS") {
        info!(
            "Overriding signer_address with env var MINTER_SIGNER_ADDRESS={}",
            address_override
        );
        config.signer_address = address_override;
    }

    let signer = SimulatedSigner::new(Address::new(config.signer_address.clone()));
    let spec = MintSpec::build(&config.mint, &signer.public_address(), &config.policy)
        .context("mint parameters failed validation")?;
    info!(
        symbol = %spec.symbol(),
        fee_bps = spec.seller_fee_basis_points(),
        creators = spec.creators().len(),
        "mint spec validated"
    );

    let mut ledger = SimulatedLedger::new();
    if config.rehearsal.metadata_transient_failures > 0 {
        ledger = ledger.with_behavior(
            MintStep::AttachMetadata,
            StepBehavior::TransientThenConfirm {
                failures: config.rehearsal.metadata_transient_failures,
            },
        );
    }
    let ledger = Arc::new(ledger);

    let orchestrator = MintOrchestrator::new(Arc::clone(&ledger), signer, config.retry.clone());
    let attempt = orchestrator.execute(&spec).await;
    let outcome = MintOutcome::from_attempt(&attempt);

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.succeeded() {
        error!("mint rehearsal did not finalize");
        std::process::exit(1);
    }
    Ok(())
}
