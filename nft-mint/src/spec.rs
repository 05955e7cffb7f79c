//! Canonical mint specification and its builder.
//!
//! A [`MintSpec`] is built once from validated input and never mutated; the
//! orchestrator reads it but cannot change it. Defaulting behavior (empty
//! creator list, empty symbol) is governed by explicit [`BuilderPolicy`]
//! options, never applied silently.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ledger::Address;
use crate::validate;

/// One royalty recipient: an address and its whole-percentage share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: Address,
    pub share: u8,
}

/// Raw caller-supplied mint parameters, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawMintParams {
    pub metadata_uri: String,
    pub symbol: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
}

/// Explicit defaulting policy for the builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuilderPolicy {
    /// Accept a spec with no creators at all instead of rejecting it.
    pub allow_empty_creators: bool,
    /// When no creators are given, fall back to the signer as the sole
    /// creator with a 100% share. Takes precedence over
    /// `allow_empty_creators` when both are set.
    pub default_creator_share_to_signer: bool,
    /// Accept an empty symbol instead of rejecting it.
    pub allow_empty_symbol: bool,
}

impl Default for BuilderPolicy {
    fn default() -> Self {
        Self {
            allow_empty_creators: false,
            default_creator_share_to_signer: true,
            allow_empty_symbol: false,
        }
    }
}

/// Immutable, validated specification of one mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintSpec {
    metadata_uri: String,
    symbol: String,
    seller_fee_basis_points: u16,
    creators: Vec<Creator>,
    mint_authority: Address,
}

impl MintSpec {
    /// Validate `raw` under `policy` and assemble the canonical spec.
    ///
    /// Deterministic and free of I/O: identical input yields a structurally
    /// equal spec. The signer's address becomes the mint authority.
    pub fn build(
        raw: &RawMintParams,
        signer_address: &Address,
        policy: &BuilderPolicy,
    ) -> Result<Self, ValidationError> {
        if raw.symbol.is_empty() && !policy.allow_empty_symbol {
            return Err(ValidationError::EmptySymbol);
        }
        validate::validate_symbol(&raw.symbol)?;
        validate::validate_fee(raw.seller_fee_basis_points)?;

        let creators = if raw.creators.is_empty() && policy.default_creator_share_to_signer {
            vec![Creator {
                address: signer_address.clone(),
                share: 100,
            }]
        } else {
            raw.creators.clone()
        };

        // An empty list is only legal when the policy asks for it; the
        // metadata account then carries no creator records at all.
        if !(creators.is_empty() && policy.allow_empty_creators) {
            validate::validate_creators(&creators)?;
        }

        Ok(Self {
            metadata_uri: raw.metadata_uri.clone(),
            symbol: raw.symbol.clone(),
            seller_fee_basis_points: raw.seller_fee_basis_points,
            creators,
            mint_authority: signer_address.clone(),
        })
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn seller_fee_basis_points(&self) -> u16 {
        self.seller_fee_basis_points
    }

    pub fn creators(&self) -> &[Creator] {
        &self.creators
    }

    pub fn mint_authority(&self) -> &Address {
        &self.mint_authority
    }
}
