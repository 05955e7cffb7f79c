//! Pure validation of royalty and creator-share invariants.
//!
//! Runs before any ledger interaction; a spec that passed validation can be
//! submitted without further input checks.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::spec::Creator;

/// 10000 basis points = 100%.
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;
/// Creator shares are whole percentages.
pub const MAX_CREATOR_SHARE: u8 = 100;
/// Metadata symbols are short tickers; the metadata account bounds them.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Check the royalty fee and the creator list together.
pub fn validate(
    seller_fee_basis_points: u16,
    creators: &[Creator],
) -> Result<(), ValidationError> {
    validate_fee(seller_fee_basis_points)?;
    validate_creators(creators)
}

/// The royalty fee must stay within 0..=10000 basis points.
pub fn validate_fee(seller_fee_basis_points: u16) -> Result<(), ValidationError> {
    if seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
        return Err(ValidationError::FeeOutOfRange(seller_fee_basis_points));
    }
    Ok(())
}

/// Creator shares must be unique-addressed, each within 0..=100, and sum to
/// exactly 100.
pub fn validate_creators(creators: &[Creator]) -> Result<(), ValidationError> {
    if creators.is_empty() {
        return Err(ValidationError::EmptyCreatorList);
    }

    let mut seen = HashSet::new();
    let mut total: u32 = 0;
    for creator in creators {
        if creator.share > MAX_CREATOR_SHARE {
            return Err(ValidationError::ShareOutOfRange {
                address: creator.address.clone(),
                share: creator.share,
            });
        }
        if !seen.insert(&creator.address) {
            return Err(ValidationError::DuplicateCreatorAddress(
                creator.address.clone(),
            ));
        }
        total += u32::from(creator.share);
    }

    if total != u32::from(MAX_CREATOR_SHARE) {
        return Err(ValidationError::SharesDoNotSumTo100(total));
    }
    Ok(())
}

/// A non-empty symbol must fit the metadata account's ticker field.
pub fn validate_symbol(symbol: &str) -> Result<(), ValidationError> {
    let length = symbol.chars().count();
    if length > MAX_SYMBOL_LEN {
        return Err(ValidationError::SymbolTooLong {
            length,
            max: MAX_SYMBOL_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Address;

    fn creator(address: &str, share: u8) -> Creator {
        Creator {
            address: Address::from(address),
            share,
        }
    }

    #[test]
    fn accepts_single_full_share_creator() {
        assert!(validate(500, &[creator("W1", 100)]).is_ok());
    }

    #[test]
    fn accepts_split_shares_summing_to_100() {
        let creators = [creator("W1", 60), creator("W2", 30), creator("W3", 10)];
        assert!(validate(0, &creators).is_ok());
    }

    #[test]
    fn fee_boundaries() {
        let creators = [creator("W1", 100)];
        assert!(validate(0, &creators).is_ok());
        assert!(validate(10_000, &creators).is_ok());
        assert_eq!(
            validate(10_001, &creators),
            Err(ValidationError::FeeOutOfRange(10_001))
        );
    }

    #[test]
    fn rejects_empty_creator_list() {
        assert_eq!(validate(500, &[]), Err(ValidationError::EmptyCreatorList));
    }

    #[test]
    fn rejects_share_above_100() {
        let creators = [creator("W1", 101)];
        assert_eq!(
            validate(500, &creators),
            Err(ValidationError::ShareOutOfRange {
                address: Address::from("W1"),
                share: 101,
            })
        );
    }

    #[test]
    fn rejects_shares_not_summing_to_100() {
        let creators = [creator("W1", 60), creator("W2", 30)];
        assert_eq!(
            validate(500, &creators),
            Err(ValidationError::SharesDoNotSumTo100(90))
        );
    }

    #[test]
    fn rejects_duplicate_creator_address() {
        let creators = [creator("W1", 50), creator("W1", 50)];
        assert_eq!(
            validate(500, &creators),
            Err(ValidationError::DuplicateCreatorAddress(Address::from("W1")))
        );
    }

    #[test]
    fn duplicate_detected_before_sum_mismatch() {
        // Both invariants are violated; the duplicate is reported first
        // because it is found while accumulating the sum.
        let creators = [creator("W1", 40), creator("W1", 40)];
        assert_eq!(
            validate(500, &creators),
            Err(ValidationError::DuplicateCreatorAddress(Address::from("W1")))
        );
    }

    #[test]
    fn symbol_length_boundary() {
        assert!(validate_symbol("NFTSYMBOL1").is_ok());
        assert_eq!(
            validate_symbol("NFTSYMBOL11"),
            Err(ValidationError::SymbolTooLong { length: 11, max: 10 })
        );
    }
}
