//! Fixed-price listings and sale settlement for a minted NFT.
//!
//! A sale moves the listing price from buyer to seller and carves the
//! royalty out of the seller's side: `price * fee_bps / 10000`, split across
//! the creators by their shares. The math is pure; actually moving funds and
//! the token is ledger transport and stays behind the capability traits.

use serde::Serialize;
use thiserror::Error;

use crate::error::ValidationError;
use crate::ledger::Address;
use crate::spec::Creator;
use crate::validate;
use crate::validate::{MAX_CREATOR_SHARE, MAX_SELLER_FEE_BASIS_POINTS};

/// Why a listing or sale cannot settle.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SaleError {
    #[error("listing price must be greater than zero")]
    InvalidPrice,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An NFT offered for sale at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub mint: Address,
    pub seller: Address,
    pub price: u64,
}

impl Listing {
    /// A zero-price listing can never settle, so it cannot be created.
    pub fn new(mint: Address, seller: Address, price: u64) -> Result<Self, SaleError> {
        if price == 0 {
            return Err(SaleError::InvalidPrice);
        }
        Ok(Self {
            mint,
            seller,
            price,
        })
    }
}

/// One royalty transfer owed by a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub recipient: Address,
    pub amount: u64,
}

/// Funds movement for one completed sale. The buyer pays the full listing
/// price; the royalty comes out of the seller's proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub mint: Address,
    pub new_owner: Address,
    pub seller_proceeds: u64,
    pub royalty_total: u64,
    pub royalties: Vec<Payout>,
}

/// Work out who gets paid what when `buyer` takes a listing.
///
/// The fee and creator shares are re-checked even though they normally come
/// from a validated metadata account, so unvalidated input cannot produce
/// payouts exceeding the price. Integer division rounds each payout down;
/// the remainder stays with the seller.
pub fn settle_sale(
    listing: &Listing,
    buyer: &Address,
    seller_fee_basis_points: u16,
    creators: &[Creator],
) -> Result<Settlement, SaleError> {
    if listing.price == 0 {
        return Err(SaleError::InvalidPrice);
    }
    validate::validate_fee(seller_fee_basis_points)?;
    // No creators means no royalty recipients, which a mint built with
    // `allow_empty_creators` legitimately produces.
    if !creators.is_empty() {
        validate::validate_creators(creators)?;
    }

    let price = u128::from(listing.price);
    let royalty_pool =
        price * u128::from(seller_fee_basis_points) / u128::from(MAX_SELLER_FEE_BASIS_POINTS);

    let mut royalties = Vec::with_capacity(creators.len());
    let mut royalty_total: u128 = 0;
    for creator in creators {
        let amount = royalty_pool * u128::from(creator.share) / u128::from(MAX_CREATOR_SHARE);
        if amount > 0 {
            royalty_total += amount;
            royalties.push(Payout {
                recipient: creator.address.clone(),
                amount: amount as u64,
            });
        }
    }

    Ok(Settlement {
        mint: listing.mint.clone(),
        new_owner: buyer.clone(),
        seller_proceeds: (price - royalty_total) as u64,
        royalty_total: royalty_total as u64,
        royalties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator(address: &str, share: u8) -> Creator {
        Creator {
            address: Address::from(address),
            share,
        }
    }

    fn listing(price: u64) -> Listing {
        Listing {
            mint: Address::from("M1"),
            seller: Address::from("SELLER"),
            price,
        }
    }

    #[test]
    fn zero_price_listing_cannot_be_created() {
        assert_eq!(
            Listing::new(Address::from("M1"), Address::from("SELLER"), 0).unwrap_err(),
            SaleError::InvalidPrice
        );
    }

    #[test]
    fn five_percent_royalty_goes_to_the_sole_creator() {
        let settlement = settle_sale(
            &listing(1_000),
            &Address::from("BUYER"),
            500,
            &[creator("W1", 100)],
        )
        .unwrap();

        assert_eq!(settlement.royalty_total, 50);
        assert_eq!(settlement.seller_proceeds, 950);
        assert_eq!(
            settlement.royalties,
            vec![Payout {
                recipient: Address::from("W1"),
                amount: 50,
            }]
        );
        assert_eq!(settlement.new_owner, Address::from("BUYER"));
    }

    #[test]
    fn royalty_splits_by_creator_share() {
        let creators = [creator("W1", 60), creator("W2", 30), creator("W3", 10)];
        let settlement = settle_sale(
            &listing(10_000),
            &Address::from("BUYER"),
            1_000,
            &creators,
        )
        .unwrap();

        assert_eq!(settlement.royalty_total, 1_000);
        assert_eq!(settlement.seller_proceeds, 9_000);
        let amounts: Vec<u64> = settlement.royalties.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![600, 300, 100]);
    }

    #[test]
    fn rounding_remainder_stays_with_the_seller() {
        // 5% of 999 is 49 (rounded down); each 50% share of that is 24.
        let creators = [creator("W1", 50), creator("W2", 50)];
        let settlement =
            settle_sale(&listing(999), &Address::from("BUYER"), 500, &creators).unwrap();

        assert_eq!(settlement.royalty_total, 48);
        assert_eq!(settlement.seller_proceeds, 951);
    }

    #[test]
    fn zero_fee_means_no_royalty_payouts() {
        let settlement = settle_sale(
            &listing(1_000),
            &Address::from("BUYER"),
            0,
            &[creator("W1", 100)],
        )
        .unwrap();

        assert_eq!(settlement.royalty_total, 0);
        assert!(settlement.royalties.is_empty());
        assert_eq!(settlement.seller_proceeds, 1_000);
    }

    #[test]
    fn no_creators_means_the_seller_keeps_everything() {
        let settlement =
            settle_sale(&listing(1_000), &Address::from("BUYER"), 500, &[]).unwrap();

        assert!(settlement.royalties.is_empty());
        assert_eq!(settlement.seller_proceeds, 1_000);
    }

    #[test]
    fn invalid_shares_never_settle() {
        let creators = [creator("W1", 60), creator("W2", 30)];
        assert_eq!(
            settle_sale(&listing(1_000), &Address::from("BUYER"), 500, &creators).unwrap_err(),
            SaleError::Validation(ValidationError::SharesDoNotSumTo100(90))
        );
    }

    #[test]
    fn full_royalty_at_maximum_fee() {
        // 10000 basis points: the whole price is royalty, the seller gets
        // nothing, and nothing underflows.
        let settlement = settle_sale(
            &listing(1_000),
            &Address::from("BUYER"),
            10_000,
            &[creator("W1", 100)],
        )
        .unwrap();

        assert_eq!(settlement.royalty_total, 1_000);
        assert_eq!(settlement.seller_proceeds, 0);
    }
}
