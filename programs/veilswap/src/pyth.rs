//! Pyth oracle adapter
//!
//! Reads and validates Pyth pull-oracle prices and converts them to the
//! engine's 18-decimal fixed point. Staleness is gated by
//! `MAX_ORACLE_STALENESS`.

use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::{Price, PriceUpdateV2, VerificationLevel};

use crate::constants::MAX_ORACLE_STALENESS;
use crate::errors::VeilswapError;

/// Maximum age for price data in seconds
/// - Mainnet: the protocol staleness constant
/// - Devnet: feeds update far less frequently, allow four times as long
#[cfg(not(feature = "devnet"))]
pub const MAXIMUM_PRICE_AGE: u64 = MAX_ORACLE_STALENESS;

#[cfg(feature = "devnet")]
pub const MAXIMUM_PRICE_AGE: u64 = 4 * MAX_ORACLE_STALENESS;

/// Minimum verification level for Pyth prices
///
/// Pyth v2 pull oracle uses partial verification to fit in single
/// transactions. 5 signatures is Pyth's recommended minimum.
pub const MIN_VERIFICATION_LEVEL: VerificationLevel =
    VerificationLevel::Partial { num_signatures: 5 };

/// Get a market's mark price with feed and staleness validation.
///
/// # Returns
/// * Price in 18-decimal fixed point
pub fn get_price(
    price_update: &Account<PriceUpdateV2>,
    feed_id: &[u8; 32],
    clock: &Clock,
) -> Result<u128> {
    require!(
        price_update.price_message.feed_id == *feed_id,
        VeilswapError::InvalidPriceFeed
    );

    let price = price_update
        .get_price_no_older_than_with_custom_verification_level(
            clock,
            MAXIMUM_PRICE_AGE,
            feed_id,
            MIN_VERIFICATION_LEVEL,
        )
        .map_err(|e| {
            msg!("Pyth price error: {:?}", e);
            VeilswapError::StaleOraclePrice
        })?;

    convert_price_to_fixed_18(&price)
}

/// Convert a Pyth price to 18-decimal fixed point.
///
/// Pyth prices are i64 with a variable exponent (typically -8).
fn convert_price_to_fixed_18(price: &Price) -> Result<u128> {
    require!(price.price > 0, VeilswapError::InvalidOraclePrice);

    let value = price.price as u128;
    let adjustment = 18i32 + price.exponent;

    if adjustment >= 0 {
        value
            .checked_mul(10u128.pow(adjustment as u32))
            .ok_or_else(|| error!(VeilswapError::AmountOverflow))
    } else {
        value
            .checked_div(10u128.pow((-adjustment) as u32))
            .ok_or_else(|| error!(VeilswapError::AmountOverflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(value: i64, exponent: i32) -> Price {
        Price {
            price: value,
            conf: 0,
            exponent,
            publish_time: 0,
        }
    }

    #[test]
    fn test_negative_exponent_scales_up() {
        // $150.00 at exponent -8
        let p = convert_price_to_fixed_18(&price(15_000_000_000, -8)).unwrap();
        assert_eq!(p, 150 * 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_zero_exponent() {
        let p = convert_price_to_fixed_18(&price(42, 0)).unwrap();
        assert_eq!(p, 42 * 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(convert_price_to_fixed_18(&price(0, -8)).is_err());
        assert!(convert_price_to_fixed_18(&price(-1, -8)).is_err());
    }
}
