//! 18-decimal fixed point arithmetic
//!
//! All internal position accounting (sizes, prices, collateral, leverage,
//! funding) is 18-decimal fixed point. Products of two 18-dec values exceed
//! u128, so the core primitive is a full-precision 256-bit mul-div. The one
//! mixed-decimal boundary (margin pool vault <-> internal ledger) funnels
//! through the two converters at the bottom.

use anchor_lang::prelude::*;

use crate::constants::PRECISION;
use crate::errors::VeilswapError;

/// Full 128x128 -> 256 bit multiply via 64-bit limbs.
/// Returns (hi, lo).
fn mul_128(a: u128, b: u128) -> (u128, u128) {
    let a_lo = a as u64 as u128;
    let a_hi = a >> 64;
    let b_lo = b as u64 as u128;
    let b_hi = b >> 64;

    let p0 = a_lo * b_lo;
    let p1 = a_lo * b_hi;
    let p2 = a_hi * b_lo;
    let p3 = a_hi * b_hi;

    let (mid, mid_carry) = p1.overflowing_add(p2);
    let (lo, lo_carry) = p0.overflowing_add(mid << 64);
    let hi = p3 + (mid >> 64) + ((mid_carry as u128) << 64) + (lo_carry as u128);

    (hi, lo)
}

/// floor(a * b / denom) with a 256-bit intermediate.
///
/// Errors on division by zero or a quotient above u128.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128> {
    require!(denom != 0, VeilswapError::AmountOverflow);

    let (hi, lo) = mul_128(a, b);
    if hi == 0 {
        return Ok(lo / denom);
    }
    // quotient fits u128 iff hi < denom
    require!(hi < denom, VeilswapError::AmountOverflow);

    // binary long division of the 256-bit value by denom
    let mut rem: u128 = 0;
    let mut quot: u128 = 0;
    for i in (0..256).rev() {
        let bit = if i >= 128 {
            (hi >> (i - 128)) & 1
        } else {
            (lo >> i) & 1
        };
        let carry = rem >> 127;
        rem = (rem << 1) | bit;
        let take = carry == 1 || rem >= denom;
        if take {
            rem = rem.wrapping_sub(denom);
        }
        quot = (quot << 1) | (take as u128);
    }
    Ok(quot)
}

/// a * b / PRECISION, the 18-dec product
pub fn fixed_mul(a: u128, b: u128) -> Result<u128> {
    mul_div(a, b, PRECISION)
}

/// a * PRECISION / b, the 18-dec quotient
pub fn fixed_div(a: u128, b: u128) -> Result<u128> {
    mul_div(a, PRECISION, b)
}

/// Native token units -> 18-dec internal units.
/// Token decimals above 18 are rejected at margin pool creation.
pub fn to_fixed_18(amount: u64, decimals: u8) -> Result<u128> {
    require!(decimals <= 18, VeilswapError::InvalidAmount);
    let scale = 10u128.pow(18 - decimals as u32);
    (amount as u128)
        .checked_mul(scale)
        .ok_or_else(|| error!(VeilswapError::AmountOverflow))
}

/// 18-dec internal units -> native token units, floor.
/// Any sub-native residue stays in the pool.
pub fn from_fixed_18(amount: u128, decimals: u8) -> Result<u64> {
    require!(decimals <= 18, VeilswapError::InvalidAmount);
    let scale = 10u128.pow(18 - decimals as u32);
    let native = amount / scale;
    u64::try_from(native).map_err(|_| error!(VeilswapError::AmountOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_small() {
        assert_eq!(mul_div(6, 7, 3).unwrap(), 14);
        assert_eq!(mul_div(10, 10, 3).unwrap(), 33); // floor
        assert_eq!(mul_div(0, u128::MAX, 5).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // 1e21 * 1e21 overflows u128 but the quotient fits
        let a = 1_000_000_000_000_000_000_000u128;
        assert_eq!(mul_div(a, a, PRECISION).unwrap(), a * 1_000);

        // identity through a huge intermediate
        assert_eq!(mul_div(u128::MAX, 12345, 12345).unwrap(), u128::MAX);
    }

    #[test]
    fn test_mul_div_rejects_overflowing_quotient() {
        assert!(mul_div(u128::MAX, 2, 1).is_err());
        assert!(mul_div(1, 1, 0).is_err());
    }

    #[test]
    fn test_fixed_mul_div() {
        let two = 2 * PRECISION;
        let three = 3 * PRECISION;
        assert_eq!(fixed_mul(two, three).unwrap(), 6 * PRECISION);
        assert_eq!(fixed_div(three, two).unwrap(), PRECISION * 3 / 2);
    }

    #[test]
    fn test_to_fixed_18() {
        // 6-decimal token: 1_000_000 units = 1.0
        assert_eq!(to_fixed_18(1_000_000, 6).unwrap(), PRECISION);
        // 18-decimal token passes through
        assert_eq!(to_fixed_18(123, 18).unwrap(), 123);
        assert!(to_fixed_18(1, 19).is_err());
    }

    #[test]
    fn test_from_fixed_18_floors() {
        // 1.5 units of a 6-decimal token
        let internal = PRECISION + PRECISION / 2;
        assert_eq!(from_fixed_18(internal, 6).unwrap(), 1_500_000);

        // residue below one native unit is floored away
        let dusty = PRECISION + 999_999_999_999; // < 1e12 = one native unit at 6 dec
        assert_eq!(from_fixed_18(dusty, 6).unwrap(), 1_000_000);
    }

    #[test]
    fn test_boundary_roundtrip_conserves_floor() {
        for amount in [0u64, 1, 999, 1_000_000, u32::MAX as u64] {
            let internal = to_fixed_18(amount, 9).unwrap();
            assert_eq!(from_fixed_18(internal, 9).unwrap(), amount);
        }
    }
}
