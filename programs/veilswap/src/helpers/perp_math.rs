//! Perp position math
//!
//! Pure 18-dec fixed-point calculations for the position manager: notional,
//! margin requirement, mark-to-market PnL, entry-price averaging, funding
//! payments, and the liquidation predicate. The liquidation price is derived
//! by bisection on the predicate rather than a closed form.

use anchor_lang::prelude::*;

use crate::constants::PRECISION;
use crate::errors::VeilswapError;
use crate::helpers::fixed_point::mul_div;

/// size * price / 1e18
pub fn notional(size: u128, price: u128) -> Result<u128> {
    mul_div(size, price, PRECISION)
}

/// Margin required to hold `size` at `price` under `leverage`:
/// notional * 1e18 / leverage
pub fn required_margin(size: u128, price: u128, leverage: u128) -> Result<u128> {
    require!(leverage > 0, VeilswapError::InvalidLeverage);
    mul_div(notional(size, price)?, PRECISION, leverage)
}

/// Signed mark-to-market PnL for `size` between entry and mark.
/// Long: size * (mark - entry) / 1e18. Short: the negation.
pub fn unrealized_pnl(size: u128, is_long: bool, entry: u128, mark: u128) -> Result<i128> {
    let gain = mark >= entry;
    let diff = if gain { mark - entry } else { entry - mark };
    let magnitude = mul_div(size, diff, PRECISION)?;
    let magnitude =
        i128::try_from(magnitude).map_err(|_| error!(VeilswapError::AmountOverflow))?;
    // a long profits when the mark rises, a short when it falls
    Ok(if gain == is_long { magnitude } else { -magnitude })
}

/// Notional-weighted entry price across a same-direction increase:
/// (old_notional * old_entry + add_notional * price) / (old_notional + add_notional)
pub fn average_entry_price(
    old_size: u128,
    old_entry: u128,
    add_size: u128,
    price: u128,
) -> Result<u128> {
    let old_notional = notional(old_size, old_entry)?;
    let add_notional = notional(add_size, price)?;
    let total = old_notional
        .checked_add(add_notional)
        .ok_or(VeilswapError::AmountOverflow)?;
    require!(total > 0, VeilswapError::InvalidSize);
    let weighted_old = mul_div(old_notional, old_entry, total)?;
    let weighted_add = mul_div(add_notional, price, total)?;
    weighted_old
        .checked_add(weighted_add)
        .ok_or_else(|| error!(VeilswapError::AmountOverflow))
}

/// Signed funding owed since the position's last settlement:
/// notional * (current_cumulative - entry_cumulative) / 1e18.
/// Positive = the position pays (longs on a positive index move);
/// shorts see the negated amount.
pub fn funding_payment(
    size: u128,
    is_long: bool,
    mark: u128,
    cumulative: i128,
    entry_cumulative: i128,
) -> Result<i128> {
    let delta = cumulative
        .checked_sub(entry_cumulative)
        .ok_or(VeilswapError::AmountOverflow)?;
    let magnitude = mul_div(notional(size, mark)?, delta.unsigned_abs(), PRECISION)?;
    let magnitude =
        i128::try_from(magnitude).map_err(|_| error!(VeilswapError::AmountOverflow))?;
    let signed = if delta >= 0 { magnitude } else { -magnitude };
    // shorts earn what longs pay
    Ok(if is_long { signed } else { -signed })
}

/// Equity after PnL, clamped at zero
pub fn equity(collateral: u128, pnl: i128) -> u128 {
    if pnl >= 0 {
        collateral.saturating_add(pnl as u128)
    } else {
        collateral.saturating_sub(pnl.unsigned_abs())
    }
}

/// Liquidation predicate: equity-to-notional at the mark price at or below
/// the maintenance margin ratio. A zero-notional position is never
/// liquidatable.
pub fn is_liquidatable(
    size: u128,
    is_long: bool,
    entry: u128,
    collateral: u128,
    mark: u128,
    maintenance_margin: u64,
) -> Result<bool> {
    let position_notional = notional(size, mark)?;
    if position_notional == 0 {
        return Ok(false);
    }
    let pnl = unrealized_pnl(size, is_long, entry, mark)?;
    let ratio = mul_div(equity(collateral, pnl), PRECISION, position_notional)?;
    Ok(ratio <= maintenance_margin as u128)
}

/// Price at which the position becomes liquidatable, found by bisection on
/// `is_liquidatable`. Returns None when no such price exists (equity covers
/// the position at every price on the losing side).
pub fn liquidation_price(
    size: u128,
    is_long: bool,
    entry: u128,
    collateral: u128,
    maintenance_margin: u64,
) -> Result<Option<u128>> {
    if size == 0 {
        return Ok(None);
    }
    let check = |mark: u128| is_liquidatable(size, is_long, entry, collateral, mark, maintenance_margin);

    if is_long {
        // liquidatable below some boundary: find the highest true mark
        let mut lo = 1u128;
        let mut hi = entry;
        if !check(lo)? {
            return Ok(None);
        }
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if check(mid)? {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Ok(Some(lo))
    } else {
        // liquidatable above some boundary: find the lowest true mark.
        // At entry + collateral/size the equity is exhausted, so the
        // predicate is certainly true there.
        let mut lo = entry;
        let mut hi = entry
            .checked_add(mul_div(collateral, PRECISION, size)?)
            .ok_or(VeilswapError::AmountOverflow)?
            .checked_add(1)
            .ok_or(VeilswapError::AmountOverflow)?;
        if check(lo)? {
            return Ok(Some(lo));
        }
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if check(mid)? {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(Some(lo))
    }
}
