//! Position lifecycle
//!
//! The position manager's open/close/liquidate paths, operating jointly on
//! a market's position book and the margin pool ledger. Every mutation
//! keeps the conservation invariant: a user's total collateral covers the
//! sum of their position collateral. Funding settles on any touch of an
//! existing position.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, LIQUIDATION_FEE_BPS};
use crate::errors::VeilswapError;
use crate::helpers::perp_math::{
    average_entry_price, equity, funding_payment, is_liquidatable, required_margin,
    unrealized_pnl,
};
use crate::state::{MarginPool, Market, Position};

/// Result of an open, for event emission
pub struct OpenOutcome {
    pub entry_price: u128,
    pub collateral: u128,
    pub size: u128,
}

/// Result of a close, for event emission
pub struct CloseOutcome {
    pub pnl: i128,
    pub size_closed: u128,
    pub fully_closed: bool,
}

/// Settle funding accrued since the position's last touch.
/// Longs pay a positive index move, shorts receive it; charges clamp at the
/// position's remaining collateral.
pub fn settle_funding(
    market: &Market,
    position: &mut Position,
    margin: &mut MarginPool,
    mark: u128,
    now: i64,
) -> Result<()> {
    if position.size == 0 {
        return Ok(());
    }
    let payment = funding_payment(
        position.size,
        position.is_long,
        mark,
        market.cumulative_funding_rate,
        position.entry_cumulative_funding,
    )?;
    if payment > 0 {
        let charge = (payment as u128).min(position.collateral);
        position.collateral -= charge;
        margin.charge(&position.owner, charge)?;
    } else if payment < 0 {
        let credit = payment.unsigned_abs();
        position.collateral = position
            .collateral
            .checked_add(credit)
            .ok_or(VeilswapError::AmountOverflow)?;
        margin.credit_locked(&position.owner, credit)?;
    }
    position.entry_cumulative_funding = market.cumulative_funding_rate;
    position.last_funding_paid = now;
    Ok(())
}

/// Open or increase a position at `entry_price`.
///
/// Opposite-direction opens against a live position are rejected; the user
/// must close first. Same-direction increases average the entry price by
/// notional weight and overwrite the leverage.
pub fn open_position(
    market: &mut Market,
    margin: &mut MarginPool,
    user: Pubkey,
    size: u128,
    is_long: bool,
    leverage: u128,
    entry_price: u128,
    now: i64,
) -> Result<OpenOutcome> {
    market.require_active()?;
    require!(size > 0, VeilswapError::InvalidSize);
    require!(
        leverage > 0 && leverage <= market.max_leverage,
        VeilswapError::InvalidLeverage
    );

    let cumulative = market.cumulative_funding_rate;
    let existing = market.position_of(&user).map(|p| (p.size, p.is_long));
    if let Some((old_size, old_is_long)) = existing {
        if old_size > 0 {
            require!(old_is_long == is_long, VeilswapError::InvalidSize);
        }
    }

    // settle funding before the size changes
    if existing.map(|(s, _)| s > 0).unwrap_or(false) {
        let mut position = *market
            .position_of(&user)
            .ok_or(VeilswapError::InvalidSize)?;
        settle_funding(market, &mut position, margin, entry_price, now)?;
        *market
            .position_mut(&user)
            .ok_or(VeilswapError::InvalidSize)? = position;
    }

    let margin_needed = required_margin(size, entry_price, leverage)?;
    margin.lock(&user, margin_needed)?;

    let position = market.ensure_position(user)?;
    if position.size == 0 {
        position.is_long = is_long;
        position.entry_price = entry_price;
        position.entry_cumulative_funding = cumulative;
    } else {
        position.entry_price =
            average_entry_price(position.size, position.entry_price, size, entry_price)?;
    }
    position.size = position
        .size
        .checked_add(size)
        .ok_or(VeilswapError::AmountOverflow)?;
    position.collateral = position
        .collateral
        .checked_add(margin_needed)
        .ok_or(VeilswapError::AmountOverflow)?;
    position.leverage = leverage;
    position.last_funding_paid = now;

    let outcome = OpenOutcome {
        entry_price: position.entry_price,
        collateral: position.collateral,
        size: position.size,
    };
    market.add_open_interest(size, is_long);
    Ok(outcome)
}

/// Close `size_to_close` of a position at `mark`, realizing PnL against
/// the position's collateral. A full close returns the remaining
/// collateral to free margin and drops the book entry.
pub fn close_position(
    market: &mut Market,
    margin: &mut MarginPool,
    user: &Pubkey,
    size_to_close: u128,
    mark: u128,
    now: i64,
) -> Result<CloseOutcome> {
    require!(size_to_close > 0, VeilswapError::InvalidSize);

    let mut position = *market
        .position_of(user)
        .ok_or(VeilswapError::InvalidSize)?;
    require!(
        position.size > 0 && size_to_close <= position.size,
        VeilswapError::InvalidSize
    );

    settle_funding(market, &mut position, margin, mark, now)?;

    let pnl = unrealized_pnl(size_to_close, position.is_long, position.entry_price, mark)?;
    if pnl > 0 {
        position.collateral = position
            .collateral
            .checked_add(pnl as u128)
            .ok_or(VeilswapError::AmountOverflow)?;
        margin.credit_locked(user, pnl as u128)?;
    } else if pnl < 0 {
        let loss = pnl.unsigned_abs().min(position.collateral);
        position.collateral -= loss;
        margin.charge(user, loss)?;
    }

    position.size -= size_to_close;
    market.remove_open_interest(size_to_close, position.is_long);

    let fully_closed = position.size == 0;
    if fully_closed {
        margin.release(user, position.collateral)?;
        market.remove_position(user);
    } else {
        *market
            .position_mut(user)
            .ok_or(VeilswapError::InvalidSize)? = position;
    }

    Ok(CloseOutcome {
        pnl,
        size_closed: size_to_close,
        fully_closed,
    })
}

/// Permissionless liquidation. Succeeds only when the maintenance-margin
/// predicate holds at `mark`; takes the liquidation fee out of the
/// position's post-funding equity into the insurance fund, then closes the
/// whole position at `mark`.
pub fn liquidate_position(
    market: &mut Market,
    margin: &mut MarginPool,
    user: &Pubkey,
    mark: u128,
    now: i64,
) -> Result<CloseOutcome> {
    let mut position = *market
        .position_of(user)
        .ok_or(VeilswapError::NotLiquidatable)?;
    require!(position.size > 0, VeilswapError::NotLiquidatable);

    settle_funding(market, &mut position, margin, mark, now)?;

    require!(
        is_liquidatable(
            position.size,
            position.is_long,
            position.entry_price,
            position.collateral,
            mark,
            market.maintenance_margin,
        )?,
        VeilswapError::NotLiquidatable
    );

    // fee on the freed equity, into the insurance fund
    let pnl = unrealized_pnl(position.size, position.is_long, position.entry_price, mark)?;
    let freed = equity(position.collateral, pnl);
    let fee = freed
        .checked_mul(LIQUIDATION_FEE_BPS as u128)
        .ok_or(VeilswapError::AmountOverflow)?
        / BPS_DENOMINATOR as u128;
    if fee > 0 {
        let fee = fee.min(position.collateral);
        position.collateral -= fee;
        margin.charge(user, fee)?;
        margin.credit_insurance(fee)?;
    }

    let size = position.size;
    *market
        .position_mut(user)
        .ok_or(VeilswapError::NotLiquidatable)? = position;
    close_position(market, margin, user, size, mark, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    const P: u128 = PRECISION;

    fn setup() -> (Market, MarginPool, Pubkey) {
        let market = Market {
            max_leverage: 20 * P,
            maintenance_margin: (P / 20) as u64, // 5%
            is_active: true,
            ..Market::default()
        };
        let mut margin = MarginPool::default();
        let user = Pubkey::new_from_array([1; 32]);
        margin.deposit(user, 10_000 * P).unwrap();
        (market, margin, user)
    }

    #[test]
    fn test_open_locks_required_margin() {
        let (mut market, mut margin, user) = setup();
        // 1 base @ $2800, 10x -> 280 margin
        let outcome =
            open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        assert_eq!(outcome.collateral, 280 * P);
        assert_eq!(margin.available_margin(&user), (10_000 - 280) * P);
        assert_eq!(market.long_open_interest, P);
    }

    #[test]
    fn test_open_rejects_excess_leverage() {
        let (mut market, mut margin, user) = setup();
        // boundary: exactly max is allowed, one unit above is not
        assert!(open_position(
            &mut market, &mut margin, user, P, true, 20 * P, 2800 * P, 0
        )
        .is_ok());
        assert!(open_position(
            &mut market,
            &mut margin,
            user,
            P,
            true,
            20 * P + 1,
            2800 * P,
            0
        )
        .is_err());
    }

    #[test]
    fn test_open_rejects_direction_flip() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        let err =
            open_position(&mut market, &mut margin, user, P, false, 10 * P, 2800 * P, 0);
        assert!(err.is_err());
    }

    #[test]
    fn test_open_rejects_insufficient_margin() {
        let (mut market, mut margin, user) = setup();
        // 100 base @ $2800, 10x -> 28_000 margin > 10_000 deposited
        assert!(open_position(
            &mut market,
            &mut margin,
            user,
            100 * P,
            true,
            10 * P,
            2800 * P,
            0
        )
        .is_err());
    }

    #[test]
    fn test_open_close_roundtrip_conserves_collateral() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        let outcome =
            close_position(&mut market, &mut margin, &user, P, 2800 * P, 0).unwrap();

        assert_eq!(outcome.pnl, 0);
        assert!(outcome.fully_closed);
        assert!(market.position_of(&user).is_none());
        // flat close at the entry price returns every unit of collateral
        assert_eq!(margin.available_margin(&user), 10_000 * P);
        assert_eq!(market.long_open_interest, 0);
    }

    #[test]
    fn test_close_realizes_profit() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        let outcome =
            close_position(&mut market, &mut margin, &user, P, 2900 * P, 0).unwrap();

        assert_eq!(outcome.pnl, (100 * P) as i128);
        assert_eq!(margin.available_margin(&user), (10_000 + 100) * P);
    }

    #[test]
    fn test_close_loss_clamps_at_collateral() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        // mark collapses far past the collateral: loss clamps at 280
        let outcome =
            close_position(&mut market, &mut margin, &user, P, 2000 * P, 0).unwrap();

        assert_eq!(outcome.pnl, -((800 * P) as i128));
        assert_eq!(margin.available_margin(&user), (10_000 - 280) * P);
        let account = margin.account_of(&user).unwrap();
        assert_eq!(account.locked, 0);
    }

    #[test]
    fn test_partial_close_keeps_position() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, 2 * P, true, 10 * P, 2800 * P, 0).unwrap();
        let outcome =
            close_position(&mut market, &mut margin, &user, P, 2800 * P, 0).unwrap();

        assert!(!outcome.fully_closed);
        let position = market.position_of(&user).unwrap();
        assert_eq!(position.size, P);
        assert!(position.collateral > 0);
    }

    #[test]
    fn test_close_more_than_size_rejected() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();
        assert!(close_position(&mut market, &mut margin, &user, 2 * P, 2800 * P, 0).is_err());
    }

    #[test]
    fn test_same_direction_increase_averages_entry() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2000 * P, 0).unwrap();
        let outcome =
            open_position(&mut market, &mut margin, user, P, true, 10 * P, 3000 * P, 0).unwrap();

        // notional weights 2000 and 3000:
        // (2000*2000 + 3000*3000) / 5000 = 2600
        assert_eq!(outcome.entry_price, 2600 * P);
        assert_eq!(outcome.size, 2 * P);
    }

    #[test]
    fn test_funding_charges_long_credits_short() {
        let (mut market, mut margin, user) = setup();
        let short_user = Pubkey::new_from_array([2; 32]);
        margin.deposit(short_user, 10_000 * P).unwrap();

        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2000 * P, 0).unwrap();
        open_position(&mut market, &mut margin, short_user, P, false, 10 * P, 2000 * P, 0)
            .unwrap();

        // +1% funding index
        market.cumulative_funding_rate = (P / 100) as i128;

        // touching each position settles 1% of the $2000 notional
        close_position(&mut market, &mut margin, &user, P, 2000 * P, 100).unwrap();
        close_position(&mut market, &mut margin, &short_user, P, 2000 * P, 100).unwrap();

        assert_eq!(margin.available_margin(&user), (10_000 - 20) * P);
        assert_eq!(margin.available_margin(&short_user), (10_000 + 20) * P);
    }

    #[test]
    fn test_liquidation_at_exhausted_equity() {
        let (mut market, mut margin, user) = setup();
        // long 1 @ 2800, 10x -> collateral 280
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();

        // healthy at entry
        assert!(liquidate_position(&mut market, &mut margin, &user, 2800 * P, 0).is_err());

        // mark 2520: equity zero, predicate holds, fee is zero (5% of 0)
        let outcome =
            liquidate_position(&mut market, &mut margin, &user, 2520 * P, 0).unwrap();
        assert!(outcome.fully_closed);
        assert!(market.position_of(&user).is_none());
        assert_eq!(margin.insurance_fund, 0);
        assert_eq!(margin.available_margin(&user), (10_000 - 280) * P);
    }

    #[test]
    fn test_liquidation_fee_reaches_insurance_fund() {
        let (mut market, mut margin, user) = setup();
        open_position(&mut market, &mut margin, user, P, true, 10 * P, 2800 * P, 0).unwrap();

        // mark 2650: pnl = -150, equity = 130, ratio = 130/2650 = 4.9% <= 5%
        let outcome =
            liquidate_position(&mut market, &mut margin, &user, 2650 * P, 0).unwrap();
        assert!(outcome.fully_closed);

        // fee = 5% of 130 equity
        let fee = 130 * P * 500 / 10_000;
        assert_eq!(margin.insurance_fund, fee);
        // user keeps equity minus fee
        assert_eq!(
            margin.available_margin(&user),
            (10_000 - 280) * P + (130 * P - fee)
        );
    }
}
