//! Batch netting and settlement math
//!
//! Spot batches accumulate signed per-intent deltas against the currency_0
//! reference, resolve a single swap direction, and split the realized
//! output pro rata. Participants swapping against the net direction are
//! internalized: they receive exactly their minimum output from the
//! collected inputs, which is why their minima are subtracted during
//! netting. Perp batches net signed base size.

use anchor_lang::prelude::*;

use crate::constants::PRECISION;
use crate::errors::VeilswapError;
use crate::helpers::fixed_point::mul_div;

/// One spot intent's settlement-relevant fields
#[derive(Clone, Copy, Debug)]
pub struct SpotContribution {
    pub user: Pubkey,
    pub recipient: Pubkey,
    /// token_in == currency_0
    pub currency_0_in: bool,
    pub amount_in: u64,
    pub min_amount_out: u64,
}

/// Accumulated signed deltas, currency_0 reference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetDeltas {
    pub delta_0: i128,
    pub delta_1: i128,
}

/// One settlement payout (internal-ledger credit)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub recipient: Pubkey,
    /// Credited on the currency_0 side of the ledger
    pub currency_0_out: bool,
    pub amount: u64,
}

/// Accumulate signed deltas: an input adds on its own side, the minimum
/// output subtracts on the other.
pub fn accumulate_deltas(contributions: &[SpotContribution]) -> NetDeltas {
    let mut deltas = NetDeltas::default();
    for c in contributions {
        if c.currency_0_in {
            deltas.delta_0 += c.amount_in as i128;
            deltas.delta_1 -= c.min_amount_out as i128;
        } else {
            deltas.delta_1 += c.amount_in as i128;
            deltas.delta_0 -= c.min_amount_out as i128;
        }
    }
    deltas
}

/// Resolve the single valid swap direction. Exactly one of
/// (delta_0 > 0, delta_1 < 0) or (delta_1 > 0, delta_0 < 0) must hold;
/// anything else - same-sign, zero-netting, or a zero side - is rejected.
pub fn resolve_direction(deltas: &NetDeltas) -> Result<bool> {
    if deltas.delta_0 > 0 && deltas.delta_1 < 0 {
        Ok(true)
    } else if deltas.delta_1 > 0 && deltas.delta_0 < 0 {
        Ok(false)
    } else {
        Err(error!(VeilswapError::InvalidSwapDirection))
    }
}

/// Privacy self-check: recompute the deltas from the stored contributions
/// and require equality with the accumulator. A mismatch means state moved
/// between accumulation and validation.
pub fn self_check(contributions: &[SpotContribution], accumulated: &NetDeltas) -> Result<()> {
    let recomputed = accumulate_deltas(contributions);
    require!(recomputed == *accumulated, VeilswapError::NetDeltaMismatch);
    Ok(())
}

/// Exact input owed to the pool for the resolved direction
pub fn net_input(deltas: &NetDeltas, zero_for_one: bool) -> Result<u64> {
    let raw = if zero_for_one {
        deltas.delta_0
    } else {
        deltas.delta_1
    };
    u64::try_from(raw).map_err(|_| error!(VeilswapError::AmountOverflow))
}

/// Split the realized output across the batch.
///
/// Net-direction participants share `actual_output` plus the counter-side
/// inputs of the same currency, floor-divided pro rata over their inputs;
/// the last of them receives the remainder so no dust is stranded. Each is
/// guaranteed its floor share: a share below `min_amount_out` fails the
/// whole batch. Counter-direction participants are paid exactly their
/// minimum in the net input currency.
///
/// Payouts are produced in contribution order.
pub fn settle_outputs(
    contributions: &[SpotContribution],
    zero_for_one: bool,
    actual_output: u64,
) -> Result<Vec<Payout>> {
    let total_in: u128 = contributions
        .iter()
        .filter(|c| c.currency_0_in == zero_for_one)
        .map(|c| c.amount_in as u128)
        .sum();
    require!(total_in > 0, VeilswapError::InvalidSwapDirection);

    let counter_in: u128 = contributions
        .iter()
        .filter(|c| c.currency_0_in != zero_for_one)
        .map(|c| c.amount_in as u128)
        .sum();
    let available = actual_output as u128 + counter_in;

    let last_eligible = contributions
        .iter()
        .rposition(|c| c.currency_0_in == zero_for_one)
        .ok_or(VeilswapError::InvalidSwapDirection)?;

    let mut payouts = Vec::with_capacity(contributions.len());
    let mut distributed: u128 = 0;
    for (i, c) in contributions.iter().enumerate() {
        if c.currency_0_in == zero_for_one {
            let share = mul_div(available, c.amount_in as u128, total_in)?;
            if share < c.min_amount_out as u128 {
                msg!(
                    "slippage exceeded: recipient_hash={:02x?} expected={} actual={}",
                    &solana_keccak_hasher::hash(c.recipient.as_ref()).to_bytes()[0..8],
                    c.min_amount_out,
                    share
                );
                return Err(error!(VeilswapError::SlippageExceededForUser));
            }
            let amount = if i == last_eligible {
                available - distributed
            } else {
                share
            };
            distributed += amount;
            payouts.push(Payout {
                recipient: c.recipient,
                currency_0_out: !zero_for_one,
                amount: u64::try_from(amount)
                    .map_err(|_| error!(VeilswapError::AmountOverflow))?,
            });
        } else {
            // internalized counter-direction fill at exactly the minimum
            payouts.push(Payout {
                recipient: c.recipient,
                currency_0_out: zero_for_one,
                amount: c.min_amount_out,
            });
        }
    }
    Ok(payouts)
}

/// One perp intent's signed base-size contribution:
/// opening a long or closing a short buys base (+); the mirror cases sell.
pub fn perp_contribution(size: u128, is_long: bool, is_open: bool) -> Result<i128> {
    let signed = i128::try_from(size).map_err(|_| error!(VeilswapError::AmountOverflow))?;
    Ok(if is_open == is_long { signed } else { -signed })
}

/// Net signed base size of a perp batch; zero netting is invalid
pub fn net_base(contributions: &[i128]) -> Result<i128> {
    let mut net: i128 = 0;
    for c in contributions {
        net = net
            .checked_add(*c)
            .ok_or(VeilswapError::AmountOverflow)?;
    }
    require!(net != 0, VeilswapError::InvalidPerpCommitment);
    Ok(net)
}

/// Batch execution price: |quote delta| * 1e18 / |base delta|, 18-dec
pub fn execution_price(quote_abs: u128, base_abs: u128) -> Result<u128> {
    require!(base_abs > 0, VeilswapError::InvalidPerpCommitment);
    mul_div(quote_abs, PRECISION, base_abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(c0_in: bool, amount_in: u64, min_out: u64, tag: u8) -> SpotContribution {
        SpotContribution {
            user: Pubkey::new_from_array([tag; 32]),
            recipient: Pubkey::new_from_array([tag; 32]),
            currency_0_in: c0_in,
            amount_in,
            min_amount_out: min_out,
        }
    }

    #[test]
    fn test_two_sided_netting() {
        // Alice swaps 1_000_000 of currency_0, Bob 500_000 of currency_1
        let contributions = [
            contribution(true, 1_000_000, 990_000, 1),
            contribution(false, 500_000, 495_000, 2),
        ];
        let deltas = accumulate_deltas(&contributions);
        assert_eq!(deltas.delta_0, 1_000_000 - 495_000);
        assert_eq!(deltas.delta_1, 500_000 - 990_000);
        assert!(resolve_direction(&deltas).unwrap());
        assert_eq!(net_input(&deltas, true).unwrap(), 505_000);
    }

    #[test]
    fn test_direction_rejects_one_sided_zero() {
        // all participants on the same side with zero minima: delta_1 = 0
        let contributions = [
            contribution(true, 100, 0, 1),
            contribution(true, 200, 0, 2),
        ];
        let deltas = accumulate_deltas(&contributions);
        assert!(resolve_direction(&deltas).is_err());
    }

    #[test]
    fn test_direction_rejects_zero_batch() {
        assert!(resolve_direction(&NetDeltas::default()).is_err());
    }

    #[test]
    fn test_self_check_detects_mutation() {
        let contributions = [
            contribution(true, 100, 90, 1),
            contribution(true, 200, 180, 2),
        ];
        let mut deltas = accumulate_deltas(&contributions);
        assert!(self_check(&contributions, &deltas).is_ok());

        deltas.delta_0 += 1;
        assert!(self_check(&contributions, &deltas).is_err());
    }

    #[test]
    fn test_one_sided_distribution_with_remainder() {
        // three inputs on currency_0, pool returns 2_985_000 of currency_1
        let contributions = [
            contribution(true, 1_000_000, 985_000, 1),
            contribution(true, 1_000_000, 985_000, 2),
            contribution(true, 1_000_000, 985_000, 3),
        ];
        let payouts = settle_outputs(&contributions, true, 2_985_000).unwrap();
        assert_eq!(payouts.len(), 3);
        // floor shares are equal here and sum exactly
        assert_eq!(payouts[0].amount, 995_000);
        assert_eq!(payouts[1].amount, 995_000);
        assert_eq!(payouts[2].amount, 995_000);
        let total: u64 = payouts.iter().map(|p| p.amount).sum();
        assert_eq!(total, 2_985_000);
    }

    #[test]
    fn test_remainder_goes_to_last_eligible() {
        // 1_000_003 output over inputs 1:1:1 -> floor 333_334.33
        let contributions = [
            contribution(true, 100, 0, 1),
            contribution(true, 100, 0, 2),
            contribution(true, 100, 0, 3),
        ];
        let payouts = settle_outputs(&contributions, true, 1_000_003).unwrap();
        assert_eq!(payouts[0].amount, 333_334);
        assert_eq!(payouts[1].amount, 333_334);
        // last takes the rounding dust
        assert_eq!(payouts[2].amount, 333_335);
        let total: u64 = payouts.iter().map(|p| p.amount).sum();
        assert_eq!(total, 1_000_003);
    }

    #[test]
    fn test_slippage_boundary_exact_share_passes() {
        let contributions = [
            contribution(true, 500, 500, 1),
            contribution(true, 500, 500, 2),
        ];
        // output exactly covers both minima
        let payouts = settle_outputs(&contributions, true, 1000).unwrap();
        assert_eq!(payouts[0].amount, 500);
        assert_eq!(payouts[1].amount, 500);
    }

    #[test]
    fn test_slippage_one_unit_short_fails() {
        let contributions = [
            contribution(true, 500, 500, 1),
            contribution(true, 500, 500, 2),
        ];
        assert!(settle_outputs(&contributions, true, 999).is_err());
    }

    #[test]
    fn test_counter_side_receives_exact_minimum() {
        // Alice nets against Bob; direction is zero-for-one
        let contributions = [
            contribution(true, 1_000_000, 990_000, 1),
            contribution(false, 500_000, 495_000, 2),
        ];
        let deltas = accumulate_deltas(&contributions);
        let zero_for_one = resolve_direction(&deltas).unwrap();

        // pool converts the 505_000 net input into 500_000 of currency_1
        let payouts = settle_outputs(&contributions, zero_for_one, 500_000).unwrap();

        // Alice: pool output plus Bob's 500_000 currency_1 input
        assert_eq!(payouts[0].recipient, Pubkey::new_from_array([1; 32]));
        assert!(!payouts[0].currency_0_out);
        assert_eq!(payouts[0].amount, 1_000_000);

        // Bob: exactly his minimum, in currency_0
        assert_eq!(payouts[1].recipient, Pubkey::new_from_array([2; 32]));
        assert!(payouts[1].currency_0_out);
        assert_eq!(payouts[1].amount, 495_000);
    }

    #[test]
    fn test_conservation_both_currencies() {
        let contributions = [
            contribution(true, 800, 700, 1),
            contribution(false, 300, 250, 2),
            contribution(true, 400, 350, 3),
        ];
        let deltas = accumulate_deltas(&contributions);
        let zero_for_one = resolve_direction(&deltas).unwrap();
        assert!(zero_for_one);
        let input = net_input(&deltas, true).unwrap(); // 1200 - 250 = 950
        assert_eq!(input, 950);

        let actual_output = 900u64;
        let payouts = settle_outputs(&contributions, zero_for_one, actual_output).unwrap();

        // currency_1 out: pool output + counter inputs, fully distributed
        let out_1: u64 = payouts
            .iter()
            .filter(|p| !p.currency_0_out)
            .map(|p| p.amount)
            .sum();
        assert_eq!(out_1, actual_output + 300);

        // currency_0 out: exactly the counter minima, which with the pool
        // input sums back to the collected currency_0
        let out_0: u64 = payouts
            .iter()
            .filter(|p| p.currency_0_out)
            .map(|p| p.amount)
            .sum();
        assert_eq!(out_0 + input, 800 + 400);
    }

    #[test]
    fn test_perp_contribution_signs() {
        assert_eq!(perp_contribution(10, true, true).unwrap(), 10); // open long buys
        assert_eq!(perp_contribution(10, false, true).unwrap(), -10); // open short sells
        assert_eq!(perp_contribution(10, true, false).unwrap(), -10); // close long sells
        assert_eq!(perp_contribution(10, false, false).unwrap(), 10); // close short buys
    }

    #[test]
    fn test_net_base_rejects_zero() {
        assert!(net_base(&[10, -10]).is_err());
        assert_eq!(net_base(&[10, -3]).unwrap(), 7);
    }

    #[test]
    fn test_execution_price() {
        // 1.96e21 quote for 7e17 base = 2800 * 1e18
        let p = execution_price(
            1_960_000_000_000_000_000_000,
            700_000_000_000_000_000,
        )
        .unwrap();
        assert_eq!(p, 2_800 * PRECISION);
    }
}
