//! Per-pool batch state and internal spot balance ledger
//!
//! The pool account carries the canonical key, one batch clock per side
//! (spot / perp), and the internal balance ledger the spot engine settles
//! against. Token custody lives in the two pool vaults; the ledger is the
//! authoritative per-user split of those vaults.

use anchor_lang::prelude::*;

use crate::constants::{BATCH_INTERVAL, MAX_BALANCES};
use crate::errors::VeilswapError;
use crate::state::PoolKey;

/// Batch serialization clock, one per pool side
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchState {
    pub last_batch_timestamp: i64,
    pub batch_nonce: u64,
}

impl BatchState {
    /// Two batches of the same pool side cannot execute within the interval
    pub fn check_interval(&self, now: i64) -> Result<()> {
        require!(
            now - self.last_batch_timestamp >= BATCH_INTERVAL,
            VeilswapError::BatchConditionsNotMet
        );
        Ok(())
    }

    pub fn advance(&mut self, now: i64) {
        self.last_batch_timestamp = now;
        self.batch_nonce += 1;
    }
}

/// One user's internal balances for the pool pair
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceEntry {
    pub owner: Pubkey,
    pub amount_0: u64,
    pub amount_1: u64,
}

/// Per-pool engine account
#[account]
#[derive(Default, InitSpace)]
pub struct BatchPool {
    /// Canonical pool key
    pub key: PoolKey,

    /// keccak256 of the canonical key encoding, cached
    pub pool_id: [u8; 32],

    pub spot_batch: BatchState,
    pub perp_batch: BatchState,

    /// Native decimals of the two currencies, captured at initialization
    pub decimals_0: u8,
    pub decimals_1: u8,

    /// PDA bump
    pub bump: u8,
    pub vault_0_bump: u8,
    pub vault_1_bump: u8,

    #[max_len(MAX_BALANCES)]
    pub balances: Vec<BalanceEntry>,
}

impl BatchPool {
    /// true = currency_0 side
    pub fn is_currency_0(&self, mint: &Pubkey) -> Result<bool> {
        if *mint == self.key.currency_0 {
            Ok(true)
        } else if *mint == self.key.currency_1 {
            Ok(false)
        } else {
            Err(error!(VeilswapError::InvalidAmount))
        }
    }

    pub fn balance_of(&self, owner: &Pubkey, currency_0_side: bool) -> u64 {
        self.balances
            .iter()
            .find(|b| b.owner == *owner)
            .map(|b| if currency_0_side { b.amount_0 } else { b.amount_1 })
            .unwrap_or(0)
    }

    /// Credit `amount` to `owner`, creating the ledger entry on first use
    pub fn credit(&mut self, owner: Pubkey, currency_0_side: bool, amount: u64) -> Result<()> {
        let index = match self.balances.iter().position(|b| b.owner == owner) {
            Some(i) => i,
            None => {
                require!(
                    self.balances.len() < MAX_BALANCES,
                    VeilswapError::BalanceLedgerFull
                );
                self.balances.push(BalanceEntry {
                    owner,
                    amount_0: 0,
                    amount_1: 0,
                });
                self.balances.len() - 1
            }
        };
        let entry = &mut self.balances[index];
        let slot = if currency_0_side {
            &mut entry.amount_0
        } else {
            &mut entry.amount_1
        };
        *slot = slot
            .checked_add(amount)
            .ok_or(VeilswapError::AmountOverflow)?;
        Ok(())
    }

    /// Debit `amount` from `owner`; the caller's whole instruction fails on
    /// an insufficient balance
    pub fn debit(&mut self, owner: &Pubkey, currency_0_side: bool, amount: u64) -> Result<()> {
        let entry = self
            .balances
            .iter_mut()
            .find(|b| b.owner == *owner)
            .ok_or(VeilswapError::InsufficientBalance)?;
        let slot = if currency_0_side {
            &mut entry.amount_0
        } else {
            &mut entry.amount_1
        };
        *slot = slot
            .checked_sub(amount)
            .ok_or(VeilswapError::InsufficientBalance)?;
        Ok(())
    }

    /// Sum of all ledger credits for one side; the matching vault must
    /// always hold at least this much
    pub fn ledger_total(&self, currency_0_side: bool) -> u128 {
        self.balances
            .iter()
            .map(|b| {
                if currency_0_side {
                    b.amount_0 as u128
                } else {
                    b.amount_1 as u128
                }
            })
            .sum()
    }
}
