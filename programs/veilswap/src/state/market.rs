//! Perp market and position book
//!
//! One account per market: oracle binding, risk parameters, the cumulative
//! funding index, open-interest tracking, and the position book itself.
//! Position sizes are stored as magnitude + direction; `collateral = 0`
//! if and only if `size = 0`.

use anchor_lang::prelude::*;

use crate::constants::{FUNDING_PERIOD, MAX_POSITIONS};
use crate::errors::VeilswapError;

/// One user's position in a market
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub owner: Pubkey,

    /// Base-asset size magnitude, 18-dec. Zero = closed.
    pub size: u128,

    pub is_long: bool,

    /// 18-dec entry price, notional-weighted across increases
    pub entry_price: u128,

    /// Margin locked against this position, 18-dec
    pub collateral: u128,

    /// 18-dec leverage, overwritten on each increase
    pub leverage: u128,

    /// Last funding settlement time
    pub last_funding_paid: i64,

    /// Cumulative funding index at entry / last settlement
    pub entry_cumulative_funding: i128,
}

/// Perp market account
#[account]
#[derive(Default, InitSpace)]
pub struct Market {
    /// External market identifier
    pub market_id: [u8; 32],

    /// Pool whose batches settle this market
    pub pool_id: [u8; 32],

    /// Pyth feed id for the mark price
    pub oracle_feed: [u8; 32],

    /// Maximum leverage, 18-dec
    pub max_leverage: u128,

    /// Maintenance margin ratio, 18-dec, in [0, 1e18)
    pub maintenance_margin: u64,

    pub last_funding_time: i64,

    /// Keeper-accrued cumulative funding rate, 18-dec signed
    pub cumulative_funding_rate: i128,

    pub is_active: bool,

    /// Open interest in base units, 18-dec
    pub long_open_interest: u128,
    pub short_open_interest: u128,

    /// PDA bump
    pub bump: u8,

    #[max_len(MAX_POSITIONS)]
    pub positions: Vec<Position>,
}

impl Market {
    pub fn position_of(&self, owner: &Pubkey) -> Option<&Position> {
        self.positions.iter().find(|p| p.owner == *owner)
    }

    pub fn position_mut(&mut self, owner: &Pubkey) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.owner == *owner)
    }

    /// Fetch-or-insert the book entry for `owner`
    pub fn ensure_position(&mut self, owner: Pubkey) -> Result<&mut Position> {
        let index = match self.positions.iter().position(|p| p.owner == owner) {
            Some(i) => i,
            None => {
                require!(
                    self.positions.len() < MAX_POSITIONS,
                    VeilswapError::PositionBookFull
                );
                self.positions.push(Position {
                    owner,
                    ..Position::default()
                });
                self.positions.len() - 1
            }
        };
        Ok(&mut self.positions[index])
    }

    /// Drop a fully closed book entry
    pub fn remove_position(&mut self, owner: &Pubkey) {
        self.positions.retain(|p| p.owner != *owner);
    }

    pub fn add_open_interest(&mut self, size: u128, is_long: bool) {
        if is_long {
            self.long_open_interest = self.long_open_interest.saturating_add(size);
        } else {
            self.short_open_interest = self.short_open_interest.saturating_add(size);
        }
    }

    pub fn remove_open_interest(&mut self, size: u128, is_long: bool) {
        if is_long {
            self.long_open_interest = self.long_open_interest.saturating_sub(size);
        } else {
            self.short_open_interest = self.short_open_interest.saturating_sub(size);
        }
    }

    /// Keeper-posted funding accrual, gated by the funding period
    pub fn apply_funding(&mut self, rate_delta: i128, now: i64) -> Result<()> {
        require!(
            now - self.last_funding_time >= FUNDING_PERIOD,
            VeilswapError::FundingTooSoon
        );
        self.cumulative_funding_rate = self
            .cumulative_funding_rate
            .checked_add(rate_delta)
            .ok_or(VeilswapError::AmountOverflow)?;
        self.last_funding_time = now;
        Ok(())
    }

    pub fn require_active(&self) -> Result<()> {
        require!(self.is_active, VeilswapError::MarketNotActive);
        Ok(())
    }
}
