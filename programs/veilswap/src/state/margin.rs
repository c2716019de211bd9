//! Margin pool
//!
//! Per-user collateral ledger shared by every market. `total_collateral`
//! always covers `locked`, the sum of collateral held against open
//! positions; the difference is the user's free margin. The insurance fund
//! accumulates liquidation fees. All amounts are 18-dec internal units;
//! conversion to the collateral token's native decimals happens at the
//! vault boundary only.

use anchor_lang::prelude::*;

use crate::constants::MAX_MARGIN_ACCOUNTS;
use crate::errors::VeilswapError;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarginAccount {
    pub owner: Pubkey,

    /// Total collateral, 18-dec. Invariant: `total_collateral >= locked`.
    pub total_collateral: u128,

    /// Collateral held against open positions, 18-dec
    pub locked: u128,
}

/// Margin pool account (one per collateral mint)
#[account]
#[derive(Default, InitSpace)]
pub struct MarginPool {
    pub collateral_mint: Pubkey,

    /// Native decimals of the collateral token (<= 18)
    pub collateral_decimals: u8,

    /// Batch engine authorized to mutate positions; set exactly once
    pub executor: Pubkey,

    /// Accumulated liquidation fees, 18-dec
    pub insurance_fund: u128,

    /// PDA bump
    pub bump: u8,
    pub vault_bump: u8,

    #[max_len(MAX_MARGIN_ACCOUNTS)]
    pub accounts: Vec<MarginAccount>,
}

impl MarginPool {
    pub fn executor_is_set(&self) -> bool {
        self.executor != Pubkey::default()
    }

    pub fn account_of(&self, owner: &Pubkey) -> Option<&MarginAccount> {
        self.accounts.iter().find(|a| a.owner == *owner)
    }

    fn account_mut(&mut self, owner: &Pubkey) -> Result<&mut MarginAccount> {
        self.accounts
            .iter_mut()
            .find(|a| a.owner == *owner)
            .ok_or_else(|| error!(VeilswapError::InsufficientMargin))
    }

    fn ensure_account(&mut self, owner: Pubkey) -> Result<&mut MarginAccount> {
        let index = match self.accounts.iter().position(|a| a.owner == owner) {
            Some(i) => i,
            None => {
                require!(
                    self.accounts.len() < MAX_MARGIN_ACCOUNTS,
                    VeilswapError::MarginBookFull
                );
                self.accounts.push(MarginAccount {
                    owner,
                    ..MarginAccount::default()
                });
                self.accounts.len() - 1
            }
        };
        Ok(&mut self.accounts[index])
    }

    pub fn available_margin(&self, owner: &Pubkey) -> u128 {
        self.account_of(owner)
            .map(|a| a.total_collateral - a.locked)
            .unwrap_or(0)
    }

    pub fn deposit(&mut self, owner: Pubkey, amount: u128) -> Result<()> {
        let account = self.ensure_account(owner)?;
        account.total_collateral = account
            .total_collateral
            .checked_add(amount)
            .ok_or(VeilswapError::AmountOverflow)?;
        Ok(())
    }

    /// Withdraw free margin only
    pub fn withdraw(&mut self, owner: &Pubkey, amount: u128) -> Result<()> {
        require!(
            amount <= self.available_margin(owner),
            VeilswapError::InsufficientMargin
        );
        let account = self.account_mut(owner)?;
        account.total_collateral -= amount;
        Ok(())
    }

    /// Move free margin into position collateral
    pub fn lock(&mut self, owner: &Pubkey, amount: u128) -> Result<()> {
        require!(
            amount <= self.available_margin(owner),
            VeilswapError::InsufficientMargin
        );
        let account = self.account_mut(owner)?;
        account.locked += amount;
        Ok(())
    }

    /// Return position collateral to free margin (full close)
    pub fn release(&mut self, owner: &Pubkey, amount: u128) -> Result<()> {
        let account = self.account_mut(owner)?;
        account.locked = account
            .locked
            .checked_sub(amount)
            .ok_or(VeilswapError::InsufficientMargin)?;
        Ok(())
    }

    /// Deduct value that leaves the user entirely: realized loss, funding
    /// charge, liquidation fee. Reduces both locked and total.
    pub fn charge(&mut self, owner: &Pubkey, amount: u128) -> Result<()> {
        let account = self.account_mut(owner)?;
        account.locked = account
            .locked
            .checked_sub(amount)
            .ok_or(VeilswapError::InsufficientMargin)?;
        account.total_collateral = account
            .total_collateral
            .checked_sub(amount)
            .ok_or(VeilswapError::InsufficientMargin)?;
        Ok(())
    }

    /// Credit value into position collateral: realized profit, funding
    /// credit. Increases both locked and total.
    pub fn credit_locked(&mut self, owner: &Pubkey, amount: u128) -> Result<()> {
        let account = self.ensure_account(*owner)?;
        account.locked = account
            .locked
            .checked_add(amount)
            .ok_or(VeilswapError::AmountOverflow)?;
        account.total_collateral = account
            .total_collateral
            .checked_add(amount)
            .ok_or(VeilswapError::AmountOverflow)?;
        Ok(())
    }

    pub fn credit_insurance(&mut self, amount: u128) -> Result<()> {
        self.insurance_fund = self
            .insurance_fund
            .checked_add(amount)
            .ok_or(VeilswapError::AmountOverflow)?;
        Ok(())
    }
}
