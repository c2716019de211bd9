//! Withdraw free margin from the margin pool
//!
//! The requested amount is in native token units; the 18-dec ledger is
//! debited by the exact equivalent, so no residue is created here. The
//! floor lives on the other side: sub-native ledger dust is simply not
//! withdrawable and remains in the pool.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::CollateralWithdrawn;
use crate::helpers::fixed_point::to_fixed_18;
use crate::state::MarginPool;

#[derive(Accounts)]
pub struct WithdrawCollateral<'info> {
    #[account(
        mut,
        seeds = [seeds::MARGIN_POOL, margin_pool.collateral_mint.as_ref()],
        bump = margin_pool.bump,
    )]
    pub margin_pool: Box<Account<'info, MarginPool>>,

    #[account(
        mut,
        seeds = [seeds::MARGIN_VAULT, margin_pool.collateral_mint.as_ref()],
        bump = margin_pool.vault_bump,
    )]
    pub margin_vault: Box<Account<'info, TokenAccount>>,

    /// User's collateral token account (destination)
    #[account(
        mut,
        constraint = user_token_account.mint == margin_pool.collateral_mint @ VeilswapError::InvalidAmount,
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_collateral(ctx: Context<WithdrawCollateral>, amount: u64) -> Result<()> {
    require!(amount > 0, VeilswapError::InvalidAmount);

    let margin_pool = &mut ctx.accounts.margin_pool;
    let internal = to_fixed_18(amount, margin_pool.collateral_decimals)?;
    margin_pool.withdraw(&ctx.accounts.user.key(), internal)?;

    let mint = margin_pool.collateral_mint;
    let bump = margin_pool.bump;
    let signer_seeds: &[&[u8]] = &[seeds::MARGIN_POOL, mint.as_ref(), &[bump]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.margin_vault.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: margin_pool.to_account_info(),
    };
    let signer_seeds_arr = [signer_seeds];
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        &signer_seeds_arr,
    );
    token::transfer(cpi_ctx, amount)?;

    emit!(CollateralWithdrawn {
        user: ctx.accounts.user.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
