//! Deposit collateral into the margin pool

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::CollateralDeposited;
use crate::helpers::fixed_point::to_fixed_18;
use crate::state::MarginPool;

#[derive(Accounts)]
pub struct DepositCollateral<'info> {
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

    /// User's collateral token account (source)
    #[account(
        mut,
        constraint = user_token_account.mint == margin_pool.collateral_mint @ VeilswapError::InvalidAmount,
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn deposit_collateral(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
    require!(amount > 0, VeilswapError::InvalidAmount);

    let cpi_accounts = Transfer {
        from: ctx.accounts.user_token_account.to_account_info(),
        to: ctx.accounts.margin_vault.to_account_info(),
        authority: ctx.accounts.user.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    let margin_pool = &mut ctx.accounts.margin_pool;
    let internal = to_fixed_18(amount, margin_pool.collateral_decimals)?;
    margin_pool.deposit(ctx.accounts.user.key(), internal)?;

    emit!(CollateralDeposited {
        user: ctx.accounts.user.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
