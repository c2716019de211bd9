//! Withdraw from an internal spot balance

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::TokensWithdrawn;
use crate::state::BatchPool;

#[derive(Accounts)]
pub struct WithdrawTokens<'info> {
    #[account(
        mut,
        seeds = [seeds::BATCH_POOL, batch_pool.pool_id.as_ref()],
        bump = batch_pool.bump,
    )]
    pub batch_pool: Box<Account<'info, BatchPool>>,

    pub mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        seeds = [seeds::VAULT, batch_pool.pool_id.as_ref(), mint.key().as_ref()],
        bump,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// User's token account (destination)
    #[account(mut, constraint = user_token_account.mint == mint.key() @ VeilswapError::InvalidAmount)]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn withdraw_tokens(ctx: Context<WithdrawTokens>, amount: u64) -> Result<()> {
    require!(amount > 0, VeilswapError::InvalidAmount);

    let batch_pool = &mut ctx.accounts.batch_pool;
    let currency_0_side = batch_pool.is_currency_0(&ctx.accounts.mint.key())?;
    batch_pool.debit(&ctx.accounts.user.key(), currency_0_side, amount)?;

    let pool_id = batch_pool.pool_id;
    let bump = batch_pool.bump;
    let signer_seeds: &[&[u8]] = &[seeds::BATCH_POOL, pool_id.as_ref(), &[bump]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: batch_pool.to_account_info(),
    };
    let signer_seeds_arr = [signer_seeds];
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        &signer_seeds_arr,
    );
    token::transfer(cpi_ctx, amount)?;

    emit!(TokensWithdrawn {
        pool_id,
        user: ctx.accounts.user.key(),
        token: ctx.accounts.mint.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
