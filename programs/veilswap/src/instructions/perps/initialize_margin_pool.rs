//! Initialize the margin pool for a collateral mint

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::state::{MarginPool, ProtocolConfig};

#[derive(Accounts)]
pub struct InitializeMarginPool<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        init,
        payer = payer,
        space = 8 + MarginPool::INIT_SPACE,
        seeds = [seeds::MARGIN_POOL, collateral_mint.key().as_ref()],
        bump,
    )]
    pub margin_pool: Box<Account<'info, MarginPool>>,

    pub collateral_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        seeds = [seeds::MARGIN_VAULT, collateral_mint.key().as_ref()],
        bump,
        token::mint = collateral_mint,
        token::authority = margin_pool,
    )]
    pub margin_vault: Box<Account<'info, TokenAccount>>,

    /// Protocol owner
    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_margin_pool(ctx: Context<InitializeMarginPool>) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    // the 18-dec conversion only supports tokens at or below 18 decimals
    require!(
        ctx.accounts.collateral_mint.decimals <= 18,
        VeilswapError::InvalidAmount
    );

    let margin_pool = &mut ctx.accounts.margin_pool;
    margin_pool.collateral_mint = ctx.accounts.collateral_mint.key();
    margin_pool.collateral_decimals = ctx.accounts.collateral_mint.decimals;
    margin_pool.executor = Pubkey::default();
    margin_pool.insurance_fund = 0;
    margin_pool.bump = ctx.bumps.margin_pool;
    margin_pool.vault_bump = ctx.bumps.margin_vault;

    msg!(
        "margin pool initialized for mint {}",
        margin_pool.collateral_mint
    );
    Ok(())
}
