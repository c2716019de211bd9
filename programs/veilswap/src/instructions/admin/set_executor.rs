//! One-time executor binding for the margin pool
//!
//! Positions are mutated only through batch execution and liquidation,
//! which require the margin pool to be bound to the engine's config
//! account. The binding is written exactly once; this breaks the
//! engine / position-manager reference cycle at initialization time.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::state::{MarginPool, ProtocolConfig};

#[derive(Accounts)]
pub struct SetExecutor<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::MARGIN_POOL, margin_pool.collateral_mint.as_ref()],
        bump = margin_pool.bump,
    )]
    pub margin_pool: Box<Account<'info, MarginPool>>,

    /// Protocol owner
    pub authority: Signer<'info>,
}

pub fn set_executor(ctx: Context<SetExecutor>, executor: Pubkey) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;

    let margin_pool = &mut ctx.accounts.margin_pool;
    require!(
        !margin_pool.executor_is_set(),
        VeilswapError::ExecutorAlreadySet
    );
    require!(executor != Pubkey::default(), VeilswapError::InvalidAmount);

    margin_pool.executor = executor;
    msg!("executor pinned to {}", executor);
    Ok(())
}
