//! Pause / unpause a perp market

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::state::{Market, ProtocolConfig};

#[derive(Accounts)]
pub struct SetMarketStatus<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::MARKET, market.pool_id.as_ref(), market.market_id.as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    /// Protocol owner
    pub authority: Signer<'info>,
}

pub fn pause_market(ctx: Context<SetMarketStatus>) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    ctx.accounts.market.is_active = false;
    msg!("market {} paused", ctx.accounts.market.key());
    Ok(())
}

pub fn unpause_market(ctx: Context<SetMarketStatus>) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    ctx.accounts.market.is_active = true;
    msg!("market {} unpaused", ctx.accounts.market.key());
    Ok(())
}
