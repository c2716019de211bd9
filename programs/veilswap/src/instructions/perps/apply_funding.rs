//! Keeper-posted funding accrual

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::events::FundingApplied;
use crate::state::{Market, ProtocolConfig};

#[derive(Accounts)]
pub struct ApplyFunding<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::MARKET, market.pool_id.as_ref(), market.market_id.as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    /// Funding keeper (the protocol owner)
    pub keeper: Signer<'info>,
}

pub fn apply_funding(ctx: Context<ApplyFunding>, rate_delta: i128) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.keeper.key())?;

    let clock = Clock::get()?;
    let market = &mut ctx.accounts.market;
    market.apply_funding(rate_delta, clock.unix_timestamp)?;

    emit!(FundingApplied {
        market: market.key(),
        rate: rate_delta,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}
