//! Create a perp market bound to a batch pool

use anchor_lang::prelude::*;

use crate::constants::{seeds, PRECISION};
use crate::errors::VeilswapError;
use crate::events::MarketCreated;
use crate::state::{BatchPool, Market, ProtocolConfig};

#[derive(Accounts)]
#[instruction(market_id: [u8; 32])]
pub struct CreateMarket<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// Pool whose perp batches settle this market
    #[account(
        seeds = [seeds::BATCH_POOL, batch_pool.pool_id.as_ref()],
        bump = batch_pool.bump,
    )]
    pub batch_pool: Box<Account<'info, BatchPool>>,

    #[account(
        init,
        payer = payer,
        space = 8 + Market::INIT_SPACE,
        seeds = [seeds::MARKET, batch_pool.pool_id.as_ref(), market_id.as_ref()],
        bump,
    )]
    pub market: Box<Account<'info, Market>>,

    /// Protocol owner
    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn create_market(
    ctx: Context<CreateMarket>,
    market_id: [u8; 32],
    oracle_feed: [u8; 32],
    max_leverage: u128,
    maintenance_margin: u64,
) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    require!(max_leverage > 0, VeilswapError::InvalidLeverage);
    require!(
        (maintenance_margin as u128) < PRECISION,
        VeilswapError::InvalidAmount
    );

    let market = &mut ctx.accounts.market;
    let clock = Clock::get()?;

    market.market_id = market_id;
    market.pool_id = ctx.accounts.batch_pool.pool_id;
    market.oracle_feed = oracle_feed;
    market.max_leverage = max_leverage;
    market.maintenance_margin = maintenance_margin;
    market.last_funding_time = clock.unix_timestamp;
    market.cumulative_funding_rate = 0;
    market.is_active = true;
    market.bump = ctx.bumps.market;

    emit!(MarketCreated {
        market: market.key(),
        pool_id: market.pool_id,
        max_leverage,
        maintenance_margin,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}
