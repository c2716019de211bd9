//! Liquidate an underwater position
//!
//! Permissionless keeper instruction. Succeeds only when the maintenance
//! margin predicate holds at the oracle mark price; the liquidation fee
//! moves into the insurance fund and the position closes at the mark.

use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::PositionLiquidated;
use crate::helpers::positions::liquidate_position;
use crate::pyth::get_price;
use crate::state::{MarginPool, Market, ProtocolConfig};

#[derive(Accounts)]
pub struct Liquidate<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::MARKET, market.pool_id.as_ref(), market.market_id.as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [seeds::MARGIN_POOL, margin_pool.collateral_mint.as_ref()],
        bump = margin_pool.bump,
    )]
    pub margin_pool: Box<Account<'info, MarginPool>>,

    /// Pyth price update for the market's feed
    pub price_update: Account<'info, PriceUpdateV2>,

    /// Anyone may liquidate
    pub liquidator: Signer<'info>,
}

pub fn liquidate(ctx: Context<Liquidate>, user: Pubkey) -> Result<()> {
    require!(
        ctx.accounts.margin_pool.executor == ctx.accounts.protocol_config.key(),
        VeilswapError::PerpManagerNotSet
    );

    let clock = Clock::get()?;
    let market = &mut ctx.accounts.market;
    let margin_pool = &mut ctx.accounts.margin_pool;

    let mark = get_price(&ctx.accounts.price_update, &market.oracle_feed, &clock)?;

    liquidate_position(market, margin_pool, &user, mark, clock.unix_timestamp)?;

    emit!(PositionLiquidated {
        user,
        market: market.key(),
        liquidator: ctx.accounts.liquidator.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("position liquidated at mark {}", mark);
    Ok(())
}
