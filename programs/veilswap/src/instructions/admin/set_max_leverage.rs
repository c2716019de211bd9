//! Update a market's maximum leverage

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::state::{Market, ProtocolConfig};

#[derive(Accounts)]
pub struct SetMaxLeverage<'info> {
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

pub fn set_max_leverage(ctx: Context<SetMaxLeverage>, max_leverage: u128) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    require!(max_leverage > 0, VeilswapError::InvalidLeverage);

    ctx.accounts.market.max_leverage = max_leverage;
    msg!("max leverage set to {}", max_leverage);
    Ok(())
}
