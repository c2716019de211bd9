//! Initialize the protocol configuration singleton

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::state::ProtocolConfig;

#[derive(Accounts)]
pub struct InitializeProtocolConfig<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + ProtocolConfig::INIT_SPACE,
        seeds = [seeds::PROTOCOL_CONFIG],
        bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// Protocol owner
    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_protocol_config(ctx: Context<InitializeProtocolConfig>) -> Result<()> {
    let config = &mut ctx.accounts.protocol_config;
    config.authority = ctx.accounts.authority.key();
    config.paused = false;
    config.bump = ctx.bumps.protocol_config;

    msg!("protocol config initialized, authority {}", config.authority);
    Ok(())
}
