//! Register a verification key for a circuit

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::events::VerificationKeyRegistered;
use crate::state::{verification_key::MAX_VK_DATA_SIZE, ProtocolConfig, VerificationKey};

#[derive(Accounts)]
#[instruction(circuit_id: [u8; 32])]
pub struct RegisterVerificationKey<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// Verification key account
    #[account(
        init,
        payer = payer,
        space = VerificationKey::space(MAX_VK_DATA_SIZE),
        seeds = [seeds::VERIFICATION_KEY, circuit_id.as_ref()],
        bump,
    )]
    pub verification_key: Account<'info, VerificationKey>,

    /// Protocol owner
    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn register_verification_key(
    ctx: Context<RegisterVerificationKey>,
    circuit_id: [u8; 32],
    vk_data: Vec<u8>,
) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;

    let vk = &mut ctx.accounts.verification_key;
    let clock = Clock::get()?;

    vk.circuit_id = circuit_id;
    vk.vk_data = vk_data;
    vk.authority = ctx.accounts.authority.key();
    vk.is_active = true;
    vk.bump = ctx.bumps.verification_key;

    emit!(VerificationKeyRegistered {
        circuit_id,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}
