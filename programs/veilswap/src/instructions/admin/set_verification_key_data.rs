//! Append verification key data on an existing account
//!
//! Used for keys that exceed a single transaction: register with the first
//! chunk, then append the rest.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::state::{verification_key::MAX_VK_DATA_SIZE, ProtocolConfig, VerificationKey};

#[derive(Accounts)]
#[instruction(circuit_id: [u8; 32])]
pub struct SetVerificationKeyData<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::VERIFICATION_KEY, circuit_id.as_ref()],
        bump = verification_key.bump,
    )]
    pub verification_key: Account<'info, VerificationKey>,

    /// Protocol owner
    pub authority: Signer<'info>,
}

pub fn set_verification_key_data(
    ctx: Context<SetVerificationKeyData>,
    _circuit_id: [u8; 32],
    chunk: Vec<u8>,
    append: bool,
) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;

    let vk = &mut ctx.accounts.verification_key;
    if append {
        require!(
            vk.vk_data.len() + chunk.len() <= MAX_VK_DATA_SIZE,
            VeilswapError::InvalidVerificationKey
        );
        vk.vk_data.extend_from_slice(&chunk);
    } else {
        require!(
            chunk.len() <= MAX_VK_DATA_SIZE,
            VeilswapError::InvalidVerificationKey
        );
        vk.vk_data = chunk;
    }

    msg!("verification key data now {} bytes", vk.vk_data.len());
    Ok(())
}
