//! Protocol configuration
//!
//! Singleton PDA carrying the owner role and the global pause switch. Its
//! address doubles as the engine identity that the margin pool's one-time
//! executor binding points at.

use anchor_lang::prelude::*;

use crate::errors::VeilswapError;

#[account]
#[derive(Default, InitSpace)]
pub struct ProtocolConfig {
    /// Owner allowed to administer pools, markets and verification keys
    pub authority: Pubkey,

    /// Global pause for commit/reveal/batch entry points
    pub paused: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl ProtocolConfig {
    pub fn require_authority(&self, signer: &Pubkey) -> Result<()> {
        require!(self.authority == *signer, VeilswapError::OnlyOwner);
        Ok(())
    }

    pub fn require_unpaused(&self) -> Result<()> {
        require!(!self.paused, VeilswapError::ProtocolPaused);
        Ok(())
    }
}
