//! Operator escape hatch for stale reveals
//!
//! A reveal whose deadline has passed blocks every batch that includes its
//! commitment. The operator removes the entries; commitments and nonces
//! are untouched, so the committer can re-reveal with a fresh intent under
//! a new commitment.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::events::PendingRevealsCleared;
use crate::state::{ProtocolConfig, RevealStore};

#[derive(Accounts)]
pub struct ClearPendingReveals<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [seeds::REVEAL_STORE, reveal_store.pool_id.as_ref()],
        bump = reveal_store.bump,
    )]
    pub reveal_store: Box<Account<'info, RevealStore>>,

    /// Protocol owner
    pub authority: Signer<'info>,
}

pub fn clear_pending_reveals(
    ctx: Context<ClearPendingReveals>,
    hashes: Vec<[u8; 32]>,
) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;

    let store = &mut ctx.accounts.reveal_store;
    let mut removed = 0u64;
    for hash in &hashes {
        if store.remove(hash) {
            removed += 1;
        }
    }

    emit!(PendingRevealsCleared {
        pool_id: store.pool_id,
        removed,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
