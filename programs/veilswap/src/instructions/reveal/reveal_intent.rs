//! Reveal a transparent intent against its commitment
//!
//! Recomputes the keccak commitment hash from the canonical encoding and
//! requires a matching unrevealed registry entry. The entry is NOT marked
//! revealed here; that flag transitions atomically with batch consumption.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::{CommitmentRevealed, PerpCommitmentRevealed};
use crate::state::{BatchPool, CommitmentRegistry, Intent, ProtocolConfig, RevealStore};

#[derive(Accounts)]
pub struct RevealIntent<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        seeds = [seeds::BATCH_POOL, batch_pool.pool_id.as_ref()],
        bump = batch_pool.bump,
    )]
    pub batch_pool: Box<Account<'info, BatchPool>>,

    #[account(
        seeds = [seeds::COMMITMENT_REGISTRY, batch_pool.pool_id.as_ref()],
        bump = commitment_registry.bump,
    )]
    pub commitment_registry: Box<Account<'info, CommitmentRegistry>>,

    #[account(
        mut,
        seeds = [seeds::REVEAL_STORE, batch_pool.pool_id.as_ref()],
        bump = reveal_store.bump,
    )]
    pub reveal_store: Box<Account<'info, RevealStore>>,

    /// Fee payer; any relayer may carry a reveal
    pub submitter: Signer<'info>,
}

pub fn reveal_intent(ctx: Context<RevealIntent>, intent: Intent) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;

    let clock = Clock::get()?;
    let store = &mut ctx.accounts.reveal_store;
    let registry = &ctx.accounts.commitment_registry;
    let batch_pool = &ctx.accounts.batch_pool;

    // now == deadline is still valid
    require!(
        clock.unix_timestamp <= intent.deadline(),
        VeilswapError::DeadlineExpired
    );
    require!(
        !store.nonce_used(&intent.user(), intent.nonce()),
        VeilswapError::InvalidNonce
    );
    intent.validate(&batch_pool.key)?;

    let hash = intent.commitment_hash();
    let entry = registry.require_pending(&hash)?;
    require!(
        entry.is_perp == intent.is_perp(),
        VeilswapError::InvalidCommitment
    );

    store.store(hash, intent)?;

    if intent.is_perp() {
        emit!(PerpCommitmentRevealed {
            pool_id: store.pool_id,
            commitment_hash: hash,
            timestamp: clock.unix_timestamp,
        });
    } else {
        emit!(CommitmentRevealed {
            pool_id: store.pool_id,
            commitment_hash: hash,
            timestamp: clock.unix_timestamp,
        });
    }
    Ok(())
}
