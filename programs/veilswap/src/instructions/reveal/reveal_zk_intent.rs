//! Reveal an intent against a proof-verified Poseidon commitment
//!
//! The Poseidon hash cannot be recomputed on-chain affordably; trust was
//! established when the Groth16 proof bound the hash at submission. The
//! reveal therefore requires the registry's verified flag instead of hash
//! equality, plus the same deadline and nonce checks as the transparent
//! path.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::errors::VeilswapError;
use crate::events::{CommitmentRevealed, PerpCommitmentRevealed};
use crate::state::{BatchPool, CommitmentRegistry, Intent, ProtocolConfig, RevealStore};

#[derive(Accounts)]
pub struct RevealZkIntent<'info> {
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

pub fn reveal_zk_intent(
    ctx: Context<RevealZkIntent>,
    commitment_hash: [u8; 32],
    intent: Intent,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;

    let clock = Clock::get()?;
    let store = &mut ctx.accounts.reveal_store;
    let registry = &ctx.accounts.commitment_registry;
    let batch_pool = &ctx.accounts.batch_pool;

    require!(
        clock.unix_timestamp <= intent.deadline(),
        VeilswapError::DeadlineExpired
    );
    require!(
        !store.nonce_used(&intent.user(), intent.nonce()),
        VeilswapError::InvalidNonce
    );
    intent.validate(&batch_pool.key)?;

    let entry = registry.require_pending(&commitment_hash)?;
    require!(entry.zk_verified, VeilswapError::InvalidCommitment);
    require!(
        entry.is_perp == intent.is_perp(),
        VeilswapError::InvalidCommitment
    );

    store.store(commitment_hash, intent)?;

    if intent.is_perp() {
        emit!(PerpCommitmentRevealed {
            pool_id: store.pool_id,
            commitment_hash,
            timestamp: clock.unix_timestamp,
        });
    } else {
        emit!(CommitmentRevealed {
            pool_id: store.pool_id,
            commitment_hash,
            timestamp: clock.unix_timestamp,
        });
    }
    Ok(())
}
