//! Submit a hiding commitment
//!
//! The transaction fee payer is any relayer; neither state nor events
//! record who submitted. The declared kind (spot/perp) only selects the
//! event stream and is cross-checked again at reveal.

use anchor_lang::prelude::*;

use crate::constants::seeds;
use crate::events::{CommitmentSubmitted, PerpCommitmentSubmitted};
use crate::state::{BatchPool, CommitmentRegistry, ProtocolConfig};

#[derive(Accounts)]
pub struct SubmitCommitment<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        seeds = [seeds::BATCH_POOL, batch_pool.pool_id.as_ref()],
        bump = batch_pool.bump,
    )]
    pub batch_pool: Box<Account<'info, BatchPool>>,

    #[account(
        mut,
        seeds = [seeds::COMMITMENT_REGISTRY, batch_pool.pool_id.as_ref()],
        bump = commitment_registry.bump,
    )]
    pub commitment_registry: Box<Account<'info, CommitmentRegistry>>,

    /// Fee payer; identity is not recorded
    pub submitter: Signer<'info>,
}

pub fn submit_commitment(
    ctx: Context<SubmitCommitment>,
    commitment_hash: [u8; 32],
    is_perp: bool,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;

    let registry = &mut ctx.accounts.commitment_registry;
    let clock = Clock::get()?;

    let appended = registry.submit(commitment_hash, is_perp, clock.unix_timestamp)?;
    if appended {
        if is_perp {
            emit!(PerpCommitmentSubmitted {
                pool_id: registry.pool_id,
                commitment_hash,
                timestamp: clock.unix_timestamp,
            });
        } else {
            emit!(CommitmentSubmitted {
                pool_id: registry.pool_id,
                commitment_hash,
                timestamp: clock.unix_timestamp,
            });
        }
    }
    Ok(())
}
