//! Submit a commitment with a Groth16 binding proof
//!
//! The proof's single public signal must equal the commitment hash. On
//! success the registry entry is flagged verified, which later admits the
//! Poseidon reveal path (the hash is never recomputed on-chain).

use anchor_lang::prelude::*;

use crate::constants::{circuits, seeds};
use crate::errors::VeilswapError;
use crate::events::{
    CommitmentSubmitted, CommitmentVerified, PerpCommitmentSubmitted, PerpCommitmentVerified,
};
use crate::helpers::verify_commitment_proof;
use crate::state::{BatchPool, CommitmentRegistry, ProtocolConfig, VerificationKey};

#[derive(Accounts)]
pub struct SubmitCommitmentWithProof<'info> {
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

    /// Verification key for the intent commitment circuit
    #[account(
        seeds = [seeds::VERIFICATION_KEY, circuits::INTENT_COMMITMENT.as_ref()],
        bump = verification_key.bump,
        constraint = verification_key.is_active @ VeilswapError::VerificationKeyNotFound,
    )]
    pub verification_key: Box<Account<'info, VerificationKey>>,

    /// Fee payer; identity is not recorded
    pub submitter: Signer<'info>,
}

pub fn submit_commitment_with_proof(
    ctx: Context<SubmitCommitmentWithProof>,
    commitment_hash: [u8; 32],
    is_perp: bool,
    proof: Vec<u8>,
    public_signals: Vec<[u8; 32]>,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;

    // the circuit exposes exactly one public signal: the commitment
    require!(
        public_signals.len() == 1 && public_signals[0] == commitment_hash,
        VeilswapError::InvalidCommitment
    );
    verify_commitment_proof(
        &proof,
        &ctx.accounts.verification_key.vk_data,
        &commitment_hash,
    )?;

    let registry = &mut ctx.accounts.commitment_registry;
    let clock = Clock::get()?;

    let appended = registry.submit_verified(commitment_hash, is_perp, clock.unix_timestamp)?;
    if is_perp {
        if appended {
            emit!(PerpCommitmentSubmitted {
                pool_id: registry.pool_id,
                commitment_hash,
                timestamp: clock.unix_timestamp,
            });
        }
        emit!(PerpCommitmentVerified {
            pool_id: registry.pool_id,
            commitment_hash,
            timestamp: clock.unix_timestamp,
        });
    } else {
        if appended {
            emit!(CommitmentSubmitted {
                pool_id: registry.pool_id,
                commitment_hash,
                timestamp: clock.unix_timestamp,
            });
        }
        emit!(CommitmentVerified {
            pool_id: registry.pool_id,
            commitment_hash,
            timestamp: clock.unix_timestamp,
        });
    }
    Ok(())
}
