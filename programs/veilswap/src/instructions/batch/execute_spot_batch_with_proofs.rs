//! Execute a spot batch, re-verifying each commitment proof
//!
//! Belt-and-braces variant for ZK-path batches: every supplied proof is
//! verified against the commitment circuit key with its hash as the sole
//! public signal, and every consumed commitment must carry the verified
//! flag (its reveal arrived via the ZK reveal path).

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{circuits, seeds};
use crate::errors::VeilswapError;
use crate::helpers::verify_commitment_proof;
use crate::instructions::batch::execute_spot_batch::run_spot_batch;
use crate::state::{
    BatchPool, CommitmentRegistry, ProtocolConfig, RevealStore, VerificationKey,
};

#[derive(Accounts)]
pub struct ExecuteSpotBatchWithProofs<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
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

    #[account(
        mut,
        seeds = [seeds::REVEAL_STORE, batch_pool.pool_id.as_ref()],
        bump = reveal_store.bump,
    )]
    pub reveal_store: Box<Account<'info, RevealStore>>,

    #[account(
        mut,
        seeds = [seeds::VAULT, batch_pool.pool_id.as_ref(), batch_pool.key.currency_0.as_ref()],
        bump = batch_pool.vault_0_bump,
    )]
    pub vault_0: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [seeds::VAULT, batch_pool.pool_id.as_ref(), batch_pool.key.currency_1.as_ref()],
        bump = batch_pool.vault_1_bump,
    )]
    pub vault_1: Box<Account<'info, TokenAccount>>,

    /// Verification key for the intent commitment circuit
    #[account(
        seeds = [seeds::VERIFICATION_KEY, circuits::INTENT_COMMITMENT.as_ref()],
        bump = verification_key.bump,
        constraint = verification_key.is_active @ VeilswapError::VerificationKeyNotFound,
    )]
    pub verification_key: Box<Account<'info, VerificationKey>>,

    /// CHECK: must be the pool program named by the pool key
    #[account(address = batch_pool.key.hook @ VeilswapError::PoolSwapFailed)]
    pub pool_program: AccountInfo<'info>,

    /// Batch execution is permissionless
    pub executor: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn execute_spot_batch_with_proofs<'info>(
    ctx: Context<'_, '_, '_, 'info, ExecuteSpotBatchWithProofs<'info>>,
    commitment_hashes: Vec<[u8; 32]>,
    proofs: Vec<Vec<u8>>,
    public_signals: Vec<[u8; 32]>,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;
    require!(
        proofs.len() == commitment_hashes.len()
            && public_signals.len() == commitment_hashes.len(),
        VeilswapError::InvalidCommitment
    );
    for ((proof, signal), hash) in proofs
        .iter()
        .zip(public_signals.iter())
        .zip(commitment_hashes.iter())
    {
        require!(signal == hash, VeilswapError::InvalidCommitment);
        verify_commitment_proof(proof, &ctx.accounts.verification_key.vk_data, hash)?;
    }

    let clock = Clock::get()?;
    run_spot_batch(
        &mut ctx.accounts.batch_pool,
        &mut ctx.accounts.commitment_registry,
        &mut ctx.accounts.reveal_store,
        &mut ctx.accounts.vault_0,
        &mut ctx.accounts.vault_1,
        &ctx.accounts.pool_program,
        &ctx.accounts.token_program.to_account_info(),
        ctx.remaining_accounts,
        &commitment_hashes,
        true,
        clock.unix_timestamp,
    )
}
