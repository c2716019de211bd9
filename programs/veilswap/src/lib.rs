//! Veilswap - privacy-preserving batch execution engine
//!
//! Trading intents hide behind commitments until settlement: users commit,
//! later reveal, and any caller triggers a batch that nets all revealed
//! intents into a single swap against the external pool program, splitting
//! the output pro rata and updating leveraged perp positions.

use anchor_lang::prelude::*;

pub mod constants;
pub mod cpi;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod instructions;
pub mod pyth;
pub mod state;

#[cfg(test)]
mod tests;

use instructions::*;
use state::{Intent, PoolKey};

declare_id!("7BWpEN8PqFEZ131A5F8iEniMS6bYREGrabxLHgSdUmVW");

#[program]
pub mod veilswap {
    use super::*;

    // ============ Admin Operations ============

    /// Initialize the protocol configuration singleton
    pub fn initialize_protocol_config(ctx: Context<InitializeProtocolConfig>) -> Result<()> {
        admin::initialize_protocol_config(ctx)
    }

    /// Register a Groth16 verification key for a circuit
    pub fn register_verification_key(
        ctx: Context<RegisterVerificationKey>,
        circuit_id: [u8; 32],
        vk_data: Vec<u8>,
    ) -> Result<()> {
        admin::register_verification_key(ctx, circuit_id, vk_data)
    }

    /// Replace or append verification key data on an existing account
    pub fn set_verification_key_data(
        ctx: Context<SetVerificationKeyData>,
        circuit_id: [u8; 32],
        chunk: Vec<u8>,
        append: bool,
    ) -> Result<()> {
        admin::set_verification_key_data(ctx, circuit_id, chunk, append)
    }

    /// Create a perp market bound to a batch pool
    pub fn create_market(
        ctx: Context<CreateMarket>,
        market_id: [u8; 32],
        oracle_feed: [u8; 32],
        max_leverage: u128,
        maintenance_margin: u64,
    ) -> Result<()> {
        admin::create_market(ctx, market_id, oracle_feed, max_leverage, maintenance_margin)
    }

    /// Pause a market
    pub fn pause_market(ctx: Context<SetMarketStatus>) -> Result<()> {
        admin::pause_market(ctx)
    }

    /// Unpause a market
    pub fn unpause_market(ctx: Context<SetMarketStatus>) -> Result<()> {
        admin::unpause_market(ctx)
    }

    /// Update a market's maximum leverage
    pub fn set_max_leverage(ctx: Context<SetMaxLeverage>, max_leverage: u128) -> Result<()> {
        admin::set_max_leverage(ctx, max_leverage)
    }

    /// One-time executor binding for the margin pool
    pub fn set_executor(ctx: Context<SetExecutor>, executor: Pubkey) -> Result<()> {
        admin::set_executor(ctx, executor)
    }

    /// Remove stale reveals blocking a pool's batches
    pub fn clear_pending_reveals(
        ctx: Context<ClearPendingReveals>,
        hashes: Vec<[u8; 32]>,
    ) -> Result<()> {
        admin::clear_pending_reveals(ctx, hashes)
    }

    // ============ Pool Operations ============

    /// Initialize a batch pool with its registry, reveal store, and vaults
    pub fn initialize_batch_pool(
        ctx: Context<InitializeBatchPool>,
        pool_key: PoolKey,
    ) -> Result<()> {
        pool::initialize_batch_pool(ctx, pool_key)
    }

    /// Fund an internal spot balance
    pub fn deposit_tokens(ctx: Context<DepositTokens>, amount: u64) -> Result<()> {
        pool::deposit_tokens(ctx, amount)
    }

    /// Withdraw from an internal spot balance
    pub fn withdraw_tokens(ctx: Context<WithdrawTokens>, amount: u64) -> Result<()> {
        pool::withdraw_tokens(ctx, amount)
    }

    // ============ Commit/Reveal Operations ============

    /// Submit a hiding commitment
    pub fn submit_commitment(
        ctx: Context<SubmitCommitment>,
        commitment_hash: [u8; 32],
        is_perp: bool,
    ) -> Result<()> {
        commit::submit_commitment(ctx, commitment_hash, is_perp)
    }

    /// Submit a commitment with a Groth16 binding proof
    pub fn submit_commitment_with_proof(
        ctx: Context<SubmitCommitmentWithProof>,
        commitment_hash: [u8; 32],
        is_perp: bool,
        proof: Vec<u8>,
        public_signals: Vec<[u8; 32]>,
    ) -> Result<()> {
        commit::submit_commitment_with_proof(ctx, commitment_hash, is_perp, proof, public_signals)
    }

    /// Reveal a transparent intent against its keccak commitment
    pub fn reveal_intent(ctx: Context<RevealIntent>, intent: Intent) -> Result<()> {
        reveal::reveal_intent(ctx, intent)
    }

    /// Reveal an intent against a proof-verified Poseidon commitment
    pub fn reveal_zk_intent(
        ctx: Context<RevealZkIntent>,
        commitment_hash: [u8; 32],
        intent: Intent,
    ) -> Result<()> {
        reveal::reveal_zk_intent(ctx, commitment_hash, intent)
    }

    // ============ Batch Settlement ============

    /// Execute a spot batch over revealed intents
    pub fn execute_spot_batch<'info>(
        ctx: Context<'_, '_, '_, 'info, ExecuteSpotBatch<'info>>,
        commitment_hashes: Vec<[u8; 32]>,
    ) -> Result<()> {
        batch::execute_spot_batch(ctx, commitment_hashes)
    }

    /// Execute a spot batch, re-verifying each commitment proof
    pub fn execute_spot_batch_with_proofs<'info>(
        ctx: Context<'_, '_, '_, 'info, ExecuteSpotBatchWithProofs<'info>>,
        commitment_hashes: Vec<[u8; 32]>,
        proofs: Vec<Vec<u8>>,
        public_signals: Vec<[u8; 32]>,
    ) -> Result<()> {
        batch::execute_spot_batch_with_proofs(ctx, commitment_hashes, proofs, public_signals)
    }

    /// Execute a perp batch over revealed intents
    pub fn execute_perp_batch<'info>(
        ctx: Context<'_, '_, '_, 'info, ExecutePerpBatch<'info>>,
        commitment_hashes: Vec<[u8; 32]>,
        base_is_currency_0: bool,
    ) -> Result<()> {
        batch::execute_perp_batch(ctx, commitment_hashes, base_is_currency_0)
    }

    // ============ Margin / Position Operations ============

    /// Initialize the margin pool for a collateral mint
    pub fn initialize_margin_pool(ctx: Context<InitializeMarginPool>) -> Result<()> {
        perps::initialize_margin_pool(ctx)
    }

    /// Deposit collateral into the margin pool
    pub fn deposit_collateral(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
        perps::deposit_collateral(ctx, amount)
    }

    /// Withdraw free margin
    pub fn withdraw_collateral(ctx: Context<WithdrawCollateral>, amount: u64) -> Result<()> {
        perps::withdraw_collateral(ctx, amount)
    }

    /// Liquidate an underwater position at the oracle mark
    pub fn liquidate(ctx: Context<Liquidate>, user: Pubkey) -> Result<()> {
        perps::liquidate(ctx, user)
    }

    /// Post a funding rate delta
    pub fn apply_funding(ctx: Context<ApplyFunding>, rate_delta: i128) -> Result<()> {
        perps::apply_funding(ctx, rate_delta)
    }
}
