//! Initialize a batch pool with its registry, reveal store, and vaults

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::seeds;
use crate::state::{BatchPool, CommitmentRegistry, PoolKey, ProtocolConfig, RevealStore};

#[derive(Accounts)]
#[instruction(pool_key: PoolKey)]
pub struct InitializeBatchPool<'info> {
    #[account(seeds = [seeds::PROTOCOL_CONFIG], bump = protocol_config.bump)]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        init,
        payer = payer,
        space = 8 + BatchPool::INIT_SPACE,
        seeds = [seeds::BATCH_POOL, &pool_key.id()],
        bump,
    )]
    pub batch_pool: Box<Account<'info, BatchPool>>,

    #[account(
        init,
        payer = payer,
        space = 8 + CommitmentRegistry::INIT_SPACE,
        seeds = [seeds::COMMITMENT_REGISTRY, &pool_key.id()],
        bump,
    )]
    pub commitment_registry: Box<Account<'info, CommitmentRegistry>>,

    #[account(
        init,
        payer = payer,
        space = 8 + RevealStore::INIT_SPACE,
        seeds = [seeds::REVEAL_STORE, &pool_key.id()],
        bump,
    )]
    pub reveal_store: Box<Account<'info, RevealStore>>,

    #[account(address = pool_key.currency_0)]
    pub mint_0: Box<Account<'info, Mint>>,

    #[account(address = pool_key.currency_1)]
    pub mint_1: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        seeds = [seeds::VAULT, &pool_key.id(), pool_key.currency_0.as_ref()],
        bump,
        token::mint = mint_0,
        token::authority = batch_pool,
    )]
    pub vault_0: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = payer,
        seeds = [seeds::VAULT, &pool_key.id(), pool_key.currency_1.as_ref()],
        bump,
        token::mint = mint_1,
        token::authority = batch_pool,
    )]
    pub vault_1: Box<Account<'info, TokenAccount>>,

    /// Protocol owner
    pub authority: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_batch_pool(ctx: Context<InitializeBatchPool>, pool_key: PoolKey) -> Result<()> {
    ctx.accounts
        .protocol_config
        .require_authority(&ctx.accounts.authority.key())?;
    pool_key.validate()?;

    let pool_id = pool_key.id();

    let batch_pool = &mut ctx.accounts.batch_pool;
    batch_pool.key = pool_key;
    batch_pool.pool_id = pool_id;
    batch_pool.decimals_0 = ctx.accounts.mint_0.decimals;
    batch_pool.decimals_1 = ctx.accounts.mint_1.decimals;
    batch_pool.bump = ctx.bumps.batch_pool;
    batch_pool.vault_0_bump = ctx.bumps.vault_0;
    batch_pool.vault_1_bump = ctx.bumps.vault_1;

    let registry = &mut ctx.accounts.commitment_registry;
    registry.pool_id = pool_id;
    registry.bump = ctx.bumps.commitment_registry;

    let store = &mut ctx.accounts.reveal_store;
    store.pool_id = pool_id;
    store.bump = ctx.bumps.reveal_store;

    msg!("batch pool initialized, pool_id {:02x?}", &pool_id[0..8]);
    Ok(())
}
