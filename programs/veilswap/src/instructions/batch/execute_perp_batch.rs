//! Execute a perp batch
//!
//! Nets signed base-asset sizes across the revealed perp intents, executes
//! one hedging swap against the pool (exact-output when the batch buys
//! base, exact-input when it sells), derives the batch execution price
//! from the realized deltas, and updates every position at that price in
//! caller-supplied order.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{
    seeds, MAX_BATCH_SIZE, MAX_SQRT_PRICE, MIN_COMMITMENTS, MIN_SQRT_PRICE,
};
use crate::cpi::{pool_swap, PoolSwapArgs};
use crate::errors::VeilswapError;
use crate::events::{PerpBatchExecuted, PositionClosed, PositionOpened};
use crate::helpers::fixed_point::{from_fixed_18, to_fixed_18};
use crate::helpers::netting::{execution_price, net_base, perp_contribution};
use crate::helpers::positions::{close_position, open_position};
use crate::instructions::batch::execute_spot_batch::require_unique;
use crate::state::{
    BatchPool, CommitmentRegistry, Intent, MarginPool, Market, PerpIntent, ProtocolConfig,
    RevealStore,
};

#[derive(Accounts)]
pub struct ExecutePerpBatch<'info> {
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

    /// Market every intent in the batch must target
    #[account(
        mut,
        seeds = [seeds::MARKET, market.pool_id.as_ref(), market.market_id.as_ref()],
        bump = market.bump,
        constraint = market.pool_id == batch_pool.pool_id @ VeilswapError::MarketNotFound,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [seeds::MARGIN_POOL, margin_pool.collateral_mint.as_ref()],
        bump = margin_pool.bump,
    )]
    pub margin_pool: Box<Account<'info, MarginPool>>,

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

    /// CHECK: must be the pool program named by the pool key
    #[account(address = batch_pool.key.hook @ VeilswapError::PoolSwapFailed)]
    pub pool_program: AccountInfo<'info>,

    /// Batch execution is permissionless
    pub executor: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn execute_perp_batch<'info>(
    ctx: Context<'_, '_, '_, 'info, ExecutePerpBatch<'info>>,
    commitment_hashes: Vec<[u8; 32]>,
    base_is_currency_0: bool,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    let batch_pool = &mut ctx.accounts.batch_pool;
    let registry = &mut ctx.accounts.commitment_registry;
    let store = &mut ctx.accounts.reveal_store;
    let market = &mut ctx.accounts.market;
    let margin_pool = &mut ctx.accounts.margin_pool;

    // position mutation is gated behind the one-time executor binding
    require!(
        margin_pool.executor == ctx.accounts.protocol_config.key(),
        VeilswapError::PerpManagerNotSet
    );

    require!(
        commitment_hashes.len() >= MIN_COMMITMENTS,
        VeilswapError::InsufficientCommitments
    );
    require!(
        commitment_hashes.len() <= MAX_BATCH_SIZE,
        VeilswapError::BatchTooLarge
    );
    batch_pool.perp_batch.check_interval(now)?;
    require_unique(&commitment_hashes)?;

    // load and validate every reveal
    let mut intents: Vec<PerpIntent> = Vec::with_capacity(commitment_hashes.len());
    let mut signed_sizes: Vec<i128> = Vec::with_capacity(commitment_hashes.len());
    for hash in &commitment_hashes {
        let entry = *registry.require_pending(hash)?;
        require!(entry.is_perp, VeilswapError::InvalidCommitment);
        let intent = *store
            .get(hash)
            .ok_or(VeilswapError::InvalidCommitment)?;
        let perp = match intent {
            Intent::Perp(p) => p,
            Intent::Spot(_) => return Err(error!(VeilswapError::InvalidCommitment)),
        };
        require!(now <= perp.deadline, VeilswapError::DeadlineExpired);
        require!(
            !store.nonce_used(&perp.user, perp.nonce),
            VeilswapError::InvalidNonce
        );
        require!(
            perp.market == market.key(),
            VeilswapError::MarketNotFound
        );
        signed_sizes.push(perp_contribution(perp.size, perp.is_long, perp.is_open)?);
        intents.push(perp);
    }

    let net = net_base(&signed_sizes)?;
    let buying_base = net > 0;
    // input side of the swap: quote when buying base, base when selling
    let zero_for_one = base_is_currency_0 ^ buying_base;

    let (base_decimals, quote_decimals) = if base_is_currency_0 {
        (batch_pool.decimals_0, batch_pool.decimals_1)
    } else {
        (batch_pool.decimals_1, batch_pool.decimals_0)
    };
    let base_native = from_fixed_18(net.unsigned_abs(), base_decimals)?;
    require!(base_native > 0, VeilswapError::InvalidPerpCommitment);

    let pool_id = batch_pool.pool_id;
    let bump = batch_pool.bump;
    let (input_vault, output_vault) = if zero_for_one {
        (&mut *ctx.accounts.vault_0, &mut *ctx.accounts.vault_1)
    } else {
        (&mut *ctx.accounts.vault_1, &mut *ctx.accounts.vault_0)
    };
    let input_before = input_vault.amount;
    let output_before = output_vault.amount;

    let sqrt_price_limit = if zero_for_one {
        MIN_SQRT_PRICE + 1
    } else {
        MAX_SQRT_PRICE - 1
    };
    let pool_authority = batch_pool.to_account_info();
    let signer_seeds: &[&[u8]] = &[seeds::BATCH_POOL, pool_id.as_ref(), &[bump]];
    let result = pool_swap(
        &ctx.accounts.pool_program,
        &pool_authority,
        &input_vault.to_account_info(),
        &output_vault.to_account_info(),
        &ctx.accounts.token_program.to_account_info(),
        PoolSwapArgs {
            pool_id,
            zero_for_one,
            // exact output of base when buying, exact input of base when selling
            amount_specified: if buying_base {
                base_native as i128
            } else {
                -(base_native as i128)
            },
            sqrt_price_limit,
        },
        signer_seeds,
        ctx.remaining_accounts,
    )?;

    input_vault.reload()?;
    output_vault.reload()?;
    let paid = input_before
        .checked_sub(input_vault.amount)
        .ok_or(VeilswapError::PoolSwapFailed)?;
    let received = output_vault
        .amount
        .checked_sub(output_before)
        .ok_or(VeilswapError::PoolSwapFailed)?;
    let (delta_in, delta_out) = if zero_for_one {
        (result.delta_0, result.delta_1)
    } else {
        (result.delta_1, result.delta_0)
    };
    require!(
        delta_in == -(paid as i128) && delta_out == received as i128,
        VeilswapError::PoolSwapFailed
    );
    let (base_moved, quote_moved) = if buying_base {
        (received, paid)
    } else {
        (paid, received)
    };
    require!(base_moved > 0, VeilswapError::PoolSwapFailed);

    // batch execution price from the realized deltas
    let price = execution_price(
        to_fixed_18(quote_moved, quote_decimals)?,
        to_fixed_18(base_moved, base_decimals)?,
    )?;

    // update positions in caller-supplied order at the uniform price
    let market_key = market.key();
    for perp in &intents {
        if perp.is_open {
            let outcome = open_position(
                market,
                margin_pool,
                perp.user,
                perp.size,
                perp.is_long,
                perp.leverage,
                price,
                now,
            )?;
            emit!(PositionOpened {
                user: perp.user,
                market: market_key,
                size: perp.size,
                is_long: perp.is_long,
                entry_price: outcome.entry_price,
                leverage: perp.leverage,
                collateral: outcome.collateral,
                timestamp: now,
            });
        } else {
            let outcome =
                close_position(market, margin_pool, &perp.user, perp.size, price, now)?;
            emit!(PositionClosed {
                user: perp.user,
                market: market_key,
                size_closed: outcome.size_closed,
                mark_price: price,
                pnl: outcome.pnl,
                timestamp: now,
            });
        }
    }

    // finalize
    for (hash, perp) in commitment_hashes.iter().zip(intents.iter()) {
        registry.mark_revealed(hash)?;
        store.consume_nonce(perp.user, perp.nonce)?;
        store.remove(hash);
    }
    batch_pool.perp_batch.advance(now);

    emit!(PerpBatchExecuted {
        pool_id,
        batch_size: commitment_hashes.len() as u64,
        execution_price: price,
        timestamp: now,
    });
    msg!(
        "perp batch settled: size={} net_base={} price={}",
        commitment_hashes.len(),
        net,
        price
    );
    Ok(())
}
