//! Execute a spot batch
//!
//! Consumes stored reveals for the supplied commitment hashes, nets them
//! into one pool swap, and distributes the output pro rata on the internal
//! ledger. Any failure reverts the whole batch: commitments stay pending,
//! reveals stay stored, nonces stay unused.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{
    seeds, MAX_BATCH_SIZE, MAX_SQRT_PRICE, MIN_COMMITMENTS, MIN_SQRT_PRICE,
};
use crate::cpi::{pool_swap, PoolSwapArgs};
use crate::errors::VeilswapError;
use crate::events::{BatchExecuted, TokensDistributed};
use crate::helpers::netting::{
    accumulate_deltas, net_input, resolve_direction, self_check, settle_outputs,
    SpotContribution,
};
use crate::state::{BatchPool, CommitmentRegistry, Intent, ProtocolConfig, RevealStore};

#[derive(Accounts)]
pub struct ExecuteSpotBatch<'info> {
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

    /// CHECK: must be the pool program named by the pool key
    #[account(address = batch_pool.key.hook @ VeilswapError::PoolSwapFailed)]
    pub pool_program: AccountInfo<'info>,

    /// Batch execution is permissionless
    pub executor: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn execute_spot_batch<'info>(
    ctx: Context<'_, '_, '_, 'info, ExecuteSpotBatch<'info>>,
    commitment_hashes: Vec<[u8; 32]>,
) -> Result<()> {
    ctx.accounts.protocol_config.require_unpaused()?;
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
        false,
        clock.unix_timestamp,
    )
}

/// Shared spot settlement core, also driven by the proof-carrying variant
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_spot_batch<'info>(
    batch_pool: &mut Account<'info, BatchPool>,
    registry: &mut Account<'info, CommitmentRegistry>,
    store: &mut Account<'info, RevealStore>,
    vault_0: &mut Account<'info, TokenAccount>,
    vault_1: &mut Account<'info, TokenAccount>,
    pool_program: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    remaining_accounts: &[AccountInfo<'info>],
    commitment_hashes: &[[u8; 32]],
    require_zk: bool,
    now: i64,
) -> Result<()> {
    require!(
        commitment_hashes.len() >= MIN_COMMITMENTS,
        VeilswapError::InsufficientCommitments
    );
    require!(
        commitment_hashes.len() <= MAX_BATCH_SIZE,
        VeilswapError::BatchTooLarge
    );
    batch_pool.spot_batch.check_interval(now)?;
    require_unique(commitment_hashes)?;

    // load and validate every reveal before touching any balance
    let mut contributions = Vec::with_capacity(commitment_hashes.len());
    let mut nonces = Vec::with_capacity(commitment_hashes.len());
    for hash in commitment_hashes {
        let entry = *registry.require_pending(hash)?;
        require!(!entry.is_perp, VeilswapError::InvalidCommitment);
        if require_zk {
            require!(entry.zk_verified, VeilswapError::InvalidCommitment);
        }
        let intent = *store
            .get(hash)
            .ok_or(VeilswapError::InvalidCommitment)?;
        let spot = match intent {
            Intent::Spot(s) => s,
            Intent::Perp(_) => return Err(error!(VeilswapError::InvalidCommitment)),
        };
        require!(now <= spot.deadline, VeilswapError::DeadlineExpired);
        require!(
            !store.nonce_used(&spot.user, spot.nonce),
            VeilswapError::InvalidNonce
        );
        contributions.push(SpotContribution {
            user: spot.user,
            recipient: spot.recipient,
            currency_0_in: batch_pool.is_currency_0(&spot.token_in)?,
            amount_in: spot.amount_in,
            min_amount_out: spot.min_amount_out,
        });
        nonces.push((spot.user, spot.nonce));
    }

    let deltas = accumulate_deltas(&contributions);
    let zero_for_one = resolve_direction(&deltas)?;
    self_check(&contributions, &deltas)?;

    // collect every input into the engine side of the ledger; one
    // insufficient balance fails the whole batch
    for c in &contributions {
        batch_pool.debit(&c.user, c.currency_0_in, c.amount_in)?;
    }

    let input_amount = net_input(&deltas, zero_for_one)?;
    let pool_id = batch_pool.pool_id;
    let bump = batch_pool.bump;
    let currency_0 = batch_pool.key.currency_0;
    let currency_1 = batch_pool.key.currency_1;

    let (input_vault, output_vault) = if zero_for_one {
        (&mut *vault_0, &mut *vault_1)
    } else {
        (&mut *vault_1, &mut *vault_0)
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
        pool_program,
        &pool_authority,
        &input_vault.to_account_info(),
        &output_vault.to_account_info(),
        token_program,
        PoolSwapArgs {
            pool_id,
            zero_for_one,
            // negative amount = exact input
            amount_specified: -(input_amount as i128),
            sqrt_price_limit,
        },
        signer_seeds,
        remaining_accounts,
    )?;

    // settle: the pool must have pulled exactly the net input and pushed
    // the output it reported
    input_vault.reload()?;
    output_vault.reload()?;
    let paid = input_before
        .checked_sub(input_vault.amount)
        .ok_or(VeilswapError::PoolSwapFailed)?;
    let received = output_vault
        .amount
        .checked_sub(output_before)
        .ok_or(VeilswapError::PoolSwapFailed)?;
    require!(paid == input_amount, VeilswapError::PoolSwapFailed);
    let (delta_in, delta_out) = if zero_for_one {
        (result.delta_0, result.delta_1)
    } else {
        (result.delta_1, result.delta_0)
    };
    require!(
        delta_in == -(paid as i128) && delta_out == received as i128,
        VeilswapError::PoolSwapFailed
    );

    // per-user slippage floor, then pro-rata distribution
    let payouts = settle_outputs(&contributions, zero_for_one, received)?;
    for payout in &payouts {
        if payout.amount == 0 {
            continue;
        }
        batch_pool.credit(payout.recipient, payout.currency_0_out, payout.amount)?;
        emit!(TokensDistributed {
            pool_id,
            recipient_hash: solana_keccak_hasher::hash(payout.recipient.as_ref()).to_bytes(),
            token: if payout.currency_0_out {
                currency_0
            } else {
                currency_1
            },
            amount: payout.amount,
        });
    }

    // finalize: reveal flags flip atomically with consumption
    for (hash, (user, nonce)) in commitment_hashes.iter().zip(nonces) {
        registry.mark_revealed(hash)?;
        store.consume_nonce(user, nonce)?;
        store.remove(hash);
    }
    batch_pool.spot_batch.advance(now);

    emit!(BatchExecuted {
        pool_id,
        net_delta_0: result.delta_0,
        net_delta_1: result.delta_1,
        batch_size: commitment_hashes.len() as u64,
        timestamp: now,
    });
    msg!(
        "spot batch settled: size={} zero_for_one={} input={} output={}",
        commitment_hashes.len(),
        zero_for_one,
        paid,
        received
    );
    Ok(())
}

pub(crate) fn require_unique(hashes: &[[u8; 32]]) -> Result<()> {
    for i in 0..hashes.len() {
        for j in (i + 1)..hashes.len() {
            require!(hashes[i] != hashes[j], VeilswapError::InvalidCommitment);
        }
    }
    Ok(())
}
