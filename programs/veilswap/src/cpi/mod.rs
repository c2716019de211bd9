//! CPI into the external AMM pool program
//!
//! The pool program (the `hook` of a pool key) executes the single netted
//! swap of a batch. The settlement protocol mirrors the callback discipline
//! of the engine's design: the engine moves the owed input from its vault
//! to the pool during the invocation, and the pool moves the output into
//! the engine's vault before returning. The signed `(delta_0, delta_1)`
//! result is read from CPI return data and the handler cross-checks the
//! output side against the observed vault balance change.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke_signed},
};

use crate::errors::VeilswapError;

/// Swap instruction discriminator understood by conforming pool programs
pub const POOL_SWAP_DISCRIMINATOR: [u8; 8] = *b"POOL_SWP";

/// Wire arguments of the pool swap instruction
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct PoolSwapArgs {
    /// Canonical pool id
    pub pool_id: [u8; 32],
    pub zero_for_one: bool,
    /// Negative = exact input, positive = exact output
    pub amount_specified: i128,
    /// Direction-appropriate bound, Q64.64
    pub sqrt_price_limit: u128,
}

/// Signed swap result from the engine's perspective:
/// negative = paid to the pool, positive = received from it
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSwapResult {
    pub delta_0: i128,
    pub delta_1: i128,
}

/// Invoke the pool program's swap and decode its return data.
///
/// # Arguments
/// * `pool_program` - The external pool program (pool key hook)
/// * `engine_authority` - Batch pool PDA signing for vault movements
/// * `input_vault` / `output_vault` - Engine vaults the pool settles against
/// * `signer_seeds` - Seeds for the batch pool PDA
/// * `remaining_accounts` - Pool-side accounts (reserves, state)
#[allow(clippy::too_many_arguments)]
pub fn pool_swap<'info>(
    pool_program: &AccountInfo<'info>,
    engine_authority: &AccountInfo<'info>,
    input_vault: &AccountInfo<'info>,
    output_vault: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    args: PoolSwapArgs,
    signer_seeds: &[&[u8]],
    remaining_accounts: &[AccountInfo<'info>],
) -> Result<PoolSwapResult> {
    let mut data = Vec::with_capacity(8 + 32 + 1 + 16 + 16);
    data.extend_from_slice(&POOL_SWAP_DISCRIMINATOR);
    args.serialize(&mut data)
        .map_err(|_| VeilswapError::PoolSwapFailed)?;

    let mut accounts = vec![
        AccountMeta::new_readonly(*engine_authority.key, true),
        AccountMeta::new(*input_vault.key, false),
        AccountMeta::new(*output_vault.key, false),
        AccountMeta::new_readonly(*token_program.key, false),
    ];
    for acc in remaining_accounts {
        accounts.push(AccountMeta {
            pubkey: *acc.key,
            is_signer: acc.is_signer,
            is_writable: acc.is_writable,
        });
    }

    let ix = Instruction {
        program_id: *pool_program.key,
        accounts,
        data,
    };

    let mut account_infos = vec![
        engine_authority.clone(),
        input_vault.clone(),
        output_vault.clone(),
        token_program.clone(),
    ];
    account_infos.extend(remaining_accounts.iter().cloned());

    invoke_signed(&ix, &account_infos, &[signer_seeds])
        .map_err(|_| VeilswapError::PoolSwapFailed)?;

    // the pool reports its signed deltas in return data
    let (returner, payload) =
        get_return_data().ok_or(VeilswapError::PoolSwapFailed)?;
    require!(
        returner == *pool_program.key,
        VeilswapError::PoolSwapFailed
    );
    PoolSwapResult::try_from_slice(&payload).map_err(|_| error!(VeilswapError::PoolSwapFailed))
}
