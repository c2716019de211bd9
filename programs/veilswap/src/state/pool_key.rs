//! Pool key identity
//!
//! A pool is addressed by its canonical key: ordered currency pair, fee,
//! tick spacing, and the external pool program (hook) that executes swaps.
//! The 32-byte keccak hash of the canonical encoding is the PoolId used as
//! the primary key into every per-pool account.

use anchor_lang::prelude::*;

use crate::constants::MAX_POOL_FEE;
use crate::errors::VeilswapError;

/// Canonical pool key
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolKey {
    /// Lower currency mint (byte order)
    pub currency_0: Pubkey,

    /// Higher currency mint
    pub currency_1: Pubkey,

    /// Pool fee in pips (100% = 1_000_000)
    pub fee: u32,

    /// Tick spacing of the external pool
    pub tick_spacing: i32,

    /// External pool program executing the netted swap
    pub hook: Pubkey,
}

impl PoolKey {
    /// Canonical encoding length: 32 + 32 + 4 + 4 + 32
    pub const ENCODED_LEN: usize = 104;

    /// Validate ordering and fee bound
    pub fn validate(&self) -> Result<()> {
        require!(
            self.currency_0.to_bytes() < self.currency_1.to_bytes(),
            VeilswapError::InvalidPoolKey
        );
        require!(self.fee <= MAX_POOL_FEE, VeilswapError::InvalidPoolKey);
        Ok(())
    }

    /// Canonical byte encoding (field order, big-endian scalars)
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..32].copy_from_slice(self.currency_0.as_ref());
        out[32..64].copy_from_slice(self.currency_1.as_ref());
        out[64..68].copy_from_slice(&self.fee.to_be_bytes());
        out[68..72].copy_from_slice(&self.tick_spacing.to_be_bytes());
        out[72..104].copy_from_slice(self.hook.as_ref());
        out
    }

    /// Canonical PoolId: keccak256 of the encoding
    pub fn id(&self) -> [u8; 32] {
        solana_keccak_hasher::hash(&self.encode()).to_bytes()
    }

    /// Whether `currency` is one of the pool's two sides
    pub fn contains(&self, currency: &Pubkey) -> bool {
        *currency == self.currency_0 || *currency == self.currency_1
    }
}
