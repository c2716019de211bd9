//! Per-pool reveal store and used-nonce table
//!
//! Reveals are additive map inserts keyed by commitment hash; the engine
//! deletes them on batch consumption. A hash can be revealed once (first
//! write wins). Nonces are checked at reveal time and consumed only at
//! batch finalization so a failed batch leaves them unused.

use anchor_lang::prelude::*;

use crate::constants::{MAX_REVEALS, MAX_TRACKED_NONCES};
use crate::errors::VeilswapError;
use crate::state::Intent;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealEntry {
    pub commitment_hash: [u8; 32],
    pub intent: Intent,
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NonceEntry {
    pub user: Pubkey,
    pub nonce: u64,
}

/// Per-pool reveal store account
#[account]
#[derive(Default, InitSpace)]
pub struct RevealStore {
    /// Canonical pool id this store serves
    pub pool_id: [u8; 32],

    /// PDA bump
    pub bump: u8,

    #[max_len(MAX_REVEALS)]
    pub reveals: Vec<RevealEntry>,

    /// Consumed (user, nonce) pairs for this pool
    #[max_len(MAX_TRACKED_NONCES)]
    pub used_nonces: Vec<NonceEntry>,
}

impl RevealStore {
    pub fn get(&self, hash: &[u8; 32]) -> Option<&Intent> {
        self.reveals
            .iter()
            .find(|r| r.commitment_hash == *hash)
            .map(|r| &r.intent)
    }

    /// Store a reveal. First write wins: a second reveal for the same hash
    /// is rejected rather than overwritten.
    pub fn store(&mut self, hash: [u8; 32], intent: Intent) -> Result<()> {
        require!(self.get(&hash).is_none(), VeilswapError::InvalidCommitment);
        require!(
            self.reveals.len() < MAX_REVEALS,
            VeilswapError::RevealStoreFull
        );
        self.reveals.push(RevealEntry {
            commitment_hash: hash,
            intent,
        });
        Ok(())
    }

    /// Delete a consumed or stale reveal. Returns whether it was present.
    pub fn remove(&mut self, hash: &[u8; 32]) -> bool {
        let before = self.reveals.len();
        self.reveals.retain(|r| r.commitment_hash != *hash);
        self.reveals.len() != before
    }

    pub fn nonce_used(&self, user: &Pubkey, nonce: u64) -> bool {
        self.used_nonces
            .iter()
            .any(|n| n.user == *user && n.nonce == nonce)
    }

    /// Record a nonce as consumed. Transitions at most once: a second
    /// consumption attempt fails.
    pub fn consume_nonce(&mut self, user: Pubkey, nonce: u64) -> Result<()> {
        require!(!self.nonce_used(&user, nonce), VeilswapError::InvalidNonce);
        require!(
            self.used_nonces.len() < MAX_TRACKED_NONCES,
            VeilswapError::NonceTableFull
        );
        self.used_nonces.push(NonceEntry { user, nonce });
        Ok(())
    }
}
