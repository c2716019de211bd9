//! Per-pool commitment registry
//!
//! Append-only list of hiding commitments. The registry never records the
//! committer. A hash appears at most once per pool; the `revealed` flag is
//! written once by the settlement engine and never reset.

use anchor_lang::prelude::*;

use crate::constants::MAX_COMMITMENTS;
use crate::errors::VeilswapError;

/// One registry entry
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitmentEntry {
    /// Hiding commitment (keccak for transparent intents, Poseidon for ZK)
    pub hash: [u8; 32],

    /// Submission time
    pub timestamp: i64,

    /// Set once when a batch consumes the matching reveal
    pub revealed: bool,

    /// Set when a Groth16 proof bound this hash as its public signal
    pub zk_verified: bool,

    /// Intent kind declared at submission; reveals must match
    pub is_perp: bool,
}

/// Per-pool commitment registry account
#[account]
#[derive(Default, InitSpace)]
pub struct CommitmentRegistry {
    /// Canonical pool id this registry serves
    pub pool_id: [u8; 32],

    /// PDA bump
    pub bump: u8,

    #[max_len(MAX_COMMITMENTS)]
    pub entries: Vec<CommitmentEntry>,
}

impl CommitmentRegistry {
    pub fn find(&self, hash: &[u8; 32]) -> Option<&CommitmentEntry> {
        self.entries.iter().find(|e| e.hash == *hash)
    }

    fn find_mut(&mut self, hash: &[u8; 32]) -> Option<&mut CommitmentEntry> {
        self.entries.iter_mut().find(|e| e.hash == *hash)
    }

    /// Append a commitment. Returns false (and leaves the registry
    /// untouched) if the hash is already present.
    pub fn submit(&mut self, hash: [u8; 32], is_perp: bool, now: i64) -> Result<bool> {
        if self.find(&hash).is_some() {
            return Ok(false);
        }
        require!(
            self.entries.len() < MAX_COMMITMENTS,
            VeilswapError::RegistryFull
        );
        self.entries.push(CommitmentEntry {
            hash,
            timestamp: now,
            revealed: false,
            zk_verified: false,
            is_perp,
        });
        Ok(true)
    }

    /// Append (if absent) and flag the hash as proof-verified.
    /// Returns true when the entry was newly appended.
    pub fn submit_verified(&mut self, hash: [u8; 32], is_perp: bool, now: i64) -> Result<bool> {
        let appended = self.submit(hash, is_perp, now)?;
        // submit() guarantees presence
        if let Some(entry) = self.find_mut(&hash) {
            entry.zk_verified = true;
        }
        Ok(appended)
    }

    /// Commitments not yet consumed by a batch
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.revealed).count()
    }

    /// Look up an unrevealed entry, failing with the unified commitment error
    pub fn require_pending(&self, hash: &[u8; 32]) -> Result<&CommitmentEntry> {
        self.find(hash)
            .filter(|e| !e.revealed)
            .ok_or_else(|| error!(VeilswapError::InvalidCommitment))
    }

    /// One-way transition to revealed
    pub fn mark_revealed(&mut self, hash: &[u8; 32]) -> Result<()> {
        let entry = self
            .find_mut(hash)
            .ok_or_else(|| error!(VeilswapError::InvalidCommitment))?;
        entry.revealed = true;
        Ok(())
    }
}
