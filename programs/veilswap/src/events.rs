//! Veilswap events for indexer consumption
//!
//! Spot and perp commit/reveal flows emit distinct event types so indexers
//! can follow each side without decoding intents. Recipient addresses in
//! distribution events are keccak-hashed, never emitted in clear.

use anchor_lang::prelude::*;

/// Emitted when a commitment is appended to a pool's registry.
/// Deliberately carries no committer identity.
#[event]
pub struct CommitmentSubmitted {
    /// Canonical pool id
    pub pool_id: [u8; 32],
    /// Commitment hash
    pub commitment_hash: [u8; 32],
    /// Timestamp
    pub timestamp: i64,
}

/// Emitted when a commitment's Groth16 proof verifies (ZK path only)
#[event]
pub struct CommitmentVerified {
    pub pool_id: [u8; 32],
    pub commitment_hash: [u8; 32],
    pub timestamp: i64,
}

/// Emitted when an intent is revealed against a pending commitment
#[event]
pub struct CommitmentRevealed {
    pub pool_id: [u8; 32],
    pub commitment_hash: [u8; 32],
    pub timestamp: i64,
}

/// Perp-side counterparts of the commit/reveal events
#[event]
pub struct PerpCommitmentSubmitted {
    pub pool_id: [u8; 32],
    pub commitment_hash: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct PerpCommitmentVerified {
    pub pool_id: [u8; 32],
    pub commitment_hash: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct PerpCommitmentRevealed {
    pub pool_id: [u8; 32],
    pub commitment_hash: [u8; 32],
    pub timestamp: i64,
}

/// Emitted once per successful spot batch
#[event]
pub struct BatchExecuted {
    pub pool_id: [u8; 32],
    /// Actual signed deltas from the pool swap (engine perspective:
    /// negative = paid to pool, positive = received)
    pub net_delta_0: i128,
    pub net_delta_1: i128,
    pub batch_size: u64,
    pub timestamp: i64,
}

/// Emitted per non-zero payout of a spot batch
#[event]
pub struct TokensDistributed {
    pub pool_id: [u8; 32],
    /// keccak256(recipient) - recipients stay hidden in the event stream
    pub recipient_hash: [u8; 32],
    /// Output token mint
    pub token: Pubkey,
    pub amount: u64,
}

/// Emitted once per successful perp batch
#[event]
pub struct PerpBatchExecuted {
    pub pool_id: [u8; 32],
    pub batch_size: u64,
    /// Batch execution price, 18-decimal fixed point quote per base
    pub execution_price: u128,
    pub timestamp: i64,
}

// ============ Position Manager Events ============

#[event]
pub struct PositionOpened {
    pub user: Pubkey,
    pub market: Pubkey,
    pub size: u128,
    pub is_long: bool,
    /// Entry price after notional-weighted averaging, 18-dec
    pub entry_price: u128,
    pub leverage: u128,
    pub collateral: u128,
    pub timestamp: i64,
}

#[event]
pub struct PositionClosed {
    pub user: Pubkey,
    pub market: Pubkey,
    pub size_closed: u128,
    /// Mark price the close settled at, 18-dec
    pub mark_price: u128,
    /// Signed realized pnl, 18-dec
    pub pnl: i128,
    pub timestamp: i64,
}

#[event]
pub struct PositionLiquidated {
    pub user: Pubkey,
    pub market: Pubkey,
    pub liquidator: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct CollateralDeposited {
    pub user: Pubkey,
    /// Native token units
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct CollateralWithdrawn {
    pub user: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Emitted when a keeper posts a funding rate delta
#[event]
pub struct FundingApplied {
    pub market: Pubkey,
    /// Signed rate delta, 18-dec
    pub rate: i128,
    pub timestamp: i64,
}

// ============ Spot Ledger Events ============

/// Emitted when a user funds their internal spot balance
#[event]
pub struct TokensDeposited {
    pub pool_id: [u8; 32],
    pub user: Pubkey,
    pub token: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct TokensWithdrawn {
    pub pool_id: [u8; 32],
    pub user: Pubkey,
    pub token: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

// ============ Admin Events ============

#[event]
pub struct MarketCreated {
    pub market: Pubkey,
    pub pool_id: [u8; 32],
    pub max_leverage: u128,
    pub maintenance_margin: u64,
    pub timestamp: i64,
}

#[event]
pub struct VerificationKeyRegistered {
    pub circuit_id: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct PendingRevealsCleared {
    pub pool_id: [u8; 32],
    pub removed: u64,
    pub timestamp: i64,
}
