//! Veilswap error codes
//!
//! The commit/reveal/batch surface deliberately keeps its error taxonomy
//! coarse: a failed proof, an unknown hash, and a non-matching public signal
//! all surface as `InvalidCommitment`.

use anchor_lang::prelude::*;

#[error_code]
pub enum VeilswapError {
    // ============ Commit/Reveal Errors ============
    #[msg("Unknown commitment hash, bad proof, or non-matching public signal")]
    InvalidCommitment,

    #[msg("Intent deadline has passed")]
    DeadlineExpired,

    #[msg("Nonce already consumed for this pool and user")]
    InvalidNonce,

    #[msg("Commitment registry is full")]
    RegistryFull,

    #[msg("Reveal store is full")]
    RevealStoreFull,

    #[msg("Used-nonce table is full")]
    NonceTableFull,

    // ============ Batch Errors ============
    #[msg("Batch size below minimum commitment count")]
    InsufficientCommitments,

    #[msg("Batch interval has not elapsed")]
    BatchConditionsNotMet,

    #[msg("Batch exceeds maximum size")]
    BatchTooLarge,

    #[msg("Net deltas are same-sign or zero")]
    InvalidSwapDirection,

    #[msg("Accumulated deltas do not match recomputed deltas")]
    NetDeltaMismatch,

    #[msg("Pro-rata share below a participant's minimum output")]
    SlippageExceededForUser,

    #[msg("Perp batch nets to zero base size")]
    InvalidPerpCommitment,

    #[msg("Pool swap invocation failed")]
    PoolSwapFailed,

    // ============ Position Errors ============
    #[msg("Invalid position size")]
    InvalidSize,

    #[msg("Leverage is zero or exceeds market maximum")]
    InvalidLeverage,

    #[msg("Invalid amount")]
    InvalidAmount,

    #[msg("Operation would exceed available margin")]
    InsufficientMargin,

    #[msg("Position is not liquidatable")]
    NotLiquidatable,

    #[msg("Market is not active")]
    MarketNotActive,

    #[msg("Market not found")]
    MarketNotFound,

    #[msg("Position manager executor has not been set")]
    PerpManagerNotSet,

    #[msg("Funding period has not elapsed")]
    FundingTooSoon,

    #[msg("Position book is full")]
    PositionBookFull,

    #[msg("Margin book is full")]
    MarginBookFull,

    // ============ Authorization Errors ============
    #[msg("Only the protocol owner may call this")]
    OnlyOwner,

    #[msg("Only the authorized executor may call this")]
    OnlyExecutor,

    #[msg("Executor has already been set")]
    ExecutorAlreadySet,

    #[msg("Protocol is paused")]
    ProtocolPaused,

    // ============ Pool/Ledger Errors ============
    #[msg("Pool currencies out of order or fee above maximum")]
    InvalidPoolKey,

    #[msg("Insufficient internal balance")]
    InsufficientBalance,

    #[msg("Balance ledger is full")]
    BalanceLedgerFull,

    #[msg("Amount overflow")]
    AmountOverflow,

    // ============ Oracle Errors ============
    #[msg("Invalid oracle price")]
    InvalidOraclePrice,

    #[msg("Oracle price is stale")]
    StaleOraclePrice,

    #[msg("Invalid Pyth price feed - feed ID mismatch")]
    InvalidPriceFeed,

    // ============ Proof Errors ============
    #[msg("Invalid proof length")]
    InvalidProofLength,

    #[msg("Invalid verification key")]
    InvalidVerificationKey,

    #[msg("Verification key not found or inactive")]
    VerificationKeyNotFound,
}
