//! Protocol constants

/// Minimum number of commitments per batch
pub const MIN_COMMITMENTS: usize = 2;

/// Minimum seconds between two batches of the same pool/side
pub const BATCH_INTERVAL: i64 = 300;

/// Minimum seconds between funding accruals on a market (8 hours)
pub const FUNDING_PERIOD: i64 = 8 * 60 * 60;

/// 18-decimal fixed point scale
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Liquidation fee taken into the insurance fund, in basis points
pub const LIQUIDATION_FEE_BPS: u64 = 500;

/// Basis point denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum accepted oracle price age in seconds
pub const MAX_ORACLE_STALENESS: u64 = 3600;

/// Groth16 proof size in bytes (A: 64, B: 128, C: 64)
pub const GROTH16_PROOF_SIZE: usize = 256;

/// Maximum pool fee (pips, 100% = 1_000_000)
pub const MAX_POOL_FEE: u32 = 1_000_000;

/// Sqrt price bounds (Q64.64) passed to the pool program as the
/// direction-appropriate limit; batches carry no user-facing price limit
pub const MIN_SQRT_PRICE: u128 = 4295048016;
pub const MAX_SQRT_PRICE: u128 = 79226673515401279992447579055;

/// Capacity bounds for account-resident collections
pub const MAX_COMMITMENTS: usize = 64;
pub const MAX_REVEALS: usize = 32;
pub const MAX_TRACKED_NONCES: usize = 96;
pub const MAX_POSITIONS: usize = 64;
pub const MAX_MARGIN_ACCOUNTS: usize = 64;
pub const MAX_BALANCES: usize = 32;

/// Maximum commitments consumed by a single batch
pub const MAX_BATCH_SIZE: usize = 16;

/// Circuit IDs for verification key lookup
pub mod circuits {
    /// Binds a Poseidon intent commitment to its single public signal
    pub const INTENT_COMMITMENT: [u8; 32] = *b"intent_commitment_______________";
}

/// PDA seeds
pub mod seeds {
    pub const PROTOCOL_CONFIG: &[u8] = b"protocol_config";
    pub const BATCH_POOL: &[u8] = b"batch_pool";
    pub const COMMITMENT_REGISTRY: &[u8] = b"commitment_registry";
    pub const REVEAL_STORE: &[u8] = b"reveal_store";
    pub const VAULT: &[u8] = b"vault";
    pub const MARKET: &[u8] = b"market";
    pub const MARGIN_POOL: &[u8] = b"margin_pool";
    pub const MARGIN_VAULT: &[u8] = b"margin_vault";
    pub const VERIFICATION_KEY: &[u8] = b"vk";
}
