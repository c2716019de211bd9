//! Trading intents and their hiding commitments
//!
//! An intent is the revealed form of a commitment. Spot and perp intents
//! share one registry and one reveal path; settlement dispatches on the
//! variant. The transparent commitment hash is keccak256 over a canonical
//! 32-byte-word encoding so it is byte-for-byte reproducible off-chain.
//! ZK commitments use Poseidon and are never recomputed on-chain; the
//! binding is established by the Groth16 proof instead.

use anchor_lang::prelude::*;

use crate::errors::VeilswapError;
use crate::state::PoolKey;

/// Leading kind word of the canonical encoding
pub const INTENT_KIND_SPOT: u64 = 0;
pub const INTENT_KIND_PERP: u64 = 1;

/// A spot swap intent
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpotIntent {
    /// Account whose internal balance funds the swap
    pub user: Pubkey,

    /// Input currency mint (must be one pool side)
    pub token_in: Pubkey,

    /// Output currency mint (the other pool side)
    pub token_out: Pubkey,

    /// Exact input amount, native token units
    pub amount_in: u64,

    /// Minimum acceptable output, native token units
    pub min_amount_out: u64,

    /// Internal-balance account credited with the output
    pub recipient: Pubkey,

    /// Per-(pool, user) replay nonce
    pub nonce: u64,

    /// Unix deadline; `now == deadline` is still valid
    pub deadline: i64,
}

/// A perp position intent
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerpIntent {
    pub user: Pubkey,

    /// Market account address
    pub market: Pubkey,

    /// Base-asset size, 18-dec fixed point
    pub size: u128,

    pub is_long: bool,

    /// true = open/increase, false = close/decrease
    pub is_open: bool,

    /// Committed collateral bound, 18-dec (hashed; margin actually locked
    /// is derived from size, price and leverage at execution)
    pub collateral: u128,

    /// Requested leverage, 18-dec fixed point
    pub leverage: u128,

    pub nonce: u64,
    pub deadline: i64,
}

/// Sum type over the two intent kinds
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Spot(SpotIntent),
    Perp(PerpIntent),
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Spot(SpotIntent::default())
    }
}

impl Intent {
    pub fn user(&self) -> Pubkey {
        match self {
            Intent::Spot(i) => i.user,
            Intent::Perp(i) => i.user,
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            Intent::Spot(i) => i.nonce,
            Intent::Perp(i) => i.nonce,
        }
    }

    pub fn deadline(&self) -> i64 {
        match self {
            Intent::Spot(i) => i.deadline,
            Intent::Perp(i) => i.deadline,
        }
    }

    pub fn is_perp(&self) -> bool {
        matches!(self, Intent::Perp(_))
    }

    /// Validate fields that do not depend on execution-time state
    pub fn validate(&self, pool_key: &PoolKey) -> Result<()> {
        match self {
            Intent::Spot(i) => {
                require!(i.token_in != i.token_out, VeilswapError::InvalidAmount);
                require!(
                    pool_key.contains(&i.token_in) && pool_key.contains(&i.token_out),
                    VeilswapError::InvalidAmount
                );
                require!(i.amount_in > 0, VeilswapError::InvalidAmount);
            }
            Intent::Perp(i) => {
                require!(i.size > 0, VeilswapError::InvalidSize);
                require!(i.leverage > 0, VeilswapError::InvalidLeverage);
            }
        }
        Ok(())
    }

    /// Canonical encoding: a leading kind word, then each field as a
    /// 32-byte big-endian word in declared order. Bools encode as 0/1.
    pub fn encode_words(&self) -> Vec<[u8; 32]> {
        match self {
            Intent::Spot(i) => vec![
                word_u64(INTENT_KIND_SPOT),
                i.user.to_bytes(),
                i.token_in.to_bytes(),
                i.token_out.to_bytes(),
                word_u64(i.amount_in),
                word_u64(i.min_amount_out),
                i.recipient.to_bytes(),
                word_u64(i.nonce),
                word_u64(i.deadline as u64),
            ],
            Intent::Perp(i) => vec![
                word_u64(INTENT_KIND_PERP),
                i.user.to_bytes(),
                i.market.to_bytes(),
                word_u128(i.size),
                word_bool(i.is_long),
                word_bool(i.is_open),
                word_u128(i.collateral),
                word_u128(i.leverage),
                word_u64(i.nonce),
                word_u64(i.deadline as u64),
            ],
        }
    }

    /// Transparent commitment hash: keccak256 over the canonical encoding
    pub fn commitment_hash(&self) -> [u8; 32] {
        let words = self.encode_words();
        let refs: Vec<&[u8]> = words.iter().map(|w| w.as_ref()).collect();
        solana_keccak_hasher::hashv(&refs).to_bytes()
    }
}

/// 32-byte big-endian word with the value in the last 8 bytes
fn word_u64(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..32].copy_from_slice(&value.to_be_bytes());
    out
}

/// 32-byte big-endian word with the value in the last 16 bytes
fn word_u128(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..32].copy_from_slice(&value.to_be_bytes());
    out
}

fn word_bool(value: bool) -> [u8; 32] {
    word_u64(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot() -> SpotIntent {
        SpotIntent {
            user: Pubkey::new_from_array([1; 32]),
            token_in: Pubkey::new_from_array([2; 32]),
            token_out: Pubkey::new_from_array([3; 32]),
            amount_in: 1_000_000,
            min_amount_out: 990_000,
            recipient: Pubkey::new_from_array([1; 32]),
            nonce: 1,
            deadline: 1_700_000_000,
        }
    }

    fn perp() -> PerpIntent {
        PerpIntent {
            user: Pubkey::new_from_array([1; 32]),
            market: Pubkey::new_from_array([4; 32]),
            size: 1_000_000_000_000_000_000,
            is_long: true,
            is_open: true,
            collateral: 500_000,
            leverage: 5_000_000_000_000_000_000,
            nonce: 1,
            deadline: 1_700_000_000,
        }
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(
            Intent::Spot(spot()).commitment_hash(),
            Intent::Spot(spot()).commitment_hash()
        );
        assert_eq!(
            Intent::Perp(perp()).commitment_hash(),
            Intent::Perp(perp()).commitment_hash()
        );
    }

    #[test]
    fn test_hash_changes_with_every_field() {
        let base = Intent::Spot(spot()).commitment_hash();

        let mut i = spot();
        i.amount_in += 1;
        assert_ne!(base, Intent::Spot(i).commitment_hash());

        let mut i = spot();
        i.min_amount_out += 1;
        assert_ne!(base, Intent::Spot(i).commitment_hash());

        let mut i = spot();
        i.nonce += 1;
        assert_ne!(base, Intent::Spot(i).commitment_hash());

        let mut i = spot();
        i.deadline += 1;
        assert_ne!(base, Intent::Spot(i).commitment_hash());

        let mut i = spot();
        i.recipient = Pubkey::new_from_array([9; 32]);
        assert_ne!(base, Intent::Spot(i).commitment_hash());
    }

    #[test]
    fn test_kind_word_separates_domains() {
        // A spot and a perp intent can never collide: the leading word differs.
        let spot_words = Intent::Spot(spot()).encode_words();
        let perp_words = Intent::Perp(perp()).encode_words();
        assert_ne!(spot_words[0], perp_words[0]);
    }

    #[test]
    fn test_bool_encoding_distinguishes_direction() {
        let mut long = perp();
        long.is_long = true;
        let mut short = perp();
        short.is_long = false;
        assert_ne!(
            Intent::Perp(long).commitment_hash(),
            Intent::Perp(short).commitment_hash()
        );
    }

    #[test]
    fn test_spot_validation() {
        let pool_key = PoolKey {
            currency_0: Pubkey::new_from_array([2; 32]),
            currency_1: Pubkey::new_from_array([3; 32]),
            fee: 3000,
            tick_spacing: 60,
            hook: Pubkey::new_from_array([9; 32]),
        };
        assert!(Intent::Spot(spot()).validate(&pool_key).is_ok());

        let mut bad = spot();
        bad.token_out = bad.token_in;
        assert!(Intent::Spot(bad).validate(&pool_key).is_err());

        let mut bad = spot();
        bad.token_in = Pubkey::new_from_array([8; 32]);
        assert!(Intent::Spot(bad).validate(&pool_key).is_err());
    }
}
