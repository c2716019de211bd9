//! End-to-end scenario tests
//!
//! Drives the commit -> reveal -> batch pipeline over the state accounts
//! and settlement helpers exactly as the instruction handlers do, with the
//! external pool swap replaced by its realized deltas. Covers the netting,
//! distribution, replay, expiry, and perp settlement flows end to end.

use anchor_lang::prelude::*;

use crate::constants::{BATCH_INTERVAL, MIN_COMMITMENTS, PRECISION};
use crate::errors::VeilswapError;
use crate::helpers::netting::{
    accumulate_deltas, execution_price, net_base, net_input, perp_contribution,
    resolve_direction, self_check, settle_outputs, Payout, SpotContribution,
};
use crate::helpers::positions::open_position;
use crate::state::{
    BatchPool, CommitmentRegistry, Intent, MarginPool, Market, PoolKey, RevealStore, SpotIntent,
};

/// Extract the anchor error code so expectations survive origin info
fn code(err: &anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        other => panic!("unexpected error type: {:?}", other),
    }
}

fn assert_err(err: anchor_lang::error::Error, expected: VeilswapError) {
    assert_eq!(code(&err), code(&error!(expected)));
}

fn pool_key() -> PoolKey {
    PoolKey {
        currency_0: Pubkey::new_from_array([1; 32]), // e.g. USDC
        currency_1: Pubkey::new_from_array([2; 32]), // e.g. USDT
        fee: 3000,
        tick_spacing: 60,
        hook: Pubkey::new_from_array([99; 32]),
    }
}

fn user(tag: u8) -> Pubkey {
    Pubkey::new_from_array([tag; 32])
}

fn spot_intent(tag: u8, token_in_0: bool, amount_in: u64, min_out: u64, nonce: u64, deadline: i64) -> Intent {
    let key = pool_key();
    let (token_in, token_out) = if token_in_0 {
        (key.currency_0, key.currency_1)
    } else {
        (key.currency_1, key.currency_0)
    };
    Intent::Spot(SpotIntent {
        user: user(tag),
        token_in,
        token_out,
        amount_in,
        min_amount_out: min_out,
        recipient: user(tag),
        nonce,
        deadline,
    })
}

struct Engine {
    pool: BatchPool,
    registry: CommitmentRegistry,
    store: RevealStore,
}

impl Engine {
    fn new() -> Self {
        let key = pool_key();
        let pool = BatchPool {
            key,
            pool_id: key.id(),
            ..BatchPool::default()
        };
        Engine {
            pool,
            registry: CommitmentRegistry::default(),
            store: RevealStore::default(),
        }
    }

    fn commit(&mut self, intent: &Intent, now: i64) -> [u8; 32] {
        let hash = intent.commitment_hash();
        self.registry
            .submit(hash, intent.is_perp(), now)
            .unwrap();
        hash
    }

    fn reveal(&mut self, intent: Intent, now: i64) -> Result<[u8; 32]> {
        require!(now <= intent.deadline(), VeilswapError::DeadlineExpired);
        require!(
            !self.store.nonce_used(&intent.user(), intent.nonce()),
            VeilswapError::InvalidNonce
        );
        intent.validate(&self.pool.key)?;
        let hash = intent.commitment_hash();
        let entry = self.registry.require_pending(&hash)?;
        require!(
            entry.is_perp == intent.is_perp(),
            VeilswapError::InvalidCommitment
        );
        self.store.store(hash, intent)?;
        Ok(hash)
    }

    /// The spot batch state machine with the pool swap stubbed: the
    /// closure maps the net input to the pool's output amount.
    fn execute_spot_batch(
        &mut self,
        hashes: &[[u8; 32]],
        now: i64,
        pool: impl Fn(u64) -> u64,
    ) -> Result<Vec<Payout>> {
        require!(
            hashes.len() >= MIN_COMMITMENTS,
            VeilswapError::InsufficientCommitments
        );
        self.pool.spot_batch.check_interval(now)?;

        let mut contributions = Vec::new();
        let mut nonces = Vec::new();
        for hash in hashes {
            let entry = *self.registry.require_pending(hash)?;
            assert!(!entry.is_perp);
            let intent = *self
                .store
                .get(hash)
                .ok_or(VeilswapError::InvalidCommitment)?;
            let spot = match intent {
                Intent::Spot(s) => s,
                Intent::Perp(_) => return Err(error!(VeilswapError::InvalidCommitment)),
            };
            require!(now <= spot.deadline, VeilswapError::DeadlineExpired);
            require!(
                !self.store.nonce_used(&spot.user, spot.nonce),
                VeilswapError::InvalidNonce
            );
            contributions.push(SpotContribution {
                user: spot.user,
                recipient: spot.recipient,
                currency_0_in: self.pool.is_currency_0(&spot.token_in)?,
                amount_in: spot.amount_in,
                min_amount_out: spot.min_amount_out,
            });
            nonces.push((spot.user, spot.nonce));
        }

        let deltas = accumulate_deltas(&contributions);
        let zero_for_one = resolve_direction(&deltas)?;
        self_check(&contributions, &deltas)?;

        for c in &contributions {
            self.pool.debit(&c.user, c.currency_0_in, c.amount_in)?;
        }

        let input = net_input(&deltas, zero_for_one)?;
        let output = pool(input);
        let payouts = settle_outputs(&contributions, zero_for_one, output)?;
        for p in &payouts {
            if p.amount > 0 {
                self.pool.credit(p.recipient, p.currency_0_out, p.amount)?;
            }
        }

        for (hash, (owner, nonce)) in hashes.iter().zip(nonces) {
            self.registry.mark_revealed(hash)?;
            self.store.consume_nonce(owner, nonce)?;
            self.store.remove(hash);
        }
        self.pool.spot_batch.advance(now);
        Ok(payouts)
    }
}

#[test]
fn scenario_two_sided_spot_netting() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    let deadline = now + 3600;

    // Alice swaps 1_000_000 currency_0 for >= 990_000 currency_1;
    // Bob swaps 500_000 currency_1 for >= 495_000 currency_0
    engine.pool.credit(user(10), true, 1_000_000).unwrap();
    engine.pool.credit(user(11), false, 500_000).unwrap();

    let alice = spot_intent(10, true, 1_000_000, 990_000, 1, deadline);
    let bob = spot_intent(11, false, 500_000, 495_000, 1, deadline);
    engine.commit(&alice, now);
    engine.commit(&bob, now);
    let h_alice = engine.reveal(alice, now).unwrap();
    let h_bob = engine.reveal(bob, now).unwrap();

    assert_eq!(engine.registry.pending_count(), 2);

    // netting: delta_0 = +505_000, delta_1 = -490_000, zero-for-one
    let exec_time = now + BATCH_INTERVAL;
    let payouts = engine
        .execute_spot_batch(&[h_alice, h_bob], exec_time, |input| {
            assert_eq!(input, 505_000);
            // the pool converts the net input near par
            500_000
        })
        .unwrap();

    // Alice gets the pool output plus Bob's counter-side input
    assert_eq!(payouts[0].amount, 1_000_000);
    assert!(payouts[0].amount >= 990_000);
    // Bob gets exactly his minimum in currency_0
    assert_eq!(payouts[1].amount, 495_000);

    // ledger: inputs fully debited, outputs credited
    assert_eq!(engine.pool.balance_of(&user(10), true), 0);
    assert_eq!(engine.pool.balance_of(&user(10), false), 1_000_000);
    assert_eq!(engine.pool.balance_of(&user(11), false), 0);
    assert_eq!(engine.pool.balance_of(&user(11), true), 495_000);

    // finality
    assert_eq!(engine.registry.pending_count(), 0);
    assert!(engine.store.get(&h_alice).is_none());
    assert!(engine.store.nonce_used(&user(10), 1));
    assert_eq!(engine.pool.spot_batch.batch_nonce, 1);
}

#[test]
fn scenario_one_sided_batch_distributes_everything() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    let deadline = now + 3600;

    for tag in [20u8, 21, 22] {
        engine.pool.credit(user(tag), true, 1_000_000).unwrap();
        let intent = spot_intent(tag, true, 1_000_000, 985_000, 1, deadline);
        engine.commit(&intent, now);
        engine.reveal(intent, now).unwrap();
    }
    let hashes: Vec<[u8; 32]> = [20u8, 21, 22]
        .iter()
        .map(|t| spot_intent(*t, true, 1_000_000, 985_000, 1, deadline).commitment_hash())
        .collect();

    let payouts = engine
        .execute_spot_batch(&hashes, now + BATCH_INTERVAL, |input| {
            assert_eq!(input, 3_000_000);
            2_985_000
        })
        .unwrap();

    // pro-rata conservation: every output token is distributed
    let distributed: u64 = payouts.iter().map(|p| p.amount).sum();
    assert_eq!(distributed, 2_985_000);
    for p in &payouts {
        assert!(p.amount >= 985_000);
    }
}

#[test]
fn scenario_batch_below_minimum_fails() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    engine.pool.credit(user(10), true, 100).unwrap();
    let intent = spot_intent(10, true, 100, 90, 1, now + 3600);
    engine.commit(&intent, now);
    let hash = engine.reveal(intent, now).unwrap();

    let err = engine
        .execute_spot_batch(&[hash], now + BATCH_INTERVAL, |_| 100)
        .unwrap_err();
    assert_err(err, VeilswapError::InsufficientCommitments);
}

#[test]
fn scenario_batch_interval_enforced() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    let deadline = now + 7200;

    // first batch succeeds
    for (tag, nonce) in [(10u8, 1u64), (11, 1)] {
        engine.pool.credit(user(tag), true, 2_000).unwrap();
        let intent = spot_intent(tag, true, 1_000, 900, nonce, deadline);
        engine.commit(&intent, now);
        engine.reveal(intent, now).unwrap();
    }
    let hashes: Vec<[u8; 32]> = [(10u8, 1u64), (11, 1)]
        .iter()
        .map(|(t, n)| spot_intent(*t, true, 1_000, 900, *n, deadline).commitment_hash())
        .collect();
    engine
        .execute_spot_batch(&hashes, now + BATCH_INTERVAL, |_| 1_900)
        .unwrap();

    // a second batch inside the interval is rejected
    for (tag, nonce) in [(10u8, 2u64), (11, 2)] {
        let intent = spot_intent(tag, true, 1_000, 900, nonce, deadline);
        engine.commit(&intent, now + BATCH_INTERVAL);
        engine.reveal(intent, now + BATCH_INTERVAL).unwrap();
    }
    let hashes2: Vec<[u8; 32]> = [(10u8, 2u64), (11, 2)]
        .iter()
        .map(|(t, n)| spot_intent(*t, true, 1_000, 900, *n, deadline).commitment_hash())
        .collect();
    let err = engine
        .execute_spot_batch(&hashes2, now + 2 * BATCH_INTERVAL - 1, |_| 1_900)
        .unwrap_err();
    assert_err(err, VeilswapError::BatchConditionsNotMet);

    // and passes once the interval elapses
    engine
        .execute_spot_batch(&hashes2, now + 2 * BATCH_INTERVAL, |_| 1_900)
        .unwrap();
}

#[test]
fn scenario_nonce_replay_rejected() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    let deadline = now + 7200;

    engine.pool.credit(user(10), true, 10_000).unwrap();
    engine.pool.credit(user(11), true, 10_000).unwrap();

    let alice = spot_intent(10, true, 1_000, 900, 42, deadline);
    let bob = spot_intent(11, true, 1_000, 900, 1, deadline);
    engine.commit(&alice, now);
    engine.commit(&bob, now);
    let hashes = [
        engine.reveal(alice, now).unwrap(),
        engine.reveal(bob, now).unwrap(),
    ];
    engine
        .execute_spot_batch(&hashes, now + BATCH_INTERVAL, |_| 1_900)
        .unwrap();

    // a fresh commitment reusing nonce 42 is rejected at the earliest
    // checkpoint: the nonce was consumed by the executed batch
    let replay = spot_intent(10, true, 2_000, 1_800, 42, deadline);
    engine.commit(&replay, now + BATCH_INTERVAL);
    let err = engine.reveal(replay, now + BATCH_INTERVAL).unwrap_err();
    assert_err(err, VeilswapError::InvalidNonce);
}

#[test]
fn scenario_stale_reveal_blocks_batch_until_cleared() {
    let mut engine = Engine::new();
    let now = 1_000_000;

    engine.pool.credit(user(10), true, 10_000).unwrap();
    engine.pool.credit(user(11), true, 10_000).unwrap();
    engine.pool.credit(user(12), true, 10_000).unwrap();

    // Alice's reveal expires at T; the others live long
    let t = now + 100;
    let alice = spot_intent(10, true, 1_000, 900, 1, t);
    let bob = spot_intent(11, true, 1_000, 900, 1, now + 7200);
    let carol = spot_intent(12, true, 1_000, 900, 1, now + 7200);
    for intent in [&alice, &bob, &carol] {
        engine.commit(intent, now);
        engine.reveal(*intent, now).unwrap();
    }
    let h_alice = alice.commitment_hash();
    let h_bob = bob.commitment_hash();
    let h_carol = carol.commitment_hash();

    // at T+1 the batch containing Alice fails
    let err = engine
        .execute_spot_batch(&[h_alice, h_bob, h_carol], t + 1 + BATCH_INTERVAL, |_| 2_900)
        .unwrap_err();
    assert_err(err, VeilswapError::DeadlineExpired);

    // operator clears the stale reveal; re-attempt without Alice succeeds
    assert!(engine.store.remove(&h_alice));
    engine
        .execute_spot_batch(&[h_bob, h_carol], t + 1 + BATCH_INTERVAL, |_| 1_900)
        .unwrap();

    // Alice's commitment is still pending; her nonce was never consumed
    assert!(engine.registry.require_pending(&h_alice).is_ok());
    assert!(!engine.store.nonce_used(&user(10), 1));
}

#[test]
fn scenario_first_reveal_locks_the_hash() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    let intent = spot_intent(10, true, 1_000, 900, 1, now + 3600);
    engine.commit(&intent, now);
    engine.reveal(intent, now).unwrap();
    // the same commitment cannot be re-revealed
    let err = engine.reveal(intent, now).unwrap_err();
    assert_err(err, VeilswapError::InvalidCommitment);
}

#[test]
fn scenario_deadline_boundary() {
    let mut engine = Engine::new();
    let now = 1_000_000;
    // now == deadline is allowed
    let at_boundary = spot_intent(10, true, 1_000, 900, 1, now);
    engine.commit(&at_boundary, now);
    assert!(engine.reveal(at_boundary, now).is_ok());

    // one second past is rejected
    let expired = spot_intent(11, true, 1_000, 900, 1, now - 1);
    engine.commit(&expired, now);
    let err = engine.reveal(expired, now).unwrap_err();
    assert_err(err, VeilswapError::DeadlineExpired);
}

#[test]
fn scenario_perp_batch_opens_net_long() {
    const P: u128 = PRECISION;

    // Alice opens long 1e18, Bob opens short 3e17: net +7e17 base
    let alice_size = P;
    let bob_size = 3 * P / 10;
    let contributions = vec![
        perp_contribution(alice_size, true, true).unwrap(),
        perp_contribution(bob_size, false, true).unwrap(),
    ];
    let net = net_base(&contributions).unwrap();
    assert_eq!(net, (7 * P / 10) as i128);

    // pool fills 7e17 base for 1.96e21 quote -> execution price 2_800e18
    let price = execution_price(196 * P * 10, 7 * P / 10).unwrap();
    assert_eq!(price, 2_800 * P);

    // both positions open at the batch execution price
    let mut market = Market {
        max_leverage: 20 * P,
        maintenance_margin: (P / 20) as u64,
        is_active: true,
        ..Market::default()
    };
    let mut margin = MarginPool::default();
    margin.deposit(user(10), 10_000 * P).unwrap();
    margin.deposit(user(11), 10_000 * P).unwrap();

    let alice = open_position(
        &mut market, &mut margin, user(10), alice_size, true, 5 * P, price, 0,
    )
    .unwrap();
    let bob = open_position(
        &mut market, &mut margin, user(11), bob_size, false, 5 * P, price, 0,
    )
    .unwrap();

    assert_eq!(alice.entry_price, 2_800 * P);
    assert_eq!(bob.entry_price, 2_800 * P);
    // margin locked: notional / leverage
    assert_eq!(alice.collateral, 560 * P);
    assert_eq!(bob.collateral, 168 * P);
    assert_eq!(market.long_open_interest, alice_size);
    assert_eq!(market.short_open_interest, bob_size);
}

#[test]
fn scenario_perp_zero_netting_rejected() {
    const P: u128 = PRECISION;
    let contributions = vec![
        perp_contribution(P, true, true).unwrap(),
        perp_contribution(P, true, false).unwrap(),
    ];
    assert!(net_base(&contributions).is_err());
}

#[cfg(test)]
mod zk_commitments {
    use super::*;
    use crate::helpers::field::is_canonical_field_element;
    use light_hasher::{Hasher, Poseidon};

    #[test]
    fn poseidon_commitments_are_canonical_field_elements() {
        // ZK-path commitments arrive as Poseidon hashes; whatever the
        // prover feeds in, the output must pass the verifier's
        // canonicality gate
        let secret = [7u8; 31];
        let amount = 1_000_000u64.to_be_bytes();
        let hash = Poseidon::hashv(&[&secret[..], &amount[..]]).unwrap();
        assert!(is_canonical_field_element(&hash));

        // deterministic and input-sensitive
        assert_eq!(hash, Poseidon::hashv(&[&secret[..], &amount[..]]).unwrap());
        let other =
            Poseidon::hashv(&[&secret[..], &2_000_000u64.to_be_bytes()[..]]).unwrap();
        assert_ne!(hash, other);
    }

    #[test]
    fn poseidon_and_keccak_domains_cannot_collide_in_registry() {
        // a transparent reveal recomputes keccak; a ZK reveal never
        // recomputes. The registry keeps them apart by the verified flag,
        // not by hash shape - but the hashes differ anyway.
        let intent = spot_intent(1, true, 1_000, 900, 1, 2_000_000);
        let keccak = intent.commitment_hash();
        let poseidon = Poseidon::hashv(&[&[1u8; 31][..]]).unwrap();
        assert_ne!(keccak, poseidon);
    }
}
