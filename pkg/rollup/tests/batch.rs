use std::sync::Arc;

use primitives::{Secp256k1Verifier, Signer};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use rollup::*;
use zk_circuits::{CircuitKind, TranscriptBackend};

fn composer() -> Composer {
    let backend = TranscriptBackend::random(ChaChaRng::seed_from_u64(42));
    Composer::new(Arc::new(backend), Arc::new(Secp256k1Verifier))
}

fn transfer(
    world: &mut RollupWorld,
    composer: &Composer,
    from: &Signer,
    to: &Signer,
    amount: u64,
) -> RollupProof {
    let nonce = world
        .accounts
        .get(account_id(&from.public_key()))
        .map_or(0, |account| account.nonce);

    let tx = RollupTransaction::new(from.public_key(), to.public_key(), amount, nonce);
    world.transaction(composer, &tx, &tx.sign(from)).unwrap()
}

#[test]
fn batch_of_deposits_and_transfers() {
    let composer = composer();
    let users: Vec<_> = (0..4).map(|_| Signer::random()).collect();

    let mut world = RollupWorld::new();
    for (i, user) in users.iter().enumerate().take(3) {
        world.deposit(user.public_key(), 100 * (i as u64 + 1));
    }

    let start = world.state();
    let mut proofs = Vec::new();

    while !world.pending.is_empty() {
        proofs.push(world.process_deposit(&composer).unwrap());
    }

    proofs.push(transfer(&mut world, &composer, &users[0], &users[1], 50));
    proofs.push(transfer(&mut world, &composer, &users[1], &users[3], 120));
    proofs.push(transfer(&mut world, &composer, &users[2], &users[0], 300));
    proofs.push(transfer(&mut world, &composer, &users[3], &users[3], 20));

    let balances: Vec<_> = users
        .iter()
        .map(|user| world.accounts.get(account_id(&user.public_key())).unwrap().balance)
        .collect();
    assert_eq!(balances, [350, 130, 0, 120]);
    assert_eq!(balances.iter().sum::<u64>(), 600);

    let sequential = composer.compose(proofs.clone()).unwrap();
    let parallel = composer.compose_parallel(proofs).unwrap();

    let expected = StateTransition {
        source: start,
        target: world.state(),
    };
    assert_eq!(sequential.transition(), expected);
    assert_eq!(parallel.transition(), expected);
    assert_eq!(sequential.kind(), CircuitKind::RollupMerge);
    assert_eq!(sequential.steps(), 7);

    // every deposit was consumed
    assert_eq!(
        expected.target.pending_deposits_commitment,
        PendingDeposits::new().commitment()
    );

    sequential.verify(composer.backend()).unwrap();
    parallel.verify(composer.backend()).unwrap();
}

#[test]
fn proofs_survive_json() {
    let composer = composer();
    let alice = Signer::random();

    let mut world = RollupWorld::new();
    world.deposit(alice.public_key(), 10);
    let proof = world.process_deposit(&composer).unwrap();

    let json = serde_json::to_value(&proof).unwrap();
    assert_eq!(json["type"], "deposit");

    let decoded: RollupProof = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, proof);
    decoded.verify(composer.backend()).unwrap();
}

#[test]
fn a_failed_step_does_not_break_the_chain() {
    let composer = composer();
    let (alice, bob) = (Signer::random(), Signer::random());

    let mut world = RollupWorld::new();
    world.deposit(alice.public_key(), 10);

    let deposit = world.process_deposit(&composer).unwrap();

    let greedy = RollupTransaction::new(alice.public_key(), bob.public_key(), 11, 0);
    assert!(world
        .transaction(&composer, &greedy, &greedy.sign(&alice))
        .is_err());

    let ok = transfer(&mut world, &composer, &alice, &bob, 10);

    let batch = composer.compose(vec![deposit, ok]).unwrap();
    assert_eq!(batch.transition().target, world.state());
}
