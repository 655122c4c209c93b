use std::{sync::Arc, time::Instant};

use eyre::{ensure, Result};
use primitives::{Secp256k1Verifier, Signer};
use rand::Rng;
use rollup::{account_id, Composer, RollupTransaction, RollupWorld};
use serde_json::json;
use tracing::info;
use zk_circuits::TranscriptBackend;

use crate::args::RollupArgs;

pub fn run(args: &RollupArgs) -> Result<()> {
    ensure!(args.accounts >= 2, "need at least two accounts to transfer between");

    let mut rng = rand::thread_rng();
    let composer = Composer::new(
        Arc::new(TranscriptBackend::random(&mut rng)),
        Arc::new(Secp256k1Verifier),
    );

    let signers: Vec<_> = (0..args.accounts).map(|_| Signer::random()).collect();

    let mut world = RollupWorld::new();
    for signer in &signers {
        world.deposit(signer.public_key(), args.balance);
    }

    let start = world.state();
    let mut proofs = Vec::with_capacity(args.accounts + args.transfers);

    while !world.pending.is_empty() {
        proofs.push(world.process_deposit(&composer)?);
    }

    for _ in 0..args.transfers {
        let from = &signers[rng.gen_range(0..signers.len())];
        let to = &signers[rng.gen_range(0..signers.len())];

        let sender = world
            .accounts
            .get(account_id(&from.public_key()))
            .copied()
            .ok_or_else(|| eyre::eyre!("sender has no account"))?;
        let amount = rng.gen_range(0..=sender.balance / 2);

        let tx = RollupTransaction::new(from.public_key(), to.public_key(), amount, sender.nonce);
        proofs.push(world.transaction(&composer, &tx, &tx.sign(from))?);
    }

    info!(steps = proofs.len(), "proved every step");

    let timer = Instant::now();
    let sequential = composer.compose(proofs.clone())?;
    let sequential_time = timer.elapsed();

    let timer = Instant::now();
    let parallel = composer.compose_parallel(proofs)?;
    let parallel_time = timer.elapsed();

    ensure!(
        sequential.transition() == parallel.transition(),
        "sequential and parallel composition disagree"
    );
    ensure!(sequential.transition().source == start, "batch does not start at the initial state");
    ensure!(sequential.transition().target == world.state(), "batch does not end at the current state");

    let summary = json!({
        "steps": parallel.steps(),
        "transition": parallel.transition(),
        "world_commitment": {
            "source": start.world_commitment(),
            "target": world.state().world_commitment(),
        },
        "sequential_secs": sequential_time.as_secs_f64(),
        "parallel_secs": parallel_time.as_secs_f64(),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
