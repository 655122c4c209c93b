use std::sync::Arc;

use eyre::{bail, eyre, Result};
use primitives::Address;
use serde_json::json;
use shielded_pool::{Error, ExtData, Ledger, Pool, PoolConfig, TransactionBuilder};
use tracing::{info, warn};
use zk_circuits::{
    data::{Keypair, Note},
    TranscriptBackend,
};

use crate::args::SimulateArgs;

const DEPOSITOR: Address = Address::new([0xa1; 20]);

pub async fn run(config: PoolConfig, args: SimulateArgs) -> Result<()> {
    let SimulateArgs {
        deposit,
        withdrawal,
        fee,
        recipient,
    } = args;

    let change_amount = deposit
        .checked_sub(withdrawal)
        .and_then(|rest| rest.checked_sub(fee))
        .ok_or_else(|| eyre!("withdrawal {withdrawal} and fee {fee} exceed deposit {deposit}"))?;

    let mut rng = rand::thread_rng();
    let backend = Arc::new(TranscriptBackend::random(&mut rng));
    let ledger = Arc::new(Ledger::new());
    let pool = Pool::with_ledger(config, backend.clone(), ledger.clone())?;

    ledger.fund(DEPOSITOR, deposit);
    let owner = Keypair::random(&mut rng);

    let note = Note::new(owner.public_key, deposit, &mut rng);
    let tx = TransactionBuilder::new(ExtData::deposit(deposit))
        .output(note.clone())
        .build(&pool.snapshot().await, &*backend, &mut rng)?;

    let receipt = pool.accept(&tx, DEPOSITOR).await?;
    let note = note.with_index(receipt.output_indices[0]);
    info!(root = %receipt.root, index = receipt.output_indices[0], "deposited");

    let change = Note::new(owner.public_key, change_amount, &mut rng);
    let tx = TransactionBuilder::new(ExtData::withdrawal(recipient, withdrawal).with_fee(fee))
        .input(note, owner.clone())
        .output(change)
        .build(&pool.snapshot().await, &*backend, &mut rng)?;

    let receipt = pool.accept(&tx, DEPOSITOR).await?;
    info!(root = %receipt.root, %recipient, withdrawal, "withdrew");

    match pool.accept(&tx, DEPOSITOR).await {
        Err(Error::AlreadySpent(nullifier)) => warn!(%nullifier, "replay rejected"),
        Err(err) => bail!("replay failed for the wrong reason: {err}"),
        Ok(_) => bail!("replayed withdrawal was accepted"),
    }

    let summary = json!({
        "root": pool.root().await,
        "next_index": pool.next_index().await,
        "pool_balance": pool.balance().await,
        "fees": pool.fees().await,
        "custody": ledger.custody(),
        "depositor_balance": ledger.balance_of(DEPOSITOR),
        "recipient_balance": ledger.balance_of(recipient),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
