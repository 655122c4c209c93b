use std::sync::Arc;

use accumulator::Accumulator;
use primitives::Address;
use tokio::sync::RwLock;
use tracing::{info, warn};
use zk_circuits::{data::Note, CircuitKind, ProofBackend};
use zk_primitives::Element;

use crate::{
    BridgedDeposit, DepositEvent, DepositSource, Error, ExtData, ExternalError, Ledger, NullifierSet,
    PoolConfig, PoolEvent, PoolSnapshot, Receipt, Result, ShieldedTransaction, WithdrawalSink,
};

/// A shielded pool
///
/// All state sits behind one [`RwLock`]. [`Pool::accept`] holds the write lock from its first
/// check until the transaction is applied, so transactions are applied one at a time, and either
/// fully or not at all. Snapshots and read accessors only take the read lock.
pub struct Pool {
    config: PoolConfig,
    state: RwLock<PoolState>,
    backend: Arc<dyn ProofBackend>,
    source: Arc<dyn DepositSource>,
    sink: Arc<dyn WithdrawalSink>,
}

#[derive(Debug)]
struct PoolState {
    tree: Accumulator,
    nullifiers: NullifierSet,
    /// Value held in custody, i.e. unspent notes plus fees
    balance: u64,
    fees: u64,
}

/// Where the deposit of an accepted transaction comes from
#[derive(Debug, Clone, Copy)]
enum Funding {
    /// Pulled from this address by the [`DepositSource`]
    Pull(Address),
    /// Already moved into custody by a bridge
    Bridged,
}

impl Pool {
    /// Create an empty pool
    pub fn new(
        config: PoolConfig,
        backend: Arc<dyn ProofBackend>,
        source: Arc<dyn DepositSource>,
        sink: Arc<dyn WithdrawalSink>,
    ) -> Result<Self> {
        config.validate()?;

        let state = PoolState {
            tree: Accumulator::new(config.tree_height, config.root_history_size)?,
            nullifiers: NullifierSet::new(),
            balance: 0,
            fees: 0,
        };

        Ok(Self {
            config,
            state: RwLock::new(state),
            backend,
            source,
            sink,
        })
    }

    /// Create an empty pool whose deposits and withdrawals go through `ledger`
    pub fn with_ledger(
        config: PoolConfig,
        backend: Arc<dyn ProofBackend>,
        ledger: Arc<Ledger>,
    ) -> Result<Self> {
        Self::new(config, backend, ledger.clone(), ledger)
    }

    /// The configuration this pool was created with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// A copy of the accumulator to build transactions against
    pub async fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.read().await;
        PoolSnapshot::new(state.tree.clone(), self.config.max_deposit_amount)
    }

    /// The current root
    pub async fn root(&self) -> Element {
        self.state.read().await.tree.root()
    }

    /// Every root a transaction may currently be built against, newest first
    pub async fn root_history(&self) -> Vec<Element> {
        self.state.read().await.tree.history().iter().collect()
    }

    /// Whether `root` is the current root or one of the recent roots
    pub async fn known_root(&self, root: Element) -> bool {
        self.state.read().await.tree.known_root(root)
    }

    /// The index the next commitment will be inserted at
    pub async fn next_index(&self) -> u64 {
        self.state.read().await.tree.next_index()
    }

    /// Whether `nullifier` has been revealed
    pub async fn is_spent(&self, nullifier: Element) -> bool {
        self.state.read().await.nullifiers.is_spent(nullifier)
    }

    /// The value held in custody
    pub async fn balance(&self) -> u64 {
        self.state.read().await.balance
    }

    /// The fees collected so far, included in [`Pool::balance`]
    pub async fn fees(&self) -> u64 {
        self.state.read().await.fees
    }

    /// Check and apply `tx`, pulling any deposit from `sender`
    ///
    /// Nothing is changed unless every check passes and the external transfer succeeds
    #[tracing::instrument(err, skip(self, tx), fields(nullifiers = ?tx.nullifiers()))]
    pub async fn accept(&self, tx: &ShieldedTransaction, sender: Address) -> Result<Receipt> {
        self.apply(tx, Funding::Pull(sender)).await
    }

    /// Apply the transaction carried by a bridged deposit
    ///
    /// The funds are already in custody, so nothing is pulled. The transaction must deposit exactly
    /// the bridged amount.
    #[tracing::instrument(err, skip(self, event), fields(owner = %event.owner, amount = event.amount))]
    pub async fn on_deposit_bridged(&self, event: DepositEvent) -> Result<Receipt> {
        let BridgedDeposit {
            transaction: tx,
            blinding,
        } = BridgedDeposit::from_bytes(&event.extra_data)?;

        if tx.ext_data.deposit != event.amount || tx.ext_data.withdrawal != 0 {
            return Err(Error::invalid_ext_data(format!(
                "bridged {} but the transaction deposits {}",
                event.amount, tx.ext_data.deposit
            )));
        }

        // the whole amount must land in one note owned by `event.owner`
        let expected = Note::restore(event.owner, event.amount, blinding).commitment();
        if !tx.commitments().contains(&expected) {
            return Err(Error::invalid_ext_data(format!(
                "no output of the bridged transaction is a note of {} for {}",
                event.amount, event.owner
            )));
        }

        self.apply(&tx, Funding::Bridged).await
    }

    async fn apply(&self, tx: &ShieldedTransaction, funding: Funding) -> Result<Receipt> {
        let mut state = self.state.write().await;

        let totals = self.validate(&state, tx)?;
        self.external_leg(&tx.ext_data, funding).await?;

        let receipt = state.commit(tx, totals)?;
        info!(
            root = %receipt.root,
            first_index = receipt.output_indices[0],
            "accepted transaction"
        );

        Ok(receipt)
    }

    fn validate(&self, state: &PoolState, tx: &ShieldedTransaction) -> Result<Totals> {
        let ext_data = &tx.ext_data;
        let public = &tx.public_inputs;

        ext_data.validate()?;

        if public.ext_data_hash != ext_data.hash() {
            return Err(Error::invalid_ext_data("ext data hash does not match proof"));
        }

        if public.public_amount != ext_data.public_amount() {
            return Err(Error::invalid_ext_data("public amount does not match proof"));
        }

        state.tree.check_root(public.root)?;

        if ext_data.deposit > self.config.max_deposit_amount {
            return Err(Error::DepositLimitExceeded {
                amount: ext_data.deposit,
                max: self.config.max_deposit_amount,
            });
        }

        self.backend
            .verify(CircuitKind::Transaction, &public.to_vec(), &tx.proof)
            .map_err(Error::InvalidProof)?;

        if let Err(err) = state.nullifiers.ensure_unspent(&public.nullifiers) {
            warn!(?err, "double spend attempt");
            return Err(err);
        }

        state.tree.ensure_capacity(2)?;

        state.totals_after(ext_data)
    }

    async fn external_leg(&self, ext_data: &ExtData, funding: Funding) -> Result<()> {
        let timeout = self.config.external_transfer_timeout();

        let transfer = async {
            if let (Funding::Pull(from), true) = (funding, ext_data.deposit > 0) {
                self.source.pull(from, ext_data.deposit).await?;
            }

            if ext_data.withdrawal > 0 {
                self.sink
                    .release(ext_data.recipient, ext_data.withdrawal)
                    .await?;
            }

            Ok::<_, ExternalError>(())
        };

        tokio::time::timeout(timeout, transfer)
            .await
            .map_err(|_| ExternalError::Timeout(timeout))??;

        Ok(())
    }
}

/// The custody counters after a transaction, computed before anything is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Totals {
    balance: u64,
    fees: u64,
}

impl PoolState {
    fn totals_after(&self, ext_data: &ExtData) -> Result<Totals> {
        let ExtData {
            withdrawal,
            deposit,
            fee,
            ..
        } = *ext_data;

        let out_of_range = || Error::BalanceOutOfRange {
            balance: self.balance,
            fees: self.fees,
            deposit,
            withdrawal,
            fee,
        };

        let balance = self
            .balance
            .checked_add(deposit)
            .and_then(|balance| balance.checked_sub(withdrawal))
            .ok_or_else(out_of_range)?;
        let fees = self.fees.checked_add(fee).ok_or_else(out_of_range)?;

        Ok(Totals { balance, fees })
    }

    /// Apply a transaction that has passed every check
    fn commit(&mut self, tx: &ShieldedTransaction, totals: Totals) -> Result<Receipt> {
        let nullifiers = tx.nullifiers();
        let commitments = tx.commitments();

        // capacity was checked under the same lock, and a failed insert changes nothing
        let first = self.tree.insert_batch(commitments)?;

        self.nullifiers.mark_all(&nullifiers);

        self.balance = totals.balance;
        self.fees = totals.fees;

        let output_indices = [first, first + 1];

        let events = nullifiers
            .iter()
            .map(|&nullifier| PoolEvent::NewNullifier { nullifier })
            .chain(
                commitments
                    .iter()
                    .zip(output_indices)
                    .map(|(&commitment, index)| PoolEvent::NewCommitment { commitment, index }),
            )
            .collect();

        Ok(Receipt {
            output_indices,
            root: self.tree.root(),
            nullifiers,
            events,
        })
    }
}
