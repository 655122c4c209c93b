use accumulator::{Accumulator, MembershipWitness};
use rand::{CryptoRng, RngCore};
use zk_circuits::{
    data::{InputNote, Keypair, Note, Transaction},
    ProofBackend, UTXO_INPUTS, UTXO_OUTPUTS,
};
use zk_primitives::Element;

use crate::{Error, ExtData, Result, ShieldedTransaction};

/// A read-only copy of the pool's accumulator, taken at one root
///
/// Transactions are built against a snapshot, so building never blocks acceptance
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    tree: Accumulator,
    max_deposit_amount: u64,
}

impl PoolSnapshot {
    /// A snapshot of `tree`, enforcing `max_deposit_amount`
    #[must_use]
    pub fn new(tree: Accumulator, max_deposit_amount: u64) -> Self {
        Self {
            tree,
            max_deposit_amount,
        }
    }

    /// The root every witness from this snapshot is against
    #[must_use]
    pub fn root(&self) -> Element {
        self.tree.root()
    }

    /// The number of commitments in the accumulator
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.tree.next_index()
    }

    /// The membership witness for the commitment at `index`
    pub fn witness(&self, index: u64) -> Result<MembershipWitness> {
        Ok(self.tree.get_path(index)?)
    }

    pub(crate) fn check_deposit(&self, amount: u64) -> Result<()> {
        match amount > self.max_deposit_amount {
            true => Err(Error::DepositLimitExceeded {
                amount,
                max: self.max_deposit_amount,
            }),
            false => Ok(()),
        }
    }

    /// Find `note` in the accumulator and pair it with its witness
    ///
    /// A note with an index must be at that index. A note without one is looked up by its
    /// commitment. Zero-amount notes that can't be found are spent as padding.
    fn spendable(&self, note: Note, keypair: Keypair) -> Result<InputNote> {
        let commitment = note.commitment();

        let index = match note.index {
            Some(index) => (self.tree.leaf(index) == Some(commitment)).then_some(index),
            None => self.tree.position_of(commitment),
        };

        match index {
            Some(index) => {
                let witness = self.tree.get_path(index)?;
                Ok(InputNote::new(note.with_index(index), keypair, witness))
            }
            None if note.is_padding() => Ok(InputNote {
                note,
                keypair,
                witness: None,
            }),
            None => Err(Error::UnknownInput(commitment)),
        }
    }
}

/// Collects up to two inputs, up to two outputs and the external data of a transaction, then
/// proves it
///
/// ```rust
/// # use shielded_pool::*;
/// # use accumulator::Accumulator;
/// # use zk_circuits::{data::{Keypair, Note}, TranscriptBackend};
/// let mut rng = rand::thread_rng();
/// let backend = TranscriptBackend::random(&mut rng);
/// let snapshot = PoolSnapshot::new(Accumulator::new(8, 4).unwrap(), 1_000);
///
/// let alice = Keypair::random(&mut rng);
/// let note = Note::new(alice.public_key, 100, &mut rng);
///
/// let tx = TransactionBuilder::new(ExtData::deposit(100))
///     .output(note.clone())
///     .build(&snapshot, &backend, &mut rng)
///     .unwrap();
///
/// assert_eq!(tx.commitments()[0], note.commitment());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<(Note, Keypair)>,
    outputs: Vec<Note>,
    ext_data: ExtData,
}

impl TransactionBuilder {
    /// An empty transaction with this external data
    #[must_use]
    pub fn new(ext_data: ExtData) -> Self {
        Self {
            ext_data,
            ..Self::default()
        }
    }

    /// Spend `note` with `keypair`
    #[must_use]
    pub fn input(mut self, note: Note, keypair: Keypair) -> Self {
        self.inputs.push((note, keypair));
        self
    }

    /// Create `note`
    #[must_use]
    pub fn output(mut self, note: Note) -> Self {
        self.outputs.push(note);
        self
    }

    /// Check, pad and prove the transaction
    ///
    /// Missing inputs and outputs are filled with zero-amount notes, each with a fresh key and
    /// blinding. Nothing in `snapshot` is modified.
    pub fn build(
        self,
        snapshot: &PoolSnapshot,
        backend: &dyn ProofBackend,
        mut rng: impl RngCore + CryptoRng,
    ) -> Result<ShieldedTransaction> {
        let Self {
            inputs,
            outputs,
            ext_data,
        } = self;

        if inputs.len() > UTXO_INPUTS || outputs.len() > UTXO_OUTPUTS {
            return Err(Error::TooManyNotes {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        ext_data.validate()?;
        snapshot.check_deposit(ext_data.deposit)?;
        check_balance(
            inputs.iter().map(|(note, _)| u128::from(note.amount)).sum(),
            outputs.iter().map(|note| u128::from(note.amount)).sum(),
            &ext_data,
        )?;

        let mut inputs = inputs
            .into_iter()
            .map(|(note, keypair)| snapshot.spendable(note, keypair))
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let mut outputs = outputs.into_iter();

        let inputs: [InputNote; UTXO_INPUTS] = core::array::from_fn(|_| {
            inputs
                .next()
                .unwrap_or_else(|| InputNote::padding(&mut rng))
        });
        let outputs: [Note; UTXO_OUTPUTS] =
            core::array::from_fn(|_| outputs.next().unwrap_or_else(|| Note::padding(&mut rng)));

        let tx = Transaction::new(
            inputs,
            outputs,
            snapshot.root(),
            ext_data.public_amount(),
            ext_data.hash(),
        );

        let proof = backend.prove(&tx)?;

        Ok(ShieldedTransaction {
            proof,
            public_inputs: tx.public(),
            ext_data,
        })
    }
}

/// `inputs + deposit == outputs + withdrawal + fee`, in u128 so nothing can overflow
fn check_balance(inputs: u128, outputs: u128, ext_data: &ExtData) -> Result<()> {
    let ExtData {
        withdrawal,
        deposit,
        fee,
        ..
    } = *ext_data;

    let credit = inputs + u128::from(deposit);
    let debit = outputs + u128::from(withdrawal) + u128::from(fee);

    match credit == debit {
        true => Ok(()),
        false => Err(Error::UnbalancedTransaction {
            inputs,
            outputs,
            deposit,
            withdrawal,
            fee,
        }),
    }
}
