use std::sync::Arc;

use primitives::{Signature, SignatureVerifier};
use tracing::{debug, info};

use crate::{
    account_id, AccountTree, DepositStep, Error, MergeStep, PendingDeposits, Result,
    RollupAccount, RollupProof, RollupState, RollupTransaction, StateTransition, TransferStep,
};

/// Proves elementary rollup steps, and merges their proofs
///
/// The composer holds no rollup state of its own: the pending deposits and accounts are passed in
/// by the caller, and are only changed once a step has been proven
#[derive(Clone)]
pub struct Composer {
    backend: Arc<dyn zk_circuits::ProofBackend>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl core::fmt::Debug for Composer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Composer").finish_non_exhaustive()
    }
}

impl Composer {
    /// A composer proving with `backend`, and checking transfer signatures with `verifier`
    pub fn new(
        backend: Arc<dyn zk_circuits::ProofBackend>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self { backend, verifier }
    }

    /// The backend proofs are produced and verified with
    #[must_use]
    pub fn backend(&self) -> &dyn zk_circuits::ProofBackend {
        &*self.backend
    }

    /// Credit the top pending deposit to a new account with nonce 0
    #[tracing::instrument(err, skip_all, fields(pending = pending.len()))]
    pub fn process_deposit(
        &self,
        pending: &mut PendingDeposits,
        accounts: &mut AccountTree,
    ) -> Result<RollupProof> {
        let (deposit, remaining) = pending.peek().ok_or(Error::EmptyDepositQueue)?;
        let deposit = *deposit;
        let id = deposit.account_id();

        accounts.ensure_insertable(id).map_err(|err| match err {
            keyed_accumulator::Error::KeyExists(id) => Error::AccountAlreadyExists(id),
            err => err.into(),
        })?;

        let account = RollupAccount::new(deposit.public_key, deposit.amount);
        let path = accounts.path_for(id);

        let transition = StateTransition {
            source: RollupState::of(pending, accounts),
            target: RollupState {
                pending_deposits_commitment: remaining,
                account_db_commitment: path.compute_root_hash(AccountTree::leaf_for(id, &account)),
            },
        };

        let step = DepositStep {
            transition,
            deposit,
            path,
        };
        let proof = self.backend.prove(&step)?;

        accounts.insert(id, account)?;
        pending.pop();

        debug_assert_eq!(RollupState::of(pending, accounts), transition.target);
        info!(account = %id, amount = deposit.amount, "credited deposit");

        Ok(RollupProof::Deposit { transition, proof })
    }

    /// Apply a signed transfer, creating the receiver's account on first receipt
    #[tracing::instrument(err, skip_all, fields(amount = tx.amount, nonce = tx.nonce))]
    pub fn transaction(
        &self,
        tx: &RollupTransaction,
        signature: &Signature,
        pending: &PendingDeposits,
        accounts: &mut AccountTree,
    ) -> Result<RollupProof> {
        if !self.verifier.verify(&tx.from, &tx.message(), signature) {
            return Err(Error::InvalidSignature);
        }

        let sender_id = account_id(&tx.from);
        let sender = *accounts
            .get(sender_id)
            .ok_or(Error::UnknownAccount(sender_id))?;

        if sender.nonce != tx.nonce {
            return Err(Error::NonceMismatch {
                expected: sender.nonce,
                got: tx.nonce,
            });
        }

        let debited = sender
            .debited(tx.amount)
            .ok_or(Error::InsufficientBalance {
                balance: sender.balance,
                amount: tx.amount,
            })?;

        let receiver_id = account_id(&tx.to);
        let receiver = match receiver_id == sender_id {
            true => Some(debited),
            false => accounts.get(receiver_id).copied(),
        };

        let credited = match receiver {
            Some(receiver) => receiver
                .credited(tx.amount)
                .ok_or(Error::BalanceOverflow(receiver_id))?,
            None => {
                accounts.ensure_insertable(receiver_id)?;
                RollupAccount::new(tx.to, tx.amount)
            }
        };

        let source = RollupState::of(pending, accounts);
        let sender_path = accounts.path_for(sender_id);

        // the receiver's path is taken after the sender is updated, so the sender is written now
        // and restored if proving fails
        accounts.upsert(sender_id, debited)?;
        let receiver_path = accounts.path_for(receiver_id);

        let transition = StateTransition {
            source,
            target: RollupState {
                pending_deposits_commitment: source.pending_deposits_commitment,
                account_db_commitment: receiver_path
                    .compute_root_hash(AccountTree::leaf_for(receiver_id, &credited)),
            },
        };

        let step = TransferStep {
            transition,
            tx: *tx,
            signature: signature.clone(),
            verifier: &*self.verifier,
            sender,
            sender_path,
            receiver,
            receiver_path,
        };

        let proof = match self.backend.prove(&step) {
            Ok(proof) => proof,
            Err(err) => {
                accounts.upsert(sender_id, sender)?;
                return Err(err.into());
            }
        };

        accounts.upsert(receiver_id, credited)?;

        debug_assert_eq!(RollupState::of(pending, accounts), transition.target);
        info!(from = %sender_id, to = %receiver_id, "applied transfer");

        Ok(RollupProof::Transfer { transition, proof })
    }

    /// Merge two adjacent proofs into one proving `left.source` to `right.target`
    #[tracing::instrument(err, skip_all, fields(steps = left.steps() + right.steps()))]
    pub fn merge(&self, left: &RollupProof, right: &RollupProof) -> Result<RollupProof> {
        let (l, r) = (left.transition(), right.transition());
        if !l.is_followed_by(&r) {
            return Err(Error::TransitionMismatch {
                left: l.target,
                right: r.source,
            });
        }

        left.verify(&*self.backend).map_err(Error::InvalidProof)?;
        right.verify(&*self.backend).map_err(Error::InvalidProof)?;

        let step = MergeStep {
            left,
            right,
            backend: &*self.backend,
        };
        let transition = step.transition();
        let proof = self.backend.prove(&step)?;

        debug!(steps = left.steps() + right.steps(), "merged");

        Ok(RollupProof::Merge {
            transition,
            proof,
            steps: left.steps() + right.steps(),
        })
    }

    /// Merge a batch in order, one proof at a time
    ///
    /// A single proof is returned as is
    #[tracing::instrument(err, skip_all, fields(proofs = proofs.len()))]
    pub fn compose(&self, proofs: Vec<RollupProof>) -> Result<RollupProof> {
        let mut proofs = proofs.into_iter();
        let first = proofs.next().ok_or(Error::EmptyBatch)?;

        proofs.try_fold(first, |acc, next| self.merge(&acc, &next))
    }

    /// Merge a batch as a balanced tree, with the two halves of each level proven in parallel
    ///
    /// Proves the same transition as [`Composer::compose`]
    #[tracing::instrument(err, skip_all, fields(proofs = proofs.len()))]
    pub fn compose_parallel(&self, proofs: Vec<RollupProof>) -> Result<RollupProof> {
        self.reduce(&proofs)
    }

    fn reduce(&self, proofs: &[RollupProof]) -> Result<RollupProof> {
        match proofs {
            [] => Err(Error::EmptyBatch),
            [single] => Ok(single.clone()),
            _ => {
                let (left, right) = proofs.split_at(proofs.len() / 2);
                let (left, right) = rayon::join(|| self.reduce(left), || self.reduce(right));

                self.merge(&left?, &right?)
            }
        }
    }
}
