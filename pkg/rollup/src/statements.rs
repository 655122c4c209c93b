//! The statements behind each [`RollupProof`](crate::RollupProof)
//!
//! Each statement holds the witness for one step, and its constraints tie the step's
//! [`StateTransition`] to that witness. A merge step is the recursive case: its witness is the
//! two child proofs, and its constraints verify them.

use keyed_accumulator::Path;
use primitives::{Signature, SignatureVerifier};
use zk_circuits::{CircuitKind, Error, ProofBackend, Provable, Result};
use zk_primitives::{hash_bytes, hash_merge, Element};

use crate::{
    account_id, AccountTree, Deposit, RollupAccount, RollupProof, RollupTransaction,
    StateTransition, ACCOUNT_TREE_DEPTH,
};

fn constraint(message: &str) -> Error {
    Error::Constraint(message.to_string())
}

fn require(condition: bool, message: &str) -> Result<()> {
    match condition {
        true => Ok(()),
        false => Err(constraint(message)),
    }
}

/// The top pending deposit becomes a new account
#[derive(Debug, Clone)]
pub struct DepositStep {
    /// The claimed transition
    pub transition: StateTransition,
    /// The deposit being credited
    pub deposit: Deposit,
    /// The path to the new account's leaf in the source tree
    pub path: Path<ACCOUNT_TREE_DEPTH>,
}

impl Provable for DepositStep {
    fn kind(&self) -> CircuitKind {
        CircuitKind::RollupDeposit
    }

    fn public_inputs(&self) -> Vec<Element> {
        self.transition.public_inputs()
    }

    fn private_inputs(&self) -> Vec<Element> {
        let mut inputs = vec![self.deposit.account_id(), Element::new(self.deposit.amount)];
        inputs.extend(&self.path.siblings);
        inputs
    }

    fn check_constraints(&self) -> Result<()> {
        let StateTransition { source, target } = self.transition;
        let id = self.deposit.account_id();

        require(
            source.pending_deposits_commitment
                == hash_merge([self.deposit.hash(), target.pending_deposits_commitment]),
            "deposit is not the top of the pending stack",
        )?;

        require(
            self.path.key == id && self.path.root_hash == source.account_db_commitment,
            "account path is not for the source tree",
        )?;
        require(self.path.proves_absent(), "account already exists")?;

        let account = RollupAccount::new(self.deposit.public_key, self.deposit.amount);
        let leaf = AccountTree::leaf_for(id, &account);

        require(
            self.path.compute_root_hash(leaf) == target.account_db_commitment,
            "target accounts do not contain the new account",
        )
    }
}

/// A signed transfer from one account to another
///
/// The signature over the transfer is part of the witness, so only the sender's key can produce
/// a provable statement. The sender is updated first, giving an intermediate root, and the
/// receiver's path is taken against that intermediate root. This also covers an account sending
/// to itself.
#[derive(Clone)]
pub struct TransferStep<'a> {
    /// The claimed transition
    pub transition: StateTransition,
    /// The transfer
    pub tx: RollupTransaction,
    /// The sender's signature over [`RollupTransaction::message`]
    pub signature: Signature,
    /// Checks `signature` against the sender's public key
    pub verifier: &'a dyn SignatureVerifier,
    /// The sender's account in the source tree
    pub sender: RollupAccount,
    /// The path to the sender in the source tree
    pub sender_path: Path<ACCOUNT_TREE_DEPTH>,
    /// The receiver's account after the sender was updated, if it exists
    pub receiver: Option<RollupAccount>,
    /// The path to the receiver after the sender was updated
    pub receiver_path: Path<ACCOUNT_TREE_DEPTH>,
}

impl Provable for TransferStep<'_> {
    fn kind(&self) -> CircuitKind {
        CircuitKind::RollupTransfer
    }

    fn public_inputs(&self) -> Vec<Element> {
        self.transition.public_inputs()
    }

    fn private_inputs(&self) -> Vec<Element> {
        let receiver = self.receiver.unwrap_or(RollupAccount::new(self.tx.to, 0));

        let mut inputs = vec![
            Element::new(self.tx.amount),
            Element::from(self.tx.nonce),
            Element::new(self.sender.balance),
            Element::from(self.sender.nonce),
            Element::new(receiver.balance),
            Element::from(receiver.nonce),
            Element::from(self.receiver.is_some()),
            hash_bytes(&self.signature.0),
        ];
        inputs.extend(&self.sender_path.siblings);
        inputs.extend(&self.receiver_path.siblings);
        inputs
    }

    fn check_constraints(&self) -> Result<()> {
        let StateTransition { source, target } = self.transition;
        let tx = &self.tx;

        require(
            self.verifier.verify(&tx.from, &tx.message(), &self.signature),
            "transfer is not signed by the sender",
        )?;

        require(
            source.pending_deposits_commitment == target.pending_deposits_commitment,
            "a transfer cannot touch pending deposits",
        )?;

        let sender_id = account_id(&tx.from);
        require(
            self.sender.public_key == tx.from
                && self.sender_path.key == sender_id
                && self.sender_path.root_hash == source.account_db_commitment
                && self.sender_path.proves(&self.sender),
            "sender is not in the source tree",
        )?;
        require(self.sender.nonce == tx.nonce, "nonce mismatch")?;

        let sender = self
            .sender
            .debited(tx.amount)
            .ok_or_else(|| constraint("insufficient balance"))?;
        let intermediate = self
            .sender_path
            .compute_root_hash(AccountTree::leaf_for(sender_id, &sender));

        let receiver_id = account_id(&tx.to);
        require(
            self.receiver_path.key == receiver_id && self.receiver_path.root_hash == intermediate,
            "receiver path is not for the intermediate tree",
        )?;

        let receiver = match self.receiver {
            Some(receiver) => {
                require(
                    receiver.public_key == tx.to && self.receiver_path.proves(&receiver),
                    "receiver is not in the intermediate tree",
                )?;
                receiver
                    .credited(tx.amount)
                    .ok_or_else(|| constraint("receiver balance overflow"))?
            }
            None => {
                require(self.receiver_path.proves_absent(), "receiver already exists")?;
                RollupAccount::new(tx.to, tx.amount)
            }
        };

        require(
            self.receiver_path
                .compute_root_hash(AccountTree::leaf_for(receiver_id, &receiver))
                == target.account_db_commitment,
            "target accounts do not match the transfer",
        )
    }
}

impl core::fmt::Debug for TransferStep<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransferStep")
            .field("transition", &self.transition)
            .field("tx", &self.tx)
            .field("signature", &self.signature)
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}

/// Two adjacent proofs, folded into one
pub struct MergeStep<'a> {
    /// The earlier proof
    pub left: &'a RollupProof,
    /// The later proof, starting where `left` ends
    pub right: &'a RollupProof,
    /// Verifies the children
    pub backend: &'a dyn ProofBackend,
}

impl MergeStep<'_> {
    /// The transition proven by the merged proof
    #[must_use]
    pub fn transition(&self) -> StateTransition {
        StateTransition {
            source: self.left.transition().source,
            target: self.right.transition().target,
        }
    }
}

impl Provable for MergeStep<'_> {
    fn kind(&self) -> CircuitKind {
        CircuitKind::RollupMerge
    }

    fn public_inputs(&self) -> Vec<Element> {
        self.transition().public_inputs()
    }

    fn private_inputs(&self) -> Vec<Element> {
        let mut inputs = self.left.transition().public_inputs();
        inputs.extend(self.right.transition().public_inputs());
        inputs
    }

    fn check_constraints(&self) -> Result<()> {
        require(
            self.left.transition().is_followed_by(&self.right.transition()),
            "transitions are not adjacent",
        )?;

        self.left.verify(self.backend)?;
        self.right.verify(self.backend)
    }
}

impl core::fmt::Debug for MergeStep<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MergeStep")
            .field("left", self.left)
            .field("right", self.right)
            .finish_non_exhaustive()
    }
}
