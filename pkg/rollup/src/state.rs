use borsh::{BorshDeserialize, BorshSerialize};
use primitives::Signature;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use zk_primitives::{hash_merge, Element};

use crate::{
    AccountTree, Composer, Deposit, PendingDeposits, Result, RollupProof, RollupTransaction,
};

/// The public commitments to the rollup state
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct RollupState {
    /// Commitment to the [`PendingDeposits`] stack
    pub pending_deposits_commitment: Element,
    /// Root hash of the [`AccountTree`]
    pub account_db_commitment: Element,
}

impl RollupState {
    /// The state of a pending deposits stack and an account tree
    #[must_use]
    pub fn of(pending: &PendingDeposits, accounts: &AccountTree) -> Self {
        Self {
            pending_deposits_commitment: pending.commitment(),
            account_db_commitment: accounts.root_hash(),
        }
    }

    /// A single commitment to the whole state
    #[must_use]
    pub fn world_commitment(&self) -> Element {
        hash_merge([self.pending_deposits_commitment, self.account_db_commitment])
    }
}

/// A move from one [`RollupState`] to another
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct StateTransition {
    /// The state before
    pub source: RollupState,
    /// The state after
    pub target: RollupState,
}

impl StateTransition {
    /// Public inputs of every rollup circuit: the source commitments, then the target commitments
    #[must_use]
    pub fn public_inputs(&self) -> Vec<Element> {
        vec![
            self.source.pending_deposits_commitment,
            self.source.account_db_commitment,
            self.target.pending_deposits_commitment,
            self.target.account_db_commitment,
        ]
    }

    /// Whether `next` starts where this ends
    #[must_use]
    pub fn is_followed_by(&self, next: &Self) -> bool {
        self.target == next.source
    }
}

/// The full rollup state, owned by whoever sequences the rollup
///
/// Every operation here is all-or-nothing: on error, the pending deposits and the accounts are
/// exactly as they were
#[derive(Debug, Clone, Default)]
pub struct RollupWorld {
    /// Deposits that have not been credited yet
    pub pending: PendingDeposits,
    /// Every account
    pub accounts: AccountTree,
}

impl RollupWorld {
    /// An empty rollup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current public state
    #[must_use]
    pub fn state(&self) -> RollupState {
        RollupState::of(&self.pending, &self.accounts)
    }

    /// Queue a deposit that will create an account for `public_key`
    pub fn deposit(&mut self, public_key: PublicKey, amount: u64) -> Element {
        self.pending.push(Deposit { public_key, amount })
    }

    /// Credit the next pending deposit, see [`Composer::process_deposit`]
    pub fn process_deposit(&mut self, composer: &Composer) -> Result<RollupProof> {
        composer.process_deposit(&mut self.pending, &mut self.accounts)
    }

    /// Apply a signed transfer, see [`Composer::transaction`]
    pub fn transaction(
        &mut self,
        composer: &Composer,
        tx: &RollupTransaction,
        signature: &Signature,
    ) -> Result<RollupProof> {
        composer.transaction(tx, signature, &self.pending, &mut self.accounts)
    }
}

#[cfg(test)]
mod tests {
    use primitives::Signer;

    use super::*;

    #[test]
    fn empty_world() {
        let world = RollupWorld::new();
        let state = world.state();

        assert_eq!(state.pending_deposits_commitment, Element::ZERO);
        assert_eq!(state.account_db_commitment, AccountTree::new().root_hash());
        assert_eq!(
            state.world_commitment(),
            hash_merge([Element::ZERO, AccountTree::new().root_hash()])
        );
    }

    #[test]
    fn deposit_changes_pending_commitment_only() {
        let mut world = RollupWorld::new();
        let before = world.state();

        let commitment = world.deposit(Signer::random().public_key(), 10);
        let after = world.state();

        assert_eq!(after.pending_deposits_commitment, commitment);
        assert_ne!(after.pending_deposits_commitment, before.pending_deposits_commitment);
        assert_eq!(after.account_db_commitment, before.account_db_commitment);
        assert_ne!(after.world_commitment(), before.world_commitment());
    }

    #[test]
    fn public_inputs_order() {
        let a = RollupState {
            pending_deposits_commitment: Element::new(1),
            account_db_commitment: Element::new(2),
        };
        let b = RollupState {
            pending_deposits_commitment: Element::new(3),
            account_db_commitment: Element::new(4),
        };

        let transition = StateTransition { source: a, target: b };
        assert_eq!(
            transition.public_inputs(),
            [1, 2, 3, 4].map(Element::new).to_vec()
        );

        assert!(transition.is_followed_by(&StateTransition { source: b, target: a }));
        assert!(!transition.is_followed_by(&transition));
    }
}
