use secp256k1::PublicKey;
use zk_primitives::{hash_merge, Element};

use crate::account_id;

/// A deposit waiting to be credited to a new account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    /// Owner of the account to create
    pub public_key: PublicKey,
    /// Initial balance of the account
    pub amount: u64,
}

impl Deposit {
    /// The id of the account this deposit creates
    #[must_use]
    pub fn account_id(&self) -> Element {
        account_id(&self.public_key)
    }

    /// The hash pushed onto the pending deposits commitment
    #[must_use]
    pub fn hash(&self) -> Element {
        hash_merge([self.account_id(), Element::new(self.amount)])
    }
}

/// A stack of deposits, committed to as a hash chain
///
/// Pushing `d` onto commitment `c` gives `hash_merge([d.hash(), c])`, and the empty stack is
/// [`Element::ZERO`]. Deposits are processed from the top, so popping is a matter of restoring
/// the commitment from before the push.
///
/// ```rust
/// # use rollup::*;
/// # use primitives::Signer;
/// let mut pending = PendingDeposits::new();
/// let empty = pending.commitment();
///
/// pending.push(Deposit { public_key: Signer::random().public_key(), amount: 1 });
/// assert_ne!(pending.commitment(), empty);
///
/// pending.pop();
/// assert_eq!(pending.commitment(), empty);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PendingDeposits {
    /// Each deposit, with the commitment from before it was pushed
    stack: Vec<(Deposit, Element)>,
    commitment: Element,
}

impl PendingDeposits {
    /// An empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a deposit, returning the new commitment
    pub fn push(&mut self, deposit: Deposit) -> Element {
        let previous = self.commitment;
        self.commitment = hash_merge([deposit.hash(), previous]);
        self.stack.push((deposit, previous));
        self.commitment
    }

    /// The deposit that will be processed next, with the commitment that remains after it
    #[must_use]
    pub fn peek(&self) -> Option<(&Deposit, Element)> {
        self.stack
            .last()
            .map(|(deposit, previous)| (deposit, *previous))
    }

    /// Remove the top deposit
    pub fn pop(&mut self) -> Option<Deposit> {
        let (deposit, previous) = self.stack.pop()?;
        self.commitment = previous;
        Some(deposit)
    }

    /// The commitment to every pending deposit
    #[must_use]
    pub fn commitment(&self) -> Element {
        self.commitment
    }

    /// The number of pending deposits
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether there is nothing pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
