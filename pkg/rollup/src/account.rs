use keyed_accumulator::{LeafHash, Tree};
use secp256k1::PublicKey;
use zk_primitives::{hash_bytes, hash_merge, Element};

/// Depth of the account tree
pub const ACCOUNT_TREE_DEPTH: usize = 64;

/// Accounts keyed by [`account_id`]
pub type AccountTree = Tree<ACCOUNT_TREE_DEPTH, RollupAccount>;

/// The account id of a public key: a hash of its compressed encoding
#[must_use]
pub fn account_id(public_key: &PublicKey) -> Element {
    hash_bytes(&public_key.serialize())
}

/// A plain rollup account
///
/// The public key is implied by the account id, so only the balance and nonce are committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupAccount {
    /// Spendable balance
    pub balance: u64,
    /// The nonce the next outgoing transaction must carry
    pub nonce: u32,
    /// The key that signs outgoing transactions
    pub public_key: PublicKey,
}

impl RollupAccount {
    /// A fresh account with nonce 0
    #[must_use]
    pub fn new(public_key: PublicKey, balance: u64) -> Self {
        Self {
            balance,
            nonce: 0,
            public_key,
        }
    }

    /// This account's key in the [`AccountTree`]
    #[must_use]
    pub fn id(&self) -> Element {
        account_id(&self.public_key)
    }

    /// The account after sending `amount`, or `None` if it can't
    #[must_use]
    pub fn debited(self, amount: u64) -> Option<Self> {
        Some(Self {
            balance: self.balance.checked_sub(amount)?,
            nonce: self.nonce.checked_add(1)?,
            ..self
        })
    }

    /// The account after receiving `amount`, or `None` on overflow
    #[must_use]
    pub fn credited(self, amount: u64) -> Option<Self> {
        Some(Self {
            balance: self.balance.checked_add(amount)?,
            ..self
        })
    }
}

impl LeafHash for RollupAccount {
    fn leaf_hash(&self) -> Element {
        hash_merge([Element::new(self.balance), Element::from(self.nonce)])
    }
}
