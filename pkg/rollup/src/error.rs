use zk_primitives::Element;

use crate::RollupState;

/// Result alias for rollup operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors from building or composing rollup proofs
///
/// Every elementary step checks everything before touching state, so any of these leaves the
/// pending deposits and the account tree exactly as they were
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The left proof does not end where the right proof starts
    #[error("cannot merge: left ends at {left:?}, right starts at {right:?}")]
    TransitionMismatch {
        /// Target of the left proof
        left: RollupState,
        /// Source of the right proof
        right: RollupState,
    },

    /// A deposit tried to create an account that already exists
    #[error("account {0} already exists")]
    AccountAlreadyExists(Element),

    /// The transaction nonce is not the account's next nonce
    #[error("nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch {
        /// The sender's current nonce
        expected: u32,
        /// The transaction's nonce
        got: u32,
    },

    /// The sender cannot cover the amount
    #[error("insufficient balance: {balance} < {amount}")]
    InsufficientBalance {
        /// The sender's balance
        balance: u64,
        /// The transferred amount
        amount: u64,
    },

    /// Crediting the receiver would overflow its balance
    #[error("balance of account {0} would overflow")]
    BalanceOverflow(Element),

    /// The sender has no account
    #[error("unknown account {0}")]
    UnknownAccount(Element),

    /// The signature is not by the sender over this transaction
    #[error("invalid signature")]
    InvalidSignature,

    /// There is no pending deposit to process
    #[error("no pending deposits")]
    EmptyDepositQueue,

    /// There is nothing to compose
    #[error("cannot compose an empty batch")]
    EmptyBatch,

    /// A child proof did not verify
    #[error("invalid proof")]
    InvalidProof(#[source] zk_circuits::Error),

    /// The account tree rejected a key
    #[error(transparent)]
    Tree(#[from] keyed_accumulator::Error),

    /// The proof backend refused a statement
    #[error(transparent)]
    Circuit(#[from] zk_circuits::Error),
}
