use zk_primitives::Element;

use crate::{ConfigError, ExternalError};

/// Reasons a transaction can be rejected, or a pool can fail to start
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input note is not in the accumulator, or not at the index it claims
    #[error("input note with commitment {0} is not in the accumulator")]
    UnknownInput(Element),

    /// The value going in is not the value going out
    #[error(
        "unbalanced transaction: inputs ({inputs}) + deposit ({deposit}) != \
         outputs ({outputs}) + withdrawal ({withdrawal}) + fee ({fee})"
    )]
    UnbalancedTransaction {
        /// Sum of the input amounts
        inputs: u128,
        /// Sum of the output amounts
        outputs: u128,
        /// External deposit
        deposit: u64,
        /// External withdrawal
        withdrawal: u64,
        /// Fee
        fee: u64,
    },

    /// The proof does not verify against the public inputs
    #[error("invalid proof")]
    InvalidProof(#[source] zk_circuits::Error),

    /// A nullifier has already been revealed, i.e. the note was already spent
    #[error("nullifier {0} is already spent")]
    AlreadySpent(Element),

    /// The deposit source or withdrawal sink failed, nothing was applied
    #[error("external transfer failed")]
    ExternalTransferFailed(#[from] ExternalError),

    /// The external data does not match the public inputs, or is malformed
    #[error("invalid ext data: {0}")]
    InvalidExtData(String),

    /// The deposit is larger than the configured maximum
    #[error("deposit of {amount} exceeds the maximum of {max}")]
    DepositLimitExceeded {
        /// The requested deposit
        amount: u64,
        /// [`PoolConfig::max_deposit_amount`](crate::PoolConfig::max_deposit_amount)
        max: u64,
    },

    /// Applying the transaction would take the custody counters out of the range of a `u64`
    #[error(
        "pool balance {balance} (fees {fees}) cannot take deposit {deposit}, \
         withdrawal {withdrawal} and fee {fee}"
    )]
    BalanceOutOfRange {
        /// Value held in custody before the transaction
        balance: u64,
        /// Fees collected before the transaction
        fees: u64,
        /// External deposit
        deposit: u64,
        /// External withdrawal
        withdrawal: u64,
        /// Fee
        fee: u64,
    },

    /// More than two inputs or two outputs
    #[error("a transaction has at most {max} inputs and {max} outputs, got {inputs} and {outputs}", max = zk_circuits::UTXO_INPUTS)]
    TooManyNotes {
        /// The number of inputs requested
        inputs: usize,
        /// The number of outputs requested
        outputs: usize,
    },

    /// Accumulator error, including stale roots and a full tree
    #[error("accumulator error")]
    Accumulator(#[from] accumulator::Error),

    /// The statement could not be proven
    #[error("circuit error")]
    Circuit(#[from] zk_circuits::Error),

    /// Invalid configuration
    #[error("config error")]
    Config(#[from] ConfigError),
}

/// Result alias for pool operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Whether the pool can no longer accept any transaction
    ///
    /// Every other error is specific to the rejected transaction
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Accumulator(accumulator::Error::CapacityExceeded { .. })
        )
    }

    pub(crate) fn invalid_ext_data(message: impl Into<String>) -> Self {
        Self::InvalidExtData(message.into())
    }
}
