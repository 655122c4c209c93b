use serde::{Deserialize, Serialize};
use zk_circuits::{CircuitKind, Proof, ProofBackend};

use crate::StateTransition;

/// A proof that the rollup moved from one state to another
///
/// ```rust
/// # use rollup::*;
/// # use zk_circuits::{CircuitKind, Element, Proof};
/// let transition = StateTransition {
///     source: RollupState::default(),
///     target: RollupState::default(),
/// };
/// let proof = RollupProof::Transfer { transition, proof: Proof::new(vec![]) };
///
/// assert_eq!(proof.kind(), CircuitKind::RollupTransfer);
/// assert_eq!(proof.steps(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupProof {
    /// A pending deposit was credited to a new account
    Deposit {
        /// The proven transition
        transition: StateTransition,
        /// Proof of a [`DepositStep`](crate::DepositStep)
        proof: Proof,
    },

    /// A signed transfer was applied
    Transfer {
        /// The proven transition
        transition: StateTransition,
        /// Proof of a [`TransferStep`](crate::TransferStep)
        proof: Proof,
    },

    /// Two adjacent proofs were merged
    Merge {
        /// The proven transition
        transition: StateTransition,
        /// Proof of a [`MergeStep`](crate::MergeStep)
        proof: Proof,
        /// The number of elementary steps below this proof
        steps: usize,
    },
}

impl RollupProof {
    /// The transition this proves
    #[must_use]
    pub fn transition(&self) -> StateTransition {
        match self {
            Self::Deposit { transition, .. }
            | Self::Transfer { transition, .. }
            | Self::Merge { transition, .. } => *transition,
        }
    }

    /// The circuit that produced [`RollupProof::proof`]
    #[must_use]
    pub fn kind(&self) -> CircuitKind {
        match self {
            Self::Deposit { .. } => CircuitKind::RollupDeposit,
            Self::Transfer { .. } => CircuitKind::RollupTransfer,
            Self::Merge { .. } => CircuitKind::RollupMerge,
        }
    }

    /// The raw proof
    #[must_use]
    pub fn proof(&self) -> &Proof {
        match self {
            Self::Deposit { proof, .. } | Self::Transfer { proof, .. } | Self::Merge { proof, .. } => {
                proof
            }
        }
    }

    /// The number of deposits and transfers this covers
    #[must_use]
    pub fn steps(&self) -> usize {
        match self {
            Self::Deposit { .. } | Self::Transfer { .. } => 1,
            Self::Merge { steps, .. } => *steps,
        }
    }

    /// Check the proof against its own transition
    pub fn verify(&self, backend: &dyn ProofBackend) -> zk_circuits::Result<()> {
        backend.verify(
            self.kind(),
            &self.transition().public_inputs(),
            self.proof(),
        )
    }
}
