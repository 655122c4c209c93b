use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use zk_circuits::{data::TransactionPublicInputs, Proof};
use zk_primitives::Element;

use crate::{Error, ExtData, Result};

/// A proven transaction, ready to be submitted to a [`Pool`](crate::Pool)
///
/// Contains nothing private: the notes themselves never leave the builder
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ShieldedTransaction {
    /// Proof of the transaction statement
    pub proof: Proof,
    /// The values the proof is checked against
    pub public_inputs: TransactionPublicInputs,
    /// Recipient, withdrawal, deposit and fee, bound to the proof by its hash
    pub ext_data: ExtData,
}

impl ShieldedTransaction {
    /// The nullifiers this transaction reveals
    #[must_use]
    pub fn nullifiers(&self) -> [Element; 2] {
        self.public_inputs.nullifiers
    }

    /// The commitments this transaction inserts
    #[must_use]
    pub fn commitments(&self) -> [Element; 2] {
        self.public_inputs.commitments
    }
}

/// The payload of a bridged [`DepositEvent`](crate::DepositEvent)
///
/// Opens the note the deposit creates, so the pool can check that it belongs to the depositor
/// named by the bridge: one output of `transaction` must commit to
/// `Note::restore(event.owner, event.amount, blinding)`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BridgedDeposit {
    /// The deposit transaction
    pub transaction: ShieldedTransaction,
    /// Blinding of the note that receives the bridged amount
    pub blinding: Element,
}

impl BridgedDeposit {
    /// Encode as the `extra_data` of a [`DepositEvent`](crate::DepositEvent)
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        // borsh into a Vec can't fail
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Decode from the `extra_data` of a [`DepositEvent`](crate::DepositEvent)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        borsh::from_slice(bytes).map_err(|err| Error::invalid_ext_data(err.to_string()))
    }
}

/// Something that happened to the pool's public state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PoolEvent {
    /// A commitment was inserted at `index`
    NewCommitment {
        /// The commitment
        commitment: Element,
        /// Its position in the accumulator
        index: u64,
    },
    /// A note was spent
    NewNullifier {
        /// The revealed nullifier
        nullifier: Element,
    },
}

/// The result of an accepted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Where the two output commitments were inserted
    pub output_indices: [u64; 2],
    /// The root after the outputs were inserted
    pub root: Element,
    /// The nullifiers that are now spent
    pub nullifiers: [Element; 2],
    /// Everything that changed, in order
    pub events: Vec<PoolEvent>,
}
