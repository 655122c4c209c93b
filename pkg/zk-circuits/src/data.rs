//! Simple data types used as inputs to the proofs

use accumulator::MembershipWitness;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use zk_primitives::Element;

use crate::{UTXO_INPUTS, UTXO_OUTPUTS};

/// A shielded spending key, and the public key notes are addressed to
///
/// `public_key = hash_merge([private_key, 0])`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypair {
    /// Secret key for the address, required to spend a note
    pub private_key: Element,
    /// The owner field of every note this key can spend
    pub public_key: Element,
}

/// A note (UTXO) in the shielded pool
///
/// Only the commitment is ever published. The amount, blinding and owner stay with whoever holds
/// the note.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct Note {
    /// Value of the note, in base units
    pub amount: u64,
    /// Random value hiding the other fields of the commitment
    pub blinding: Element,
    /// Public key of the owner of the note
    pub owner: Element,
    /// Position of the commitment in the accumulator, once it has been inserted
    pub index: Option<u64>,
}

/// A [`Note`] that belongs to the current user, i.e. they have the private key and can therefore
/// spend it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputNote {
    pub note: Note,
    pub keypair: Keypair,
    /// Proof that the note is in the accumulator, only optional for zero-amount padding notes
    pub witness: Option<MembershipWitness>,
}

/// The transaction statement
///
/// ```text
///  (Private)                                (Public)
///                      ┌─────────────┐
///  InputNote           │             │      Root (used to verify input notes)
///  InputNote    ───►   │ Transaction │ ───► Public amount, ExtData hash
///  Note (output)       │             │      Nullifiers (for input notes)
///  Note (output)       │             │      Commitments (for output notes)
///                      └─────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: [InputNote; UTXO_INPUTS],
    pub outputs: [Note; UTXO_OUTPUTS],
    /// A recent root of the accumulator that every non-padding input is included under
    pub root: Element,
    /// `deposit - withdrawal - fee`, modulo the field
    pub public_amount: Element,
    /// Binds the external data (recipient, fee, ..) to the proof
    pub ext_data_hash: Element,
}

/// The public half of a [`Transaction`], in the order it is proven
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct TransactionPublicInputs {
    pub root: Element,
    pub public_amount: Element,
    pub ext_data_hash: Element,
    pub nullifiers: [Element; UTXO_INPUTS],
    pub commitments: [Element; UTXO_OUTPUTS],
}
