use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use zk_primitives::Element;

use crate::constants::{TRANSACTION_PUBLIC_INPUTS, TRANSITION_PUBLIC_INPUTS};

/// The statements this crate knows how to prove
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
#[serde(rename_all = "snake_case")]
pub enum CircuitKind {
    /// A shielded pool transaction: two inputs, two outputs, one external leg
    Transaction,
    /// A rollup deposit, moving a pending deposit into the account tree
    RollupDeposit,
    /// A signed rollup transfer between two accounts
    RollupTransfer,
    /// Two adjacent rollup transitions, merged into one
    RollupMerge,
}

impl CircuitKind {
    /// Domain separator mixed into every proof of this kind
    pub fn tag(self) -> Element {
        match self {
            Self::Transaction => Element::new(1),
            Self::RollupDeposit => Element::new(2),
            Self::RollupTransfer => Element::new(3),
            Self::RollupMerge => Element::new(4),
        }
    }

    /// The number of public inputs a statement of this kind has
    pub fn public_input_count(self) -> usize {
        match self {
            Self::Transaction => TRANSACTION_PUBLIC_INPUTS,
            Self::RollupDeposit | Self::RollupTransfer | Self::RollupMerge => {
                TRANSITION_PUBLIC_INPUTS
            }
        }
    }
}

impl core::fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Transaction => "transaction",
            Self::RollupDeposit => "rollup deposit",
            Self::RollupTransfer => "rollup transfer",
            Self::RollupMerge => "rollup merge",
        };

        f.write_str(name)
    }
}
