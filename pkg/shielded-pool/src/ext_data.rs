use borsh::{BorshDeserialize, BorshSerialize};
use primitives::Address;
use serde::{Deserialize, Serialize};
use zk_primitives::{hash_bytes, Element};

use crate::{Error, Result};

/// The public, external half of a transaction
///
/// Its hash is a public input of the proof, so none of these fields can be changed after proving
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct ExtData {
    /// Receives the withdrawal, ignored for deposits
    pub recipient: Address,
    /// Value leaving the pool to `recipient`
    pub withdrawal: u64,
    /// Value entering the pool from the submitter
    pub deposit: u64,
    /// Value kept by the pool operator
    pub fee: u64,
}

impl ExtData {
    /// A transaction that only deposits
    #[must_use]
    pub fn deposit(amount: u64) -> Self {
        Self {
            deposit: amount,
            ..Self::default()
        }
    }

    /// A transaction that only withdraws
    #[must_use]
    pub fn withdrawal(recipient: Address, amount: u64) -> Self {
        Self {
            recipient,
            withdrawal: amount,
            ..Self::default()
        }
    }

    /// A transaction with no external leg
    #[must_use]
    pub fn transfer() -> Self {
        Self::default()
    }

    /// Add a fee
    #[must_use]
    pub fn with_fee(self, fee: u64) -> Self {
        Self { fee, ..self }
    }

    /// `hash_bytes` of the borsh encoding
    #[must_use]
    pub fn hash(&self) -> Element {
        // borsh into a Vec can't fail
        let bytes = borsh::to_vec(self).unwrap_or_default();
        hash_bytes(&bytes)
    }

    /// `deposit - withdrawal - fee`, modulo the field
    ///
    /// ```rust
    /// # use shielded_pool::*;
    /// # use zk_primitives::Element;
    /// assert_eq!(ExtData::deposit(10).public_amount(), Element::new(10));
    ///
    /// let minus_ten = Element::ZERO.field_sub(Element::new(10));
    /// assert_eq!(ExtData::deposit(5).with_fee(15).public_amount(), minus_ten);
    /// ```
    #[must_use]
    pub fn public_amount(&self) -> Element {
        Element::new(self.deposit)
            .field_sub(Element::new(self.withdrawal))
            .field_sub(Element::new(self.fee))
    }

    /// A transaction either deposits or withdraws, never both
    pub fn validate(&self) -> Result<()> {
        match self.deposit != 0 && self.withdrawal != 0 {
            true => Err(Error::invalid_ext_data(
                "a transaction cannot both deposit and withdraw",
            )),
            false => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn single_external_leg() {
        let recipient = Address::new([1; 20]);

        assert!(ExtData::deposit(1).validate().is_ok());
        assert!(ExtData::withdrawal(recipient, 1).validate().is_ok());
        assert!(ExtData::transfer().with_fee(1).validate().is_ok());

        let both = ExtData {
            deposit: 1,
            ..ExtData::withdrawal(recipient, 1)
        };
        assert!(matches!(both.validate(), Err(Error::InvalidExtData(_))));
    }

    #[test]
    fn hash_binds_recipient() {
        let a = ExtData::withdrawal(Address::new([1; 20]), 5);
        let b = ExtData::withdrawal(Address::new([2; 20]), 5);

        assert_ne!(a.hash(), b.hash());
    }

    #[proptest]
    fn public_amount_balances(deposit: u64, withdrawal: u64, fee: u64) {
        let ext = ExtData {
            recipient: Address::default(),
            withdrawal,
            deposit,
            fee,
        };

        let out = Element::new(withdrawal).field_add(Element::new(fee));
        assert_eq!(ext.public_amount().field_add(out), Element::new(deposit));
    }
}
