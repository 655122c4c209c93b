use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use primitives::Address;
use serde::{Deserialize, Serialize};
use zk_primitives::Element;

/// Failures of the collaborators that hold the pool's funds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExternalError {
    /// The account cannot cover the transfer
    #[error("{address} has {balance}, needs {amount}")]
    InsufficientFunds {
        /// The account that was debited
        address: Address,
        /// Its balance
        balance: u64,
        /// The amount requested
        amount: u64,
    },

    /// The pool's custody account cannot cover the withdrawal
    #[error("custody holds {balance}, needs {amount}")]
    InsufficientCustody {
        /// The custody balance
        balance: u64,
        /// The amount requested
        amount: u64,
    },

    /// The collaborator did not answer in time
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Any other failure reported by the collaborator
    #[error("{0}")]
    Other(String),
}

/// Where deposits are pulled from
#[async_trait]
pub trait DepositSource: Send + Sync {
    /// Move `amount` from `from` into the pool's custody
    async fn pull(&self, from: Address, amount: u64) -> Result<(), ExternalError>;
}

/// Where withdrawals are released to
#[async_trait]
pub trait WithdrawalSink: Send + Sync {
    /// Move `amount` out of the pool's custody to `recipient`
    ///
    /// Called exactly once per accepted withdrawal
    async fn release(&self, recipient: Address, amount: u64) -> Result<(), ExternalError>;
}

/// A deposit that a bridge has already moved into custody
///
/// `extra_data` is an encoded [`BridgedDeposit`](crate::BridgedDeposit): the transaction that
/// creates a note of `amount` for `owner`, and the blinding that opens that note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    /// The shielded public key the depositor wants to own the notes
    pub owner: Element,
    /// The value bridged in
    pub amount: u64,
    /// The encoded [`BridgedDeposit`](crate::BridgedDeposit)
    pub extra_data: Vec<u8>,
}

/// An in-memory token ledger, acting as both deposit source and withdrawal sink
///
/// ```rust
/// # use shielded_pool::*;
/// # use primitives::Address;
/// let ledger = Ledger::new();
/// let alice = Address::new([1; 20]);
///
/// ledger.fund(alice, 100);
/// assert_eq!(ledger.balance_of(alice), 100);
/// assert_eq!(ledger.custody(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<Address, u64>,
    custody: u64,
}

impl Ledger {
    /// An empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` to `address`
    pub fn fund(&self, address: Address, amount: u64) {
        let mut state = self.state.lock();
        let balance = state.balances.entry(address).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Credit custody directly, like a bridge would before emitting a [`DepositEvent`]
    pub fn bridge_in(&self, amount: u64) {
        let mut state = self.state.lock();
        state.custody = state.custody.saturating_add(amount);
    }

    /// The balance of `address`
    #[must_use]
    pub fn balance_of(&self, address: Address) -> u64 {
        self.state
            .lock()
            .balances
            .get(&address)
            .copied()
            .unwrap_or_default()
    }

    /// The value held on behalf of the pool
    #[must_use]
    pub fn custody(&self) -> u64 {
        self.state.lock().custody
    }
}

#[async_trait]
impl DepositSource for Ledger {
    async fn pull(&self, from: Address, amount: u64) -> Result<(), ExternalError> {
        let mut state = self.state.lock();
        let balance = state.balances.get(&from).copied().unwrap_or_default();

        let remaining = balance
            .checked_sub(amount)
            .ok_or(ExternalError::InsufficientFunds {
                address: from,
                balance,
                amount,
            })?;

        state.balances.insert(from, remaining);
        state.custody = state.custody.saturating_add(amount);
        Ok(())
    }
}

#[async_trait]
impl WithdrawalSink for Ledger {
    async fn release(&self, recipient: Address, amount: u64) -> Result<(), ExternalError> {
        let mut state = self.state.lock();

        let custody = state.custody;

        state.custody = custody
            .checked_sub(amount)
            .ok_or(ExternalError::InsufficientCustody {
                balance: custody,
                amount,
            })?;

        let balance = state.balances.entry(recipient).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
