#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! A shielded pool of notes
//!
//! Value enters the pool as a deposit, moves between notes inside it, and leaves as a withdrawal.
//! Only commitments and nullifiers are ever public: a [`ShieldedTransaction`] proves that its
//! inputs are in the accumulator, that its nullifiers belong to them, and that value is conserved,
//! without revealing which notes were spent.
//!
//! A transaction is built by a [`TransactionBuilder`] against a [`PoolSnapshot`], and then
//! submitted to [`Pool::accept`], which either applies all of it or none of it.

mod builder;
mod config;
mod error;
mod ext_data;
mod external;
mod nullifier;
mod pool;
mod transaction;

pub use builder::{PoolSnapshot, TransactionBuilder};
pub use config::{ConfigError, PoolConfig};
pub use error::{Error, Result};
pub use ext_data::ExtData;
pub use external::{DepositEvent, DepositSource, ExternalError, Ledger, WithdrawalSink};
pub use nullifier::NullifierSet;
pub use pool::Pool;
pub use transaction::{BridgedDeposit, PoolEvent, Receipt, ShieldedTransaction};
