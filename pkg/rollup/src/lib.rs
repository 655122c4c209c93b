#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! A plain-account rollup whose state transitions are proven step by step, then folded into a
//! single proof
//!
//! The rollup state is two commitments: the [`PendingDeposits`] stack of deposits that have not
//! been credited yet, and the root of the [`AccountTree`]. Every elementary step (crediting a
//! deposit, or a signed transfer) produces a [`RollupProof`] of a [`StateTransition`]. Adjacent
//! transitions can be merged, so a whole batch collapses into one proof from the first source
//! state to the last target state.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use primitives::{Secp256k1Verifier, Signer};
//! # use rollup::*;
//! # use zk_circuits::{Element, TranscriptBackend};
//! let composer = Composer::new(
//!     Arc::new(TranscriptBackend::new(Element::new(1))),
//!     Arc::new(Secp256k1Verifier),
//! );
//!
//! let alice = Signer::random();
//! let bob = Signer::random();
//!
//! let mut world = RollupWorld::new();
//! world.deposit(alice.public_key(), 100);
//! let before = world.state();
//!
//! let deposit = world.process_deposit(&composer).unwrap();
//!
//! let tx = RollupTransaction::new(alice.public_key(), bob.public_key(), 40, 0);
//! let transfer = world.transaction(&composer, &tx, &tx.sign(&alice)).unwrap();
//!
//! let batch = composer.compose(vec![deposit, transfer]).unwrap();
//! assert_eq!(batch.transition().source, before);
//! assert_eq!(batch.transition().target, world.state());
//! ```

mod account;
mod composer;
mod error;
mod pending;
mod proof;
mod state;
mod statements;
mod tx;

pub use account::{account_id, AccountTree, RollupAccount, ACCOUNT_TREE_DEPTH};
pub use composer::Composer;
pub use error::{Error, Result};
pub use pending::{Deposit, PendingDeposits};
pub use proof::RollupProof;
pub use state::{RollupState, RollupWorld, StateTransition};
pub use statements::{DepositStep, MergeStep, TransferStep};
pub use tx::RollupTransaction;
