#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! Statements proven by the pool and the rollup, and the backends that prove them
//!
//! A statement implements [`Provable`]: it knows its [`CircuitKind`], which of its values are
//! public, and how to check its own constraints against its private witness. A [`ProofBackend`]
//! turns a satisfied statement into a [`Proof`] that can later be checked against the public
//! inputs alone.

pub mod backend;
pub mod constants;
pub mod data;
mod error;
mod keys;
mod note;
pub mod proof;
mod transaction;

pub use backend::{ProofBackend, Provable, TranscriptBackend};
pub use constants::{UTXO_INPUTS, UTXO_OUTPUTS};
pub use error::{Error, Result};
pub use keys::CircuitKind;
pub use proof::Proof;
pub use zk_primitives::{Base, Element};
