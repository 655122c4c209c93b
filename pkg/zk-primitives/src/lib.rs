#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! Field elements, hashing and merkle helpers shared by the shielded pool and the rollup
//!
//! Everything that ends up inside a commitment, a nullifier or a tree node is an [`Element`], and
//! every hash is a Poseidon permutation over the BN254 scalar field ([`Base`]).

mod element;
mod hash;
mod path;

pub use element::{Element, Lsb};
pub use hash::{hash_bytes, hash_merge};
pub use path::compute_merkle_root;

/// The base element used by cryptographic operations
///
/// This is (roughly) an integer modulo `p` where `p` is [`Element::MODULUS`]
pub type Base = halo2curves_axiom::bn256::Fr;
