#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! A keyed accumulator: a sparse Merkle tree that maps [`Element`] keys to values
//!
//! Conceptually, a [`Tree`] is a `BTreeMap<Element, V>` with a root hash that commits to every
//! entry, key **and** value. Each value provides its own hash via [`LeafHash`], and the leaf stored
//! in the tree is `hash_merge([key, value.leaf_hash()])`, so changing a value changes the root.
//!
//! ```rust
//! # use keyed_accumulator::*;
//! let mut tree = Tree::<64, Element>::new();
//! let empty = tree.root_hash();
//!
//! tree.insert(Element::new(1), Element::new(100)).unwrap();
//! let one = tree.root_hash();
//! assert_ne!(empty, one);
//!
//! tree.upsert(Element::new(1), Element::new(200)).unwrap();
//! assert_ne!(one, tree.root_hash());
//! ```
//!
//! ## Structure
//!
//! A tree of depth `DEPTH` makes `DEPTH - 1` left/right decisions, taken from the `DEPTH - 1`
//! least significant bits of the key, most significant first. The root hash only depends on the
//! set of entries, never on insertion order.
//!
//! ## Collisions
//!
//! Two keys with the same `DEPTH - 1` least significant bits would occupy the same leaf. The
//! second one fails to insert with [`Error::Collision`]. With a depth of 64 and keys that are
//! hashes, this is vanishingly unlikely, but it is still checked.

mod hash;
mod tree;

pub use hash::empty_tree_hash;
pub use tree::{Collision, Error, LeafHash, Path, Tree};
pub use zk_primitives::*;
