#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! An append-only Merkle accumulator of note commitments
//!
//! ```rust
//! # use accumulator::*;
//! let mut tree = Accumulator::new(20, 30).unwrap();
//!
//! let index = tree.insert(Element::new(1)).unwrap();
//! let witness = tree.get_path(index).unwrap();
//!
//! assert!(witness.verify(tree.root()));
//! assert!(tree.known_root(witness.root));
//! ```
//!
//! ## Shape
//!
//! A tree of height `H` has `2^H` leaf slots. Level `0` holds the leaves and level `H` holds the
//! root, every other node is `hash_merge([left, right])`. Slots that have never been written
//! hold [`Element::NULL_HASH`], and a subtree made only of such slots has the well-known hash
//! [`empty_subtree_hash`], so only populated nodes are ever stored.
//!
//! ## Root history
//!
//! Witnesses are built against a root that may be superseded before the transaction that uses
//! them is accepted. The accumulator keeps the current root plus the last `K` roots, and
//! [`Accumulator::check_root`] accepts any of them.

mod error;
mod hash;
mod history;
mod tree;
mod witness;

pub use error::{Error, Result};
pub use hash::empty_subtree_hash;
pub use history::RootHistory;
pub use tree::{Accumulator, MAX_HEIGHT};
pub use witness::MembershipWitness;
pub use zk_primitives::Element;
