use crate::Element;
use std::collections::BTreeMap;

mod error;
mod insert;
mod path;
mod tree_repr;

pub use error::{Collision, Error};
pub use path::Path;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

/// A value that can be committed to by a [`Tree`]
pub trait LeafHash {
    /// A hash of every field of the value that the root hash should commit to
    fn leaf_hash(&self) -> Element;
}

impl LeafHash for Element {
    #[inline]
    fn leaf_hash(&self) -> Element {
        *self
    }
}

impl LeafHash for u64 {
    #[inline]
    fn leaf_hash(&self) -> Element {
        Element::new(*self)
    }
}

/// A sparse Merkle tree keyed by [`Element`]
///
/// ```rust
/// # use keyed_accumulator::*;
/// let mut tree = Tree::<64, u64>::new();
///
/// tree.insert(Element::new(1), 123).unwrap();
/// tree.insert(Element::new(2), 234).unwrap();
///
/// assert_eq!(tree.get(Element::new(1)), Some(&123));
/// assert!(tree.insert(Element::new(1), 0).is_err());
///
/// for (key, value) in tree.iter() {
///     println!("{key} => {value}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Tree<const DEPTH: usize, V> {
    /// The tree-like representation, holding leaf hashes only
    tree: tree_repr::Node,
    entries: BTreeMap<Element, V>,
}

impl<const DEPTH: usize, V> PartialEq for Tree<DEPTH, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.root_hash() == other.root_hash()
    }
}

impl<const DEPTH: usize, V> Eq for Tree<DEPTH, V> {}

impl<const DEPTH: usize, V> Default for Tree<DEPTH, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize, V> Tree<DEPTH, V> {
    /// Creates a new, empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            tree: tree_repr::Node::Empty { depth: DEPTH },
        }
    }

    /// The number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this tree has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the tree has an entry for `key`
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: Element) -> bool {
        self.entries.contains_key(&key)
    }

    /// The value stored at `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: Element) -> Option<&V> {
        self.entries.get(&key)
    }

    /// Iterate over the entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Element, &V)> {
        self.entries.iter()
    }

    /// The root hash of the tree
    ///
    /// This commits to every key and value in the tree, and is cached, so calling it is cheap
    #[inline]
    #[must_use]
    pub fn root_hash(&self) -> Element {
        self.tree.hash()
    }
}
