use std::iter::zip;

use crate::{empty_tree_hash, hash_merge, Element, LeafHash, Tree};

use super::tree_repr::Node;

/// A merkle path for a key in a [`Tree`]
///
/// A path can prove either that `key` maps to a particular value, or that `key` is absent
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path<const DEPTH: usize> {
    /// The key this path leads to
    pub key: Element,

    /// The `DEPTH - 1` siblings, deepest first
    pub siblings: Vec<Element>,

    /// The root hash of the tree when this path was taken
    pub root_hash: Element,
}

impl<const DEPTH: usize> Path<DEPTH> {
    /// Hash `leaf` up through the siblings
    #[must_use]
    pub fn compute_root_hash(&self, leaf: Element) -> Element {
        let bits = self.key.lsb(DEPTH - 1).leaf_first();
        let siblings = self.siblings.iter().copied();

        zk_primitives::compute_merkle_root(leaf, zip(siblings, bits))
    }

    /// Whether this path proves `key` maps to `value`
    ///
    /// ```rust
    /// # use keyed_accumulator::*;
    /// let mut tree = Tree::<64, u64>::new();
    /// tree.insert(Element::new(1), 10).unwrap();
    ///
    /// let path = tree.path_for(Element::new(1));
    /// assert!(path.proves(&10));
    /// assert!(!path.proves(&11));
    /// assert!(!path.proves_absent());
    /// ```
    #[must_use]
    pub fn proves<V: LeafHash>(&self, value: &V) -> bool {
        let leaf = hash_merge([self.key, value.leaf_hash()]);
        self.compute_root_hash(leaf) == self.root_hash
    }

    /// Whether this path proves that no key occupies `key`'s leaf
    #[must_use]
    pub fn proves_absent(&self) -> bool {
        self.compute_root_hash(Element::NULL_HASH) == self.root_hash
    }
}

impl<const DEPTH: usize, V> Tree<DEPTH, V> {
    /// The merkle path for `key` against the current root hash
    ///
    /// `key` does not need to be in the tree
    #[must_use]
    pub fn path_for(&self, key: Element) -> Path<DEPTH> {
        let bits = key.lsb(DEPTH - 1);

        // root first for now, reversed at the end
        let mut siblings = Vec::with_capacity(DEPTH - 1);
        let mut node = &self.tree;

        for bit in bits.iter().by_vals() {
            match node {
                Node::Parent { left, right, .. } => match bit {
                    false => {
                        siblings.push(right.hash());
                        node = left;
                    }
                    true => {
                        siblings.push(left.hash());
                        node = right;
                    }
                },
                // every sibling below an empty subtree is an empty subtree one level shallower
                Node::Empty { depth } => {
                    siblings.extend((1..*depth).rev().map(empty_tree_hash));
                    break;
                }
                Node::Leaf { .. } => break,
            }
        }

        siblings.reverse();

        Path {
            key,
            siblings,
            root_hash: self.root_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use super::*;

    #[proptest(cases = 32)]
    fn cached_root_hash_is_correct(tree: Tree<64, u64>, key: Element) {
        let path = tree.path_for(key);
        assert_eq!(path.root_hash, tree.root_hash());
        assert_eq!(path.siblings.len(), 63);
    }

    #[proptest(cases = 32)]
    fn path_proves_contents(tree: Tree<32, u64>, key: Element) {
        let path = tree.path_for(key);

        match tree.get(key) {
            Some(value) => {
                assert!(path.proves(value));
                assert!(!path.proves(&(value + 1)));
                assert!(!path.proves_absent());
            }
            None if tree.iter().any(|(k, _)| k.lsb(31) == key.lsb(31)) => {
                assert!(!path.proves_absent());
            }
            None => assert!(path.proves_absent()),
        }
    }

    #[test]
    fn simple_path_example() {
        let mut tree = Tree::<64, Element>::new();
        tree.insert(Element::new(1), Element::new(7)).unwrap();

        let path = tree.path_for(Element::new(1));
        assert!(path.proves(&Element::new(7)));

        let other = tree.path_for(Element::new(2));
        assert!(other.proves_absent());
        assert_eq!(other.root_hash, path.root_hash);
    }
}
