use std::collections::HashMap;

use zk_primitives::{hash_merge, Element};

use crate::{empty_subtree_hash, Error, MembershipWitness, Result, RootHistory};

/// The tallest supported tree, `2^32` leaves
pub const MAX_HEIGHT: usize = 32;

/// A fixed-height, append-only Merkle tree with a bounded history of roots
#[derive(Debug, Clone)]
pub struct Accumulator {
    height: usize,
    /// `layers[l]` holds the populated nodes of level `l`, left to right
    ///
    /// `layers[0]` are the leaves, `layers[height]` is the root once anything is inserted
    layers: Vec<Vec<Element>>,
    history: RootHistory,
    /// First index at which each leaf value was inserted
    positions: HashMap<Element, u64>,
}

impl Accumulator {
    /// Create an empty tree of the given height, remembering `root_history_size` previous roots
    pub fn new(height: usize, root_history_size: usize) -> Result<Self> {
        if !(1..=MAX_HEIGHT).contains(&height) {
            return Err(Error::InvalidHeight(height));
        }

        Ok(Self {
            height,
            layers: vec![Vec::new(); height + 1],
            history: RootHistory::new(empty_subtree_hash(height), root_history_size),
            positions: HashMap::new(),
        })
    }

    /// The height of the tree
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of leaf slots
    #[must_use]
    pub fn capacity(&self) -> u64 {
        1 << self.height
    }

    /// The number of leaves inserted so far
    #[must_use]
    pub fn len(&self) -> u64 {
        self.layers[0].len() as u64
    }

    /// Whether no leaves have been inserted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// The index the next inserted leaf will get
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.len()
    }

    /// The current root
    #[must_use]
    pub fn root(&self) -> Element {
        self.history.current()
    }

    /// The current root and the recent roots before it
    #[must_use]
    pub fn history(&self) -> &RootHistory {
        &self.history
    }

    /// Whether `root` is the current root or within the history window
    #[must_use]
    pub fn known_root(&self, root: Element) -> bool {
        self.history.contains(root)
    }

    /// Like [`Accumulator::known_root`], but fails with [`Error::StaleRoot`]
    pub fn check_root(&self, root: Element) -> Result<()> {
        match self.known_root(root) {
            true => Ok(()),
            false => Err(Error::StaleRoot(root)),
        }
    }

    /// The leaf at `index`, if one has been inserted there
    #[must_use]
    pub fn leaf(&self, index: u64) -> Option<Element> {
        let index = usize::try_from(index).ok()?;
        self.layers[0].get(index).copied()
    }

    /// The first index at which `leaf` was inserted
    #[must_use]
    pub fn position_of(&self, leaf: Element) -> Option<u64> {
        self.positions.get(&leaf).copied()
    }

    /// Fail with [`Error::CapacityExceeded`] unless `count` more leaves fit
    pub fn ensure_capacity(&self, count: u64) -> Result<()> {
        match self.capacity() - self.len() >= count {
            true => Ok(()),
            false => Err(Error::CapacityExceeded {
                capacity: self.capacity(),
            }),
        }
    }

    /// Append a leaf, returning its index
    pub fn insert(&mut self, leaf: Element) -> Result<u64> {
        let index = self.next_index();
        self.append(&[leaf])?;
        Ok(index)
    }

    /// Append two leaves with a single root update, returning the index of the first
    ///
    /// When the pair starts at an even index the two leaves share a parent, so the pair is
    /// hashed once and only one path is walked to the root
    pub fn insert_batch(&mut self, leaves: [Element; 2]) -> Result<u64> {
        let index = self.next_index();
        self.append(&leaves)?;
        Ok(index)
    }

    /// A membership witness for the leaf at `index` against the current root
    pub fn get_path(&self, index: u64) -> Result<MembershipWitness> {
        let leaf = self.leaf(index).ok_or(Error::UnknownLeaf(index))?;

        // `leaf` succeeded, so the index fits in a usize
        let mut position = index as usize;
        let mut siblings = Vec::with_capacity(self.height);
        let mut path_bits = Vec::with_capacity(self.height);

        for level in 0..self.height {
            siblings.push(self.node(level, position ^ 1));
            path_bits.push(position & 1 == 1);
            position >>= 1;
        }

        Ok(MembershipWitness {
            leaf,
            index,
            siblings,
            path_bits,
            root: self.root(),
        })
    }

    /// Append `leaves`, recompute every affected node once, and record the new root
    ///
    /// Returns the number of hashes computed
    pub(crate) fn append(&mut self, leaves: &[Element]) -> Result<usize> {
        self.ensure_capacity(leaves.len() as u64)?;

        let Some(last_offset) = leaves.len().checked_sub(1) else {
            return Ok(0);
        };

        let start = self.layers[0].len();
        for (offset, leaf) in leaves.iter().enumerate() {
            self.layers[0].push(*leaf);
            self.positions
                .entry(*leaf)
                .or_insert((start + offset) as u64);
        }

        let (mut first, mut last) = (start, start + last_offset);
        let mut hashes = 0;

        for level in 0..self.height {
            let (first_parent, last_parent) = (first / 2, last / 2);

            for parent in first_parent..=last_parent {
                let left = self.node(level, 2 * parent);
                let right = self.node(level, 2 * parent + 1);
                let hash = hash_merge([left, right]);
                hashes += 1;

                let parents = &mut self.layers[level + 1];
                match parent < parents.len() {
                    true => parents[parent] = hash,
                    false => parents.push(hash),
                }
            }

            (first, last) = (first_parent, last_parent);
        }

        let root = self.layers[self.height][0];
        self.history.push(root);

        tracing::debug!(start, count = leaves.len(), %root, "appended leaves");

        Ok(hashes)
    }

    fn node(&self, level: usize, index: usize) -> Element {
        self.layers[level]
            .get(index)
            .copied()
            .unwrap_or_else(|| empty_subtree_hash(level))
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::any};
    use test_strategy::proptest;

    use super::*;

    fn tree(height: usize) -> Accumulator {
        Accumulator::new(height, 4).unwrap()
    }

    #[test]
    fn rejects_bad_heights() {
        assert_eq!(Accumulator::new(0, 1).unwrap_err(), Error::InvalidHeight(0));
        assert_eq!(
            Accumulator::new(MAX_HEIGHT + 1, 1).unwrap_err(),
            Error::InvalidHeight(MAX_HEIGHT + 1)
        );
        assert!(Accumulator::new(MAX_HEIGHT, 1).is_ok());
    }

    #[test]
    fn empty_tree_has_well_known_root() {
        let tree = tree(5);
        assert_eq!(tree.root(), empty_subtree_hash(5));
        assert!(tree.is_empty());
        assert_eq!(tree.capacity(), 32);
    }

    #[test]
    fn small_tree_matches_manual_hashing() {
        let mut tree = tree(2);
        let leaves = [1, 2, 3].map(Element::new);

        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(tree.insert(*leaf).unwrap(), i as u64);
        }

        let left = hash_merge([leaves[0], leaves[1]]);
        let right = hash_merge([leaves[2], Element::NULL_HASH]);
        assert_eq!(tree.root(), hash_merge([left, right]));
    }

    #[test]
    fn pair_insert_matches_sequential_inserts() {
        let mut sequential = tree(6);
        let mut batched = tree(6);

        for i in 0..3 {
            let pair = [Element::new(2 * i + 10), Element::new(2 * i + 11)];

            sequential.insert(pair[0]).unwrap();
            sequential.insert(pair[1]).unwrap();
            assert_eq!(batched.insert_batch(pair).unwrap(), 2 * i);

            assert_eq!(sequential.root(), batched.root());
        }

        // one root per pair, plus genesis
        assert_eq!(batched.history().iter().count(), 4);
    }

    #[test]
    fn pair_insert_on_odd_index_matches_sequential_inserts() {
        let mut sequential = tree(4);
        let mut batched = tree(4);

        sequential.insert(Element::new(1)).unwrap();
        batched.insert(Element::new(1)).unwrap();

        sequential.insert(Element::new(2)).unwrap();
        sequential.insert(Element::new(3)).unwrap();
        assert_eq!(batched.insert_batch([2, 3].map(Element::new)).unwrap(), 1);

        assert_eq!(sequential.root(), batched.root());
    }

    #[test]
    fn pair_insert_hashes_less_than_two_inserts() {
        let mut tree = tree(10);

        let single = tree.append(&[Element::new(1)]).unwrap();
        let _ = tree.append(&[Element::new(2)]).unwrap();
        let pair = tree.append(&[Element::new(3), Element::new(4)]).unwrap();

        assert_eq!(single, 10);
        assert_eq!(pair, 10);
        assert!(pair < 2 * single);
    }

    #[test]
    fn capacity_is_enforced_before_mutation() {
        let mut tree = tree(2);

        tree.insert_batch([1, 2].map(Element::new)).unwrap();
        tree.insert(Element::new(3)).unwrap();
        let root = tree.root();

        let error = tree.insert_batch([4, 5].map(Element::new)).unwrap_err();
        assert_eq!(error, Error::CapacityExceeded { capacity: 4 });
        assert_eq!(tree.root(), root);
        assert_eq!(tree.len(), 3);

        tree.insert(Element::new(4)).unwrap();
        assert_eq!(
            tree.insert(Element::new(5)).unwrap_err(),
            Error::CapacityExceeded { capacity: 4 }
        );
    }

    #[test]
    fn unknown_leaf() {
        let mut tree = tree(3);
        assert_eq!(tree.get_path(0).unwrap_err(), Error::UnknownLeaf(0));

        tree.insert(Element::new(9)).unwrap();
        assert!(tree.get_path(0).is_ok());
        assert_eq!(tree.get_path(1).unwrap_err(), Error::UnknownLeaf(1));
    }

    #[test]
    fn staleness_boundary() {
        const K: usize = 3;
        let mut tree = Accumulator::new(8, K).unwrap();

        tree.insert(Element::new(1)).unwrap();
        let witness = tree.get_path(0).unwrap();

        for i in 0..K as u64 {
            tree.insert(Element::new(100 + i)).unwrap();
        }

        // exactly K roots old
        assert!(witness.verify(witness.root));
        assert_eq!(tree.check_root(witness.root), Ok(()));

        tree.insert(Element::new(1000)).unwrap();

        // K + 1 roots old
        assert_eq!(
            tree.check_root(witness.root),
            Err(Error::StaleRoot(witness.root))
        );
    }

    #[test]
    fn position_of_finds_first_insert() {
        let mut tree = tree(4);
        tree.insert(Element::new(7)).unwrap();
        tree.insert(Element::new(8)).unwrap();
        tree.insert(Element::new(7)).unwrap();

        assert_eq!(tree.position_of(Element::new(7)), Some(0));
        assert_eq!(tree.position_of(Element::new(8)), Some(1));
        assert_eq!(tree.position_of(Element::new(9)), None);
    }

    #[test]
    fn tampered_witness_fails() {
        let mut tree = tree(4);
        for i in 0..5 {
            tree.insert(Element::new(i)).unwrap();
        }

        let witness = tree.get_path(3).unwrap();
        assert!(witness.verify(tree.root()));

        let mut wrong_index = witness.clone();
        wrong_index.index = 2;
        assert!(!wrong_index.verify(tree.root()));

        let mut wrong_sibling = witness.clone();
        wrong_sibling.siblings[1] = Element::new(42);
        assert!(!wrong_sibling.verify(tree.root()));

        let mut wrong_leaf = witness;
        wrong_leaf.leaf = Element::new(4);
        assert!(!wrong_leaf.verify(tree.root()));
    }

    #[proptest(cases = 16)]
    fn every_leaf_rehashes_to_current_root(
        #[strategy(vec(any::<Element>(), 0..24))] leaves: Vec<Element>,
    ) {
        let mut tree = tree(5);

        for chunk in leaves.chunks(2) {
            match chunk {
                [a, b] => tree.insert_batch([*a, *b]).map(|_| ()).unwrap(),
                [a] => tree.insert(*a).map(|_| ()).unwrap(),
                _ => unreachable!(),
            }
        }

        for index in 0..tree.len() {
            let witness = tree.get_path(index).unwrap();

            assert_eq!(witness.root, tree.root());
            assert_eq!(witness.height(), 5);
            assert!(witness.verify(tree.root()));
        }
    }

    #[proptest(cases = 16)]
    fn witness_taken_after_insert_verifies(leaf: Element, #[strategy(0u64..10)] before: u64) {
        let mut tree = tree(4);
        for i in 0..before {
            tree.insert(Element::new(i)).unwrap();
        }

        let index = tree.insert(leaf).unwrap();
        let witness = tree.get_path(index).unwrap();

        assert_eq!(witness.leaf, leaf);
        assert!(witness.verify(tree.root()));
    }
}
