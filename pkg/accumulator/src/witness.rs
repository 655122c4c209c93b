use std::iter::zip;

use borsh::{BorshDeserialize, BorshSerialize};
use zk_primitives::{compute_merkle_root, Element};

/// Proof that `leaf` sits at `index` in a tree whose root was `root`
///
/// `siblings[l]` is the sibling of the path node at level `l` (leaf level first), and
/// `path_bits[l]` is `true` when the path node is the right child at that level.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MembershipWitness {
    /// The leaf this witness is for
    pub leaf: Element,
    /// The position of the leaf
    pub index: u64,
    /// Sibling hashes, leaf level first
    pub siblings: Vec<Element>,
    /// Left/right position of the path node at each level
    pub path_bits: Vec<bool>,
    /// The root of the tree when the witness was taken
    pub root: Element,
}

impl MembershipWitness {
    /// The height of the tree this witness was taken from
    #[must_use]
    pub fn height(&self) -> usize {
        self.siblings.len()
    }

    /// Hash `leaf` up through the siblings
    #[must_use]
    pub fn compute_root(&self, leaf: Element) -> Element {
        let siblings = self.siblings.iter().copied();
        let bits = self.path_bits.iter().copied();

        compute_merkle_root(leaf, zip(siblings, bits))
    }

    /// Whether this witness proves its leaf is included under `root`
    ///
    /// The path bits must also spell out `index`, otherwise a valid path could be presented for
    /// the wrong position
    #[must_use]
    pub fn verify(&self, root: Element) -> bool {
        self.siblings.len() == self.path_bits.len()
            && self.bits_match_index()
            && self.compute_root(self.leaf) == root
    }

    fn bits_match_index(&self) -> bool {
        let shifted = |by: usize| {
            u32::try_from(by)
                .ok()
                .and_then(|by| self.index.checked_shr(by))
                .unwrap_or(0)
        };

        shifted(self.path_bits.len()) == 0
            && self
                .path_bits
                .iter()
                .enumerate()
                .all(|(level, bit)| (shifted(level) & 1 == 1) == *bit)
    }
}
