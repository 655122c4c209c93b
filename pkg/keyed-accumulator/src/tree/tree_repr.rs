use bitvec::{prelude::Msb0, slice::BitSlice};

use crate::{empty_tree_hash, hash_merge, Collision, Element};

/// A tree-like representation of a sparse tree, for easier computation of merkle paths and hashes
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// An occupied leaf, `hash` is `hash_merge([key, value.leaf_hash()])`
    Leaf { key: Element, hash: Element },

    /// A subtree of depth `depth` with no entries, its hash is [`empty_tree_hash`]
    Empty { depth: usize },

    /// A parent of two nodes with a cached hash
    Parent {
        left: Box<Self>,
        right: Box<Self>,
        hash: Element,
        /// if true, the children have changed without recalculating the hash
        hash_dirty: bool,
    },
}

impl Node {
    pub fn hash(&self) -> Element {
        match self {
            Self::Leaf { hash, .. } | Self::Parent { hash, .. } => *hash,
            Self::Empty { depth } => empty_tree_hash(*depth),
        }
    }

    /// Write a leaf hash for `key`, following `bits` from this node
    ///
    /// An existing leaf for the same key is overwritten. Hashes are not updated, instead nodes
    /// along the way are marked dirty until [`Node::recalculate_hashes`] is called
    pub(crate) fn set_without_hashing<const N: usize>(
        &mut self,
        key: Element,
        leaf_hash: Element,
        bits: &BitSlice<u8, Msb0>,
    ) -> Result<(), Collision> {
        match self {
            Self::Leaf { key: existing, hash } if *existing == key => {
                *hash = leaf_hash;
                Ok(())
            }
            Self::Leaf { key: existing, .. } => Err(Collision {
                in_tree: *existing,
                inserted: key,
                depth: N,
            }),
            Self::Parent {
                left,
                right,
                hash_dirty,
                ..
            } => {
                let Some((head, tail)) = bits.split_first() else {
                    // a parent always has at least one more decision below it
                    unreachable!("ran out of key bits above the leaf level");
                };

                let result = match *head {
                    false => left.set_without_hashing::<N>(key, leaf_hash, tail),
                    true => right.set_without_hashing::<N>(key, leaf_hash, tail),
                };

                if result.is_ok() {
                    *hash_dirty = true;
                }

                result
            }
            Self::Empty { depth: 1 } => {
                *self = Self::Leaf {
                    key,
                    hash: leaf_hash,
                };
                Ok(())
            }
            Self::Empty { depth } => {
                // split an empty tree into two empty subtrees
                *self = Self::Parent {
                    left: Box::new(Self::Empty { depth: *depth - 1 }),
                    right: Box::new(Self::Empty { depth: *depth - 1 }),
                    // overwritten on the next `recalculate_hashes`, since the retry below marks
                    // this node dirty
                    hash: Element::NULL_HASH,
                    hash_dirty: false,
                };

                self.set_without_hashing::<N>(key, leaf_hash, bits)
            }
        }
    }

    /// The key stored in the leaf that `bits` leads to, if any
    pub(crate) fn occupant(&self, bits: &BitSlice<u8, Msb0>) -> Option<Element> {
        match self {
            Self::Leaf { key, .. } => Some(*key),
            Self::Empty { .. } => None,
            Self::Parent { left, right, .. } => {
                let (head, tail) = bits.split_first()?;
                match *head {
                    false => left.occupant(tail),
                    true => right.occupant(tail),
                }
            }
        }
    }

    pub fn recalculate_hashes(&mut self) {
        let Self::Parent {
            left,
            right,
            hash,
            hash_dirty,
        } = self
        else {
            return;
        };

        if !*hash_dirty {
            return;
        }

        rayon::join(|| left.recalculate_hashes(), || right.recalculate_hashes());

        *hash = hash_merge([left.hash(), right.hash()]);
        *hash_dirty = false;
    }
}
