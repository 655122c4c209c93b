use std::sync::OnceLock;

use crate::Element;

/// Trees deeper than this fall back to computing empty hashes on demand
const COMPUTE_DEPTH: usize = 257;

/// The root hash of a tree of depth `depth` with no entries
///
/// A tree of depth 1 is a single empty leaf, so its hash is [`Element::NULL_HASH`]
///
/// ```rust
/// # use keyed_accumulator::*;
/// assert_eq!(empty_tree_hash(1), Element::NULL_HASH);
/// assert_eq!(empty_tree_hash(64), Tree::<64, Element>::new().root_hash());
/// ```
#[inline]
#[must_use]
pub fn empty_tree_hash(depth: usize) -> Element {
    assert_ne!(depth, 0, "the smallest possible tree has depth 1");

    match get_cache().get(depth - 1) {
        Some(hash) => *hash,
        None => {
            let child = empty_tree_hash(depth - 1);
            crate::hash_merge([child, child])
        }
    }
}

fn get_cache() -> &'static [Element] {
    static CACHE: OnceLock<Vec<Element>> = OnceLock::new();

    CACHE.get_or_init(|| {
        let mut vec = Vec::with_capacity(COMPUTE_DEPTH);
        let mut hash = Element::NULL_HASH;
        vec.push(hash);

        for _ in 1..COMPUTE_DEPTH {
            hash = crate::hash_merge([hash, hash]);
            vec.push(hash);
        }

        vec
    })
}
