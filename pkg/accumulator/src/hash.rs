use std::sync::OnceLock;

use zk_primitives::{hash_merge, Element};

use crate::MAX_HEIGHT;

/// The hash of a subtree of height `level` in which every leaf is [`Element::NULL_HASH`]
///
/// ```rust
/// # use accumulator::*;
/// # use zk_primitives::hash_merge;
/// assert_eq!(empty_subtree_hash(0), Element::NULL_HASH);
///
/// let one = empty_subtree_hash(1);
/// assert_eq!(one, hash_merge([Element::NULL_HASH, Element::NULL_HASH]));
/// assert_eq!(empty_subtree_hash(2), hash_merge([one, one]));
/// ```
#[must_use]
pub fn empty_subtree_hash(level: usize) -> Element {
    assert!(level <= MAX_HEIGHT, "no tree is taller than {MAX_HEIGHT}");
    table()[level]
}

fn table() -> &'static [Element; MAX_HEIGHT + 1] {
    static TABLE: OnceLock<[Element; MAX_HEIGHT + 1]> = OnceLock::new();

    TABLE.get_or_init(|| {
        let mut table = [Element::NULL_HASH; MAX_HEIGHT + 1];

        for level in 1..=MAX_HEIGHT {
            let child = table[level - 1];
            table[level] = hash_merge([child, child]);
        }

        table
    })
}
