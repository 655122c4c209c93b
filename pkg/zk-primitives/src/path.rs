use crate::{hash_merge, Element};

/// Compute the root hash of a merkle tree from a leaf and its path
///
/// `siblings` yields `(sibling, bit)` pairs, leaf level first. `bit` is the position of the
/// *current node* at that level: `false` means the node is a left child (so the sibling is on the
/// right), `true` means it is a right child.
///
/// For a tree with leaves `[0, 1, 2, 3]`:
/// ```rust
/// # use zk_primitives::*;
/// let a = hash_merge([Element::new(0), Element::new(1)]);
/// let b = hash_merge([Element::new(2), Element::new(3)]);
/// let root = hash_merge([a, b]);
///
/// // leaf 2 is a left child at level 0, and its parent is a right child at level 1
/// let siblings = [(Element::new(3), false), (a, true)];
///
/// assert_eq!(compute_merkle_root(Element::new(2), siblings), root);
/// assert_ne!(compute_merkle_root(Element::NULL_HASH, siblings), root);
/// ```
pub fn compute_merkle_root<I: IntoIterator<Item = (Element, bool)>>(
    leaf: Element,
    siblings: I,
) -> Element {
    siblings
        .into_iter()
        .fold(leaf, |node, (sibling, is_right)| match is_right {
            false => hash_merge([node, sibling]),
            true => hash_merge([sibling, node]),
        })
}
