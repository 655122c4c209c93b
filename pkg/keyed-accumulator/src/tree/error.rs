use zk_primitives::Element;

/// Errors from inserting into a [`Tree`](crate::Tree)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key maps to a leaf already occupied by a different key
    #[error(transparent)]
    Collision(#[from] Collision),

    /// [`Tree::insert`](crate::Tree::insert) only creates entries, it never replaces them
    #[error("key {0} is already in the tree")]
    KeyExists(Element),
}

/// Two keys that share the leaf they would be stored in
///
/// ```rust
/// # use keyed_accumulator::*;
/// let mut tree = Tree::<16, u64>::new();
/// tree.insert(Element::new(1), 1).unwrap();
///
/// let colliding = Element::new(1 + (1 << 20));
/// let Err(Error::Collision(collision)) = tree.insert(colliding, 2) else { panic!() };
///
/// assert_eq!(collision.in_tree(), Element::new(1));
/// assert_eq!(collision.inserted(), colliding);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub(crate) in_tree: Element,
    pub(crate) inserted: Element,
    pub(crate) depth: usize,
}

impl core::fmt::Display for Collision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let Self {
            in_tree,
            inserted,
            depth,
        } = self;

        write!(
            f,
            "collision: tried to insert {inserted}, but {in_tree} is already in the tree, and they share the least significant {} bits",
            depth - 1
        )
    }
}

impl std::error::Error for Collision {}

impl Collision {
    /// The key that was already in the tree
    #[inline]
    #[must_use]
    pub fn in_tree(&self) -> Element {
        self.in_tree
    }

    /// The key that could not be inserted
    #[inline]
    #[must_use]
    pub fn inserted(&self) -> Element {
        self.inserted
    }
}
