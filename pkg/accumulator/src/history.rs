use std::collections::VecDeque;

use zk_primitives::Element;

/// The current root of an accumulator, plus a bounded window of the roots that preceded it
///
/// With a window of `K`, a root survives `K` further insertions: the root recorded `K` updates
/// ago is still known, the one recorded `K + 1` updates ago is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHistory {
    /// Newest first, `roots[0]` is the current root
    roots: VecDeque<Element>,
    previous: usize,
}

impl RootHistory {
    /// Start a history at `genesis`, remembering up to `previous` older roots
    #[must_use]
    pub fn new(genesis: Element, previous: usize) -> Self {
        let mut roots = VecDeque::with_capacity(previous + 1);
        roots.push_front(genesis);

        Self { roots, previous }
    }

    /// Record a new current root, evicting the oldest root if the window is full
    pub fn push(&mut self, root: Element) {
        self.roots.push_front(root);
        self.roots.truncate(self.previous + 1);
    }

    /// The most recently recorded root
    #[must_use]
    pub fn current(&self) -> Element {
        // the history is never empty, `new` records the genesis root
        self.roots[0]
    }

    /// Whether `root` is the current root or one of the `previous` roots before it
    #[must_use]
    pub fn contains(&self, root: Element) -> bool {
        self.roots.contains(&root)
    }

    /// How many updates ago `root` was current, if it is still in the window
    #[must_use]
    pub fn age_of(&self, root: Element) -> Option<usize> {
        self.roots.iter().position(|r| *r == root)
    }

    /// The number of older roots kept alongside the current one
    #[must_use]
    pub fn window(&self) -> usize {
        self.previous
    }

    /// All remembered roots, newest first
    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        self.roots.iter().copied()
    }
}
