use zk_primitives::Element;

/// Errors produced by an [`Accumulator`](crate::Accumulator)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every leaf slot is used, the pool has to be redeployed with a taller tree
    #[error("accumulator is full ({capacity} leaves)")]
    CapacityExceeded {
        /// The total number of leaf slots
        capacity: u64,
    },

    /// No leaf has been inserted at this index yet
    #[error("no leaf at index {0}")]
    UnknownLeaf(u64),

    /// The root is neither the current root nor one of the recent roots
    #[error("root {0} is not in the recent root history")]
    StaleRoot(Element),

    /// Trees must have a height between 1 and 32
    #[error("invalid tree height {0}, expected 1..=32")]
    InvalidHeight(usize),
}

/// Result alias for accumulator operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
