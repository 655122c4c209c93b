use crate::CircuitKind;

/// An error produced by zk-circuits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The private witness does not satisfy the statement
    #[error("constraint not satisfied: {0}")]
    Constraint(String),

    /// The proof does not attest to these public inputs
    #[error("invalid proof for {0} circuit")]
    InvalidProof(CircuitKind),

    /// Proof bytes or public inputs are malformed
    #[error("encoding error: {0}")]
    Encoding(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    pub(crate) fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}
