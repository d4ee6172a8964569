use thiserror as te;

use crate::NodeId;

/// Two rows share the same non-null ID.
#[derive(Debug, Clone, PartialEq, Eq, te::Error)]
#[error("Duplicate row ID {id:?} at row {row}")]
pub struct DuplicateKey<N: NodeId> {
    pub id: N,
    /// Position of the second row carrying this ID.
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, te::Error)]
pub enum IntegrityError<N: NodeId> {
    #[error("Cyclic reference: {path:?} -> {id:?}")]
    Cycle { path: Vec<N>, id: N },
    #[error("Node {id:?} is reachable through more than one parent (again under {parent:?})")]
    MultipleParents { id: N, parent: N },
}

#[derive(Debug, Clone, PartialEq, Eq, te::Error)]
pub enum BuildError<N: NodeId> {
    #[error(transparent)]
    Duplicate(#[from] DuplicateKey<N>),
    #[error(transparent)]
    Integrity(#[from] IntegrityError<N>),
    #[error("Maximum depth {depth} exceeded at node {id:?}")]
    DepthExceeded { id: N, depth: usize },
}

/// Recoverable problems found while building a forest.
///
/// These are logged and recorded on the handler; the build carries on without the offending
/// row or branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic<N: NodeId> {
    /// The row at this position is absent.
    NullRow { row: usize },
    /// The row at this position has no ID, so it can be neither a key nor a child.
    NullId { row: usize },
    /// The row is its own parent; it is kept as a root instead.
    SelfReference { id: N, row: usize },
    /// A child ID has no row; the branch is pruned.
    MissingRow { id: N },
}

impl<N: NodeId> std::fmt::Display for Diagnostic<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::NullRow { row } => write!(f, "Row {row} is null, skipped"),
            Diagnostic::NullId { row } => write!(f, "Row {row} has no ID, skipped"),
            Diagnostic::SelfReference { id, row } => {
                write!(f, "Row {row} ({id:?}) is its own parent, treated as root")
            }
            Diagnostic::MissingRow { id } => write!(f, "No row for child ID {id:?}, pruned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message() {
        let e = BuildError::from(DuplicateKey { id: 1u64, row: 1 });
        assert_eq!(e.to_string(), "Duplicate row ID 1 at row 1");
    }

    #[test]
    fn cycle_message() {
        let e = IntegrityError::Cycle {
            path: vec![1u64, 2],
            id: 1,
        };
        assert_eq!(e.to_string(), "Cyclic reference: [1, 2] -> 1");
    }
}
