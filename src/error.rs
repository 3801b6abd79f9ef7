use thiserror::Error;

/// Errors returned by clustering algorithms and metrics in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// The edge structure ran dry before the requested cluster count was
    /// reached; the point set is too small or disconnected relative to it.
    #[error("graph is disconnected: ran out of edges before reaching the requested cluster count")]
    DisconnectedGraph,

    /// An identifier was registered twice in a disjoint-set structure.
    #[error("id {id} is already registered")]
    DuplicateId {
        /// The offending identifier.
        id: usize,
    },

    /// An identifier was never registered in a disjoint-set structure.
    #[error("id {id} is not registered")]
    UnknownId {
        /// The offending identifier.
        id: usize,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
