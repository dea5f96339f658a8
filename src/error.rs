use thiserror::Error;

/// Errors returned by the flow entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input: non-square capacity matrix, negative capacity,
    /// or an invalid route count.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A source or target vertex index outside the graph.
    #[error("vertex index out of range")]
    InvalidVertex,

    /// Source and target coincide; no cut or flow is defined.
    #[error("source and target must be distinct")]
    IdenticalVertices,

    /// The external LP solver reported infeasible constraints. Forwarded
    /// to the caller unmodified.
    #[error("infeasible constraints: {0}")]
    Infeasible(String),
}

pub type Result<T> = std::result::Result<T, Error>;
