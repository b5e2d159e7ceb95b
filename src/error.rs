use thiserror::Error;

/// Error taxonomy for the drill engine and its collaborators.
#[derive(Debug, Error)]
pub enum DrillError {
    /// The user's level answer was not a number or not in the level map.
    #[error("invalid level selection: {0:?}")]
    InvalidLevelSelection(String),

    /// A bad argument reached the generator. The level tables are static,
    /// so hitting this means a programming mistake rather than bad input.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The engine refuses zero-length sequences so the derived metrics
    /// never divide by zero.
    #[error("practice sequence is empty")]
    EmptySequence,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
