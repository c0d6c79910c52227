use thiserror::Error;

/// Disposition taxonomy for errors that cross a component boundary.
///
/// Library call sites keep returning `anyhow::Result` the way the rest of
/// the workspace does; `EvoError` exists only where the engine needs to
/// match on *kind* rather than propagate an opaque error — generation
/// termination codes and the stats log's `degraded` bookkeeping.
#[derive(Debug, Error)]
pub enum EvoError {
    #[error("transient I/O error: {0}")]
    Transient(String),

    #[error("backend refused or returned empty content")]
    BackendRefusal,

    #[error("failed to parse backend response: {0}")]
    ParseFailure(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("partial generation failure: {0}")]
    PartialGeneration(String),

    #[error("store write failure: {0}")]
    StoreWrite(String),
}

impl EvoError {
    /// Process exit code per the persistence/error contract.
    pub fn exit_code(&self) -> i32 {
        match self {
            EvoError::Config(_) => 2,
            EvoError::InvariantViolation(_) => 2,
            EvoError::StoreWrite(_) => 4,
            EvoError::PartialGeneration(_) => 4,
            _ => 3,
        }
    }
}
