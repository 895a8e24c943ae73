//! Error types for squad optimization.

use crate::milp::SolverError;
use thiserror::Error;

/// Main error type for squad optimization.
///
/// Configuration and data errors are raised before any model is built.
/// `Infeasible` and `SolverTimeout` mirror the non-optimal solver outcomes
/// for callers that prefer `?` over matching on
/// [`SquadOutcome`](crate::squad::SquadOutcome).
#[derive(Debug, Error)]
pub enum SquadError {
    /// Invalid budget, quota, cap or solver settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Empty pool, duplicate ids, unknown position or bad price/points.
    #[error("data error: {0}")]
    Data(String),

    /// No squad satisfies all constraints.
    #[error("no squad satisfies the constraints")]
    Infeasible,

    /// The solver exceeded the caller-supplied time budget.
    #[error("solver exceeded the time limit of {limit_ms} ms")]
    SolverTimeout { limit_ms: u64 },

    /// Post-solve validation failed: the solver broke its contract.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// Malformed model or backend failure.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Result type alias for squad optimization.
pub type Result<T> = std::result::Result<T, SquadError>;
