//! This module defines the error types shared by every eigenvalue solver.
//!
//! All failure conditions of the solver core are collected in a single enum,
//! [`SolverErrorKind`], and exposed through the opaque wrapper [`SolverError`].
//! Input problems are reported when a solver is configured, convergence
//! failures when the iteration budget runs out. Nothing is retried internally.
use thiserror::Error;

/// Represents all possible errors that can occur while configuring or running a solver.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct SolverError(#[from] SolverErrorKind);

impl SolverError {
    /// Returns the kind of failure, for callers that need to branch on it.
    pub fn kind(&self) -> &SolverErrorKind {
        &self.0
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self(SolverErrorKind::InvalidInput(message.into()))
    }

    pub(crate) fn algebra(message: impl Into<String>) -> Self {
        Self(SolverErrorKind::Algebra(message.into()))
    }
}

/// The distinct kinds of solver errors.
#[derive(Error, Debug, PartialEq)]
pub enum SolverErrorKind {
    /// Malformed configuration: an empty or non-square matrix, a missing shift,
    /// a scalar field that does not match the matrix, or unset iteration settings.
    #[error("Input validation error: {0}")]
    InvalidInput(String),

    /// The power iteration used its whole budget while the displacement between
    /// consecutive iterates was still above the tolerance.
    #[error(
        "Iteration limit exceeded: no convergence after {iterations} iterations (displacement {displacement:e}, tolerance {tolerance:e})."
    )]
    IterationLimitExceeded {
        iterations: usize,
        displacement: f64,
        tolerance: f64,
    },

    /// The algorithm does not provide the requested result.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// An algebraic operation of the backend failed, e.g. inverting a singular matrix.
    #[error("Algebra error: {0}")]
    Algebra(String),

    /// The operator mapped the current iterate to the zero vector, so it can no
    /// longer be normalized.
    #[error("Power iteration breakdown at step {k}: the iterate was mapped to the zero vector.")]
    Breakdown { k: usize },
}

impl PartialEq for SolverError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
