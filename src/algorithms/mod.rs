//! Low-level iteration kernels.
//!
//! ** NOTE: We recommend using the solver types in [`crate::solvers`] instead. This
//! module is intended for callers that want to drive an iteration on their own
//! operator, e.g. a matrix they already inverted or a custom [`LinearOperator`].
//!
//! - [`power_iteration`]: the normalise-apply-compare loop shared by the whole power
//!   family. It knows nothing about shifts or inverses; it only sees an operator.
//! - [`qr_iteration`]: unshifted QR sweeps and eigenvalue extraction from the
//!   resulting quasi-triangular matrix.
//!
//! [`LinearOperator`]: crate::matrix::LinearOperator

pub mod power_iteration;
pub mod qr_iteration;

use crate::{error::SolverError, scalar::Scalar};
use num_traits::Float;

/// User-facing iteration settings. Both values start unset and must be supplied
/// before a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSettings<R> {
    pub tolerance: Option<R>,
    pub max_iterations: Option<usize>,
}

impl<R> Default for IterationSettings<R> {
    fn default() -> Self {
        Self {
            tolerance: None,
            max_iterations: None,
        }
    }
}

impl<R: Float> IterationSettings<R> {
    /// Checks the settings and turns them into a budget the kernels can run on.
    pub fn budget(&self) -> Result<IterationBudget<R>, SolverError> {
        let tolerance = self
            .tolerance
            .ok_or_else(|| SolverError::invalid_input("Tolerance must be set before solving"))?;
        let max_iterations = self.max_iterations.ok_or_else(|| {
            SolverError::invalid_input("Maximum number of iterations must be set before solving")
        })?;
        IterationBudget::new(tolerance, max_iterations)
    }
}

/// A validated pair of stopping criteria: a positive iteration cap and a finite,
/// non-negative tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationBudget<R> {
    tolerance: R,
    max_iterations: usize,
}

impl<R: Float> IterationBudget<R> {
    pub fn new(tolerance: R, max_iterations: usize) -> Result<Self, SolverError> {
        if max_iterations == 0 {
            return Err(SolverError::invalid_input(
                "Maximum number of iterations must be positive",
            ));
        }
        if !tolerance.is_finite() || tolerance < R::zero() {
            return Err(SolverError::invalid_input(
                "Tolerance must be a finite, non-negative number",
            ));
        }
        Ok(Self {
            tolerance,
            max_iterations,
        })
    }

    pub fn tolerance(&self) -> R {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// Shorthand for the budget type of a scalar field.
pub type BudgetFor<T> = IterationBudget<<T as Scalar>::Magnitude>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverErrorKind;

    #[test]
    fn test_unset_settings_are_rejected() {
        let settings = IterationSettings::<f64>::default();
        let err = settings.budget().unwrap_err();
        assert_eq!(
            err.kind(),
            &SolverErrorKind::InvalidInput("Tolerance must be set before solving".to_string())
        );

        let settings = IterationSettings {
            tolerance: Some(1e-6),
            max_iterations: None,
        };
        assert!(matches!(
            settings.budget().unwrap_err().kind(),
            SolverErrorKind::InvalidInput(_)
        ));
    }

    #[test]
    fn test_budget_validation() {
        assert!(IterationBudget::new(1e-6f64, 0).is_err());
        assert!(IterationBudget::new(-1.0f64, 10).is_err());
        assert!(IterationBudget::new(f32::NAN, 10).is_err());

        let budget = IterationBudget::new(0.0f64, 1).unwrap();
        assert_eq!(budget.tolerance(), 0.0);
        assert_eq!(budget.max_iterations(), 1);
    }
}
