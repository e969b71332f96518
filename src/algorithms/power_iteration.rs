//! The iterate-until-converged loop shared by every power-method variant.
//!
//! Given an operator `A` and a start vector `v₀`, the loop repeats
//!
//! ```text
//! v_{k+1} = A·v_k / ‖A·v_k‖
//! ```
//!
//! until the phase-aligned displacement between two consecutive iterates drops
//! below the tolerance, then reports the Rayleigh quotient of the final iterate.
//! The variants of the power family only differ in the operator they pass in and
//! in how they map the Rayleigh quotient back to an eigenvalue of the original
//! matrix; neither concern is visible here.

use super::BudgetFor;
use crate::{
    error::{SolverError, SolverErrorKind},
    matrix::{LinearOperator, aligned_displacement, dot, normalized},
    scalar::Scalar,
};
use faer::Mat;
use log::trace;
use num_traits::{Float, ToPrimitive};

/// The converged state of a power iteration.
#[derive(Debug, Clone)]
pub struct PowerIterationOutput<T: Scalar> {
    /// Unit-norm dominant eigenvector estimate of the operator.
    pub eigenvector: Mat<T>,
    /// `⟨v, A·v⟩ / ⟨v, v⟩` for the final iterate `v`.
    pub rayleigh_quotient: T,
    /// Number of operator applications performed.
    pub iterations: usize,
    /// Displacement measured at the last step.
    pub displacement: T::Magnitude,
}

/// Runs the power iteration of `operator` from `start`.
///
/// # Errors
/// * `InvalidInput` if `start` is the zero vector or its length does not match the operator.
/// * `Breakdown { k }` if step `k` maps the iterate to the zero vector.
/// * `IterationLimitExceeded` if the budget runs out before the displacement drops
///   below the tolerance.
pub fn power_iteration<T: Scalar>(
    operator: &impl LinearOperator<T>,
    start: Mat<T>,
    budget: &BudgetFor<T>,
) -> Result<PowerIterationOutput<T>, SolverError> {
    if operator.ncols() != start.nrows() || start.ncols() != 1 {
        return Err(SolverError::invalid_input(format!(
            "Starting vector of shape {}x{} does not match an operator of size {}x{}",
            start.nrows(),
            start.ncols(),
            operator.nrows(),
            operator.ncols()
        )));
    }

    let mut current = normalized(start.as_ref())
        .ok_or_else(|| SolverError::invalid_input("Starting vector must not be zero"))?;
    let mut displacement = T::Magnitude::infinity();
    let mut iterations = 0;

    while iterations < budget.max_iterations() {
        let image = operator.apply(current.as_ref());
        let next = normalized(image.as_ref()).ok_or(SolverErrorKind::Breakdown {
            k: iterations + 1,
        })?;
        iterations += 1;

        displacement = aligned_displacement(current.as_ref(), next.as_ref());
        current = next;
        trace!("power iteration step {iterations}: displacement {displacement:e}");

        if displacement < budget.tolerance() {
            let image = operator.apply(current.as_ref());
            let rayleigh_quotient =
                dot(current.as_ref(), image.as_ref()) / dot(current.as_ref(), current.as_ref());
            return Ok(PowerIterationOutput {
                eigenvector: current,
                rayleigh_quotient,
                iterations,
                displacement,
            });
        }
    }

    Err(SolverErrorKind::IterationLimitExceeded {
        iterations,
        displacement: displacement.to_f64().unwrap_or(f64::NAN),
        tolerance: budget.tolerance().to_f64().unwrap_or(f64::NAN),
    }
    .into())
}
