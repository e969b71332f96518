//! The power-method family.
//!
//! All four variants share one type, [`PowerSolver`], and differ only in their
//! [`PowerVariant`]: the operator the iteration runs on and the map from its
//! Rayleigh quotient `θ` back to an eigenvalue `λ` of the original matrix `M`.
//!
//! | variant | operator | recovery |
//! |---|---|---|
//! | [`PowerMethod`] | `M` | `λ = θ` |
//! | [`InversePowerMethod`] | `M⁻¹` | `λ = 1/θ` |
//! | [`PowerMethodWithShift`] | `M − σI` | `λ = θ + σ` |
//! | [`InversePowerMethodWithShift`] | `(M − σI)⁻¹` | `λ = 1/θ + σ` |
//!
//! Inverses are computed once, when the matrix (or the shift) is set.

use super::EigenvalueSolver;
use crate::{
    algorithms::{IterationSettings, power_iteration::power_iteration},
    error::SolverError,
    matrix::{ensure_square, invert, norm, random_vector, residual_norm, shifted},
    scalar::{Scalar, c64},
};
use faer::{Mat, MatRef};
use log::debug;
use num_traits::Zero;
use rand::{SeedableRng, rngs::StdRng};
use std::fmt::Debug;

/// Operator construction and eigenvalue recovery of one power-method variant.
pub trait PowerVariant<T: Scalar>: Debug {
    const NAME: &'static str;

    /// Builds the operator the iteration runs on from the original matrix.
    fn operator(&self, matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError>;

    /// Maps the Rayleigh quotient of the operator to an eigenvalue of the matrix.
    fn recover(&self, rayleigh_quotient: T) -> Result<T, SolverError>;
}

/// Variants parameterised by a shift `σ`.
pub trait ShiftedVariant<T: Scalar>: PowerVariant<T> {
    fn from_shift(shift: T) -> Self;
    fn shift(&self) -> T;
}

fn reciprocal<T: Scalar>(rayleigh_quotient: T) -> Result<T, SolverError> {
    if rayleigh_quotient.modulus().is_zero() {
        return Err(SolverError::algebra(
            "Rayleigh quotient of the inverse operator vanished",
        ));
    }
    Ok(T::from_real_f64(1.0) / rayleigh_quotient)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl<T: Scalar> PowerVariant<T> for Direct {
    const NAME: &'static str = "Power Method";

    fn operator(&self, matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError> {
        Ok(matrix.to_owned())
    }

    fn recover(&self, rayleigh_quotient: T) -> Result<T, SolverError> {
        Ok(rayleigh_quotient)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Inverse;

impl<T: Scalar> PowerVariant<T> for Inverse {
    const NAME: &'static str = "Inverse Power Method";

    fn operator(&self, matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError> {
        invert(matrix)
    }

    fn recover(&self, rayleigh_quotient: T) -> Result<T, SolverError> {
        reciprocal(rayleigh_quotient)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Shifted<T> {
    shift: T,
}

impl<T: Scalar> PowerVariant<T> for Shifted<T> {
    const NAME: &'static str = "Power Method with Shift";

    fn operator(&self, matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError> {
        Ok(shifted(matrix, self.shift))
    }

    fn recover(&self, rayleigh_quotient: T) -> Result<T, SolverError> {
        Ok(rayleigh_quotient + self.shift)
    }
}

impl<T: Scalar> ShiftedVariant<T> for Shifted<T> {
    fn from_shift(shift: T) -> Self {
        Self { shift }
    }

    fn shift(&self) -> T {
        self.shift
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShiftedInverse<T> {
    shift: T,
}

impl<T: Scalar> PowerVariant<T> for ShiftedInverse<T> {
    const NAME: &'static str = "Inverse Power Method with Shift";

    fn operator(&self, matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError> {
        invert(shifted(matrix, self.shift).as_ref())
    }

    fn recover(&self, rayleigh_quotient: T) -> Result<T, SolverError> {
        Ok(reciprocal(rayleigh_quotient)? + self.shift)
    }
}

impl<T: Scalar> ShiftedVariant<T> for ShiftedInverse<T> {
    fn from_shift(shift: T) -> Self {
        Self { shift }
    }

    fn shift(&self) -> T {
        self.shift
    }
}

/// Result of a successful power-family solve.
#[derive(Debug, Clone)]
pub struct PowerSolution<T: Scalar> {
    pub eigenvalue: T,
    /// Unit-norm `n × 1` eigenvector estimate.
    pub eigenvector: Mat<T>,
    pub iterations: usize,
    /// Displacement between the last two iterates.
    pub displacement: T::Magnitude,
    /// `‖M·v − λ·v‖` against the original matrix.
    pub residual: T::Magnitude,
}

/// A power-method solver for the variant `V`.
#[derive(Debug, Clone)]
pub struct PowerSolver<T: Scalar, V> {
    variant: V,
    matrix: Option<Mat<T>>,
    operator: Option<Mat<T>>,
    settings: IterationSettings<T::Magnitude>,
    seed: Option<u64>,
    solution: Option<PowerSolution<T>>,
}

/// Dominant eigenvalue of `M`.
pub type PowerMethod<T> = PowerSolver<T, Direct>;
/// Eigenvalue of `M` with the smallest modulus.
pub type InversePowerMethod<T> = PowerSolver<T, Inverse>;
/// Dominant eigenvalue of `M − σI`, shifted back by `σ`.
pub type PowerMethodWithShift<T> = PowerSolver<T, Shifted<T>>;
/// Eigenvalue of `M` closest to `σ`.
pub type InversePowerMethodWithShift<T> = PowerSolver<T, ShiftedInverse<T>>;

impl<T: Scalar, V: PowerVariant<T>> PowerSolver<T, V> {
    fn with_variant(variant: V) -> Self {
        Self {
            variant,
            matrix: None,
            operator: None,
            settings: IterationSettings::default(),
            seed: None,
            solution: None,
        }
    }

    /// Fixes the seed of the random starting vector. `None` draws a fresh seed on
    /// every solve.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn solution(&self) -> Option<&PowerSolution<T>> {
        self.solution.as_ref()
    }
}

impl<T: Scalar> PowerSolver<T, Direct> {
    pub fn new() -> Self {
        Self::with_variant(Direct)
    }
}

impl<T: Scalar> Default for PowerSolver<T, Direct> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> PowerSolver<T, Inverse> {
    pub fn new() -> Self {
        Self::with_variant(Inverse)
    }
}

impl<T: Scalar> Default for PowerSolver<T, Inverse> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> PowerSolver<T, Shifted<T>> {
    pub fn new(shift: T) -> Self {
        Self::with_variant(Shifted::from_shift(shift))
    }
}

impl<T: Scalar> PowerSolver<T, ShiftedInverse<T>> {
    pub fn new(shift: T) -> Self {
        Self::with_variant(ShiftedInverse::from_shift(shift))
    }
}

impl<T: Scalar, V: ShiftedVariant<T>> PowerSolver<T, V> {
    pub fn shift(&self) -> T {
        self.variant.shift()
    }

    /// Replaces the shift. If a matrix is already loaded its operator is rebuilt
    /// first; on failure the old shift and operator stay in place.
    pub fn set_shift(&mut self, shift: T) -> Result<(), SolverError> {
        let variant = V::from_shift(shift);
        if let Some(matrix) = &self.matrix {
            self.operator = Some(variant.operator(matrix.as_ref())?);
        }
        self.variant = variant;
        self.solution = None;
        Ok(())
    }
}

impl<T: Scalar, V: PowerVariant<T>> EigenvalueSolver<T> for PowerSolver<T, V> {
    fn name(&self) -> &'static str {
        V::NAME
    }

    fn set_matrix(&mut self, matrix: MatRef<'_, T>) -> Result<(), SolverError> {
        ensure_square(matrix)?;
        let operator = self.variant.operator(matrix)?;
        self.matrix = Some(matrix.to_owned());
        self.operator = Some(operator);
        self.solution = None;
        Ok(())
    }

    fn set_tolerance(&mut self, tolerance: T) {
        self.settings.tolerance = Some(tolerance.modulus());
    }

    fn set_max_iterations(&mut self, max_iterations: usize) {
        self.settings.max_iterations = Some(max_iterations);
    }

    fn solve(&mut self) -> Result<(), SolverError> {
        self.solution = None;

        let (Some(matrix), Some(operator)) = (&self.matrix, &self.operator) else {
            return Err(SolverError::invalid_input(
                "Matrix must be set before solving",
            ));
        };
        let budget = self.settings.budget()?;

        let n = matrix.nrows();
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut start = random_vector::<T, _>(n, &mut rng);
        if norm(start.as_ref()).is_zero() {
            start = Mat::from_fn(n, 1, |_, _| T::from_real_f64(1.0));
        }

        let output = power_iteration(operator, start, &budget)?;
        let eigenvalue = self.variant.recover(output.rayleigh_quotient)?;
        let residual = residual_norm(matrix.as_ref(), output.eigenvector.as_ref(), eigenvalue);
        debug!(
            "{}: eigenvalue {:?} after {} iterations (seed {seed}, residual {residual:e})",
            V::NAME,
            eigenvalue,
            output.iterations
        );

        self.solution = Some(PowerSolution {
            eigenvalue,
            eigenvector: output.eigenvector,
            iterations: output.iterations,
            displacement: output.displacement,
            residual,
        });
        Ok(())
    }

    fn eigenvalues(&self) -> Vec<c64> {
        self.solution
            .as_ref()
            .map(|solution| vec![solution.eigenvalue.to_c64()])
            .unwrap_or_default()
    }

    fn eigenvectors(&self) -> Result<Mat<T>, SolverError> {
        Ok(self
            .solution
            .as_ref()
            .map(|solution| solution.eigenvector.clone())
            .unwrap_or_else(|| Mat::zeros(0, 0)))
    }

    fn iterations(&self) -> usize {
        self.solution
            .as_ref()
            .map_or(0, |solution| solution.iterations)
    }
}
