//! This module provides the high-level solver API: the [`EigenvalueSolver`] contract,
//! the five concrete solvers and a small runner that picks one of them by name.
//!
//! A solver is configured, solved, then queried:
//!
//! ```rust
//! use eigensolve::solvers::{EigenvalueSolver, PowerMethod};
//! use faer::mat;
//!
//! let m = mat![[2.0f64, 1.0], [1.0, 2.0]];
//! let mut solver = PowerMethod::new().with_seed(Some(7));
//! solver.set_matrix(m.as_ref()).unwrap();
//! solver.set_tolerance(1e-10);
//! solver.set_max_iterations(1000);
//! solver.solve().unwrap();
//! assert!((solver.eigenvalues()[0].re - 3.0).abs() < 1e-8);
//! ```

pub mod power;
pub mod qr;

pub use power::{
    InversePowerMethod, InversePowerMethodWithShift, PowerMethod, PowerMethodWithShift,
    PowerSolution, PowerSolver,
};
pub use qr::QrMethod;

use crate::{
    algorithms::qr_iteration::EigenvalueOrdering,
    error::SolverError,
    scalar::{Scalar, c64},
};
use faer::{Mat, MatRef};
use log::debug;
use std::{fmt, str::FromStr};

/// Iteration cap used by the runner when none is given.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Tolerance used by the runner when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Common contract of all eigenvalue solvers.
///
/// Tolerance and iteration cap start unset; [`solve`](Self::solve) fails with
/// `InvalidInput` until both, and the matrix, have been supplied. Every call to
/// `solve` discards the results of the previous one first.
pub trait EigenvalueSolver<T: Scalar> {
    /// Short human readable name, used in logs and reports.
    fn name(&self) -> &'static str;

    /// Copies `matrix` into the solver and precomputes the operator the algorithm
    /// iterates on. On error the previous configuration is kept.
    fn set_matrix(&mut self, matrix: MatRef<'_, T>) -> Result<(), SolverError>;

    /// Sets the convergence tolerance. Only the modulus of `tolerance` is used.
    fn set_tolerance(&mut self, tolerance: T);

    fn set_max_iterations(&mut self, max_iterations: usize);

    fn solve(&mut self) -> Result<(), SolverError>;

    /// Eigenvalues found by the last successful solve, empty otherwise.
    fn eigenvalues(&self) -> Vec<c64>;

    /// Eigenvectors as the columns of an `n × k` matrix, `0 × 0` before a
    /// successful solve.
    ///
    /// # Errors
    /// `NotImplemented` for algorithms that do not produce eigenvectors.
    fn eigenvectors(&self) -> Result<Mat<T>, SolverError>;

    /// Iterations (or QR sweeps) performed by the last successful solve.
    fn iterations(&self) -> usize;
}

/// Selects one of the available algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    Qr,
    Power,
    InversePower,
    ShiftedPower,
    ShiftedInversePower,
}

impl SolverKind {
    pub const ALL: [SolverKind; 5] = [
        SolverKind::Qr,
        SolverKind::Power,
        SolverKind::InversePower,
        SolverKind::ShiftedPower,
        SolverKind::ShiftedInversePower,
    ];

    /// The short name accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            SolverKind::Qr => "qr",
            SolverKind::Power => "pm",
            SolverKind::InversePower => "im",
            SolverKind::ShiftedPower => "pms",
            SolverKind::ShiftedInversePower => "ims",
        }
    }

    pub fn requires_shift(self) -> bool {
        matches!(
            self,
            SolverKind::ShiftedPower | SolverKind::ShiftedInversePower
        )
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolverKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SolverError::invalid_input(format!(
                    "Unknown solver '{s}', expected one of: qr, pm, im, pms, ims"
                ))
            })
    }
}

/// Whether a solver works on real or complex scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Real,
    Complex,
}

impl ScalarField {
    pub fn of<T: Scalar>() -> Self {
        if T::IS_COMPLEX {
            ScalarField::Complex
        } else {
            ScalarField::Real
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScalarField::Real => "real",
            ScalarField::Complex => "complex",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejects a matrix whose entries live in a different field than the solver.
pub fn ensure_field_matches(
    matrix_is_complex: bool,
    field: ScalarField,
) -> Result<(), SolverError> {
    match (matrix_is_complex, field) {
        (true, ScalarField::Real) => Err(SolverError::invalid_input(
            "Complex matrix given to a real solver",
        )),
        (false, ScalarField::Complex) => Err(SolverError::invalid_input(
            "Real matrix given to a complex solver",
        )),
        _ => Ok(()),
    }
}

/// Everything needed to construct and configure a solver by name.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig<T: Scalar> {
    pub kind: SolverKind,
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Required by the shifted kinds, ignored by the others.
    pub shift: Option<T>,
    /// Only used by the QR method.
    pub ordering: EigenvalueOrdering,
    /// Seed of the random starting vector of the power family.
    pub seed: Option<u64>,
}

impl<T: Scalar> SolverConfig<T> {
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            shift: None,
            ordering: EigenvalueOrdering::default(),
            seed: None,
        }
    }

    fn required_shift(&self) -> Result<T, SolverError> {
        self.shift.ok_or_else(|| {
            SolverError::invalid_input(format!(
                "Solver '{}' requires a shift",
                self.kind.label()
            ))
        })
    }

    /// Constructs the configured solver with tolerance and iteration cap applied.
    pub fn build(&self) -> Result<Box<dyn EigenvalueSolver<T>>, SolverError> {
        let mut solver: Box<dyn EigenvalueSolver<T>> = match self.kind {
            SolverKind::Qr => Box::new(QrMethod::<T>::new().with_ordering(self.ordering)),
            SolverKind::Power => Box::new(PowerMethod::<T>::new().with_seed(self.seed)),
            SolverKind::InversePower => {
                Box::new(InversePowerMethod::<T>::new().with_seed(self.seed))
            }
            SolverKind::ShiftedPower => {
                Box::new(PowerMethodWithShift::new(self.required_shift()?).with_seed(self.seed))
            }
            SolverKind::ShiftedInversePower => Box::new(
                InversePowerMethodWithShift::new(self.required_shift()?).with_seed(self.seed),
            ),
        };
        solver.set_tolerance(T::from_real_f64(self.tolerance));
        solver.set_max_iterations(self.max_iterations);
        Ok(solver)
    }
}

/// Checks the field, builds the solver, loads `matrix` and solves.
///
/// Returns the solved solver so that the caller can query eigenvalues and
/// eigenvectors.
pub fn run_solver<T: Scalar>(
    config: &SolverConfig<T>,
    matrix: MatRef<'_, T>,
    matrix_is_complex: bool,
) -> Result<Box<dyn EigenvalueSolver<T>>, SolverError> {
    ensure_field_matches(matrix_is_complex, ScalarField::of::<T>())?;
    let mut solver = config.build()?;
    solver.set_matrix(matrix)?;
    solver.solve()?;
    debug!(
        "{} finished on a {}x{} {} matrix after {} iterations",
        solver.name(),
        matrix.nrows(),
        matrix.ncols(),
        ScalarField::of::<T>(),
        solver.iterations()
    );
    Ok(solver)
}
