//! The QR method: full spectrum from unshifted QR sweeps.
//!
//! The solver always performs the configured number of sweeps; running out of
//! sweeps is its normal termination. The tolerance is only used afterwards, to
//! decide which sub-diagonal entries still couple a 2×2 block.

use super::EigenvalueSolver;
use crate::{
    algorithms::{
        IterationSettings,
        qr_iteration::{EigenvalueOrdering, extract_eigenvalues, qr_iteration},
    },
    error::{SolverError, SolverErrorKind},
    matrix::ensure_square,
    scalar::{Scalar, c64},
};
use faer::{Mat, MatRef};
use log::debug;

#[derive(Debug, Clone)]
pub struct QrMethod<T: Scalar> {
    matrix: Option<Mat<T>>,
    settings: IterationSettings<T::Magnitude>,
    ordering: EigenvalueOrdering,
    schur: Option<Mat<T>>,
    eigenvalues: Vec<c64>,
    sweeps: usize,
}

impl<T: Scalar> Default for QrMethod<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> QrMethod<T> {
    pub fn new() -> Self {
        Self {
            matrix: None,
            settings: IterationSettings::default(),
            ordering: EigenvalueOrdering::default(),
            schur: None,
            eigenvalues: Vec::new(),
            sweeps: 0,
        }
    }

    pub fn with_ordering(mut self, ordering: EigenvalueOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn set_ordering(&mut self, ordering: EigenvalueOrdering) {
        self.ordering = ordering;
    }

    pub fn ordering(&self) -> EigenvalueOrdering {
        self.ordering
    }

    /// The quasi-triangular matrix left by the last successful solve.
    pub fn schur_form(&self) -> Option<MatRef<'_, T>> {
        self.schur.as_ref().map(|schur| schur.as_ref())
    }

    fn clear(&mut self) {
        self.schur = None;
        self.eigenvalues.clear();
        self.sweeps = 0;
    }
}

impl<T: Scalar> EigenvalueSolver<T> for QrMethod<T> {
    fn name(&self) -> &'static str {
        "QR Method"
    }

    fn set_matrix(&mut self, matrix: MatRef<'_, T>) -> Result<(), SolverError> {
        ensure_square(matrix)?;
        self.matrix = Some(matrix.to_owned());
        self.clear();
        Ok(())
    }

    fn set_tolerance(&mut self, tolerance: T) {
        self.settings.tolerance = Some(tolerance.modulus());
    }

    fn set_max_iterations(&mut self, max_iterations: usize) {
        self.settings.max_iterations = Some(max_iterations);
    }

    fn solve(&mut self) -> Result<(), SolverError> {
        self.clear();
        let Some(matrix) = &self.matrix else {
            return Err(SolverError::invalid_input(
                "Matrix must be set before solving",
            ));
        };
        let budget = self.settings.budget()?;

        let schur = qr_iteration(matrix.as_ref(), budget.max_iterations());
        let mut eigenvalues = extract_eigenvalues(schur.as_ref(), budget.tolerance());
        self.ordering.apply(&mut eigenvalues);
        debug!(
            "QR Method: {} eigenvalues from a {}x{} matrix ({:?} order)",
            eigenvalues.len(),
            matrix.nrows(),
            matrix.ncols(),
            self.ordering
        );

        self.schur = Some(schur);
        self.eigenvalues = eigenvalues;
        self.sweeps = budget.max_iterations();
        Ok(())
    }

    fn eigenvalues(&self) -> Vec<c64> {
        self.eigenvalues.clone()
    }

    fn eigenvectors(&self) -> Result<Mat<T>, SolverError> {
        Err(SolverErrorKind::NotImplemented(
            "Eigenvectors are not supported for the QR method.".to_string(),
        )
        .into())
    }

    fn iterations(&self) -> usize {
        self.sweeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    fn solved(m: &Mat<f64>, ordering: EigenvalueOrdering) -> QrMethod<f64> {
        let mut solver = QrMethod::new().with_ordering(ordering);
        solver.set_matrix(m.as_ref()).unwrap();
        solver.set_tolerance(1e-6);
        solver.set_max_iterations(500);
        solver.solve().unwrap();
        solver
    }

    #[test]
    fn test_full_spectrum_in_descending_magnitude() {
        let m: Mat<f64> = mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]];
        let solver = solved(&m, EigenvalueOrdering::DescendingMagnitude);
        let values = solver.eigenvalues();

        let expected = [2.0 + 2.0f64.sqrt(), 2.0, 2.0 - 2.0f64.sqrt()];
        assert_eq!(values.len(), 3);
        for (value, expected) in values.iter().zip(expected) {
            assert!((value.re - expected).abs() < 1e-8);
            assert_eq!(value.im, 0.0);
        }
        assert_eq!(solver.iterations(), 500);
    }

    #[test]
    fn test_schur_form_is_exposed() {
        let m: Mat<f64> = mat![[1.0, 2.0], [0.0, 3.0]];
        let solver = solved(&m, EigenvalueOrdering::Diagonal);
        let schur = solver.schur_form().unwrap();
        assert_eq!((schur.nrows(), schur.ncols()), (2, 2));
        assert!(schur[(1, 0)].abs() < 1e-12);

        let values = solver.eigenvalues();
        assert!((values[0].re - 1.0).abs() < 1e-12);
        assert!((values[1].re - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigenvectors_not_implemented() {
        let m: Mat<f64> = mat![[2.0, 1.0], [1.0, 2.0]];
        let solver = solved(&m, EigenvalueOrdering::default());
        let err = solver.eigenvectors().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not implemented: Eigenvectors are not supported for the QR method."
        );
    }

    #[test]
    fn test_new_matrix_clears_previous_results() {
        let m: Mat<f64> = mat![[2.0, 1.0], [1.0, 2.0]];
        let mut solver = solved(&m, EigenvalueOrdering::default());
        assert_eq!(solver.eigenvalues().len(), 2);

        solver.set_matrix(mat![[5.0]].as_ref()).unwrap();
        assert!(solver.eigenvalues().is_empty());
        assert!(solver.schur_form().is_none());
    }
}
