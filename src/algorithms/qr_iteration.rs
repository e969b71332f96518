//! Unshifted QR iteration and eigenvalue extraction.
//!
//! Each sweep factors the working matrix `A = Q·R` and replaces it with `R·Q`, a
//! similarity transform that drives `A` towards (quasi-)upper-triangular form. Real
//! matrices with complex eigenvalues never fully triangularise: a conjugate pair
//! stays behind as a 2×2 diagonal block whose sub-diagonal entry does not decay.
//! [`extract_eigenvalues`] detects these blocks and solves their characteristic
//! polynomial in `Complex64`.

use crate::scalar::{Scalar, c64};
use faer::{Mat, MatRef};
use log::debug;

/// Order in which the QR method reports eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenvalueOrdering {
    /// Largest modulus first; ties keep their diagonal order.
    #[default]
    DescendingMagnitude,
    /// The order in which the values appear on the diagonal of the final matrix.
    Diagonal,
}

impl EigenvalueOrdering {
    pub fn apply(self, values: &mut [c64]) {
        match self {
            Self::DescendingMagnitude => values.sort_by(|a, b| b.norm().total_cmp(&a.norm())),
            Self::Diagonal => {}
        }
    }
}

/// Performs one sweep: `A ↦ R·Q` where `A = Q·R`.
pub fn qr_step<T: Scalar>(matrix: MatRef<'_, T>) -> Mat<T> {
    let n = matrix.nrows();
    let qr = matrix.qr();
    let q = qr.compute_Q();
    let r_factor = qr.R();
    // Only the upper triangle of the stored factor is R.
    let r = Mat::from_fn(n, n, |i, j| {
        if i <= j {
            r_factor[(i, j)]
        } else {
            T::from_real_f64(0.0)
        }
    });
    r.as_ref() * q.as_ref()
}

/// Runs exactly `sweeps` QR sweeps on a copy of `matrix` and returns the final
/// working matrix.
pub fn qr_iteration<T: Scalar>(matrix: MatRef<'_, T>, sweeps: usize) -> Mat<T> {
    let mut working = matrix.to_owned();
    for _ in 0..sweeps {
        working = qr_step(working.as_ref());
    }
    debug!(
        "QR iteration finished after {sweeps} sweeps on a {}x{} matrix",
        working.nrows(),
        working.ncols()
    );
    working
}

/// Roots of the characteristic polynomial of `[[a, b], [c, d]]`.
pub fn block_eigenvalues(a: c64, b: c64, c: c64, d: c64) -> [c64; 2] {
    let trace = a + d;
    let determinant = a * d - b * c;
    let discriminant = (trace * trace - determinant * 4.0).sqrt();
    [(trace + discriminant) / 2.0, (trace - discriminant) / 2.0]
}

/// Reads eigenvalues off a quasi-triangular matrix in diagonal order.
///
/// Whenever the sub-diagonal entry below position `i` is larger in modulus than
/// `tolerance`, rows and columns `i, i+1` are treated as a 2×2 block and both of its
/// eigenvalues are emitted; otherwise the diagonal entry is taken as is.
pub fn extract_eigenvalues<T: Scalar>(
    schur: MatRef<'_, T>,
    tolerance: T::Magnitude,
) -> Vec<c64> {
    let n = schur.nrows();
    let mut values = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if i + 1 < n && schur[(i + 1, i)].modulus() > tolerance {
            let pair = block_eigenvalues(
                schur[(i, i)].to_c64(),
                schur[(i, i + 1)].to_c64(),
                schur[(i + 1, i)].to_c64(),
                schur[(i + 1, i + 1)].to_c64(),
            );
            values.extend(pair);
            i += 2;
        } else {
            values.push(schur[(i, i)].to_c64());
            i += 1;
        }
    }
    values
}
