//! This module defines the operator abstraction and the dense helpers the solvers
//! build on.
//!
//! The power-method family never looks at individual matrix entries while it
//! iterates: every step is a single application of a fixed operator (`M`, `M⁻¹`,
//! `M − σI` or `(M − σI)⁻¹`) to the current iterate. The [`LinearOperator`] trait
//! captures exactly that action, so the shared iteration loop is written once and
//! the variants only differ in the operator they precompute.
//!
//! Vectors are `n × 1` [`Mat`]s. Products, LU and QR factorizations are delegated
//! to [`faer`]; the small reductions below (inner product, norm, displacement)
//! work on the crate's [`Scalar`] trait so that the tolerance arithmetic stays in
//! the scalar's own real type.

use crate::{error::SolverError, scalar::Scalar};
use faer::{Mat, MatRef, prelude::*};
use num_traits::{Float, Zero};
use rand::Rng;

/// Represents a linear operator that can be applied to a vector (or a matrix).
pub trait LinearOperator<T: Scalar> {
    /// Returns the number of rows of the operator.
    fn nrows(&self) -> usize;

    /// Returns the number of columns of the operator.
    fn ncols(&self) -> usize;

    /// Applies the operator to `rhs` and returns the owned product `A * rhs`.
    ///
    /// # Panics
    ///
    /// Panics if the inner dimensions do not match.
    fn apply(&self, rhs: MatRef<'_, T>) -> Mat<T>;
}

impl<'a, T: Scalar> LinearOperator<T> for MatRef<'a, T> {
    #[inline]
    fn nrows(&self) -> usize {
        (*self).nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        (*self).ncols()
    }

    #[inline]
    fn apply(&self, rhs: MatRef<'_, T>) -> Mat<T> {
        let matrix: MatRef<'_, T> = *self;
        assert_eq!(
            matrix.ncols(),
            rhs.nrows(),
            "Dimension mismatch: operator columns ({}) do not match vector rows ({}).",
            matrix.ncols(),
            rhs.nrows(),
        );
        matrix * rhs
    }
}

impl<T: Scalar> LinearOperator<T> for Mat<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.as_ref().nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.as_ref().ncols()
    }

    #[inline]
    fn apply(&self, rhs: MatRef<'_, T>) -> Mat<T> {
        self.as_ref().apply(rhs)
    }
}

/// Rejects matrices the solvers cannot work on: empty or non-square.
pub fn ensure_square<T: Scalar>(matrix: MatRef<'_, T>) -> Result<(), SolverError> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return Err(SolverError::invalid_input("Matrix cannot be empty"));
    }
    if matrix.nrows() != matrix.ncols() {
        return Err(SolverError::invalid_input(format!(
            "Matrix must be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    Ok(())
}

pub fn identity<T: Scalar>(n: usize) -> Mat<T> {
    Mat::from_fn(n, n, |i, j| {
        if i == j {
            T::from_real_f64(1.0)
        } else {
            T::from_real_f64(0.0)
        }
    })
}

/// Returns `M − σI`.
pub fn shifted<T: Scalar>(matrix: MatRef<'_, T>, shift: T) -> Mat<T> {
    Mat::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        if i == j {
            matrix[(i, j)] - shift
        } else {
            matrix[(i, j)]
        }
    })
}

/// Inverts a square matrix through an LU factorization with partial pivoting.
///
/// The backend does not report singularity itself, so the `U` factor is checked:
/// a non-finite pivot, or one with `|u_kk| ≤ n·ε·max|u_ij|`, is reported as an
/// [`Algebra`](crate::error::SolverErrorKind::Algebra) error, and so is a
/// non-finite entry in the computed inverse. Ill-conditioned but regular matrices,
/// such as `M − σI` for a shift very close to an eigenvalue, are accepted.
pub fn invert<T: Scalar>(matrix: MatRef<'_, T>) -> Result<Mat<T>, SolverError> {
    ensure_square(matrix)?;
    let n = matrix.nrows();
    let lu = matrix.partial_piv_lu();

    let u = lu.U();
    let mut largest = T::Magnitude::zero();
    for j in 0..n {
        for i in 0..=j {
            largest = largest.max(u[(i, j)].modulus());
        }
    }
    let threshold = T::magnitude_from_f64(n as f64) * T::Magnitude::epsilon() * largest;
    for k in 0..n {
        let pivot = u[(k, k)].modulus();
        if !pivot.is_finite() || pivot <= threshold {
            return Err(SolverError::algebra(format!(
                "Matrix is singular and cannot be inverted: pivot {k} is {pivot:e}"
            )));
        }
    }

    let inverse = lu.solve(&identity::<T>(n));
    let finite = (0..n).all(|j| (0..n).all(|i| inverse[(i, j)].is_finite_scalar()));
    if !finite {
        return Err(SolverError::algebra(
            "Matrix is singular and cannot be inverted",
        ));
    }
    Ok(inverse)
}

/// Hermitian inner product `⟨a, b⟩ = Σ conj(aᵢ)·bᵢ` of two column vectors.
pub fn dot<T: Scalar>(lhs: MatRef<'_, T>, rhs: MatRef<'_, T>) -> T {
    debug_assert_eq!(lhs.nrows(), rhs.nrows());
    (0..lhs.nrows()).fold(T::from_real_f64(0.0), |acc, i| {
        acc + lhs[(i, 0)].conj_scalar() * rhs[(i, 0)]
    })
}

/// Euclidean norm of a column vector.
pub fn norm<T: Scalar>(vector: MatRef<'_, T>) -> T::Magnitude {
    (0..vector.nrows())
        .fold(T::Magnitude::zero(), |acc, i| {
            acc + vector[(i, 0)].modulus_squared()
        })
        .sqrt()
}

/// Scales a column vector to unit norm, or returns `None` for a zero vector.
pub fn normalized<T: Scalar>(vector: MatRef<'_, T>) -> Option<Mat<T>> {
    let length = norm(vector);
    if !(length > T::Magnitude::zero()) || !length.is_finite() {
        return None;
    }
    let scale = T::from_modulus(length);
    Some(Mat::from_fn(vector.nrows(), 1, |i, _| vector[(i, 0)] / scale))
}

/// Distance between two unit iterates after removing their relative phase.
///
/// With `φ = ⟨prev, next⟩ / |⟨prev, next⟩|` this is `‖next − φ·prev‖`. When the
/// dominant eigenvalue is a positive real, `φ = 1` and the value is the plain
/// displacement; for negative or complex dominant eigenvalues the iterate picks up
/// a constant phase every step, which would otherwise keep the displacement away
/// from zero even though the direction has converged.
pub fn aligned_displacement<T: Scalar>(
    previous: MatRef<'_, T>,
    current: MatRef<'_, T>,
) -> T::Magnitude {
    let overlap = dot(previous, current);
    let overlap_modulus = overlap.modulus();
    let phase = if overlap_modulus > T::Magnitude::zero() {
        overlap / T::from_modulus(overlap_modulus)
    } else {
        T::from_real_f64(1.0)
    };
    let difference = Mat::from_fn(current.nrows(), 1, |i, _| {
        current[(i, 0)] - phase * previous[(i, 0)]
    });
    norm(difference.as_ref())
}

/// `‖M·v − λ·v‖` for an eigenpair estimate.
pub fn residual_norm<T: Scalar>(
    matrix: MatRef<'_, T>,
    vector: MatRef<'_, T>,
    eigenvalue: T,
) -> T::Magnitude {
    let image = matrix.apply(vector);
    let residual = Mat::from_fn(vector.nrows(), 1, |i, _| {
        image[(i, 0)] - eigenvalue * vector[(i, 0)]
    });
    norm(residual.as_ref())
}

/// Draws a random `n × 1` vector with entries uniform in `[-1, 1)`.
pub fn random_vector<T: Scalar, R: Rng + ?Sized>(n: usize, rng: &mut R) -> Mat<T> {
    Mat::from_fn(n, 1, |_, _| T::sample(rng))
}
