//! Classical iterative eigenvalue algorithms for dense matrices.
//!
//! This crate implements the power method, the inverse power method, their shifted
//! variants and the unshifted QR algorithm on top of the [`faer`] linear algebra
//! framework. Every solver is generic over the scalar field: `f32`, `f64`,
//! [`num_complex::Complex32`] and [`num_complex::Complex64`] are supported through
//! the [`Scalar`] trait.
//!
//! ## Algorithms
//!
//! **Power family** ([`PowerMethod`], [`InversePowerMethod`], [`PowerMethodWithShift`],
//! [`InversePowerMethodWithShift`]): repeatedly applies a fixed operator (`M`, `M⁻¹`,
//! `M − σI` or `(M − σI)⁻¹`) to a normalised random vector until two consecutive
//! iterates agree up to the tolerance. Each returns one eigenpair: the dominant
//! eigenvalue, the smallest in modulus, or the one closest to the shift.
//!
//! **QR method** ([`QrMethod`]): runs a fixed number of `A ← R·Q` sweeps and reads
//! the whole spectrum off the resulting quasi-triangular matrix. Conjugate pairs of
//! real matrices are recovered from the 2×2 blocks that remain on the diagonal.
//! No eigenvectors are produced.
//!
//! All solvers implement [`EigenvalueSolver`], so they can be selected at runtime
//! through [`solvers::SolverConfig`] and [`solvers::run_solver`].
//!
//! ## Example Usage
//!
//! ```rust
//! use eigensolve::{EigenvalueSolver, InversePowerMethodWithShift, QrMethod};
//! use faer::mat;
//!
//! let m = mat![[5.0f64, 2.0], [2.0, 6.0]];
//!
//! // Eigenvalue closest to 1.
//! let mut ims = InversePowerMethodWithShift::new(1.0).with_seed(Some(42));
//! ims.set_matrix(m.as_ref()).unwrap();
//! ims.set_tolerance(1e-10);
//! ims.set_max_iterations(1000);
//! ims.solve().unwrap();
//! let smallest = (11.0 - 17.0f64.sqrt()) / 2.0;
//! assert!((ims.eigenvalues()[0].re - smallest).abs() < 1e-8);
//!
//! // Whole spectrum, largest modulus first.
//! let mut qr = QrMethod::new();
//! qr.set_matrix(m.as_ref()).unwrap();
//! qr.set_tolerance(1e-6);
//! qr.set_max_iterations(200);
//! qr.solve().unwrap();
//! let values = qr.eigenvalues();
//! assert!((values[0].re - (11.0 + 17.0f64.sqrt()) / 2.0).abs() < 1e-8);
//! assert!((values[1].re - smallest).abs() < 1e-8);
//! ```

pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod scalar;
pub mod solvers;
pub mod utils;

// Re-export the main API for convenient access.
pub use error::{SolverError, SolverErrorKind};
pub use scalar::{Scalar, c64};
pub use solvers::{
    EigenvalueSolver, InversePowerMethod, InversePowerMethodWithShift, PowerMethod,
    PowerMethodWithShift, QrMethod,
};
