//! Input and output around the solvers.
//!
//! - **`mtx_reader`**: parses Matrix Market (`.mtx`) files into dense matrices.
//! - **`export`**: writes eigenvalues and eigenvectors to result files.
//! - **`plot`**: renders the eigenvalue spectrum through an injected renderer,
//!   gnuplot by default.

pub mod export;
pub mod mtx_reader;
pub mod plot;
