//! Writers for solver results.
//!
//! For a matrix named `<name>` a [`ResultWriter`] produces, inside its output
//! directory:
//!
//! - `<name>_values.txt`: one `(re,im)` pair per line.
//! - `<name>_eigenvalues.dat`: space separated `re im` columns, ready for gnuplot.
//! - `<name>_vectors.txt`: the eigenvector matrix, one row per line.

use crate::{
    error::{SolverError, SolverErrorKind},
    scalar::{Scalar, c64},
    solvers::EigenvalueSolver,
};
use log::{info, warn};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while writing or plotting results.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("Plot error: {0}")]
    Plot(String),
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One row of the gnuplot data file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct EigenvaluePoint {
    re: f64,
    im: f64,
}

/// Writes the result files of one matrix into one directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
    name: String,
}

impl ResultWriter {
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// `<dir>/<name>_<suffix>`.
    pub fn path_for(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{suffix}", self.name))
    }

    fn create(&self, suffix: &str) -> Result<(PathBuf, File), OutputError> {
        fs::create_dir_all(&self.dir).map_err(|e| OutputError::io(&self.dir, e))?;
        let path = self.path_for(suffix);
        let file = File::create(&path).map_err(|e| OutputError::io(&path, e))?;
        Ok((path, file))
    }

    pub fn write_values(&self, eigenvalues: &[c64]) -> Result<PathBuf, OutputError> {
        let (path, file) = self.create("values.txt")?;
        let mut out = BufWriter::new(file);
        for value in eigenvalues {
            writeln!(out, "({},{})", value.re, value.im).map_err(|e| OutputError::io(&path, e))?;
        }
        out.flush().map_err(|e| OutputError::io(&path, e))?;
        info!("Results written to file: {}", path.display());
        Ok(path)
    }

    pub fn write_gnuplot_data(&self, eigenvalues: &[c64]) -> Result<PathBuf, OutputError> {
        let (path, file) = self.create("eigenvalues.dat")?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(file);
        for value in eigenvalues {
            writer.serialize(EigenvaluePoint {
                re: value.re,
                im: value.im,
            })?;
        }
        writer.flush().map_err(|e| OutputError::io(&path, e))?;
        Ok(path)
    }

    /// Writes the eigenvectors of `solver`. Returns `Ok(None)` without creating a
    /// file when the solver does not compute eigenvectors.
    pub fn write_vectors<T: Scalar>(
        &self,
        solver: &dyn EigenvalueSolver<T>,
    ) -> Result<Option<PathBuf>, OutputError> {
        let vectors = match solver.eigenvectors() {
            Ok(vectors) => vectors,
            Err(err) if matches!(err.kind(), SolverErrorKind::NotImplemented(_)) => {
                warn!("{} does not compute eigenvectors: {err}", solver.name());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let (path, file) = self.create("vectors.txt")?;
        let mut out = BufWriter::new(file);
        for i in 0..vectors.nrows() {
            let row: Vec<String> = (0..vectors.ncols())
                .map(|j| format_entry(vectors[(i, j)]))
                .collect();
            writeln!(out, "{}", row.join(" ")).map_err(|e| OutputError::io(&path, e))?;
        }
        out.flush().map_err(|e| OutputError::io(&path, e))?;
        info!("Eigenvectors written to file: {}", path.display());
        Ok(Some(path))
    }

    /// Writes every result file the solver supports and returns their paths.
    pub fn write_all<T: Scalar>(
        &self,
        solver: &dyn EigenvalueSolver<T>,
    ) -> Result<Vec<PathBuf>, OutputError> {
        let eigenvalues = solver.eigenvalues();
        let mut written = vec![
            self.write_values(&eigenvalues)?,
            self.write_gnuplot_data(&eigenvalues)?,
        ];
        written.extend(self.write_vectors(solver)?);
        Ok(written)
    }
}

/// Real entries as plain numbers, complex ones as `re+imi` / `re-imi`.
fn format_entry<T: Scalar>(value: T) -> String {
    let z = value.to_c64();
    if !T::IS_COMPLEX {
        return format!("{}", z.re);
    }
    if z.im.is_sign_negative() {
        format!("{}-{}i", z.re, -z.im)
    } else {
        format!("{}+{}i", z.re, z.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{EigenvalueSolver, PowerMethod, QrMethod};
    use faer::{Mat, mat};

    #[test]
    fn test_entry_formatting() {
        assert_eq!(format_entry(1.5f64), "1.5");
        assert_eq!(format_entry(c64::new(1.0, -2.0)), "1-2i");
        assert_eq!(format_entry(c64::new(0.5, 3.0)), "0.5+3i");
    }

    #[test]
    fn test_values_and_gnuplot_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(dir.path().join("results"), "demo");
        let values = [c64::new(3.0, 0.0), c64::new(1.0, -2.5)];

        let path = writer.write_values(&values).unwrap();
        assert_eq!(path, dir.path().join("results").join("demo_values.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "(3,0)\n(1,-2.5)\n");

        let path = writer.write_gnuplot_data(&values).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let rows: Vec<Vec<f64>> = content
            .lines()
            .map(|line| line.split(' ').map(|x| x.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows, vec![vec![3.0, 0.0], vec![1.0, -2.5]]);
    }

    #[test]
    fn test_vectors_are_skipped_for_qr() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(dir.path(), "qr");
        let m: Mat<f64> = mat![[2.0, 1.0], [1.0, 2.0]];

        let mut solver = QrMethod::new();
        solver.set_matrix(m.as_ref()).unwrap();
        solver.set_tolerance(1e-6);
        solver.set_max_iterations(100);
        solver.solve().unwrap();

        let written = writer.write_all::<f64>(&solver).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!writer.path_for("vectors.txt").exists());
    }

    #[test]
    fn test_vectors_file_for_power_method() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(dir.path(), "pm");
        let m: Mat<f64> = mat![[2.0, 0.0], [0.0, 1.0]];

        let mut solver = PowerMethod::new().with_seed(Some(11));
        solver.set_matrix(m.as_ref()).unwrap();
        solver.set_tolerance(1e-12);
        solver.set_max_iterations(1000);
        solver.solve().unwrap();

        let path = writer.write_vectors::<f64>(&solver).unwrap().unwrap();
        let content = fs::read_to_string(path).unwrap();
        let entries: Vec<f64> = content.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(entries.len(), 2);
        assert!((entries[0].abs() - 1.0).abs() < 1e-9);
        assert!(entries[1].abs() < 1e-9);
    }
}
