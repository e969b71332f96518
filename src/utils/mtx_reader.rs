//! This module provides a reader for matrices stored in the Matrix Market exchange
//! format (`.mtx`).
//!
//! Both layouts of the format are supported: `coordinate` (a list of 1-based
//! `row col value` entries) and `array` (dense, column-major). Symmetric, skew-symmetric
//! and Hermitian files only store one triangle; the missing half is filled in while
//! parsing, so [`MatrixMarket::entries`] always describes the full matrix.

use crate::scalar::{Scalar, c64};
use faer::{Mat, sparse::Triplet};
use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

/// Represents all possible errors that can occur while reading a Matrix Market file.
#[derive(Error, Debug)]
pub enum MatrixReaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The path does not end in `.mtx`.
    #[error("Invalid file extension for '{0}': expected a .mtx file")]
    InvalidExtension(String),
    /// The first line is not a `%%MatrixMarket` banner.
    #[error("Format error: The '%%MatrixMarket' header line was not found.")]
    HeaderMissing,
    /// The banner names an object, format, field or symmetry this reader does not handle.
    #[error("Format error: Unsupported Matrix Market header '{0}'")]
    UnsupportedHeader(String),
    /// Occurs when a string cannot be parsed into an integer.
    #[error("Parse error: Failed to parse integer from '{0}'")]
    ParseInt(String),
    /// Occurs when a string cannot be parsed into a float.
    #[error("Parse error: Failed to parse float from '{0}'")]
    ParseFloat(String),
    /// Occurs when the end of a file is reached unexpectedly during parsing.
    #[error("Format error: Unexpected end of file while reading data.")]
    UnexpectedEof,
    #[error("Entry ({row}, {col}) lies outside a {nrows}x{ncols} matrix")]
    EntryOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    #[error("Dimension mismatch: the size line declares {expected} entries, but the file has {found}.")]
    EntryCountMismatch { expected: usize, found: usize },
    /// Complex data was requested as a real matrix.
    #[error("Field mismatch: a complex matrix cannot be read into a real scalar type")]
    FieldMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxFormat {
    Coordinate,
    Array,
}

/// Value type declared in the banner. `double` is read as `Real`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxField {
    Real,
    Integer,
    Complex,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxSymmetry {
    General,
    Symmetric,
    SkewSymmetric,
    Hermitian,
}

impl MtxSymmetry {
    fn label(self) -> &'static str {
        match self {
            MtxSymmetry::General => "general",
            MtxSymmetry::Symmetric => "symmetric",
            MtxSymmetry::SkewSymmetric => "skew-symmetric",
            MtxSymmetry::Hermitian => "hermitian",
        }
    }
}

impl fmt::Display for MtxSymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed Matrix Market file.
#[derive(Debug, Clone)]
pub struct MatrixMarket {
    /// File stem, used to name result files.
    pub name: String,
    pub nrows: usize,
    pub ncols: usize,
    pub format: MtxFormat,
    pub field: MtxField,
    pub symmetry: MtxSymmetry,
    /// 0-based entries of the full matrix. Duplicates are allowed and are summed
    /// by [`MatrixMarket::to_dense`].
    pub entries: Vec<Triplet<usize, usize, c64>>,
}

impl MatrixMarket {
    pub fn is_complex(&self) -> bool {
        self.field == MtxField::Complex
    }

    /// Assembles the dense matrix in the scalar type `T`.
    pub fn to_dense<T: Scalar>(&self) -> Result<Mat<T>, MatrixReaderError> {
        if self.is_complex() && !T::IS_COMPLEX {
            return Err(MatrixReaderError::FieldMismatch);
        }
        let mut dense = Mat::<T>::zeros(self.nrows, self.ncols);
        for entry in &self.entries {
            let value = T::from_parts(entry.val.re, entry.val.im);
            dense[(entry.row, entry.col)] = dense[(entry.row, entry.col)] + value;
        }
        Ok(dense)
    }
}

/// Reads a `.mtx` file. The matrix is named after the file stem.
pub fn read_matrix_market(path: impl AsRef<Path>) -> Result<MatrixMarket, MatrixReaderError> {
    let path = path.as_ref();
    if path.extension().and_then(|ext| ext.to_str()) != Some("mtx") {
        return Err(MatrixReaderError::InvalidExtension(
            path.display().to_string(),
        ));
    }
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::open(path)?;
    parse_matrix_market(BufReader::new(file), &name)
}

/// Parses Matrix Market content from any buffered reader.
pub fn parse_matrix_market(
    reader: impl BufRead,
    name: &str,
) -> Result<MatrixMarket, MatrixReaderError> {
    let mut lines = reader.lines();

    let banner = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(MatrixReaderError::HeaderMissing),
        }
    };
    let (format, field, symmetry) = parse_banner(&banner)?;

    // Everything after the banner: skip comments and blank lines.
    let mut data = lines.filter(|line| match line {
        Ok(line) => {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('%')
        }
        Err(_) => true,
    });

    let size_line = data.next().ok_or(MatrixReaderError::UnexpectedEof)??;
    let size: Vec<&str> = size_line.split_whitespace().collect();
    let expected_len = match format {
        MtxFormat::Coordinate => 3,
        MtxFormat::Array => 2,
    };
    if size.len() < expected_len {
        return Err(MatrixReaderError::UnexpectedEof);
    }
    let nrows = parse_int(size[0])?;
    let ncols = parse_int(size[1])?;

    if symmetry != MtxSymmetry::General && nrows != ncols {
        return Err(MatrixReaderError::UnsupportedHeader(format!(
            "{symmetry} storage of a non-square {nrows}x{ncols} matrix"
        )));
    }

    let mut entries = Vec::new();
    match format {
        MtxFormat::Coordinate => {
            let expected = parse_int(size[2])?;
            let mut found = 0;
            for line in data {
                let line = line?;
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 2 {
                    return Err(MatrixReaderError::UnexpectedEof);
                }
                let row = parse_int(parts[0])?;
                let col = parse_int(parts[1])?;
                if row == 0 || col == 0 || row > nrows || col > ncols {
                    return Err(MatrixReaderError::EntryOutOfBounds {
                        row,
                        col,
                        nrows,
                        ncols,
                    });
                }
                let value = parse_value(&parts[2..], field)?;
                push_entry(&mut entries, symmetry, row - 1, col - 1, value);
                found += 1;
            }
            if found != expected {
                return Err(MatrixReaderError::EntryCountMismatch { expected, found });
            }
        }
        MtxFormat::Array => {
            if field == MtxField::Pattern {
                return Err(MatrixReaderError::UnsupportedHeader(banner.trim().to_string()));
            }
            let positions: Vec<(usize, usize)> = (0..ncols)
                .flat_map(|col| {
                    let first_row = match symmetry {
                        MtxSymmetry::General => 0,
                        MtxSymmetry::SkewSymmetric => col + 1,
                        MtxSymmetry::Symmetric | MtxSymmetry::Hermitian => col,
                    };
                    (first_row..nrows).map(move |row| (row, col))
                })
                .collect();

            let mut found = 0;
            for line in data {
                let line = line?;
                let parts: Vec<&str> = line.split_whitespace().collect();
                let value = parse_value(&parts, field)?;
                if let Some(&(row, col)) = positions.get(found) {
                    push_entry(&mut entries, symmetry, row, col, value);
                }
                found += 1;
            }
            if found != positions.len() {
                return Err(MatrixReaderError::EntryCountMismatch {
                    expected: positions.len(),
                    found,
                });
            }
        }
    }

    Ok(MatrixMarket {
        name: name.to_string(),
        nrows,
        ncols,
        format,
        field,
        symmetry,
        entries,
    })
}

fn parse_banner(line: &str) -> Result<(MtxFormat, MtxField, MtxSymmetry), MatrixReaderError> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|token| token.to_ascii_lowercase())
        .collect();
    if tokens.first().map(String::as_str) != Some("%%matrixmarket") {
        return Err(MatrixReaderError::HeaderMissing);
    }
    let unsupported = || MatrixReaderError::UnsupportedHeader(line.trim().to_string());
    if tokens.len() != 5 || tokens[1] != "matrix" {
        return Err(unsupported());
    }

    let format = match tokens[2].as_str() {
        "coordinate" => MtxFormat::Coordinate,
        "array" => MtxFormat::Array,
        _ => return Err(unsupported()),
    };
    let field = match tokens[3].as_str() {
        "real" | "double" => MtxField::Real,
        "integer" => MtxField::Integer,
        "complex" => MtxField::Complex,
        "pattern" => MtxField::Pattern,
        _ => return Err(unsupported()),
    };
    let symmetry = match tokens[4].as_str() {
        "general" => MtxSymmetry::General,
        "symmetric" => MtxSymmetry::Symmetric,
        "skew-symmetric" => MtxSymmetry::SkewSymmetric,
        "hermitian" => MtxSymmetry::Hermitian,
        _ => return Err(unsupported()),
    };
    Ok((format, field, symmetry))
}

fn parse_int(token: &str) -> Result<usize, MatrixReaderError> {
    token
        .parse::<usize>()
        .map_err(|_| MatrixReaderError::ParseInt(token.to_string()))
}

fn parse_float(token: &str) -> Result<f64, MatrixReaderError> {
    token
        .parse::<f64>()
        .map_err(|_| MatrixReaderError::ParseFloat(token.to_string()))
}

fn parse_value(parts: &[&str], field: MtxField) -> Result<c64, MatrixReaderError> {
    let needed = match field {
        MtxField::Pattern => 0,
        MtxField::Real | MtxField::Integer => 1,
        MtxField::Complex => 2,
    };
    if parts.len() < needed {
        return Err(MatrixReaderError::UnexpectedEof);
    }
    Ok(match field {
        MtxField::Pattern => c64::new(1.0, 0.0),
        MtxField::Real | MtxField::Integer => c64::new(parse_float(parts[0])?, 0.0),
        MtxField::Complex => c64::new(parse_float(parts[0])?, parse_float(parts[1])?),
    })
}

fn push_entry(
    entries: &mut Vec<Triplet<usize, usize, c64>>,
    symmetry: MtxSymmetry,
    row: usize,
    col: usize,
    val: c64,
) {
    entries.push(Triplet { row, col, val });
    if row == col {
        return;
    }
    let mirrored = match symmetry {
        MtxSymmetry::General => return,
        MtxSymmetry::Symmetric => val,
        MtxSymmetry::SkewSymmetric => -val,
        MtxSymmetry::Hermitian => val.conj(),
    };
    entries.push(Triplet {
        row: col,
        col: row,
        val: mirrored,
    });
}
