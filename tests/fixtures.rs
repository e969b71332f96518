//! Spectrum tests over the Matrix Market fixtures in `data/matrices/`.
//!
//! `build.rs` generates one test per `<name>.mtx` that has a `<name>.eig` next to it.
//! The `.eig` file lists the reference eigenvalues as `re im` lines in any order.
//! Each test reads the matrix with the Matrix Market reader, runs the QR method in
//! the field the file declares and matches every reference value to a distinct
//! computed one.

use anyhow::{Context, Result, ensure};
use eigensolve::{
    scalar::{Scalar, c64},
    solvers::{SolverConfig, SolverKind, run_solver},
    utils::mtx_reader::{MatrixMarket, read_matrix_market},
};
use std::{fs, path::PathBuf};

const SPECTRUM_TOLERANCE: f64 = 1e-6;

struct Fixture {
    name: String,
    mtx_path: PathBuf,
    eig_path: PathBuf,
}

fn read_reference(fixture: &Fixture) -> Result<Vec<c64>> {
    let content = fs::read_to_string(&fixture.eig_path)
        .with_context(|| format!("Failed to read {:?}", fixture.eig_path))?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> Result<c64> {
            let parts: Vec<f64> = line
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<Result<_, _>>()
                .with_context(|| format!("Malformed reference line '{line}'"))?;
            ensure!(parts.len() == 2, "Expected 're im', got '{line}'");
            Ok(c64::new(parts[0], parts[1]))
        })
        .collect()
}

fn qr_spectrum<T: Scalar>(market: &MatrixMarket) -> Result<Vec<c64>> {
    let matrix = market.to_dense::<T>()?;
    let mut config = SolverConfig::<T>::new(SolverKind::Qr);
    config.max_iterations = 2000;
    config.tolerance = 1e-8;
    let solver = run_solver(&config, matrix.as_ref(), market.is_complex())?;
    Ok(solver.eigenvalues())
}

fn run_fixture_test(fixture: &Fixture) -> Result<()> {
    let market = read_matrix_market(&fixture.mtx_path)?;
    ensure!(market.name == fixture.name, "Unexpected matrix name '{}'", market.name);
    let expected = read_reference(fixture)?;

    let mut computed = if market.is_complex() {
        qr_spectrum::<c64>(&market)?
    } else {
        qr_spectrum::<f64>(&market)?
    };
    ensure!(
        computed.len() == expected.len(),
        "{}: expected {} eigenvalues, got {}",
        fixture.name,
        expected.len(),
        computed.len()
    );

    for reference in &expected {
        let (index, distance) = computed
            .iter()
            .map(|value| (value - reference).norm())
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .context("No computed eigenvalue left to match")?;
        ensure!(
            distance < SPECTRUM_TOLERANCE,
            "{}: no eigenvalue close to {reference} (nearest is {distance:e} away)",
            fixture.name
        );
        computed.swap_remove(index);
    }
    Ok(())
}

include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));
