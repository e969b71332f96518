//! Command-line driver for the eigenvalue solvers.
//!
//! Reads a Matrix Market file, runs the selected solver on it and writes the
//! result files (`<name>_values.txt`, `<name>_eigenvalues.dat` and, when the
//! solver computes them, `<name>_vectors.txt`) into the output directory.
//! With `--plot <script>` the spectrum is additionally rendered with gnuplot.
//!
//! ```text
//! eigensolve --matrix=data/matrices/sym3.mtx --solver=ims --shift=1.5
//! eigensolve --matrix=data/matrices/hermitian2.mtx --type=complex --solver=pm
//! ```

use anyhow::{Context, Result, anyhow, ensure};
use clap::{Parser, ValueEnum};
use eigensolve::{
    algorithms::qr_iteration::EigenvalueOrdering,
    scalar::{Scalar, c64},
    solvers::{
        DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, ScalarField, SolverConfig, SolverKind,
        ensure_field_matches, run_solver,
    },
    utils::{
        export::ResultWriter,
        mtx_reader::{MatrixMarket, read_matrix_market},
        plot::{GnuplotRenderer, plot_eigenvalues},
    },
};
use std::path::PathBuf;

/// The algorithm to run.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum SolverArg {
    /// QR method: the whole spectrum, no eigenvectors.
    #[clap(name = "qr")]
    Qr,
    /// Power method: dominant eigenvalue.
    #[clap(name = "pm")]
    Power,
    /// Inverse power method: eigenvalue of smallest modulus.
    #[clap(name = "im")]
    InversePower,
    /// Power method with shift (requires --shift).
    #[clap(name = "pms")]
    ShiftedPower,
    /// Inverse power method with shift: eigenvalue closest to --shift.
    #[clap(name = "ims")]
    ShiftedInversePower,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Qr => SolverKind::Qr,
            SolverArg::Power => SolverKind::Power,
            SolverArg::InversePower => SolverKind::InversePower,
            SolverArg::ShiftedPower => SolverKind::ShiftedPower,
            SolverArg::ShiftedInversePower => SolverKind::ShiftedInversePower,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ScalarType {
    Real,
    Complex,
}

/// Order of the eigenvalues reported by the QR method.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum QrOrder {
    /// Largest modulus first.
    Magnitude,
    /// As they appear on the diagonal.
    Diagonal,
}

impl From<QrOrder> for EigenvalueOrdering {
    fn from(order: QrOrder) -> Self {
        match order {
            QrOrder::Magnitude => EigenvalueOrdering::DescendingMagnitude,
            QrOrder::Diagonal => EigenvalueOrdering::Diagonal,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "eigensolve",
    about = "Computes eigenvalues of a Matrix Market matrix with the power, inverse power or QR method."
)]
struct CliArgs {
    /// Path to the input matrix (.mtx).
    #[clap(long, value_name = "PATH")]
    matrix: PathBuf,
    #[clap(long, value_enum, default_value_t = SolverArg::Qr)]
    solver: SolverArg,
    /// Scalar field the solver works in.
    #[clap(long = "type", value_enum, default_value_t = ScalarType::Real)]
    scalar_type: ScalarType,
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    #[clap(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
    /// Shift for pms/ims, e.g. `2.5`, `-1i` or `1-2i`.
    #[clap(long, value_parser = parse_complex, allow_hyphen_values = true)]
    shift: Option<c64>,
    #[clap(long, value_enum, default_value_t = QrOrder::Magnitude)]
    qr_order: QrOrder,
    /// Seed of the random starting vector.
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long, value_name = "PATH", default_value = "results")]
    output_dir: PathBuf,
    /// Renders the spectrum with `<gnuplot-dir>/plot_<SCRIPT>.gp`.
    #[clap(long, value_name = "SCRIPT")]
    plot: Option<String>,
    #[clap(long, value_name = "PATH", default_value = "gnuplot")]
    gnuplot_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = CliArgs::parse();
    log::info!("Starting eigensolve with parameters: {:?}", &args);

    let market = read_matrix_market(&args.matrix)
        .with_context(|| format!("Failed to read matrix from {:?}", &args.matrix))?;
    log::info!(
        "Loaded '{}': {}x{}, {} stored entries",
        market.name,
        market.nrows,
        market.ncols,
        market.entries.len()
    );

    match args.scalar_type {
        ScalarType::Real => {
            let shift = match args.shift {
                Some(shift) => {
                    ensure!(
                        shift.im == 0.0,
                        "Complex shift {} requires --type complex",
                        shift
                    );
                    Some(shift.re)
                }
                None => None,
            };
            solve_and_export::<f64>(&args, &market, shift)
        }
        ScalarType::Complex => solve_and_export::<c64>(&args, &market, args.shift),
    }
}

fn solve_and_export<T: Scalar>(
    args: &CliArgs,
    market: &MatrixMarket,
    shift: Option<T>,
) -> Result<()> {
    let kind = SolverKind::from(args.solver);
    ensure!(
        !kind.requires_shift() || shift.is_some(),
        "Solver '{}' requires --shift",
        kind
    );
    let matrix_field = if market.is_complex() {
        ScalarField::Complex
    } else {
        ScalarField::Real
    };
    ensure_field_matches(market.is_complex(), ScalarField::of::<T>())
        .with_context(|| format!("Use --type={matrix_field} for '{}'", market.name))?;

    let matrix = market.to_dense::<T>()?;
    let config = SolverConfig {
        kind,
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
        shift,
        ordering: args.qr_order.into(),
        seed: args.seed,
    };

    let solver = run_solver(&config, matrix.as_ref(), market.is_complex())
        .with_context(|| format!("Solver '{}' failed on '{}'", kind, market.name))?;
    log::info!(
        "{} finished after {} iterations",
        solver.name(),
        solver.iterations()
    );
    for (i, value) in solver.eigenvalues().iter().enumerate() {
        log::info!("  lambda[{i}] = {value}");
    }

    let writer = ResultWriter::new(&args.output_dir, market.name.clone());
    writer
        .write_all(&*solver)
        .with_context(|| format!("Failed to write results to {:?}", &args.output_dir))?;

    if let Some(script) = &args.plot {
        let renderer = GnuplotRenderer::new(&args.gnuplot_dir);
        plot_eigenvalues(&renderer, &writer, script)
            .with_context(|| format!("Failed to plot with script '{script}'"))?;
    }

    log::info!("Done.");
    Ok(())
}

/// Parses `a`, `bi`, `a+bi` or `a-bi` (also `i` and `-i`).
fn parse_complex(s: &str) -> Result<c64, String> {
    let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let error = || format!("Invalid scalar '{s}', expected e.g. 2.5, -1i or 1-2i");
    let parse_part = |part: &str| part.parse::<f64>().map_err(|_| error());

    let Some(body) = text.strip_suffix('i') else {
        return Ok(c64::new(parse_part(&text)?, 0.0));
    };

    // The last sign that is not the sign of an exponent separates the parts.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'));

    let (re, im) = match split {
        Some(k) => (parse_part(&body[..k])?, &body[k..]),
        None => (0.0, body),
    };
    let im = match im {
        "" | "+" => 1.0,
        "-" => -1.0,
        other => parse_part(other)?,
    };
    Ok(c64::new(re, im))
}
