//! Plotting of eigenvalue spectra.
//!
//! Rendering is a capability handed to [`plot_eigenvalues`] from outside; the
//! solvers never plot. [`GnuplotRenderer`] is the stock implementation: it fills
//! the `DATA_FILE` and `OUTPUT_FILE` placeholders of a script template
//! `<script_dir>/plot_<script>.gp` and runs `gnuplot` on the result.

use super::export::{OutputError, ResultWriter};
use log::{debug, info};
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

pub trait PlotRenderer {
    /// Renders `data_file` with the named script into `output_file`.
    fn render(&self, script: &str, data_file: &Path, output_file: &Path)
        -> Result<(), OutputError>;
}

#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    script_dir: PathBuf,
    program: OsString,
}

impl GnuplotRenderer {
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
            program: OsString::from("gnuplot"),
        }
    }

    /// Runs `program` instead of `gnuplot`.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn script_path(&self, script: &str) -> PathBuf {
        self.script_dir.join(format!("plot_{script}.gp"))
    }
}

impl PlotRenderer for GnuplotRenderer {
    fn render(
        &self,
        script: &str,
        data_file: &Path,
        output_file: &Path,
    ) -> Result<(), OutputError> {
        let script_path = self.script_path(script);
        let template = fs::read_to_string(&script_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => OutputError::Plot(format!(
                "Gnuplot script not found: {}",
                script_path.display()
            )),
            _ => OutputError::io(&script_path, e),
        })?;
        let contents = template
            .replace("DATA_FILE", &data_file.display().to_string())
            .replace("OUTPUT_FILE", &output_file.display().to_string());

        let temp_script = output_file.with_extension("gp");
        fs::write(&temp_script, contents).map_err(|e| OutputError::io(&temp_script, e))?;
        debug!(
            "running {} on {}",
            self.program.to_string_lossy(),
            temp_script.display()
        );

        let status = Command::new(&self.program).arg(&temp_script).status();
        // Remove the script whatever the exit status.
        if let Err(e) = fs::remove_file(&temp_script) {
            debug!(
                "could not remove temporary script {}: {e}",
                temp_script.display()
            );
        }

        let status = status.map_err(|e| {
            OutputError::Plot(format!(
                "Failed to run {}: {e}",
                self.program.to_string_lossy()
            ))
        })?;
        if !status.success() {
            return Err(OutputError::Plot(format!(
                "{} exited with {status}",
                self.program.to_string_lossy()
            )));
        }
        Ok(())
    }
}

/// Plots the gnuplot data file of `writer` into `<dir>/<name>_<script>.png`.
///
/// The data file must already have been written with
/// [`ResultWriter::write_gnuplot_data`].
pub fn plot_eigenvalues(
    renderer: &dyn PlotRenderer,
    writer: &ResultWriter,
    script: &str,
) -> Result<PathBuf, OutputError> {
    let data_file = writer.path_for("eigenvalues.dat");
    if !data_file.exists() {
        return Err(OutputError::Plot(format!(
            "Eigenvalue data file not found: {}",
            data_file.display()
        )));
    }
    let output_file = writer.path_for(&format!("{script}.png"));
    renderer.render(script, &data_file, &output_file)?;
    info!("Plot written to file: {}", output_file.display());
    Ok(output_file)
}
