//! File-backed implementations of the run collaborators.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ising_core::IsingError;
use ising_mcmc::{
    Frame, FrameRecorder, OutputConfig, Renderer, RunHooks, RunLabel, SeriesLogger, Signal,
};
use tracing::{debug, enabled, Level};

use crate::output::{csv_error, tsv_writer};

/// File stem shared by the artefacts of one run, e.g. `beta=0.4000_N=64_bias=1.22`.
pub fn run_stem(label: &RunLabel) -> String {
    format!(
        "beta={:.4}_N={}_bias={:.2}",
        label.beta, label.size, label.bias
    )
}

/// Builds the collaborators requested by `output` for one run.
pub fn hooks_for(label: &RunLabel, output: &OutputConfig) -> Result<RunHooks, IsingError> {
    let stem = output.results_dir.join(run_stem(label));
    let mut hooks = RunHooks::silent();
    if output.time_series {
        let mut path = stem.clone().into_os_string();
        path.push(".dat");
        hooks = hooks.with_logger(TsvSeriesLogger::create(PathBuf::from(path))?);
    }
    if output.frames {
        let mut dir = stem.into_os_string();
        dir.push("_frames");
        hooks = hooks.with_recorder(PgmFrameRecorder::create(PathBuf::from(dir))?);
    }
    if enabled!(Level::DEBUG) {
        hooks = hooks.with_renderer(LogRenderer);
    }
    Ok(hooks)
}

/// Writes `cycle  m  e` rows, tab separated, to a `.dat` file.
pub struct TsvSeriesLogger {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl TsvSeriesLogger {
    /// Creates (or truncates) the series file.
    pub fn create(path: PathBuf) -> Result<Self, IsingError> {
        let writer = tsv_writer(&path)?;
        Ok(Self {
            path,
            writer: Some(writer),
        })
    }
}

impl SeriesLogger for TsvSeriesLogger {
    fn append_row(&mut self, cycle: f64, magnetization: f64, energy: f64) -> Result<(), IsingError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .write_record([
                format!("{cycle:.2}"),
                format!("{magnetization:.6}"),
                format!("{energy:.6}"),
            ])
            .map_err(|err| csv_error("series-write", err, &self.path))
    }

    fn close(&mut self) -> Result<(), IsingError> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|err| IsingError::io("series-flush", err, self.path.display()))?;
        }
        Ok(())
    }
}

/// Dumps every frame as a numbered binary PGM image.
pub struct PgmFrameRecorder {
    dir: PathBuf,
    written: usize,
}

impl PgmFrameRecorder {
    /// Creates the frame directory.
    pub fn create(dir: PathBuf) -> Result<Self, IsingError> {
        fs::create_dir_all(&dir).map_err(|err| IsingError::io("frames-mkdir", err, dir.display()))?;
        Ok(Self { dir, written: 0 })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.written
    }
}

fn write_pgm(path: &Path, frame: &Frame) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "P5")?;
    if let Some(annotation) = frame.annotation {
        writeln!(
            out,
            "# cycle {:.2} m {:.6}",
            annotation.cycle, annotation.magnetization
        )?;
    }
    writeln!(out, "{} {}", frame.width, frame.height)?;
    writeln!(out, "255")?;
    out.write_all(&frame.pixels)?;
    out.flush()
}

impl FrameRecorder for PgmFrameRecorder {
    fn append_frame(&mut self, frame: &Frame) -> Result<(), IsingError> {
        let path = self.dir.join(format!("frame_{:06}.pgm", self.written));
        write_pgm(&path, frame).map_err(|err| IsingError::io("frame-write", err, path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), IsingError> {
        debug!(dir = %self.dir.display(), frames = self.frames_written(), "frame dump complete");
        Ok(())
    }
}

/// Reports snapshots through the log instead of a window.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn display(&mut self, frame: &Frame) -> Result<Signal, IsingError> {
        let up = frame.pixels.iter().filter(|&&pixel| pixel != 0).count();
        let up_fraction = up as f64 / frame.pixels.len().max(1) as f64;
        match frame.annotation {
            Some(annotation) => debug!(
                cycle = annotation.cycle,
                m = annotation.magnetization,
                up_fraction,
                "frame"
            ),
            None => debug!(up_fraction, "frame"),
        }
        Ok(Signal::Continue)
    }
}
