use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ising_core::IsingError;
use serde::{Deserialize, Serialize};

use crate::lattice::Lattice;

/// Text overlay attached to a frame before display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Cycle position at which the frame was taken.
    pub cycle: f64,
    /// Magnetization per spin at that cycle.
    pub magnetization: f64,
}

/// Grayscale snapshot of the lattice, one byte per site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Pixels per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Row-major pixel values, 0 (down) or 255 (up).
    pub pixels: Vec<u8>,
    /// Overlay set by [`Frame::annotate`].
    pub annotation: Option<Annotation>,
}

impl Frame {
    /// Projects the lattice onto a grayscale image.
    pub fn from_lattice(lattice: &Lattice) -> Self {
        Self {
            width: lattice.size(),
            height: lattice.size(),
            pixels: lattice.to_image(),
            annotation: None,
        }
    }

    /// Attaches the cycle count and magnetization overlay.
    pub fn annotate(mut self, cycle: f64, magnetization: f64) -> Self {
        self.annotation = Some(Annotation {
            cycle,
            magnetization,
        });
        self
    }
}

/// Answer from a renderer after showing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep sampling.
    Continue,
    /// Stop the run at the next opportunity.
    Cancel,
}

/// Shows frames to the user. Failures are logged and never stop a run.
pub trait Renderer {
    /// Displays one annotated frame and reports whether the user asked to stop.
    fn display(&mut self, frame: &Frame) -> Result<Signal, IsingError>;
}

/// Persists frames, e.g. as an image sequence.
pub trait FrameRecorder {
    /// Appends one frame.
    fn append_frame(&mut self, frame: &Frame) -> Result<(), IsingError>;
    /// Flushes and closes the recording at run end.
    fn finalize(&mut self) -> Result<(), IsingError>;
}

/// Receives the `(cycle, magnetization, energy)` time series.
pub trait SeriesLogger {
    /// Appends one row per emitted snapshot.
    fn append_row(&mut self, cycle: f64, magnetization: f64, energy: f64)
        -> Result<(), IsingError>;
    /// Flushes and closes the series at run end.
    fn close(&mut self) -> Result<(), IsingError>;
}

/// Shared cancellation flag polled whenever a snapshot is emitted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation for every holder of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Optional collaborators attached to a run.
#[derive(Default)]
pub struct RunHooks {
    /// Frame display.
    pub renderer: Option<Box<dyn Renderer>>,
    /// Frame persistence.
    pub recorder: Option<Box<dyn FrameRecorder>>,
    /// Time-series sink.
    pub logger: Option<Box<dyn SeriesLogger>>,
    /// Cancellation flag.
    pub cancel: CancelToken,
}

impl std::fmt::Debug for RunHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHooks")
            .field("renderer", &self.renderer.is_some())
            .field("recorder", &self.recorder.is_some())
            .field("logger", &self.logger.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl RunHooks {
    /// No collaborators and a fresh cancellation token.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Attaches a renderer.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Attaches a frame recorder.
    pub fn with_recorder(mut self, recorder: impl FrameRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    /// Attaches a series logger.
    pub fn with_logger(mut self, logger: impl SeriesLogger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Shares an existing cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Whether any attached collaborator consumes frames.
    pub fn wants_frames(&self) -> bool {
        self.renderer.is_some() || self.recorder.is_some()
    }
}
