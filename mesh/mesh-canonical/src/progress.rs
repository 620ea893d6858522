//! Progress reporting for the relaxation loops.
//!
//! Reports are a side channel: nothing the engines compute depends on them.
//! A [`ProgressSink`] is injected by the caller; the plain entry points use
//! [`TracingSink`].

use std::fmt;
use std::io::Write;

use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How often an engine emits progress events.
///
/// The divergence diagnostic is emitted under every setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Reporting {
    /// No periodic lines and no final summary.
    Off,
    /// Only the final summary.
    #[default]
    Summary,
    /// A line every `n` iterations plus the final summary. `Every(0)`
    /// behaves like [`Reporting::Summary`].
    Every(u32),
}

impl Reporting {
    /// Whether iteration `iteration` (1-based) gets a periodic line.
    #[must_use]
    pub const fn reports_iteration(self, iteration: u32) -> bool {
        match self {
            Self::Every(n) => n > 0 && iteration % n == 0,
            Self::Off | Self::Summary => false,
        }
    }

    /// Whether the final summary is emitted.
    #[must_use]
    pub const fn reports_summary(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    /// Periodic report after `iteration` completed iterations.
    Iteration {
        /// Iterations completed so far.
        iteration: u32,
        /// Largest vertex displacement of the last iteration.
        max_diff: f64,
    },

    /// The divergence monitor stopped the loop.
    Diverged {
        /// Iterations completed when the loop stopped.
        iteration: u32,
    },

    /// Final summary.
    Finished {
        /// Iterations completed in total.
        iteration: u32,
        /// Largest vertex displacement of the last iteration.
        max_diff: f64,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Iteration {
                iteration,
                max_diff,
            } => write!(f, "{iteration:<15} max_diff={max_diff:e}"),
            Self::Diverged { iteration } => write!(
                f,
                "breaking out after {iteration} iterations: radius range detected, \
                 the polyhedron is crumpling (try increasing the divergence threshold)"
            ),
            Self::Finished {
                iteration,
                max_diff,
            } => write!(f, "{iteration:<15} final max_diff={max_diff:e}"),
        }
    }
}

/// Receiver of progress events.
///
/// Implemented for any `FnMut(&ProgressEvent)` closure.
pub trait ProgressSink {
    /// Handle one event.
    fn report(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> ProgressSink for F {
    fn report(&mut self, event: &ProgressEvent) {
        self(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _event: &ProgressEvent) {}
}

/// Forwards events to `tracing`: progress at `info`, divergence at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&mut self, event: &ProgressEvent) {
        match *event {
            ProgressEvent::Iteration {
                iteration,
                max_diff,
            } => info!(iteration, max_diff, "relaxation progress"),
            ProgressEvent::Diverged { iteration } => warn!(
                iteration,
                "radius range detected, polyhedron is crumpling; try increasing the divergence threshold"
            ),
            ProgressEvent::Finished {
                iteration,
                max_diff,
            } => info!(iteration, max_diff, "relaxation finished"),
        }
    }
}

/// Writes one plain-text line per event.
///
/// A failed write is logged at debug level and the relaxation carries on.
///
/// # Example
///
/// ```
/// use mesh_canonical::{ProgressEvent, ProgressSink, WriterSink};
///
/// let mut sink = WriterSink::new(Vec::new());
/// sink.report(&ProgressEvent::Iteration { iteration: 10, max_diff: 0.5 });
/// let text = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(text.starts_with("10 "));
/// assert!(text.trim_end().ends_with("max_diff=5e-1"));
/// ```
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stderr> {
    /// A sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ProgressSink for WriterSink<W> {
    fn report(&mut self, event: &ProgressEvent) {
        if let Err(error) = writeln!(self.writer, "{event}") {
            debug!(%error, "Dropped progress line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporting_schedule() {
        assert!(Reporting::Every(5).reports_iteration(10));
        assert!(!Reporting::Every(5).reports_iteration(11));
        assert!(!Reporting::Every(0).reports_iteration(10));
        assert!(!Reporting::Summary.reports_iteration(1));
        assert!(Reporting::Summary.reports_summary());
        assert!(Reporting::Every(0).reports_summary());
        assert!(!Reporting::Off.reports_summary());
    }

    #[test]
    fn closure_sink_collects() {
        let mut events = Vec::new();
        {
            let mut sink = |e: &ProgressEvent| events.push(*e);
            sink.report(&ProgressEvent::Diverged { iteration: 3 });
        }
        assert_eq!(events, vec![ProgressEvent::Diverged { iteration: 3 }]);
    }

    #[test]
    fn writer_sink_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.report(&ProgressEvent::Iteration {
            iteration: 7,
            max_diff: 0.25,
        });
        sink.report(&ProgressEvent::Diverged { iteration: 7 });
        sink.report(&ProgressEvent::Finished {
            iteration: 7,
            max_diff: 0.25,
        });
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("7 "));
        assert!(lines[0].ends_with("max_diff=2.5e-1"));
        assert!(lines[1].contains("crumpling"));
        assert!(lines[2].contains("final max_diff=2.5e-1"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_survives_write_errors() {
        let mut sink = WriterSink::new(BrokenPipe);
        sink.report(&ProgressEvent::Diverged { iteration: 2 });
        sink.report(&ProgressEvent::Finished {
            iteration: 2,
            max_diff: 1.0,
        });
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.report(&ProgressEvent::Finished {
            iteration: 1,
            max_diff: 0.0,
        });
    }
}
