//! Termination and reporting shared by the relaxation loops.

use mesh_types::PolyMesh;
use tracing::{debug, warn};

use crate::divergence::is_diverging;
use crate::progress::{ProgressEvent, ProgressSink, Reporting};
use crate::result::{RelaxOutput, RelaxStatus};

/// Tracks iterations of one relaxation run and decides when it stops.
pub(crate) struct IterationMonitor<'a> {
    epsilon: f64,
    divergence_threshold: Option<f64>,
    reporting: Reporting,
    sink: &'a mut dyn ProgressSink,
    iterations: u32,
    max_diff: f64,
}

impl<'a> IterationMonitor<'a> {
    pub(crate) fn new(
        epsilon: f64,
        divergence_threshold: Option<f64>,
        reporting: Reporting,
        sink: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            epsilon,
            divergence_threshold,
            reporting,
            sink,
            iterations: 0,
            max_diff: 0.0,
        }
    }

    /// Record a finished iteration.
    ///
    /// `max_diff` is the largest vertex displacement (reported); `measure` is
    /// the value compared against epsilon. Returns the terminal status when
    /// the loop must stop.
    pub(crate) fn record(
        &mut self,
        mesh: &PolyMesh,
        max_diff: f64,
        measure: f64,
    ) -> Option<RelaxStatus> {
        self.iterations += 1;
        self.max_diff = max_diff;

        if self.reporting.reports_iteration(self.iterations) {
            self.sink.report(&ProgressEvent::Iteration {
                iteration: self.iterations,
                max_diff,
            });
        }

        if measure < self.epsilon {
            return Some(RelaxStatus::Converged);
        }

        if let Some(threshold) = self.divergence_threshold {
            if is_diverging(mesh, threshold) {
                warn!(
                    iteration = self.iterations,
                    threshold, "Divergence detected, stopping relaxation"
                );
                self.sink.report(&ProgressEvent::Diverged {
                    iteration: self.iterations,
                });
                return Some(RelaxStatus::Diverged);
            }
        }

        None
    }

    /// Close the run. `None` means the iteration budget ran out.
    pub(crate) fn finish(self, status: Option<RelaxStatus>) -> RelaxOutput {
        let output = RelaxOutput {
            status: status.unwrap_or(RelaxStatus::Exhausted),
            iterations: self.iterations,
            max_diff: self.max_diff,
        };

        if self.reporting.reports_summary() {
            self.sink.report(&ProgressEvent::Finished {
                iteration: output.iterations,
                max_diff: output.max_diff,
            });
        }

        debug!(
            status = %output.status,
            iterations = output.iterations,
            max_diff = output.max_diff,
            "Relaxation finished"
        );
        output
    }
}

/// Largest squared distance between matching points of two slices.
pub(crate) fn max_displacement2(
    current: &[mesh_types::Point3<f64>],
    previous: &[mesh_types::Point3<f64>],
) -> f64 {
    current
        .iter()
        .zip(previous)
        .map(|(a, b)| (a - b).norm_squared())
        .fold(0.0, f64::max)
}
