//! Result types for relaxation runs.

use std::fmt;

/// How a relaxation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxStatus {
    /// The largest per-iteration displacement fell below epsilon.
    Converged,
    /// The iteration budget ran out first.
    Exhausted,
    /// The divergence monitor stopped the loop.
    Diverged,
}

impl fmt::Display for RelaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Converged => "converged",
            Self::Exhausted => "exhausted",
            Self::Diverged => "diverged",
        })
    }
}

/// Outcome of a relaxation run. The mesh itself is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxOutput {
    /// How the loop ended.
    pub status: RelaxStatus,
    /// Number of iterations performed.
    pub iterations: u32,
    /// Largest vertex displacement in the last iteration.
    pub max_diff: f64,
}

impl RelaxOutput {
    /// Whether the run reached the convergence epsilon.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == RelaxStatus::Converged
    }

    /// Whether the divergence monitor fired.
    #[must_use]
    pub fn diverged(&self) -> bool {
        self.status == RelaxStatus::Diverged
    }
}

impl fmt::Display for RelaxOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relax: {} after {} iterations, max_diff={:e}",
            self.status, self.iterations, self.max_diff
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let out = RelaxOutput {
            status: RelaxStatus::Converged,
            iterations: 4,
            max_diff: 1e-12,
        };
        assert!(out.converged());
        assert!(!out.diverged());

        let out = RelaxOutput {
            status: RelaxStatus::Diverged,
            ..out
        };
        assert!(!out.converged());
        assert!(out.diverged());
    }

    #[test]
    fn test_display() {
        let out = RelaxOutput {
            status: RelaxStatus::Exhausted,
            iterations: 100,
            max_diff: 0.125,
        };
        let display = format!("{out}");
        assert!(display.contains("exhausted"));
        assert!(display.contains("100"));
        assert!(display.contains("1.25e-1"));
    }
}
