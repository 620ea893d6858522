//! Relaxation parameters.
//!
//! One parameter struct per engine, each with presets matching the
//! convenience entry points and `with_*` builders. With the `serde` feature
//! they can be read from configuration files.

use crate::error::{CanonicalError, CanonicalResult};
use crate::normal::NormalMode;
use crate::progress::Reporting;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Default convergence epsilon.
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Order in which the edge-tangency corrections are applied.
///
/// None of these is known to be better in general; `Deferred` sometimes
/// helps an unbalanced model that drifts under `Sequential`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeOrdering {
    /// Apply each edge's correction immediately, in edge-list order.
    /// Every iteration starts from the first edge; only `Revolving` rotates.
    #[default]
    Sequential,

    /// Compute every near-point first, then apply all corrections.
    Deferred,

    /// Apply immediately, starting the scan at `iteration mod edge_count`.
    Revolving,
}

/// How the base/dual engine moves information between the two meshes.
///
/// These are coarser than the edge/plane engine. On an irregular input
/// `ReciprocalNormal` flattens the faces but leaves the edge near-points
/// spread around the unit sphere (about ±0.5% on a warped cube), and it
/// drifts without settling unless centering is on. `ReciprocalCentroidLen2`
/// may oscillate between two shapes and use up its budget without
/// converging. Use [`crate::relax_planar`] when exact tangency is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReciprocalMethod {
    /// Polar reciprocal of each face plane, corrected by the face's mean
    /// edge near-point distance. Canonicalizes approximately.
    #[default]
    ReciprocalNormal,

    /// Face centroids divided by their squared length. Planarizes, but may
    /// not settle.
    ReciprocalCentroidLen2,

    /// Face centroids divided by their length. Planarizes.
    ReciprocalCentroidLen,

    /// Face centroids copied across without reciprocation. Planarizes and
    /// shrinks.
    FaceCentroidSwap,
}

/// Parameters for the edge/plane relaxation engine.
///
/// # Example
///
/// ```
/// use mesh_canonical::{EdgeOrdering, NormalMode, PlanarParams};
///
/// let params = PlanarParams::canonical()
///     .with_max_iterations(500)
///     .with_divergence_threshold(Some(0.5))
///     .with_edge_ordering(EdgeOrdering::Deferred)
///     .with_normal_mode(NormalMode::TriangleFan);
///
/// assert!(!params.planar_only);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanarParams {
    /// Strength of the edge-tangency correction, in (0, 1].
    pub edge_factor: f64,

    /// Strength of the face-planarity correction, in (0, 1].
    pub plane_factor: f64,

    /// Iteration budget.
    pub max_iterations: u32,

    /// Stop when the vertex radius range exceeds this. `None` never checks.
    pub divergence_threshold: Option<f64>,

    /// Progress reporting schedule.
    pub reporting: Reporting,

    /// Application order of the edge-tangency corrections.
    pub edge_ordering: EdgeOrdering,

    /// Skip the edge-tangency phase and only planarize.
    pub planar_only: bool,

    /// Face normal strategy.
    pub normal_mode: NormalMode,

    /// Stop once the largest vertex displacement falls below this.
    pub epsilon: f64,
}

impl Default for PlanarParams {
    fn default() -> Self {
        Self {
            edge_factor: 0.3,
            plane_factor: 0.5,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            divergence_threshold: None,
            reporting: Reporting::default(),
            edge_ordering: EdgeOrdering::default(),
            planar_only: false,
            normal_mode: NormalMode::Newell,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl PlanarParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tangency plus planarity with the standard factors.
    #[must_use]
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Planarity only, with the standard factors.
    #[must_use]
    pub fn planar() -> Self {
        Self {
            planar_only: true,
            ..Self::default()
        }
    }

    /// Set the correction factors.
    #[must_use]
    pub const fn with_factors(mut self, edge_factor: f64, plane_factor: f64) -> Self {
        self.edge_factor = edge_factor;
        self.plane_factor = plane_factor;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the divergence threshold.
    #[must_use]
    pub const fn with_divergence_threshold(mut self, threshold: Option<f64>) -> Self {
        self.divergence_threshold = threshold;
        self
    }

    /// Set the reporting schedule.
    #[must_use]
    pub const fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    /// Set the edge correction order.
    #[must_use]
    pub const fn with_edge_ordering(mut self, ordering: EdgeOrdering) -> Self {
        self.edge_ordering = ordering;
        self
    }

    /// Enable or disable planar-only mode.
    #[must_use]
    pub const fn with_planar_only(mut self, planar_only: bool) -> Self {
        self.planar_only = planar_only;
        self
    }

    /// Set the face normal strategy.
    #[must_use]
    pub const fn with_normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }

    /// Set the convergence epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error for a factor outside (0, 1], a negative or
    /// non-finite epsilon, or a non-positive divergence threshold.
    pub fn validate(&self) -> CanonicalResult<()> {
        check_unit_factor("edge_factor", self.edge_factor)?;
        check_unit_factor("plane_factor", self.plane_factor)?;
        check_common(self.epsilon, self.divergence_threshold)
    }
}

/// Parameters for the base/dual reciprocation engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReciprocalParams {
    /// Reciprocation rule.
    pub method: ReciprocalMethod,

    /// After each [`ReciprocalMethod::ReciprocalNormal`] step, translate by
    /// −0.1 × the edge near-point centroid to counter drift.
    pub centering: bool,

    /// Face normal strategy.
    pub normal_mode: NormalMode,

    /// Iteration budget.
    pub max_iterations: u32,

    /// Stop when the vertex radius range exceeds this. `None` never checks.
    pub divergence_threshold: Option<f64>,

    /// Progress reporting schedule.
    pub reporting: Reporting,

    /// Stop once the largest vertex displacement falls below this.
    pub epsilon: f64,
}

impl Default for ReciprocalParams {
    fn default() -> Self {
        Self {
            method: ReciprocalMethod::default(),
            centering: false,
            normal_mode: NormalMode::Newell,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            divergence_threshold: None,
            reporting: Reporting::default(),
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ReciprocalParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize by face-plane reciprocation.
    #[must_use]
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Planarize by centroid reciprocation.
    #[must_use]
    pub fn planar() -> Self {
        Self {
            method: ReciprocalMethod::ReciprocalCentroidLen2,
            ..Self::default()
        }
    }

    /// Set the reciprocation rule.
    #[must_use]
    pub const fn with_method(mut self, method: ReciprocalMethod) -> Self {
        self.method = method;
        self
    }

    /// Enable or disable drift centering.
    #[must_use]
    pub const fn with_centering(mut self, centering: bool) -> Self {
        self.centering = centering;
        self
    }

    /// Set the face normal strategy.
    #[must_use]
    pub const fn with_normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the divergence threshold.
    #[must_use]
    pub const fn with_divergence_threshold(mut self, threshold: Option<f64>) -> Self {
        self.divergence_threshold = threshold;
        self
    }

    /// Set the reporting schedule.
    #[must_use]
    pub const fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    /// Set the convergence epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite epsilon or a
    /// non-positive divergence threshold.
    pub fn validate(&self) -> CanonicalResult<()> {
        check_common(self.epsilon, self.divergence_threshold)
    }
}

/// Parameters for the unit-edge / regular-polygon relaxation engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitParams {
    /// Strength of the unit-edge-length correction.
    pub shorten_factor: f64,

    /// Strength of the face-planarity correction.
    pub plane_factor: f64,

    /// Strength of the regular-polygon radius correction.
    pub radius_factor: f64,

    /// Face normal strategy.
    pub normal_mode: NormalMode,

    /// Iteration budget.
    pub max_iterations: u32,

    /// Stop when the vertex radius range exceeds this. `None` never checks.
    pub divergence_threshold: Option<f64>,

    /// Progress reporting schedule.
    pub reporting: Reporting,

    /// Stop once the largest displacement divided by the bounding box
    /// width falls below this.
    pub epsilon: f64,
}

impl Default for UnitParams {
    fn default() -> Self {
        Self {
            shorten_factor: 1.0 / 200.0,
            plane_factor: 1.0 / 200.0,
            radius_factor: 1.0 / 200.0,
            normal_mode: NormalMode::Newell,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            divergence_threshold: None,
            reporting: Reporting::default(),
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl UnitParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the three correction factors.
    #[must_use]
    pub const fn with_factors(
        mut self,
        shorten_factor: f64,
        plane_factor: f64,
        radius_factor: f64,
    ) -> Self {
        self.shorten_factor = shorten_factor;
        self.plane_factor = plane_factor;
        self.radius_factor = radius_factor;
        self
    }

    /// Set the face normal strategy.
    #[must_use]
    pub const fn with_normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the divergence threshold.
    #[must_use]
    pub const fn with_divergence_threshold(mut self, threshold: Option<f64>) -> Self {
        self.divergence_threshold = threshold;
        self
    }

    /// Set the reporting schedule.
    #[must_use]
    pub const fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    /// Set the convergence epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive or non-finite factor, a negative
    /// or non-finite epsilon, or a non-positive divergence threshold.
    pub fn validate(&self) -> CanonicalResult<()> {
        check_positive_factor("shorten_factor", self.shorten_factor)?;
        check_positive_factor("plane_factor", self.plane_factor)?;
        check_positive_factor("radius_factor", self.radius_factor)?;
        check_common(self.epsilon, self.divergence_threshold)
    }
}

fn check_unit_factor(name: &'static str, value: f64) -> CanonicalResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(CanonicalError::InvalidFactor { name, value })
    }
}

fn check_positive_factor(name: &'static str, value: f64) -> CanonicalResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CanonicalError::InvalidFactor { name, value })
    }
}

fn check_common(epsilon: f64, divergence_threshold: Option<f64>) -> CanonicalResult<()> {
    if !(epsilon >= 0.0 && epsilon.is_finite()) {
        return Err(CanonicalError::InvalidEpsilon(epsilon));
    }
    match divergence_threshold {
        Some(t) if t.is_nan() || t <= 0.0 => Err(CanonicalError::InvalidThreshold(t)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = PlanarParams::default();
        assert!((params.edge_factor - 0.3).abs() < 1e-12);
        assert!((params.plane_factor - 0.5).abs() < 1e-12);
        assert_eq!(params.normal_mode, NormalMode::Newell);
        assert_eq!(params.edge_ordering, EdgeOrdering::Sequential);
        assert!(params.divergence_threshold.is_none());
        assert!(!params.planar_only);
    }

    #[test]
    fn test_presets() {
        assert!(PlanarParams::planar().planar_only);
        assert!(!PlanarParams::canonical().planar_only);

        assert_eq!(
            ReciprocalParams::canonical().method,
            ReciprocalMethod::ReciprocalNormal
        );
        assert_eq!(
            ReciprocalParams::planar().method,
            ReciprocalMethod::ReciprocalCentroidLen2
        );
        assert!(!ReciprocalParams::canonical().centering);

        let unit = UnitParams::default();
        assert!((unit.shorten_factor - 0.005).abs() < 1e-12);
        assert!((unit.radius_factor - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let params = ReciprocalParams::new()
            .with_method(ReciprocalMethod::FaceCentroidSwap)
            .with_centering(true)
            .with_max_iterations(5)
            .with_reporting(Reporting::Off);

        assert_eq!(params.method, ReciprocalMethod::FaceCentroidSwap);
        assert!(params.centering);
        assert_eq!(params.max_iterations, 5);
        assert_eq!(params.reporting, Reporting::Off);
    }

    #[test]
    fn test_validation() {
        assert!(PlanarParams::default().validate().is_ok());
        assert!(ReciprocalParams::default().validate().is_ok());
        assert!(UnitParams::default().validate().is_ok());

        let err = PlanarParams::new().with_factors(1.5, 0.5).validate();
        assert!(matches!(
            err,
            Err(CanonicalError::InvalidFactor {
                name: "edge_factor",
                ..
            })
        ));

        let err = PlanarParams::new().with_factors(0.3, 0.0).validate();
        assert!(matches!(
            err,
            Err(CanonicalError::InvalidFactor {
                name: "plane_factor",
                ..
            })
        ));

        let err = UnitParams::new().with_factors(0.1, f64::NAN, 0.1).validate();
        assert!(matches!(err, Err(CanonicalError::InvalidFactor { .. })));

        let err = ReciprocalParams::new().with_epsilon(-1.0).validate();
        assert!(matches!(err, Err(CanonicalError::InvalidEpsilon(_))));

        let err = ReciprocalParams::new()
            .with_divergence_threshold(Some(0.0))
            .validate();
        assert!(matches!(err, Err(CanonicalError::InvalidThreshold(_))));
    }
}
