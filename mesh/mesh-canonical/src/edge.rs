//! Edge near-point primitives.
//!
//! The near-point of an edge is the foot of the perpendicular from a
//! reference point onto the edge's supporting line. In a canonical
//! polyhedron every near-point lies at distance 1 from the origin.

// Edge counts don't overflow f64 mantissas in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::{Edge, PolyMesh, Point3, Vector3};

/// Summary of the edge near-points of a mesh, measured from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPointStats {
    /// Mean near-point distance.
    pub mean: f64,
    /// Smallest near-point distance.
    pub min: f64,
    /// Largest near-point distance.
    pub max: f64,
    /// Centroid of the near-points.
    pub center: Point3<f64>,
}

impl Default for NearPointStats {
    fn default() -> Self {
        Self {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            center: Point3::origin(),
        }
    }
}

/// Closest point to `reference` on the line through `a` and `b`.
///
/// When `a` and `b` coincide the line is undefined and `reference` itself is
/// returned.
///
/// # Example
///
/// ```
/// use mesh_canonical::near_point;
/// use mesh_types::Point3;
///
/// let p = near_point(
///     &Point3::new(1.0, -5.0, 0.0),
///     &Point3::new(1.0, 5.0, 0.0),
///     &Point3::origin(),
/// );
/// assert_eq!(p, Point3::new(1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn near_point(a: &Point3<f64>, b: &Point3<f64>, reference: &Point3<f64>) -> Point3<f64> {
    let dir = b - a;
    let len2 = dir.norm_squared();
    if len2 == 0.0 {
        return *reference;
    }
    let t = dir.dot(&(reference - a)) / len2;
    a + dir * t
}

/// Near-point of a mesh edge relative to `reference`.
#[inline]
#[must_use]
pub fn edge_near_point(mesh: &PolyMesh, edge: Edge, reference: &Point3<f64>) -> Point3<f64> {
    near_point(&mesh.position(edge[0]), &mesh.position(edge[1]), reference)
}

/// Near-point statistics over all edges of `mesh`, measured from the origin.
///
/// Returns the default (all zero) summary for a mesh without edges.
#[must_use]
pub fn edge_nearpoints_stats(mesh: &PolyMesh) -> NearPointStats {
    let edges = mesh.edges();
    if edges.is_empty() {
        return NearPointStats::default();
    }

    let origin = Point3::origin();
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut center = Vector3::zeros();
    for &edge in &edges {
        let p = edge_near_point(mesh, edge, &origin);
        let dist = p.coords.norm();
        sum += dist;
        min = min.min(dist);
        max = max.max(dist);
        center += p.coords;
    }

    let count = edges.len() as f64;
    NearPointStats {
        mean: sum / count,
        min,
        max,
        center: Point3::from(center / count),
    }
}

/// Mean distance of the edge near-points from the origin.
///
/// # Example
///
/// ```
/// use mesh_canonical::edge_nearpoints_radius;
/// use mesh_types::cube;
///
/// let radius = edge_nearpoints_radius(&cube());
/// assert!((radius - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn edge_nearpoints_radius(mesh: &PolyMesh) -> f64 {
    edge_nearpoints_stats(mesh).mean
}

/// Centroid of the edge near-points measured from `reference`.
///
/// Returns the origin for a mesh without edges.
#[must_use]
pub fn edge_nearpoints_centroid(mesh: &PolyMesh, reference: &Point3<f64>) -> Point3<f64> {
    let edges = mesh.edges();
    if edges.is_empty() {
        return Point3::origin();
    }
    let sum: Vector3<f64> = edges
        .iter()
        .map(|&e| edge_near_point(mesh, e, reference).coords)
        .sum();
    Point3::from(sum / edges.len() as f64)
}

/// Scale `mesh` about the origin so its mean near-point distance becomes 1.
///
/// Relaxation is numerically fragile when started far from unit scale; this
/// is the usual normalization before canonicalizing. Meshes whose mean is
/// zero are left untouched.
pub fn unitize_nearpoints_radius(mesh: &mut PolyMesh) {
    let mean = edge_nearpoints_radius(mesh);
    if mean > 0.0 && mean.is_finite() {
        mesh.scale(1.0 / mean);
    }
}
