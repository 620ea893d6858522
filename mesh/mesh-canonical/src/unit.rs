//! Unit-edge / regular-polygon relaxation ("minmax unit").
//!
//! Pulls every edge toward length 1, every face toward its plane, and every
//! face vertex toward the circumradius of the regular (possibly star) polygon
//! with the same side count and density. All three corrections accumulate
//! into one offset buffer that is applied once per iteration.
//!
//! Convergence is measured relative to the bounding box width, so the
//! epsilon is scale independent.

// Face sizes and iteration numbers fit comfortably in f64 and usize
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::f64::consts::{PI, TAU};

use mesh_types::{MeshBounds, PolyMesh, Point3, Vector3};
use tracing::debug;

use crate::error::CanonicalResult;
use crate::monitor::IterationMonitor;
use crate::normal::{oriented_unit_normal, unit_or_zero};
use crate::params::UnitParams;
use crate::progress::{ProgressSink, Reporting, TracingSink};
use crate::result::RelaxOutput;
use crate::validate::validate_mesh;

/// Winding number of a face around its centroid.
///
/// Angles are measured in the plane of the face's Newell normal, so a convex
/// polygon has density 1 and a pentagram `{5/2}` density 2. Returns 0 when
/// the face has no usable normal.
///
/// # Example
///
/// ```
/// use mesh_canonical::polygon_density;
/// use mesh_types::cube;
///
/// assert_eq!(polygon_density(&cube(), 0), 1);
/// ```
#[must_use]
pub fn polygon_density(mesh: &PolyMesh, face: usize) -> i64 {
    let normal = unit_or_zero(mesh.face_normal(face));
    if normal == Vector3::zeros() {
        return 0;
    }

    let centroid = mesh.face_centroid(face);
    let indices = &mesh.faces[face];
    let n = indices.len();
    let turned: f64 = (0..n)
        .map(|i| {
            let a = mesh.position(indices[i]) - centroid;
            let b = mesh.position(indices[(i + 1) % n]) - centroid;
            normal.dot(&a.cross(&b)).atan2(a.dot(&b))
        })
        .sum();

    (turned / TAU).round() as i64
}

/// Circumradius of a regular `{sides/density}` polygon with unit edges.
///
/// `0.5 / sin(π·D/N)` with `D = |density|`. A density of zero, or one that
/// makes the polygon degenerate, is treated as 1. `sides` must be at least 3.
///
/// # Example
///
/// ```
/// use mesh_canonical::regular_circumradius;
///
/// // Unit square: half the diagonal
/// assert!((regular_circumradius(4, 1) - 0.5_f64.sqrt()).abs() < 1e-12);
/// ```
#[must_use]
pub fn regular_circumradius(sides: usize, density: i64) -> f64 {
    let n = sides as f64;
    let radius = |d: f64| 0.5 / (PI * d / n).sin();

    let d = density.unsigned_abs() as f64;
    if d == 0.0 || d % n == 0.0 {
        return radius(1.0);
    }
    let r = radius(d);
    if r.is_finite() {
        r
    } else {
        radius(1.0)
    }
}

/// Relax `mesh` toward unit edges, planar faces and regular face shapes.
///
/// The mesh is first scaled so its mean edge length is 1; the result stays at
/// that scale. Progress goes to [`TracingSink`]; see
/// [`relax_unit_with_sink`].
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid.
pub fn relax_unit(mesh: &mut PolyMesh, params: &UnitParams) -> CanonicalResult<RelaxOutput> {
    relax_unit_with_sink(mesh, params, &mut TracingSink)
}

/// [`relax_unit`] with an injected progress sink.
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid.
pub fn relax_unit_with_sink(
    mesh: &mut PolyMesh,
    params: &UnitParams,
    sink: &mut dyn ProgressSink,
) -> CanonicalResult<RelaxOutput> {
    validate_mesh(mesh)?;
    params.validate()?;

    let mean = mesh.mean_edge_length();
    if mean > 0.0 && mean.is_finite() {
        mesh.scale(1.0 / mean);
    }

    let radii: Vec<f64> = (0..mesh.faces.len())
        .map(|f| regular_circumradius(mesh.faces[f].len(), polygon_density(mesh, f)))
        .collect();

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        initial_scale = mean,
        shorten_factor = params.shorten_factor,
        plane_factor = params.plane_factor,
        radius_factor = params.radius_factor,
        "Starting unit-edge relaxation"
    );

    let mut offsets = vec![Vector3::zeros(); mesh.vertices.len()];
    let mut monitor = IterationMonitor::new(
        params.epsilon,
        params.divergence_threshold,
        params.reporting,
        sink,
    );
    let mut status = None;

    for iteration in 0..params.max_iterations {
        accumulate_offsets(mesh, params, &radii, iteration as usize, &mut offsets);
        for (v, d) in mesh.vertices.iter_mut().zip(&offsets) {
            *v += *d;
        }

        let max_diff = offsets.iter().map(|d| d.norm()).fold(0.0, f64::max);
        let width = mesh.bounds().max_extent();
        let measure = if width > 0.0 { max_diff / width } else { max_diff };
        if let Some(s) = monitor.record(mesh, max_diff, measure) {
            status = Some(s);
            break;
        }
    }

    Ok(monitor.finish(status))
}

/// Fill `offsets` with the three corrections for one iteration.
///
/// Faces start at `iteration mod face_count` and each face's vertices at
/// `iteration mod face_len`. Interior edges are visited once per adjacent
/// face.
fn accumulate_offsets(
    mesh: &PolyMesh,
    params: &UnitParams,
    radii: &[f64],
    iteration: usize,
    offsets: &mut [Vector3<f64>],
) {
    offsets.fill(Vector3::zeros());
    let origin = Point3::origin();
    let face_count = mesh.faces.len();

    for k in 0..face_count {
        let f = (k + iteration) % face_count;
        let face = &mesh.faces[f];
        let n = face.len();
        let normal = oriented_unit_normal(mesh, f, params.normal_mode, &origin);
        let centroid = mesh.face_centroid(f);

        for j in 0..n {
            let i = (j + iteration) % n;
            let v = face[i];
            let w = face[(i + 1) % n];
            let (lo, hi) = if v <= w { (v, w) } else { (w, v) };

            let edge = mesh.position(hi) - mesh.position(lo);
            let stretch = edge * ((1.0 - edge.norm()) * params.shorten_factor);
            offsets[lo as usize] -= stretch;
            offsets[hi as usize] += stretch;

            let p = mesh.position(v);
            offsets[v as usize] += normal * (params.plane_factor * normal.dot(&(centroid - p)));

            let radial = p - centroid;
            offsets[v as usize] += radial * ((radii[f] - radial.norm()) * params.radius_factor);
        }
    }
}

/// Unit-edge relaxation with all factors at 1/200 and Newell normals.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or `epsilon` is negative.
pub fn minmax_unit_planar(
    mesh: &mut PolyMesh,
    max_iterations: u32,
    reporting: Reporting,
    epsilon: f64,
) -> CanonicalResult<RelaxOutput> {
    let params = UnitParams::default()
        .with_max_iterations(max_iterations)
        .with_reporting(reporting)
        .with_epsilon(epsilon);
    relax_unit(mesh, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressEvent;
    use crate::{NullSink, RelaxStatus};
    use approx::assert_relative_eq;
    use mesh_types::{cube, octahedron, tetrahedron};

    fn quiet(params: UnitParams) -> UnitParams {
        params.with_reporting(Reporting::Off)
    }

    fn pentagram() -> PolyMesh {
        let vertices = (0_u32..5)
            .map(|k| {
                let a = PI / 2.0 + f64::from(k) * TAU / 5.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        PolyMesh::from_parts(vertices, vec![vec![0, 2, 4, 1, 3]])
    }

    #[test]
    fn densities() {
        assert_eq!(polygon_density(&cube(), 0), 1);
        assert_eq!(polygon_density(&tetrahedron(), 2), 1);
        assert_eq!(polygon_density(&pentagram(), 0), 2);

        let mut reversed = pentagram();
        reversed.faces[0].reverse();
        assert_eq!(polygon_density(&reversed, 0), 2);
    }

    #[test]
    fn circumradii() {
        assert_relative_eq!(regular_circumradius(3, 1), 1.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(regular_circumradius(6, 1), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            regular_circumradius(5, 2),
            0.5 / (2.0 * PI / 5.0).sin(),
            epsilon = 1e-12
        );
        // Zero and negative densities
        assert_relative_eq!(regular_circumradius(6, 0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            regular_circumradius(5, -2),
            regular_circumradius(5, 2),
            epsilon = 1e-12
        );
        // Density equal to the side count is degenerate
        assert_relative_eq!(regular_circumradius(4, 4), regular_circumradius(4, 1));
    }

    #[test]
    fn regular_solids_are_fixed_points() {
        for original in [tetrahedron(), cube(), octahedron()] {
            let mut expected = original.clone();
            expected.scale(1.0 / original.mean_edge_length());

            let mut mesh = original;
            let params = quiet(UnitParams::default().with_epsilon(1e-10));
            let out = relax_unit_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
            assert!(out.converged(), "{out}");
            assert_eq!(out.iterations, 1);
            for (a, b) in mesh.vertices.iter().zip(&expected.vertices) {
                assert!((a - b).norm() < 2e-10);
            }
        }
    }

    #[test]
    fn perturbed_cube_returns_to_unit_edges() {
        let mut mesh = cube();
        mesh.vertices[6] += Vector3::new(0.03, -0.02, 0.05);

        let params = quiet(
            UnitParams::default()
                .with_max_iterations(100_000)
                .with_epsilon(1e-10),
        );
        let out = relax_unit_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
        assert!(out.converged(), "{out}");
        for edge in mesh.edges() {
            assert_relative_eq!(mesh.edge_length(edge), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn stretched_mesh_trips_divergence() {
        let mut mesh = octahedron();
        mesh.vertices[4].z *= 5.0;
        mesh.vertices[5].z *= 5.0;

        let mut events = Vec::new();
        let mut sink = |e: &ProgressEvent| events.push(*e);
        let params = quiet(UnitParams::default().with_divergence_threshold(Some(0.1)));
        let out = relax_unit_with_sink(&mut mesh, &params, &mut sink).unwrap();
        assert_eq!(out.status, RelaxStatus::Diverged);
        assert_eq!(out.iterations, 1);
        assert_eq!(events, vec![ProgressEvent::Diverged { iteration: 1 }]);
    }

    #[test]
    fn periodic_reports() {
        let mut mesh = cube();
        mesh.vertices[0].x += 0.1;

        let mut events = Vec::new();
        let mut sink = |e: &ProgressEvent| events.push(*e);
        let params = UnitParams::default()
            .with_max_iterations(10)
            .with_reporting(Reporting::Every(5));
        let out = relax_unit_with_sink(&mut mesh, &params, &mut sink).unwrap();
        assert_eq!(out.status, RelaxStatus::Exhausted);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ProgressEvent::Iteration { iteration: 5, .. }));
        assert!(matches!(events[1], ProgressEvent::Iteration { iteration: 10, .. }));
        assert!(matches!(events[2], ProgressEvent::Finished { iteration: 10, .. }));
    }

    #[test]
    fn wrapper_uses_default_factors() {
        let mut a = cube();
        a.vertices[1].y += 0.05;
        let mut b = a.clone();
        minmax_unit_planar(&mut a, 20, Reporting::Off, 1e-12).unwrap();
        relax_unit_with_sink(
            &mut b,
            &quiet(UnitParams::default().with_max_iterations(20)),
            &mut NullSink,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
