//! Edge/plane relaxation.
//!
//! Each iteration pulls every edge toward tangency with the unit sphere and
//! every non-triangular face toward its own plane:
//!
//! 1. Tangency: for edge near-point `P`, both endpoints move by
//!    `−edge_factor · (|P| − 1) · P`, then the whole mesh is translated so the
//!    near-points are centred on the origin.
//! 2. Planarity: each vertex accumulates
//!    `plane_factor · (n · (c − v)) · n` from every face it belongs to, where
//!    `n` is the face's outward unit normal and `c` its centroid. The sum is
//!    applied once all faces have been visited.
//!
//! Faces are scanned starting at `iteration mod face_count`. This only
//! changes the floating-point summation order, never the fixed point.

// Face counts and iteration numbers fit comfortably in usize
#![allow(clippy::cast_possible_truncation)]

use mesh_types::{PolyMesh, Point3, Vector3};
use tracing::debug;

use crate::edge::edge_near_point;
use crate::error::CanonicalResult;
use crate::monitor::{max_displacement2, IterationMonitor};
use crate::normal::{face_normal, orient, unit_or_zero};
use crate::params::{EdgeOrdering, PlanarParams};
use crate::progress::{ProgressSink, Reporting, TracingSink};
use crate::result::RelaxOutput;
use crate::validate::validate_mesh;

/// Relax `mesh` toward canonical (or, with `planar_only`, planar) form.
///
/// Progress goes to [`TracingSink`]; see [`relax_planar_with_sink`].
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid.
///
/// # Example
///
/// ```
/// use mesh_canonical::{relax_planar, PlanarParams};
/// use mesh_types::cube;
///
/// let mut mesh = cube();
/// let out = relax_planar(&mut mesh, &PlanarParams::canonical().with_epsilon(1e-10))?;
/// assert!(out.converged());
/// # Ok::<(), mesh_canonical::CanonicalError>(())
/// ```
pub fn relax_planar(mesh: &mut PolyMesh, params: &PlanarParams) -> CanonicalResult<RelaxOutput> {
    relax_planar_with_sink(mesh, params, &mut TracingSink)
}

/// [`relax_planar`] with an injected progress sink.
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid.
pub fn relax_planar_with_sink(
    mesh: &mut PolyMesh,
    params: &PlanarParams,
    sink: &mut dyn ProgressSink,
) -> CanonicalResult<RelaxOutput> {
    validate_mesh(mesh)?;
    params.validate()?;

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        edge_factor = params.edge_factor,
        plane_factor = params.plane_factor,
        planar_only = params.planar_only,
        "Starting edge/plane relaxation"
    );

    let edges = mesh.edges();
    let origin = Point3::origin();
    let mut deltas = vec![Vector3::zeros(); mesh.vertices.len()];
    let mut near_points = Vec::with_capacity(edges.len());

    let mut monitor = IterationMonitor::new(
        params.epsilon,
        params.divergence_threshold,
        params.reporting,
        sink,
    );
    let mut status = None;

    for iteration in 0..params.max_iterations {
        let previous = mesh.vertices.clone();

        if !params.planar_only && !edges.is_empty() {
            near_points.clear();
            let edge_count = edges.len();
            let offset =
                |p: &Point3<f64>| p.coords * (params.edge_factor * (p.coords.norm() - 1.0));

            match params.edge_ordering {
                EdgeOrdering::Sequential | EdgeOrdering::Revolving => {
                    let start = if params.edge_ordering == EdgeOrdering::Revolving {
                        iteration as usize % edge_count
                    } else {
                        0
                    };
                    for k in 0..edge_count {
                        let edge = edges[(start + k) % edge_count];
                        let p = edge_near_point(mesh, edge, &origin);
                        let shift = offset(&p);
                        mesh.vertices[edge[0] as usize] -= shift;
                        mesh.vertices[edge[1] as usize] -= shift;
                        near_points.push(p);
                    }
                }
                EdgeOrdering::Deferred => {
                    near_points.extend(edges.iter().map(|&e| edge_near_point(mesh, e, &origin)));
                    for (edge, p) in edges.iter().zip(&near_points) {
                        let shift = offset(p);
                        mesh.vertices[edge[0] as usize] -= shift;
                        mesh.vertices[edge[1] as usize] -= shift;
                    }
                }
            }

            // Re-centre against drift
            let drift: Vector3<f64> =
                near_points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / edge_count as f64;
            mesh.translate(-drift);
        }

        accumulate_plane_deltas(mesh, params, iteration as usize, &origin, &mut deltas);
        for (v, d) in mesh.vertices.iter_mut().zip(&deltas) {
            *v += *d;
        }

        let max_diff = max_displacement2(&mesh.vertices, &previous).sqrt();
        if let Some(s) = monitor.record(mesh, max_diff, max_diff) {
            status = Some(s);
            break;
        }
    }

    Ok(monitor.finish(status))
}

/// Fill `deltas` with the planarity corrections for every non-triangle face.
fn accumulate_plane_deltas(
    mesh: &PolyMesh,
    params: &PlanarParams,
    iteration: usize,
    reference: &Point3<f64>,
    deltas: &mut [Vector3<f64>],
) {
    deltas.fill(Vector3::zeros());
    let face_count = mesh.faces.len();
    for k in 0..face_count {
        let f = (k + iteration) % face_count;
        let face = &mesh.faces[f];
        // Triangles are always planar
        if face.len() == 3 {
            continue;
        }
        let centroid = mesh.face_centroid(f);
        let normal = orient(
            unit_or_zero(face_normal(mesh, f, params.normal_mode)),
            &centroid,
            reference,
        );
        for &v in face {
            let height = normal.dot(&(centroid - mesh.position(v)));
            deltas[v as usize] += normal * (params.plane_factor * height);
        }
    }
}

/// Canonicalize with the standard factors (0.3 edge, 0.5 plane, Newell
/// normals).
///
/// # Errors
///
/// Returns an error if the mesh is invalid or `epsilon` is negative.
pub fn canonicalize_mm(
    mesh: &mut PolyMesh,
    max_iterations: u32,
    reporting: Reporting,
    epsilon: f64,
) -> CanonicalResult<RelaxOutput> {
    let params = PlanarParams::canonical()
        .with_max_iterations(max_iterations)
        .with_reporting(reporting)
        .with_epsilon(epsilon);
    relax_planar(mesh, &params)
}

/// Planarize with the standard plane factor, skipping edge tangency.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or `epsilon` is negative.
pub fn planarize_mm(
    mesh: &mut PolyMesh,
    max_iterations: u32,
    reporting: Reporting,
    epsilon: f64,
) -> CanonicalResult<RelaxOutput> {
    let params = PlanarParams::planar()
        .with_max_iterations(max_iterations)
        .with_reporting(reporting)
        .with_epsilon(epsilon);
    relax_planar(mesh, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::edge_nearpoints_stats;
    use crate::{CanonicalError, NullSink, RelaxStatus};
    use approx::assert_relative_eq;
    use mesh_types::{cube, octahedron, tetrahedron};

    fn quiet(params: PlanarParams) -> PlanarParams {
        params.with_reporting(Reporting::Off)
    }

    /// Cube with one corner pushed off all three of its faces' planes.
    fn warped_cube() -> PolyMesh {
        let mut mesh = cube();
        mesh.vertices[6] += Vector3::new(0.03, -0.02, 0.05);
        mesh
    }

    fn max_face_warp(mesh: &PolyMesh) -> f64 {
        (0..mesh.faces.len())
            .map(|f| {
                let n = mesh.face_normal(f).normalize();
                let c = mesh.face_centroid(f);
                mesh.faces[f]
                    .iter()
                    .map(|&v| n.dot(&(mesh.position(v) - c)).abs())
                    .fold(0.0, f64::max)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn canonical_solids_are_fixed_points() {
        for original in [tetrahedron(), cube(), octahedron()] {
            let mut mesh = original.clone();
            let params = quiet(PlanarParams::canonical().with_epsilon(1e-10));
            let out = relax_planar_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
            assert!(out.converged());
            assert_eq!(out.iterations, 1);
            for (a, b) in mesh.vertices.iter().zip(&original.vertices) {
                assert!((a - b).norm() < 2e-10);
            }
        }
    }

    #[test]
    fn planarize_flattens_warped_faces() {
        let mut mesh = warped_cube();
        assert!(max_face_warp(&mesh) > 1e-3);

        let params = quiet(PlanarParams::planar().with_epsilon(1e-12));
        let out = relax_planar_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
        assert!(out.converged(), "{out}");
        assert!(max_face_warp(&mesh) < 1e-9);
    }

    #[test]
    fn canonicalize_restores_tangency() {
        let mut mesh = warped_cube();
        mesh.scale(1.2);

        let params = quiet(PlanarParams::canonical().with_epsilon(1e-12));
        let out = relax_planar_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
        assert!(out.converged(), "{out}");

        let stats = edge_nearpoints_stats(&mesh);
        assert_relative_eq!(stats.min, 1.0, epsilon = 1e-8);
        assert_relative_eq!(stats.max, 1.0, epsilon = 1e-8);
        assert!(max_face_warp(&mesh) < 1e-8);
    }

    #[test]
    fn orderings_reach_the_same_form() {
        for ordering in [
            EdgeOrdering::Sequential,
            EdgeOrdering::Deferred,
            EdgeOrdering::Revolving,
        ] {
            let mut mesh = warped_cube();
            let params = quiet(
                PlanarParams::canonical()
                    .with_edge_ordering(ordering)
                    .with_epsilon(1e-12),
            );
            let out = relax_planar_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
            assert!(out.converged(), "{ordering:?}: {out}");
            assert_relative_eq!(edge_nearpoints_stats(&mesh).mean, 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn triangles_skip_the_planarity_phase() {
        let mut stretched = octahedron();
        stretched.vertices[4].z *= 2.0;
        let original = stretched.clone();

        let params = quiet(PlanarParams::planar().with_max_iterations(3));
        let out = relax_planar_with_sink(&mut stretched, &params, &mut NullSink).unwrap();
        assert!(out.converged());
        assert_eq!(out.iterations, 1);
        assert_eq!(stretched, original);
    }

    #[test]
    fn budget_exhaustion() {
        let mut mesh = warped_cube();
        let params = quiet(PlanarParams::canonical().with_max_iterations(2));
        let out = relax_planar_with_sink(&mut mesh, &params, &mut NullSink).unwrap();
        assert_eq!(out.status, RelaxStatus::Exhausted);
        assert_eq!(out.iterations, 2);
        assert!(out.max_diff > 0.0);
    }

    #[test]
    fn rejects_invalid_input() {
        let mut mesh = PolyMesh::new();
        assert!(matches!(
            relax_planar(&mut mesh, &PlanarParams::default()),
            Err(CanonicalError::EmptyMesh)
        ));

        let mut mesh = cube();
        let params = PlanarParams::default().with_factors(0.0, 0.5);
        assert!(matches!(
            relax_planar(&mut mesh, &params),
            Err(CanonicalError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn wrappers_use_standard_factors() {
        let mut a = warped_cube();
        let mut b = warped_cube();
        canonicalize_mm(&mut a, 5, Reporting::Off, 1e-12).unwrap();
        relax_planar_with_sink(
            &mut b,
            &quiet(PlanarParams::canonical().with_max_iterations(5)),
            &mut NullSink,
        )
        .unwrap();
        assert_eq!(a, b);

        let mut c = warped_cube();
        let out = planarize_mm(&mut c, 10_000, Reporting::Off, 1e-12).unwrap();
        assert!(out.converged());
    }
}
