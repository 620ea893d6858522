//! Base/dual reciprocation.
//!
//! The base mesh and its dual are rebuilt from each other every iteration.
//! Dual vertex `f` is derived from base face `f` and base vertex `v` from
//! dual face `v`, so information flows base → dual → base. Depending on the
//! [`ReciprocalMethod`] the round trip canonicalizes or only planarizes.
//!
//! Unlike the edge/plane engine, faces are always scanned in index order.

// Face sizes fit comfortably in f64
#![allow(clippy::cast_precision_loss)]

use mesh_types::{PolyMesh, Point3, Vector3};
use tracing::debug;

use crate::dual::build_dual;
use crate::edge::{edge_near_point, edge_nearpoints_centroid};
use crate::error::CanonicalResult;
use crate::monitor::{max_displacement2, IterationMonitor};
use crate::normal::{oriented_unit_normal, NormalMode};
use crate::params::{ReciprocalMethod, ReciprocalParams};
use crate::progress::{ProgressSink, Reporting, TracingSink};
use crate::result::RelaxOutput;
use crate::validate::{validate_all_vertices_used, validate_closed, validate_mesh};

/// Fraction of the near-point centroid removed per iteration when centering.
const CENTERING_STEP: f64 = 0.1;

/// Relax `mesh` by repeated base/dual reciprocation.
///
/// Progress goes to [`TracingSink`]; see [`relax_reciprocal_with_sink`].
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid, if some
/// vertex belongs to no face, or if the mesh is not closed.
///
/// # Example
///
/// ```
/// use mesh_canonical::{relax_reciprocal, ReciprocalParams};
/// use mesh_types::octahedron;
///
/// let mut mesh = octahedron();
/// let out = relax_reciprocal(&mut mesh, &ReciprocalParams::canonical().with_epsilon(1e-10))?;
/// assert!(out.converged());
/// # Ok::<(), mesh_canonical::CanonicalError>(())
/// ```
pub fn relax_reciprocal(
    mesh: &mut PolyMesh,
    params: &ReciprocalParams,
) -> CanonicalResult<RelaxOutput> {
    relax_reciprocal_with_sink(mesh, params, &mut TracingSink)
}

/// [`relax_reciprocal`] with an injected progress sink.
///
/// # Errors
///
/// Returns an error if the mesh or the parameters are invalid, if some
/// vertex belongs to no face, or if the mesh is not closed.
pub fn relax_reciprocal_with_sink(
    mesh: &mut PolyMesh,
    params: &ReciprocalParams,
    sink: &mut dyn ProgressSink,
) -> CanonicalResult<RelaxOutput> {
    validate_mesh(mesh)?;
    validate_all_vertices_used(mesh)?;
    validate_closed(mesh)?;
    params.validate()?;

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        method = ?params.method,
        centering = params.centering,
        "Starting base/dual relaxation"
    );

    // Positions are overwritten on the first iteration
    let mut dual = build_dual(mesh);
    let origin = Point3::origin();

    let mut monitor = IterationMonitor::new(
        params.epsilon,
        params.divergence_threshold,
        params.reporting,
        sink,
    );
    let mut status = None;

    for _ in 0..params.max_iterations {
        let previous = mesh.vertices.clone();

        match params.method {
            ReciprocalMethod::ReciprocalNormal => {
                dual.vertices = reciprocal_normals(mesh, params.normal_mode);
                mesh.vertices = reciprocal_normals(&dual, params.normal_mode);
                if params.centering {
                    let drift = edge_nearpoints_centroid(mesh, &origin);
                    mesh.translate(drift.coords * -CENTERING_STEP);
                }
            }
            ReciprocalMethod::ReciprocalCentroidLen2 | ReciprocalMethod::ReciprocalCentroidLen => {
                let squared = params.method == ReciprocalMethod::ReciprocalCentroidLen2;
                dual.vertices = reciprocal_centroids(mesh, squared);
                let dual_center = dual.centroid();
                dual.translate(-dual_center.coords);
                mesh.vertices = reciprocal_centroids(&dual, squared);
                let center = mesh.centroid();
                mesh.translate(-center.coords);
            }
            ReciprocalMethod::FaceCentroidSwap => {
                dual.vertices = mesh.face_centroids();
                mesh.vertices = dual.face_centroids();
            }
        }

        let max_diff = max_displacement2(&mesh.vertices, &previous).sqrt();
        if let Some(s) = monitor.record(mesh, max_diff, max_diff) {
            status = Some(s);
            break;
        }
    }

    Ok(monitor.finish(status))
}

/// One point per face: the pole of the face plane with respect to the unit
/// sphere, pulled toward or away from the origin by the face's RMS edge
/// near-point distance.
///
/// A face whose plane passes through the origin has no pole; its foot point
/// is used unchanged.
fn reciprocal_normals(mesh: &PolyMesh, mode: NormalMode) -> Vec<Point3<f64>> {
    let origin = Point3::origin();
    (0..mesh.faces.len())
        .map(|f| {
            let face = &mesh.faces[f];
            let n = face.len();
            let normal = oriented_unit_normal(mesh, f, mode, &origin);
            let centroid = mesh.face_centroid(f);

            let mean_sq = (0..n)
                .map(|i| {
                    edge_near_point(mesh, [face[i], face[(i + 1) % n]], &origin)
                        .coords
                        .norm_squared()
                })
                .sum::<f64>()
                / n as f64;
            let edge_radius = mean_sq.sqrt();

            let foot = normal * centroid.coords.dot(&normal);
            Point3::from(invert(foot, foot.norm_squared()) * ((1.0 + edge_radius) / 2.0))
        })
        .collect()
}

/// Face centroids divided by their squared length (`squared`) or length.
fn reciprocal_centroids(mesh: &PolyMesh, squared: bool) -> Vec<Point3<f64>> {
    mesh.face_centroids()
        .into_iter()
        .map(|c| {
            let len2 = c.coords.norm_squared();
            let divisor = if squared { len2 } else { len2.sqrt() };
            Point3::from(invert(c.coords, divisor))
        })
        .collect()
}

/// `v / divisor`, or `v` itself when the divisor is zero.
fn invert(v: Vector3<f64>, divisor: f64) -> Vector3<f64> {
    if divisor > 0.0 {
        v / divisor
    } else {
        v
    }
}

/// Canonicalize by face-plane reciprocation, without centering.
///
/// Faces come out planar, but edges are only roughly tangent and an
/// irregular mesh may drift until `max_iterations` runs out. Enable
/// centering through [`ReciprocalParams`] to make it settle.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or `epsilon` is negative.
pub fn canonicalize_bd(
    mesh: &mut PolyMesh,
    max_iterations: u32,
    reporting: Reporting,
    epsilon: f64,
) -> CanonicalResult<RelaxOutput> {
    let params = ReciprocalParams::canonical()
        .with_max_iterations(max_iterations)
        .with_reporting(reporting)
        .with_epsilon(epsilon);
    relax_reciprocal(mesh, &params)
}

/// Planarize by reciprocating face centroids (squared-length form).
///
/// On irregular meshes this can oscillate slowly and end
/// [`crate::RelaxStatus::Exhausted`] even though the faces are flat.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or `epsilon` is negative.
pub fn planarize_bd(
    mesh: &mut PolyMesh,
    max_iterations: u32,
    reporting: Reporting,
    epsilon: f64,
) -> CanonicalResult<RelaxOutput> {
    let params = ReciprocalParams::planar()
        .with_max_iterations(max_iterations)
        .with_reporting(reporting)
        .with_epsilon(epsilon);
    relax_reciprocal(mesh, &params)
}
