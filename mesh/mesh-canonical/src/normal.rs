//! Face normal strategies for nonplanar polygons.

use mesh_types::{PolyMesh, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a (possibly nonplanar) face's normal is measured.
///
/// All strategies produce an un-normalized sum; the magnitude carries no
/// meaning beyond being zero for fully degenerate faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalMode {
    /// Signed-area weighted (Newell) normal of the whole loop.
    #[default]
    Newell,

    /// Sum of `(v0 − v1) × (v1 − v2)` over every cyclic vertex triple.
    TriangleFan,

    /// Sum of `(v0 − v2) × (v1 − v3)` over every cyclic vertex quadruple.
    QuadDiagonal,
}

/// Compute the un-normalized normal of `face` using `mode`.
///
/// # Example
///
/// ```
/// use mesh_canonical::{face_normal, NormalMode};
/// use mesh_types::cube;
///
/// let mesh = cube();
/// // Face 1 is the +Z square
/// for mode in [NormalMode::Newell, NormalMode::TriangleFan, NormalMode::QuadDiagonal] {
///     let n = face_normal(&mesh, 1, mode).normalize();
///     assert!((n.z - 1.0).abs() < 1e-12);
/// }
/// ```
#[must_use]
pub fn face_normal(mesh: &PolyMesh, face: usize, mode: NormalMode) -> Vector3<f64> {
    match mode {
        NormalMode::Newell => mesh.face_normal(face),
        NormalMode::TriangleFan => triangle_fan_normal(mesh, &mesh.faces[face]),
        NormalMode::QuadDiagonal => quad_diagonal_normal(mesh, &mesh.faces[face]),
    }
}

/// Unit normal of `face` oriented away from `reference`.
///
/// The normal is flipped when it points toward `reference` as seen from the
/// face centroid. A zero normal stays zero.
#[must_use]
pub fn oriented_unit_normal(
    mesh: &PolyMesh,
    face: usize,
    mode: NormalMode,
    reference: &Point3<f64>,
) -> Vector3<f64> {
    let centroid = mesh.face_centroid(face);
    orient(unit_or_zero(face_normal(mesh, face, mode)), &centroid, reference)
}

/// Flip `normal` so that it points along `centroid − reference`.
pub(crate) fn orient(
    normal: Vector3<f64>,
    centroid: &Point3<f64>,
    reference: &Point3<f64>,
) -> Vector3<f64> {
    if normal.dot(&(centroid - reference)) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Normalize, leaving zero-length vectors unchanged.
pub(crate) fn unit_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or(v)
}

fn triangle_fan_normal(mesh: &PolyMesh, face: &[u32]) -> Vector3<f64> {
    let n = face.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let v0 = mesh.position(face[i]);
        let v1 = mesh.position(face[(i + 1) % n]);
        let v2 = mesh.position(face[(i + 2) % n]);
        normal += (v0 - v1).cross(&(v1 - v2));
    }
    normal
}

fn quad_diagonal_normal(mesh: &PolyMesh, face: &[u32]) -> Vector3<f64> {
    let n = face.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let v0 = mesh.position(face[i]);
        let v1 = mesh.position(face[(i + 1) % n]);
        let v2 = mesh.position(face[(i + 2) % n]);
        let v3 = mesh.position(face[(i + 3) % n]);
        normal += (v0 - v2).cross(&(v1 - v3));
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{octahedron, tetrahedron};

    const MODES: [NormalMode; 3] = [
        NormalMode::Newell,
        NormalMode::TriangleFan,
        NormalMode::QuadDiagonal,
    ];

    /// Square in z = 0 with one corner lifted, so the loop is not planar.
    fn warped_quad() -> PolyMesh {
        PolyMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.2),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn modes_agree_on_planar_faces() {
        let mesh = octahedron();
        for f in 0..mesh.faces.len() {
            let reference = mesh.face_normal(f).normalize();
            for mode in MODES {
                let n = face_normal(&mesh, f, mode).normalize();
                assert_relative_eq!(n, reference, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn warped_quad_normals_lean_up() {
        let mesh = warped_quad();
        for mode in MODES {
            let n = face_normal(&mesh, 0, mode).normalize();
            assert!(n.z > 0.9, "{mode:?} gave {n:?}");
        }
    }

    #[test]
    fn orientation_flips_inward_normals() {
        let mut mesh = tetrahedron();
        for face in &mut mesh.faces {
            face.reverse();
        }
        for f in 0..mesh.faces.len() {
            let n = oriented_unit_normal(&mesh, f, NormalMode::Newell, &Point3::origin());
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(n.dot(&mesh.face_centroid(f).coords) > 0.0);
        }
    }

    #[test]
    fn degenerate_face_gives_zero() {
        let mesh = PolyMesh::from_parts(
            vec![Point3::new(1.0, 1.0, 1.0); 3],
            vec![vec![0, 1, 2]],
        );
        for mode in MODES {
            let n = oriented_unit_normal(&mesh, 0, mode, &Point3::origin());
            assert_relative_eq!(n, Vector3::zeros());
        }
    }
}
