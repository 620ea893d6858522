//! Reference solids in canonical form.
//!
//! Every solid here has planar faces, counter-clockwise (outward) loops, and
//! all edges tangent to the unit sphere at the origin, so each one is a fixed
//! point of the canonicalization engines.

use crate::PolyMesh;
use nalgebra::Point3;
use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

/// Regular tetrahedron with midsphere radius 1 (edge length `2√2`).
///
/// # Example
///
/// ```
/// use mesh_types::{tetrahedron, MeshTopology};
///
/// let mesh = tetrahedron();
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.face_count(), 4);
/// ```
#[must_use]
pub fn tetrahedron() -> PolyMesh {
    PolyMesh::from_parts(
        vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ],
        vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
    )
}

/// Cube with midsphere radius 1 (edge length `√2`).
#[must_use]
pub fn cube() -> PolyMesh {
    let a = FRAC_1_SQRT_2;
    PolyMesh::from_parts(
        vec![
            Point3::new(-a, -a, -a), // 0
            Point3::new(a, -a, -a),  // 1
            Point3::new(a, a, -a),   // 2
            Point3::new(-a, a, -a),  // 3
            Point3::new(-a, -a, a),  // 4
            Point3::new(a, -a, a),   // 5
            Point3::new(a, a, a),    // 6
            Point3::new(-a, a, a),   // 7
        ],
        vec![
            vec![0, 3, 2, 1], // -Z
            vec![4, 5, 6, 7], // +Z
            vec![0, 1, 5, 4], // -Y
            vec![3, 7, 6, 2], // +Y
            vec![0, 4, 7, 3], // -X
            vec![1, 2, 6, 5], // +X
        ],
    )
}

/// Regular octahedron with midsphere radius 1 (vertices at distance `√2`).
#[must_use]
pub fn octahedron() -> PolyMesh {
    let a = SQRT_2;
    PolyMesh::from_parts(
        vec![
            Point3::new(a, 0.0, 0.0),  // 0 +X
            Point3::new(-a, 0.0, 0.0), // 1 -X
            Point3::new(0.0, a, 0.0),  // 2 +Y
            Point3::new(0.0, -a, 0.0), // 3 -Y
            Point3::new(0.0, 0.0, a),  // 4 +Z
            Point3::new(0.0, 0.0, -a), // 5 -Z
        ],
        vec![
            vec![0, 2, 4],
            vec![2, 1, 4],
            vec![1, 3, 4],
            vec![3, 0, 4],
            vec![2, 0, 5],
            vec![1, 2, 5],
            vec![3, 1, 5],
            vec![0, 3, 5],
        ],
    )
}
