//! Divergence ("crumpling") detection.
//!
//! A relaxation that is going wrong tends to implode: some vertices fall in
//! toward the centre while others stay out. The spread of vertex distances
//! from the centroid, relative to their midrange, detects this early.

use mesh_types::PolyMesh;

/// Relative spread of vertex distances from the mesh centroid.
///
/// Computes `(max − min) / ((max + min) / 2)` over the distances of all
/// vertices from the vertex centroid. Returns 0.0 for an empty mesh or when
/// every vertex sits on the centroid.
///
/// # Example
///
/// ```
/// use mesh_canonical::vertex_radius_range;
/// use mesh_types::cube;
///
/// // All cube vertices are equidistant from the centre
/// assert!(vertex_radius_range(&cube()) < 1e-12);
/// ```
#[must_use]
pub fn vertex_radius_range(mesh: &PolyMesh) -> f64 {
    let center = mesh.centroid();
    let (min, max) = mesh
        .vertices
        .iter()
        .map(|v| (v - center).norm())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

    let mid = (max + min) / 2.0;
    if mesh.vertices.is_empty() || mid <= 0.0 {
        return 0.0;
    }
    (max - min) / mid
}

/// Whether the vertex radius range exceeds `threshold`.
#[must_use]
pub fn is_diverging(mesh: &PolyMesh, threshold: f64) -> bool {
    vertex_radius_range(mesh) > threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{octahedron, Point3, Vector3};

    #[test]
    fn regular_solid_is_not_diverging() {
        let mesh = octahedron();
        assert_relative_eq!(vertex_radius_range(&mesh), 0.0, epsilon = 1e-12);
        assert!(!is_diverging(&mesh, 0.01));
    }

    #[test]
    fn stretched_solid_is_diverging() {
        let mut mesh = octahedron();
        mesh.vertices[4].z *= 5.0;
        mesh.vertices[5].z *= 5.0;
        // distances sqrt(2) and 5 sqrt(2): range 4 / midrange 3
        assert_relative_eq!(vertex_radius_range(&mesh), 4.0 / 3.0, epsilon = 1e-12);
        assert!(is_diverging(&mesh, 0.1));
        assert!(!is_diverging(&mesh, 2.0));
    }

    #[test]
    fn measured_from_centroid_not_origin() {
        let mut mesh = octahedron();
        mesh.translate(Vector3::new(10.0, -3.0, 7.0));
        assert_relative_eq!(vertex_radius_range(&mesh), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_meshes() {
        assert_relative_eq!(vertex_radius_range(&PolyMesh::new()), 0.0);

        let collapsed = PolyMesh::from_parts(vec![Point3::new(1.0, 2.0, 3.0); 4], Vec::new());
        assert_relative_eq!(vertex_radius_range(&collapsed), 0.0);
        assert!(!is_diverging(&collapsed, 0.0));
    }
}
