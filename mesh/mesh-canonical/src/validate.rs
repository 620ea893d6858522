//! Input validation for the relaxation engines.

use hashbrown::HashSet;
use mesh_types::{MeshTopology, PolyMesh};

use crate::error::{CanonicalError, CanonicalResult};

/// Check that `mesh` is something the engines can relax.
///
/// Requires at least one vertex and one face, every face to have at least
/// three vertices, and every face index to be in range.
///
/// # Errors
///
/// Returns the first problem found, scanning faces in order.
///
/// # Example
///
/// ```
/// use mesh_canonical::{validate_mesh, CanonicalError};
/// use mesh_types::{cube, PolyMesh};
///
/// assert!(validate_mesh(&cube()).is_ok());
/// assert!(matches!(validate_mesh(&PolyMesh::new()), Err(CanonicalError::EmptyMesh)));
/// ```
pub fn validate_mesh(mesh: &PolyMesh) -> CanonicalResult<()> {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return Err(CanonicalError::EmptyMesh);
    }
    if mesh.face_count() == 0 {
        return Err(CanonicalError::NoFaces);
    }

    for (face, indices) in mesh.faces.iter().enumerate() {
        if indices.len() < 3 {
            return Err(CanonicalError::DegenerateFace {
                face,
                len: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(CanonicalError::InvalidVertexIndex {
                face,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Check that every vertex is used by at least one face.
///
/// The base/dual engine rebuilds each base vertex from its dual face, so an
/// unused vertex has nothing to be rebuilt from.
///
/// # Errors
///
/// Returns [`CanonicalError::UnusedVertex`] for the lowest unused index.
pub fn validate_all_vertices_used(mesh: &PolyMesh) -> CanonicalResult<()> {
    let mut used = vec![false; mesh.vertices.len()];
    for &v in mesh.faces.iter().flatten() {
        if let Some(slot) = used.get_mut(v as usize) {
            *slot = true;
        }
    }
    match used.iter().position(|&u| !u) {
        Some(vertex) => Err(CanonicalError::UnusedVertex { vertex }),
        None => Ok(()),
    }
}

/// Check that every vertex is surrounded by a closed ring of at least
/// three faces.
///
/// A vertex fails when one of its edges is used in only one direction (an
/// open boundary) or when it belongs to fewer than three face corners. Its
/// dual face would then have no plane to reciprocate.
///
/// # Errors
///
/// Returns [`CanonicalError::OpenBoundary`] for the lowest such vertex.
///
/// # Example
///
/// ```
/// use mesh_canonical::{validate_closed, CanonicalError};
/// use mesh_types::cube;
///
/// let mut open = cube();
/// open.faces.remove(1);
/// assert!(validate_closed(&cube()).is_ok());
/// assert!(matches!(
///     validate_closed(&open),
///     Err(CanonicalError::OpenBoundary { vertex: 4 })
/// ));
/// ```
pub fn validate_closed(mesh: &PolyMesh) -> CanonicalResult<()> {
    let directed: HashSet<(u32, u32)> = mesh
        .faces
        .iter()
        .flat_map(|face| loop_edges(face))
        .collect();

    let mut corners = vec![0_usize; mesh.vertices.len()];
    let mut open = vec![false; mesh.vertices.len()];
    for (a, b) in mesh.faces.iter().flat_map(|face| loop_edges(face)) {
        if let Some(count) = corners.get_mut(a as usize) {
            *count += 1;
        }
        if !directed.contains(&(b, a)) {
            for v in [a, b] {
                if let Some(flag) = open.get_mut(v as usize) {
                    *flag = true;
                }
            }
        }
    }

    match (0..mesh.vertices.len()).find(|&v| open[v] || corners[v] < 3) {
        Some(vertex) => Err(CanonicalError::OpenBoundary { vertex }),
        None => Ok(()),
    }
}

/// Directed edges `(v_i, v_{i+1})` of a face loop.
fn loop_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.len();
    (0..n).map(move |i| (face[i], face[(i + 1) % n]))
}
