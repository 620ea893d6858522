//! Indexed polygon mesh.

// Vertex and face counts don't overflow f64 mantissas in practice
#![allow(clippy::cast_precision_loss)]

use crate::{Aabb, MeshBounds, MeshTopology};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An undirected edge as `[lo, hi]` vertex indices.
pub type Edge = [u32; 2];

/// An indexed polygon mesh.
///
/// Vertices are plain positions; faces are closed loops of vertex indices of
/// any length (at least three). Relaxation algorithms move the vertices in
/// place and never touch the faces.
///
/// # Example
///
/// ```
/// use mesh_types::{PolyMesh, MeshTopology, cube};
///
/// let mesh = cube();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.face_count(), 6);
/// assert_eq!(mesh.edges().len(), 12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolyMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Faces as closed loops of indices into `vertices`.
    pub faces: Vec<Vec<u32>>,
}

impl PolyMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<Vec<u32>>) -> Self {
        Self { vertices, faces }
    }

    /// Position of vertex `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn position(&self, index: u32) -> Point3<f64> {
        self.vertices[index as usize]
    }

    /// Derive the undirected edges from the face loops.
    ///
    /// Each edge is reported once as `[lo, hi]`, sorted ascending, so the
    /// order is stable for a given topology.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::tetrahedron;
    ///
    /// let edges = tetrahedron().edges();
    /// assert_eq!(edges.len(), 6);
    /// assert_eq!(edges[0], [0, 1]);
    /// ```
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .faces
            .iter()
            .flat_map(|face| face_edges(face))
            .filter(|[a, b]| a != b)
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Vector from the first to the second endpoint of an edge.
    #[inline]
    #[must_use]
    pub fn edge_vector(&self, edge: Edge) -> Vector3<f64> {
        self.position(edge[1]) - self.position(edge[0])
    }

    /// Length of an edge.
    #[inline]
    #[must_use]
    pub fn edge_length(&self, edge: Edge) -> f64 {
        self.edge_vector(edge).norm()
    }

    /// Mean length over the deduplicated edges, or 0.0 without edges.
    #[must_use]
    pub fn mean_edge_length(&self) -> f64 {
        let edges = self.edges();
        if edges.is_empty() {
            return 0.0;
        }
        edges.iter().map(|&e| self.edge_length(e)).sum::<f64>() / edges.len() as f64
    }

    /// Centroid of a face: the unweighted mean of its vertex positions.
    ///
    /// Returns the origin for an empty face.
    #[must_use]
    pub fn face_centroid(&self, face: usize) -> Point3<f64> {
        mean_point(self.faces[face].iter().map(|&v| self.position(v)))
    }

    /// Centroids of all faces, in face order.
    #[must_use]
    pub fn face_centroids(&self) -> Vec<Point3<f64>> {
        (0..self.faces.len()).map(|f| self.face_centroid(f)).collect()
    }

    /// Newell normal of a face.
    ///
    /// Sum of `v_i × v_{i+1}` around the loop, equal to twice the vector area
    /// of the polygon. Well defined for nonplanar faces. Not normalized;
    /// points outward for counter-clockwise loops.
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Vector3<f64> {
        let face = &self.faces[face];
        let n = face.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = self.position(face[i]).coords;
            let b = self.position(face[(i + 1) % n]).coords;
            normal += a.cross(&b);
        }
        normal
    }

    /// Mean of all vertex positions, or the origin for an empty mesh.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        mean_point(self.vertices.iter().copied())
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Scale every vertex uniformly about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.coords *= factor;
        }
    }
}

/// Directed edges of a face loop, normalized to `[lo, hi]`.
fn face_edges(face: &[u32]) -> impl Iterator<Item = Edge> + '_ {
    let n = face.len();
    (0..n).map(move |i| {
        let (a, b) = (face[i], face[(i + 1) % n]);
        if a <= b { [a, b] } else { [b, a] }
    })
}

/// Mean of a sequence of points, or the origin when it is empty.
fn mean_point(points: impl Iterator<Item = Point3<f64>>) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    let mut count = 0_usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        Point3::origin()
    } else {
        Point3::from(sum / count as f64)
    }
}

impl MeshTopology for PolyMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl MeshBounds for PolyMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }
}
