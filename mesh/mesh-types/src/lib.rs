//! Polygon mesh types for polyhedron relaxation.
//!
//! This crate provides the mesh collaborator consumed by the relaxation
//! engines in `mesh-canonical`:
//!
//! - [`PolyMesh`] - Vertex positions plus polygonal faces of any size
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`MeshTopology`] / [`MeshBounds`] - Read-only access traits
//! - [`tetrahedron`], [`cube`], [`octahedron`] - Reference solids
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Faces
//!
//! A face is an ordered, closed loop of at least three vertex indices.
//! Index `i` and `(i + 1) % len` form an edge. Faces need not be planar or
//! convex; star polygons are allowed.
//!
//! # Example
//!
//! ```
//! use mesh_types::{PolyMesh, Point3, MeshTopology};
//!
//! let mut mesh = PolyMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 1.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.faces.push(vec![0, 1, 2, 3]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.edges().len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod solids;
mod traits;

pub use bounds::Aabb;
pub use mesh::{Edge, PolyMesh};
pub use solids::{cube, octahedron, tetrahedron};
pub use traits::{MeshBounds, MeshTopology};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
