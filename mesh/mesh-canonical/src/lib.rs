//! Planarization and canonicalization of polyhedral meshes.
//!
//! A polyhedron is *canonical* when every face is planar and every edge is
//! tangent to the unit sphere at the origin. This crate drives a polygon mesh
//! toward that form (or toward planarity alone) by iterative relaxation.
//!
//! # Engines
//!
//! - **Edge/plane** ([`relax_planar`]): pulls each edge's near-point onto the
//!   unit sphere and each vertex onto its faces' planes.
//! - **Base/dual** ([`relax_reciprocal`]): rebuilds the mesh from its dual
//!   by polar reciprocation every iteration. Faster per step but only
//!   approximately tangent; see [`ReciprocalMethod`].
//! - **Unit edge** ([`relax_unit`]): drives edges to length 1 and faces to
//!   regular, planar polygons.
//!
//! Each engine has a `*_with_sink` form taking a [`ProgressSink`], and
//! shorthand wrappers ([`canonicalize_mm`], [`planarize_mm`],
//! [`canonicalize_bd`], [`planarize_bd`], [`minmax_unit_planar`]) with the
//! standard factors.
//!
//! # Termination
//!
//! A run ends when the per-iteration displacement drops below epsilon
//! ([`RelaxStatus::Converged`]), when the iteration budget runs out
//! ([`RelaxStatus::Exhausted`]), or when the optional divergence monitor sees
//! the vertex radius range blow up ([`RelaxStatus::Diverged`]). Only invalid
//! input is an error.
//!
//! # Example
//!
//! ```
//! use mesh_canonical::{relax_planar, unitize_nearpoints_radius, PlanarParams, Reporting};
//! use mesh_types::cube;
//!
//! let mut mesh = cube();
//! mesh.vertices[6].z += 0.05;
//! mesh.scale(3.0);
//! unitize_nearpoints_radius(&mut mesh);
//!
//! let params = PlanarParams::canonical()
//!     .with_epsilon(1e-10)
//!     .with_reporting(Reporting::Off);
//! let out = relax_planar(&mut mesh, &params)?;
//! assert!(out.converged());
//! # Ok::<(), mesh_canonical::CanonicalError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod divergence;
mod dual;
mod edge;
mod error;
mod monitor;
mod normal;
mod params;
mod planar;
mod progress;
mod reciprocal;
mod result;
mod unit;
mod validate;

pub use divergence::{is_diverging, vertex_radius_range};
pub use dual::build_dual;
pub use edge::{
    edge_near_point, edge_nearpoints_centroid, edge_nearpoints_radius, edge_nearpoints_stats,
    near_point, unitize_nearpoints_radius, NearPointStats,
};
pub use error::{CanonicalError, CanonicalResult};
pub use normal::{face_normal, oriented_unit_normal, NormalMode};
pub use params::{
    EdgeOrdering, PlanarParams, ReciprocalMethod, ReciprocalParams, UnitParams,
    DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS,
};
pub use planar::{canonicalize_mm, planarize_mm, relax_planar, relax_planar_with_sink};
pub use progress::{NullSink, ProgressEvent, ProgressSink, Reporting, TracingSink, WriterSink};
pub use reciprocal::{canonicalize_bd, planarize_bd, relax_reciprocal, relax_reciprocal_with_sink};
pub use result::{RelaxOutput, RelaxStatus};
pub use unit::{
    minmax_unit_planar, polygon_density, regular_circumradius, relax_unit, relax_unit_with_sink,
};
pub use validate::{validate_all_vertices_used, validate_closed, validate_mesh};
