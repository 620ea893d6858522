//! Combinatorial dual construction.

// Face counts fit in u32 face indices, as vertex counts do in `PolyMesh`
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use mesh_types::PolyMesh;

/// Build the dual of `base`.
///
/// Dual vertex `f` stands for base face `f` and starts at that face's
/// centroid. Dual face `v` lists the base faces around base vertex `v` in
/// cyclic order, found by walking across shared edges. On an open boundary
/// the walk is continued from the other side of the starting face; faces
/// the walk cannot reach are appended in index order.
///
/// Only the dual's combinatorial structure is meaningful; the relaxation
/// engines overwrite its positions every iteration.
///
/// # Example
///
/// ```
/// use mesh_canonical::build_dual;
/// use mesh_types::{cube, MeshTopology};
///
/// let dual = build_dual(&cube());
/// assert_eq!(dual.vertex_count(), 6);
/// assert_eq!(dual.face_count(), 8);
/// assert!(dual.faces.iter().all(|f| f.len() == 3));
/// ```
#[must_use]
pub fn build_dual(base: &PolyMesh) -> PolyMesh {
    let mut edge_faces: HashMap<(u32, u32), usize> = HashMap::new();
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); base.vertices.len()];

    for (f, face) in base.faces.iter().enumerate() {
        let n = face.len();
        for i in 0..n {
            edge_faces.entry((face[i], face[(i + 1) % n])).or_insert(f);
            let around = &mut incident[face[i] as usize];
            if around.last() != Some(&f) {
                around.push(f);
            }
        }
    }

    let faces = incident
        .iter()
        .enumerate()
        .map(|(v, around)| {
            vertex_fan(base, &edge_faces, v as u32, around)
                .into_iter()
                .map(|f| f as u32)
                .collect()
        })
        .collect();

    PolyMesh::from_parts(base.face_centroids(), faces)
}

/// Faces around `v`, ordered by adjacency.
fn vertex_fan(
    base: &PolyMesh,
    edge_faces: &HashMap<(u32, u32), usize>,
    v: u32,
    around: &[usize],
) -> Vec<usize> {
    let Some(&start) = around.first() else {
        return Vec::new();
    };

    // Forward: cross the edge (v, next) into the face holding (next, v)
    let mut fan = vec![start];
    let mut current = start;
    let mut closed = false;
    while let Some((_, next)) = loop_neighbours(&base.faces[current], v) {
        match edge_faces.get(&(next, v)) {
            Some(&g) if g == start => {
                closed = true;
                break;
            }
            Some(&g) if !fan.contains(&g) => {
                fan.push(g);
                current = g;
            }
            _ => break,
        }
    }

    if !closed {
        // Backward from the start: cross (prev, v) into the face holding (v, prev)
        let mut back = Vec::new();
        current = start;
        while let Some((prev, _)) = loop_neighbours(&base.faces[current], v) {
            match edge_faces.get(&(v, prev)) {
                Some(&g) if !fan.contains(&g) && !back.contains(&g) => {
                    back.push(g);
                    current = g;
                }
                _ => break,
            }
        }
        back.reverse();
        back.extend(fan);
        fan = back;
    }

    for &f in around {
        if !fan.contains(&f) {
            fan.push(f);
        }
    }
    fan
}

/// The vertices before and after `v` in a face loop.
fn loop_neighbours(face: &[u32], v: u32) -> Option<(u32, u32)> {
    let n = face.len();
    let k = face.iter().position(|&x| x == v)?;
    Some((face[(k + n - 1) % n], face[(k + 1) % n]))
}
