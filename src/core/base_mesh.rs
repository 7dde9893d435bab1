//! The fixed base mesh: a pentakis dodecahedron projected onto a sphere.
//!
//! The pentakis dodecahedron has 32 vertices (the 20 vertices of a regular
//! dodecahedron plus one apex above each of its 12 pentagons), 60 triangular
//! faces and 90 edges. Every vertex is pushed out to the sphere of the
//! requested radius, so the mesh is a closed, outward-wound triangulated
//! approximation of that sphere.
//!
//! # Face order
//!
//! Face indices are identities: glyph tables and recorded addresses are keyed
//! by them. The order is fixed by [`BASE_FACE_INDICES`]; for each index triple
//! `(i0, i1, i2)` the face is emitted with vertices `(v[i1], v[i2], v[i0])`,
//! and the whole mesh is turned a quarter turn about +Y,
//! `(x, y, z) -> (z, y, -x)`.

use crate::core::collections::{FastHashMap, fast_hash_map_with_capacity};
use crate::core::facet::{EdgeKey, FaceSet, Facet};
use crate::geometry::point::Point;

/// Number of vertices of the base mesh.
pub const BASE_VERTEX_COUNT: usize = 32;

/// Number of faces of the base mesh.
pub const BASE_FACE_COUNT: usize = 60;

/// Number of distinct edges of the base mesh.
pub const BASE_EDGE_COUNT: usize = 90;

/// Tolerance for vertex radii, relative to the sphere radius.
pub const RADIUS_TOLERANCE: f64 = 1e-12;

/// Vertex index triples of the base mesh, in face order.
///
/// Indices 0..20 and 24..32 are dodecahedron vertices, 12..24 are the
/// pentagon apexes. Every face starts at its apex.
#[rustfmt::skip]
pub const BASE_FACE_INDICES: [[usize; 3]; BASE_FACE_COUNT] = [
    [12, 0, 2], [12, 2, 26], [12, 26, 4], [12, 4, 24], [12, 24, 0],
    [13, 3, 1], [13, 1, 25], [13, 25, 5], [13, 5, 27], [13, 27, 3],
    [14, 2, 0], [14, 0, 28], [14, 28, 6], [14, 6, 30], [14, 30, 2],
    [15, 1, 3], [15, 3, 31], [15, 31, 7], [15, 7, 29], [15, 29, 1],
    [16, 4, 5], [16, 5, 25], [16, 25, 8], [16, 8, 24], [16, 24, 4],
    [17, 5, 4], [17, 4, 26], [17, 26, 9], [17, 9, 27], [17, 27, 5],
    [18, 7, 6], [18, 6, 28], [18, 28, 10], [18, 10, 29], [18, 29, 7],
    [19, 6, 7], [19, 7, 31], [19, 31, 11], [19, 11, 30], [19, 30, 6],
    [20, 8, 10], [20, 10, 28], [20, 28, 0], [20, 0, 24], [20, 24, 8],
    [21, 10, 8], [21, 8, 25], [21, 25, 1], [21, 1, 29], [21, 29, 10],
    [22, 11, 9], [22, 9, 26], [22, 26, 2], [22, 2, 30], [22, 30, 11],
    [23, 9, 11], [23, 11, 31], [23, 31, 3], [23, 3, 27], [23, 27, 9],
];

/// Errors raised while building or validating a mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The sphere radius is not a positive finite number.
    #[error("Mesh size must be positive and finite, got {size}")]
    InvalidSize {
        /// The rejected size
        size: f64,
    },

    /// Some edges are not shared by exactly two faces.
    #[error(
        "Mesh is not closed: {boundary_edges} boundary edges, {non_manifold_edges} non-manifold edges"
    )]
    NotClosed {
        /// Edges used by a single face
        boundary_edges: usize,
        /// Edges used by three or more faces
        non_manifold_edges: usize,
    },

    /// A vertex does not lie on the sphere.
    #[error("Vertex {vertex} of face {face} lies at radius {radius}, expected {expected}")]
    OffSphere {
        /// Face index
        face: usize,
        /// Offending vertex
        vertex: Point,
        /// Its distance from the origin
        radius: f64,
        /// The sphere radius
        expected: f64,
    },
}

/// Unit-scale vertex directions before projection and rotation.
#[rustfmt::skip]
fn reference_vertices() -> [Point; BASE_VERTEX_COUNT] {
    let sqrt5 = 5.0_f64.sqrt();
    let c0 = (sqrt5 - 1.0) / 4.0;
    let c1 = (9.0 + sqrt5) / 76.0;
    let c2 = 5.0_f64.mul_add(sqrt5, 7.0) / 76.0;
    let c3 = (1.0 + sqrt5) / 4.0;
    let h = 0.5;

    [
        [0.0, c0, c3], [0.0, c0, -c3], [0.0, -c0, c3], [0.0, -c0, -c3],
        [c3, 0.0, c0], [c3, 0.0, -c0], [-c3, 0.0, c0], [-c3, 0.0, -c0],
        [c0, c3, 0.0], [c0, -c3, 0.0], [-c0, c3, 0.0], [-c0, -c3, 0.0],
        [c1, 0.0, c2], [c1, 0.0, -c2], [-c1, 0.0, c2], [-c1, 0.0, -c2],
        [c2, c1, 0.0], [c2, -c1, 0.0], [-c2, c1, 0.0], [-c2, -c1, 0.0],
        [0.0, c2, c1], [0.0, c2, -c1], [0.0, -c2, c1], [0.0, -c2, -c1],
        [h, h, h], [h, h, -h], [h, -h, h], [h, -h, -h],
        [-h, h, h], [-h, h, -h], [-h, -h, h], [-h, -h, -h],
    ]
    .map(Point::new)
}

fn check_size(size: f64) -> Result<(), MeshError> {
    if size > 0.0 && size.is_finite() {
        Ok(())
    } else {
        Err(MeshError::InvalidSize { size })
    }
}

/// Vertices of the base mesh on the sphere of radius `size`, indexed as in
/// [`BASE_FACE_INDICES`].
///
/// # Errors
///
/// Returns [`MeshError::InvalidSize`] if `size` is not positive and finite.
pub fn base_vertices(size: f64) -> Result<[Point; BASE_VERTEX_COUNT], MeshError> {
    check_size(size)?;
    Ok(reference_vertices().map(|direction| {
        // Reference directions are all non-zero.
        let on_sphere = direction / direction.length() * size;
        Point::new([on_sphere.z(), on_sphere.y(), -on_sphere.x()])
    }))
}

/// Build the base mesh for a sphere of radius `size`.
///
/// Deterministic: the same `size` always yields bit-identical faces in the
/// same order.
///
/// # Errors
///
/// Returns [`MeshError::InvalidSize`] if `size` is not positive and finite.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::base_mesh::{BASE_FACE_COUNT, build_base_mesh, validate_closure};
///
/// let mesh = build_base_mesh(100.0).unwrap();
/// assert_eq!(mesh.len(), BASE_FACE_COUNT);
/// assert!(validate_closure(&mesh).is_ok());
/// ```
pub fn build_base_mesh(size: f64) -> Result<FaceSet, MeshError> {
    let vertices = base_vertices(size)?;
    let faces = BASE_FACE_INDICES
        .iter()
        .map(|&[i0, i1, i2]| Facet::new([vertices[i1], vertices[i2], vertices[i0]]))
        .collect();
    tracing::debug!(size, faces = BASE_FACE_COUNT, "built base mesh");
    Ok(faces)
}

/// Verify that every edge of `faces` is shared by exactly two faces.
///
/// Edges are matched by exact vertex coordinates, which holds for meshes
/// whose faces index a shared vertex table.
///
/// # Errors
///
/// Returns [`MeshError::NotClosed`] with the number of boundary and
/// non-manifold edges if the mesh has any.
pub fn validate_closure(faces: &[Facet]) -> Result<(), MeshError> {
    let mut edge_uses: FastHashMap<EdgeKey, usize> = fast_hash_map_with_capacity(faces.len() * 3);
    for facet in faces {
        for (a, b) in facet.edges() {
            *edge_uses.entry(EdgeKey::new(&a, &b)).or_insert(0) += 1;
        }
    }

    let boundary_edges = edge_uses.values().filter(|&&n| n == 1).count();
    let non_manifold_edges = edge_uses.values().filter(|&&n| n > 2).count();
    if boundary_edges == 0 && non_manifold_edges == 0 {
        Ok(())
    } else {
        Err(MeshError::NotClosed {
            boundary_edges,
            non_manifold_edges,
        })
    }
}

/// Verify that every vertex of `faces` lies on the sphere of radius `size`
/// within [`RADIUS_TOLERANCE`].
///
/// # Errors
///
/// Returns [`MeshError::OffSphere`] for the first offending vertex.
pub fn validate_sphere(faces: &[Facet], size: f64) -> Result<(), MeshError> {
    check_size(size)?;
    for (face, facet) in faces.iter().enumerate() {
        for vertex in facet.vertices() {
            let radius = vertex.length();
            if (radius - size).abs() > RADIUS_TOLERANCE * size {
                return Err(MeshError::OffSphere {
                    face,
                    vertex: *vertex,
                    radius,
                    expected: size,
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
