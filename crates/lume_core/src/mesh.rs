//! Triangle mesh geometry.
//!
//! A mesh is the only compound object kind: the acceleration structure
//! never intersects it as a whole, it indexes the individual triangles.

use lume_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors raised while building a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),

    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
///
/// When per-vertex normals are present, hits against the mesh are shaded
/// with barycentric-interpolated normals; otherwise the flat face normal
/// is used.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Indices are validated up front so triangle accessors never have to
    /// bounds-check.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
    ) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        for &index in &indices {
            if index as usize >= positions.len() {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
        if let Some(normals) = &normals {
            if normals.len() != positions.len() {
                return Err(MeshError::NormalCountMismatch {
                    normals: normals.len(),
                    vertices: positions.len(),
                });
            }
        }

        let bounds = Self::compute_bounds(&positions);
        Ok(Self {
            positions,
            normals,
            indices,
            bounds,
        })
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        let mut bounds = Aabb::empty();
        for &p in positions {
            bounds.extend_by(p);
        }
        bounds
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let base = i * 3;
        [
            self.positions[self.indices[base] as usize],
            self.positions[self.indices[base + 1] as usize],
            self.positions[self.indices[base + 2] as usize],
        ]
    }

    /// Per-vertex normals of triangle `i`, if the mesh carries normals.
    pub fn triangle_normals(&self, i: usize) -> Option<[Vec3; 3]> {
        let normals = self.normals.as_ref()?;
        let base = i * 3;
        Some([
            normals[self.indices[base] as usize],
            normals[self.indices[base + 1] as usize],
            normals[self.indices[base + 2] as usize],
        ])
    }

    /// Bounding box of triangle `i` alone.
    pub fn triangle_bounds(&self, i: usize) -> Aabb {
        let [a, b, c] = self.triangle(i);
        let mut bounds = Aabb::empty();
        bounds.extend_by(a);
        bounds.extend_by(b);
        bounds.extend_by(c);
        bounds
    }

    /// Bounding box of the whole mesh.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// True if per-vertex normals are available for smooth shading.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Replaces any existing normals. Each vertex normal is the
    /// normalized sum of the face normals of the triangles sharing that
    /// vertex, so larger faces weigh more.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;

            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];

            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        let mut degenerate = 0usize;
        for normal in &mut normals {
            let len = normal.length();
            if len > 1e-8 {
                *normal /= len;
            } else {
                // Vertex only touched by zero-area faces
                *normal = Vec3::Y;
                degenerate += 1;
            }
        }
        if degenerate > 0 {
            log::debug!(
                "compute_normals: {} of {} vertices had no usable face normal",
                degenerate,
                vertex_count
            );
        }

        self.normals = Some(normals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        // Two triangles spanning [0,1]x[0,1] at z=0
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_triangles() {
        let mesh = quad();
        assert_eq!(mesh.triangle_count(), 2);

        let [a, b, c] = mesh.triangle(1);
        assert_eq!(a, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(c, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = quad();
        assert_eq!(mesh.bounds().min, Vec3::ZERO);
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 1.0, 0.0));

        let tri_bounds = mesh.triangle_bounds(0);
        assert_eq!(tri_bounds.min, Vec3::ZERO);
        assert_eq!(tri_bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_mesh_rejects_bad_indices() {
        let result = Mesh::new(vec![Vec3::ZERO], vec![0, 0], None);
        assert!(matches!(result, Err(MeshError::RaggedIndices(2))));

        let result = Mesh::new(vec![Vec3::ZERO], vec![0, 0, 7], None);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_mesh_rejects_normal_mismatch() {
        let result = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
            Some(vec![Vec3::Z]),
        );
        assert!(matches!(result, Err(MeshError::NormalCountMismatch { .. })));
    }

    #[test]
    fn test_compute_normals_flat_quad() {
        let mut mesh = quad();
        assert!(!mesh.has_normals());

        mesh.compute_normals();
        assert!(mesh.has_normals());

        // Every vertex of a flat quad gets the face normal (+Z winding)
        let normals = mesh.triangle_normals(0).unwrap();
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-5);
        }
    }
}
