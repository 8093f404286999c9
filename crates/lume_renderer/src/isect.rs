//! Intersection result record.

use lume_math::Vec3;

/// Record of the nearest hit found by an intersection query.
///
/// Created fresh per query and filled in by intersection routines as
/// they find closer hits; never outlives one trace call. The stored
/// normal is the geometric one (outward for spheres, winding-derived for
/// triangles) - shading orients or interpolates it as needed.
#[derive(Debug, Clone)]
pub struct IsectInfo {
    /// Parametric distance along the ray
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Geometric surface normal at the intersection
    pub normal: Vec3,
    /// Barycentric (u, v) of the hit, for triangle hits
    pub barycentric: Option<(f32, f32)>,
    /// Index of the hit triangle, for mesh hits
    pub triangle: Option<u32>,
    /// Index of the hit object in the scene's object list
    pub object: usize,
    /// Primitive intersection tests performed by this query
    pub primitive_tests: u32,
}

impl IsectInfo {
    /// A fresh "no hit yet" record.
    pub fn new() -> Self {
        Self {
            t: f32::INFINITY,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            barycentric: None,
            triangle: None,
            object: 0,
            primitive_tests: 0,
        }
    }

    /// True once some intersection routine has recorded a hit.
    pub fn is_hit(&self) -> bool {
        self.t.is_finite()
    }
}

impl Default for IsectInfo {
    fn default() -> Self {
        Self::new()
    }
}
