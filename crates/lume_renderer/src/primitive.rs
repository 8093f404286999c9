//! Primitives: the units the acceleration structure indexes.
//!
//! A primitive is a lightweight view into the scene - an object index
//! plus, for meshes, a triangle index. A mesh with N triangles
//! decomposes into exactly N primitives; every other object kind into
//! one. The sphere test is the analytic quadratic, the triangle test is
//! Möller-Trumbore (double-sided).

use crate::IsectInfo;
use lume_core::{Object, ObjectKind, Scene};
use lume_math::{Aabb, Interval, Ray, Vec3};

/// Epsilon below which a ray is considered parallel to a triangle plane.
const PARALLEL_EPS: f32 = 1e-8;

/// A non-owning reference to one indexable piece of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    /// Index of the owning object in the scene's object list
    pub object: usize,
    /// Triangle index, meaningful only when the object is a mesh
    pub triangle: Option<u32>,
}

impl Primitive {
    /// Enumerate the primitives of every object in the scene, in object
    /// order: one per mesh triangle, one per anything else.
    pub fn collect(scene: &Scene) -> Vec<Primitive> {
        let mut primitives = Vec::with_capacity(scene.primitive_count());
        for (object, obj) in scene.objects().iter().enumerate() {
            match obj.kind() {
                ObjectKind::Mesh(mesh) => {
                    for tri in 0..mesh.triangle_count() as u32 {
                        primitives.push(Primitive {
                            object,
                            triangle: Some(tri),
                        });
                    }
                }
                _ => primitives.push(Primitive {
                    object,
                    triangle: None,
                }),
            }
        }
        primitives
    }

    /// Bounding box of this primitive alone.
    pub fn bounds(&self, scene: &Scene) -> Aabb {
        let obj = scene.object(self.object);
        match (obj.kind(), self.triangle) {
            (ObjectKind::Mesh(mesh), Some(tri)) => mesh.triangle_bounds(tri as usize),
            _ => obj.bounds(),
        }
    }

    /// Test the ray against this primitive.
    ///
    /// Records the hit in `isect` and returns true if the parameter lies
    /// strictly inside `ray_t`. Callers shrink `ray_t.max` to the
    /// nearest hit so far to keep the query a nearest-hit search.
    pub fn intersect(
        &self,
        ray: &Ray,
        scene: &Scene,
        ray_t: Interval,
        isect: &mut IsectInfo,
    ) -> bool {
        isect.primitive_tests += 1;
        let obj = scene.object(self.object);

        match (obj.kind(), self.triangle) {
            (ObjectKind::Sphere { center, radius }, _) => {
                let Some(t) = intersect_sphere(*center, *radius, ray, ray_t) else {
                    return false;
                };
                let point = ray.at(t);
                isect.t = t;
                isect.point = point;
                isect.normal = (point - *center) / *radius;
                isect.barycentric = None;
                isect.triangle = None;
                isect.object = self.object;
                true
            }
            (ObjectKind::Triangle { v0, v1, v2 }, _) => {
                let Some((t, u, v)) = intersect_triangle(*v0, *v1, *v2, ray, ray_t) else {
                    return false;
                };
                isect.t = t;
                isect.point = ray.at(t);
                isect.normal = (*v1 - *v0).cross(*v2 - *v0).normalize();
                isect.barycentric = Some((u, v));
                isect.triangle = None;
                isect.object = self.object;
                true
            }
            (ObjectKind::Mesh(mesh), Some(tri)) => {
                let [v0, v1, v2] = mesh.triangle(tri as usize);
                let Some((t, u, v)) = intersect_triangle(v0, v1, v2, ray, ray_t) else {
                    return false;
                };
                isect.t = t;
                isect.point = ray.at(t);
                isect.normal = (v1 - v0).cross(v2 - v0).normalize();
                isect.barycentric = Some((u, v));
                isect.triangle = Some(tri);
                isect.object = self.object;
                true
            }
            // A mesh without a triangle index is not an indexable
            // primitive; nothing constructs one.
            (ObjectKind::Mesh(_), None) => false,
        }
    }
}

/// Test a ray against a whole object, scanning mesh triangles linearly.
///
/// This is the un-accelerated path: a mesh finds its own nearest
/// triangle hit in one pass. Used by the linear-scan fallback.
pub fn intersect_object(
    object: usize,
    ray: &Ray,
    scene: &Scene,
    ray_t: Interval,
    isect: &mut IsectInfo,
) -> bool {
    let obj = scene.object(object);
    match obj.kind() {
        ObjectKind::Mesh(mesh) => {
            let mut hit = false;
            let mut closest = ray_t.max;
            for tri in 0..mesh.triangle_count() as u32 {
                let prim = Primitive {
                    object,
                    triangle: Some(tri),
                };
                if prim.intersect(ray, scene, Interval::new(ray_t.min, closest), isect) {
                    hit = true;
                    closest = isect.t;
                }
            }
            hit
        }
        _ => {
            let prim = Primitive {
                object,
                triangle: None,
            };
            prim.intersect(ray, scene, ray_t, isect)
        }
    }
}

/// Analytic ray/sphere intersection, returning the nearest parameter in
/// range.
fn intersect_sphere(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }
    Some(root)
}

/// Möller-Trumbore ray/triangle intersection, double-sided.
///
/// Returns (t, u, v) on a hit. A near-zero determinant means the ray is
/// parallel to the triangle plane: a miss, not an error. Degenerate
/// (zero-area) triangles fall out the same way.
fn intersect_triangle(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray: &Ray,
    ray_t: Interval,
) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let det = edge1.dot(h);

    // Ray is parallel to triangle (or the triangle has no area)
    if det.abs() < PARALLEL_EPS {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }
    Some((t, u, v))
}
