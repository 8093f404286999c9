//! Scene objects.
//!
//! An object pairs one geometry variant with a material. The closed
//! [`ObjectKind`] enum replaces a virtual object hierarchy: intersection
//! code dispatches with a `match`, and "is this a mesh?" is a variant
//! check rather than a downcast.

use crate::{Material, Mesh};
use lume_math::{Aabb, Vec3};

/// Geometry of a scene object.
#[derive(Clone, Debug)]
pub enum ObjectKind {
    Sphere { center: Vec3, radius: f32 },
    Triangle { v0: Vec3, v1: Vec3, v2: Vec3 },
    Mesh(Mesh),
}

/// A geometric object with its material and cached bounds.
#[derive(Clone, Debug)]
pub struct Object {
    kind: ObjectKind,
    material: Material,
    bounds: Aabb,
}

impl Object {
    /// Create a sphere object.
    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        Self {
            kind: ObjectKind::Sphere { center, radius },
            material,
            bounds: Aabb::new(center - rvec, center + rvec),
        }
    }

    /// Create a single-triangle object.
    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let mut bounds = Aabb::empty();
        bounds.extend_by(v0);
        bounds.extend_by(v1);
        bounds.extend_by(v2);
        Self {
            kind: ObjectKind::Triangle { v0, v1, v2 },
            material,
            bounds,
        }
    }

    /// Create a mesh object.
    pub fn mesh(mesh: Mesh, material: Material) -> Self {
        let bounds = mesh.bounds();
        Self {
            kind: ObjectKind::Mesh(mesh),
            material,
            bounds,
        }
    }

    /// The geometry variant.
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// The object's material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Bounding box of the whole object.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// How many indexable primitives this object decomposes into:
    /// one per triangle for a mesh, one for everything else.
    pub fn primitive_count(&self) -> usize {
        match &self.kind {
            ObjectKind::Mesh(mesh) => mesh.triangle_count(),
            _ => 1,
        }
    }
}
