//! Scene aggregation.

use crate::{Light, Object};
use lume_math::{Aabb, Vec3};

/// A renderable scene: objects, lights, and a background color.
///
/// The scene bounding box is maintained incrementally as objects are
/// added; it becomes the enclosing volume of the acceleration structure.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,
    background: Vec3,
    bounds: Aabb,
}

impl Scene {
    /// Create a new empty scene with a black background.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            background: Vec3::ZERO,
            bounds: Aabb::EMPTY,
        }
    }

    /// Add an object to the scene, growing the scene bounds.
    pub fn add_object(&mut self, object: Object) {
        self.bounds = Aabb::surrounding(&self.bounds, &object.bounds());
        self.objects.push(object);
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Set the color returned for rays that escape the scene.
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }

    /// All objects in insertion order. Intersection results refer to
    /// objects by index into this slice.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Object by index.
    pub fn object(&self, index: usize) -> &Object {
        &self.objects[index]
    }

    /// All lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Background color.
    pub fn background(&self) -> Vec3 {
        self.background
    }

    /// Bounding box enclosing every object. Empty for an empty scene.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Total number of indexable primitives across all objects.
    pub fn primitive_count(&self) -> usize {
        self.objects.iter().map(Object::primitive_count).sum()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
