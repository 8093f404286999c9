//! Acceleration structures.
//!
//! Anything that can take a primitive soup and answer nearest-hit and
//! occlusion queries implements [`Accelerator`]; the grid is the primary
//! structure and [`LinearScan`] is the brute-force reference the grid is
//! validated against. Alternative partitioning schemes (compact grid,
//! k-d tree) slot in behind the same trait.

mod grid;

pub use grid::Grid;

use crate::{intersect_object, IsectInfo, Primitive};
use lume_core::Scene;
use lume_math::{Aabb, Interval, Ray};
use std::fmt;

/// Diagnostics returned by [`Accelerator::construct`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildStats {
    /// Cells per axis
    pub resolution: [u32; 3],
    /// Cells holding at least one primitive
    pub occupied_cells: usize,
    /// Total primitive references across all cells (straddling
    /// primitives are referenced once per overlapped cell)
    pub primitive_refs: usize,
    /// primitive_refs / occupied_cells, 0 when nothing is occupied
    pub avg_refs_per_cell: f32,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} cells, {} occupied, {} refs ({:.2} avg per occupied cell)",
            self.resolution[0],
            self.resolution[1],
            self.resolution[2],
            self.occupied_cells,
            self.primitive_refs,
            self.avg_refs_per_cell,
        )
    }
}

/// A spatial index over scene primitives.
///
/// Built once before tracing starts and read-only afterwards, so queries
/// need no locking.
pub trait Accelerator: Send + Sync {
    /// Build (or fully rebuild) the structure over the given primitives.
    ///
    /// `bounds` is the enclosing volume, normally the scene bounds.
    /// Construction is idempotent: calling again with the same inputs
    /// yields an identical structure, and never patches incrementally.
    fn construct(&mut self, bounds: Aabb, primitives: &[Primitive], scene: &Scene) -> BuildStats;

    /// Find the nearest hit along the ray, if any.
    ///
    /// Fills `isect` (including its per-query test counter) and returns
    /// true on a hit.
    fn intersect(&self, ray: &Ray, scene: &Scene, isect: &mut IsectInfo) -> bool;

    /// True if anything blocks the ray before `t_max`.
    ///
    /// Any-hit query for shadow rays: may stop at the first occluder
    /// found, in no particular order. Adds the primitive tests it
    /// performs to `tests`.
    fn occluded(&self, ray: &Ray, t_max: f32, scene: &Scene, tests: &mut u32) -> bool;
}

/// Brute-force accelerator: every query scans every object.
///
/// The closest-so-far loop over objects; meshes scan their own triangles
/// once per ray. Slow, obviously correct, and the parity oracle for the
/// grid.
#[derive(Debug, Default)]
pub struct LinearScan;

impl LinearScan {
    pub fn new() -> Self {
        Self
    }
}

impl Accelerator for LinearScan {
    fn construct(&mut self, _bounds: Aabb, primitives: &[Primitive], _scene: &Scene) -> BuildStats {
        // Nothing to build; stats describe the degenerate single cell.
        BuildStats {
            resolution: [1, 1, 1],
            occupied_cells: usize::from(!primitives.is_empty()),
            primitive_refs: primitives.len(),
            avg_refs_per_cell: primitives.len() as f32,
        }
    }

    fn intersect(&self, ray: &Ray, scene: &Scene, isect: &mut IsectInfo) -> bool {
        let mut hit = false;
        let mut closest = f32::INFINITY;

        for object in 0..scene.objects().len() {
            let range = Interval::new(0.0, closest);
            if intersect_object(object, ray, scene, range, isect) {
                hit = true;
                closest = isect.t;
            }
        }
        hit
    }

    fn occluded(&self, ray: &Ray, t_max: f32, scene: &Scene, tests: &mut u32) -> bool {
        let range = Interval::new(0.0, t_max);
        for object in 0..scene.objects().len() {
            let mut isect = IsectInfo::new();
            let hit = intersect_object(object, ray, scene, range, &mut isect);
            *tests += isect.primitive_tests;
            if hit {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_core::{Material, Object};
    use lume_math::Vec3;

    fn two_spheres() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(Object::sphere(
            Vec3::new(0.0, 0.0, -2.0),
            0.5,
            Material::default(),
        ));
        scene.add_object(Object::sphere(
            Vec3::new(0.0, 0.0, -5.0),
            0.5,
            Material::default(),
        ));
        scene
    }

    #[test]
    fn test_linear_scan_nearest() {
        let scene = two_spheres();
        let accel = LinearScan::new();

        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut isect = IsectInfo::new();
        assert!(accel.intersect(&ray, &scene, &mut isect));
        assert_eq!(isect.object, 0);
        assert!((isect.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_linear_scan_occlusion_respects_t_max() {
        let scene = two_spheres();
        let accel = LinearScan::new();
        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut tests = 0;
        assert!(accel.occluded(&ray, 10.0, &scene, &mut tests));
        assert!(tests > 0);

        // Nearest occluder is at t=1.5; a shorter budget sees nothing
        let mut tests = 0;
        assert!(!accel.occluded(&ray, 1.0, &scene, &mut tests));
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new();
        let accel = LinearScan::new();

        let ray = Ray::primary(Vec3::ZERO, Vec3::Z);
        let mut isect = IsectInfo::new();
        assert!(!accel.intersect(&ray, &scene, &mut isect));
        assert_eq!(isect.primitive_tests, 0);
    }
}
