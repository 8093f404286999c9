//! Uniform grid acceleration structure.
//!
//! Construction bins every primitive into the cells its bounding box
//! overlaps; queries march cells along the ray with a 3D DDA, testing
//! only the primitives in visited cells. Cell storage is a dense arena
//! of optional primitive lists - a cell allocates lazily when it
//! receives its first primitive.

use crate::accel::{Accelerator, BuildStats};
use crate::{IsectInfo, Primitive};
use lume_core::{GridConfig, Scene};
use lume_math::{Aabb, Interval, Ray, Vec3};

/// Uniform spatial grid over scene primitives.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    bounds: Aabb,
    resolution: [u32; 3],
    cell_size: Vec3,
    cells: Vec<Option<Vec<Primitive>>>,
}

impl Grid {
    /// Create an unbuilt grid with the given tuning parameters.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            bounds: Aabb::EMPTY,
            resolution: [1, 1, 1],
            cell_size: Vec3::ONE,
            cells: Vec::new(),
        }
    }

    /// Cells per axis.
    pub fn resolution(&self) -> [u32; 3] {
        self.resolution
    }

    /// World-space extent of one cell.
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// The enclosing volume the grid was built over.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Primitives referenced by the cell at (x, y, z). Empty for
    /// never-allocated cells.
    pub fn cell(&self, x: u32, y: u32, z: u32) -> &[Primitive] {
        self.cells[self.cell_index(x as i64, y as i64, z as i64)]
            .as_deref()
            .unwrap_or(&[])
    }

    /// Flattened index of a cell: x + y*rx + z*rx*ry.
    #[inline]
    fn cell_index(&self, x: i64, y: i64, z: i64) -> usize {
        let rx = self.resolution[0] as i64;
        let ry = self.resolution[1] as i64;
        (x + y * rx + z * rx * ry) as usize
    }

    /// Cell coordinates of a world point, clamped into the grid.
    ///
    /// The float-to-int cast saturates, so points at (or beyond) the far
    /// boundary and non-finite quotients from zero-extent axes land in a
    /// valid cell.
    fn cell_coords(&self, p: Vec3) -> [i64; 3] {
        let rel = (p - self.bounds.min) / self.cell_size;
        let mut coords = [0i64; 3];
        for axis in 0..3 {
            let hi = self.resolution[axis] as i64 - 1;
            coords[axis] = (rel[axis].floor() as i64).clamp(0, hi);
        }
        coords
    }

    /// Per-axis resolution from the density heuristic.
    ///
    /// cbrt(primitive_count * alpha / volume) cells per world unit,
    /// scaled by each axis extent, floored, clamped to
    /// [1, max_resolution]. A degenerate (zero-volume) box falls back to
    /// a single cell.
    fn pick_resolution(&self, bounds: Aabb, primitive_count: usize) -> [u32; 3] {
        let volume = bounds.volume();
        if primitive_count == 0 || volume <= 0.0 {
            return [1, 1, 1];
        }

        let cells_per_unit = (primitive_count as f32 * self.config.alpha / volume).cbrt();
        let diagonal = bounds.diagonal();
        let max = self.config.max_resolution;

        let mut resolution = [1u32; 3];
        for axis in 0..3 {
            let cells = (diagonal[axis] * cells_per_unit).floor() as i64;
            resolution[axis] = cells.clamp(1, max as i64) as u32;
        }
        resolution
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl Accelerator for Grid {
    fn construct(&mut self, bounds: Aabb, primitives: &[Primitive], scene: &Scene) -> BuildStats {
        self.bounds = bounds;
        self.resolution = self.pick_resolution(bounds, primitives.len());

        let diagonal = if bounds.is_empty() {
            Vec3::ONE
        } else {
            bounds.diagonal()
        };
        self.cell_size = diagonal
            / Vec3::new(
                self.resolution[0] as f32,
                self.resolution[1] as f32,
                self.resolution[2] as f32,
            );

        // Full rebuild: previous contents never leak into this one
        let total = self.resolution.iter().map(|&r| r as usize).product();
        self.cells = vec![None; total];

        let mut primitive_refs = 0usize;
        for &primitive in primitives {
            let prim_bounds = primitive.bounds(scene);
            let min_cell = self.cell_coords(prim_bounds.min);
            let max_cell = self.cell_coords(prim_bounds.max);

            // Every overlapped cell references the primitive
            for z in min_cell[2]..=max_cell[2] {
                for y in min_cell[1]..=max_cell[1] {
                    for x in min_cell[0]..=max_cell[0] {
                        let index = self.cell_index(x, y, z);
                        self.cells[index]
                            .get_or_insert_with(Vec::new)
                            .push(primitive);
                        primitive_refs += 1;
                    }
                }
            }
        }

        let occupied_cells = self.cells.iter().filter(|c| c.is_some()).count();
        let stats = BuildStats {
            resolution: self.resolution,
            occupied_cells,
            primitive_refs,
            avg_refs_per_cell: if occupied_cells > 0 {
                primitive_refs as f32 / occupied_cells as f32
            } else {
                0.0
            },
        };
        log::info!("grid built over {} primitives: {}", primitives.len(), stats);
        stats
    }

    fn intersect(&self, ray: &Ray, scene: &Scene, isect: &mut IsectInfo) -> bool {
        let Some(mut march) = CellMarch::begin(self, ray) else {
            return false;
        };

        let mut hit = false;
        loop {
            if let Some(primitives) = &self.cells[march.current_index()] {
                for primitive in primitives {
                    if primitive.intersect(ray, scene, Interval::new(0.0, isect.t), isect) {
                        hit = true;
                    }
                }
            }

            // A hit in front of the current cell's far boundary cannot be
            // beaten by anything in a later cell
            if hit && isect.t < march.exit_t() {
                break;
            }
            if !march.advance() {
                break;
            }
        }
        hit
    }

    fn occluded(&self, ray: &Ray, t_max: f32, scene: &Scene, tests: &mut u32) -> bool {
        let Some(mut march) = CellMarch::begin(self, ray) else {
            return false;
        };

        let mut probe = IsectInfo::new();
        loop {
            if let Some(primitives) = &self.cells[march.current_index()] {
                for primitive in primitives {
                    if primitive.intersect(ray, scene, Interval::new(0.0, t_max), &mut probe) {
                        *tests += probe.primitive_tests;
                        return true;
                    }
                }
            }

            // Cells beyond the occlusion budget are irrelevant
            if march.exit_t() >= t_max {
                break;
            }
            if !march.advance() {
                break;
            }
        }
        *tests += probe.primitive_tests;
        false
    }
}

/// DDA state for walking cells along a ray.
///
/// Tracks, per axis, the parametric distance to the next cell boundary
/// and the distance to cross one full cell; each step advances whichever
/// axis crosses first.
struct CellMarch {
    cell: [i64; 3],
    step: [i64; 3],
    exit: [i64; 3],
    delta_t: [f32; 3],
    next_crossing: [f32; 3],
    stride_y: i64,
    stride_z: i64,
}

impl CellMarch {
    /// Set up the march at the ray's entry cell, or None if the ray
    /// misses the grid entirely.
    fn begin(grid: &Grid, ray: &Ray) -> Option<Self> {
        if grid.cells.is_empty() || grid.bounds.is_empty() {
            return None;
        }
        let t_enter = grid.bounds.intersect(ray)?;

        // Origin inside the box enters at the origin itself
        let t0 = t_enter.max(0.0);
        let entry = ray.at(t0);
        let cell = grid.cell_coords(entry);

        let mut march = Self {
            cell,
            step: [0; 3],
            exit: [0; 3],
            delta_t: [0.0; 3],
            next_crossing: [0.0; 3],
            stride_y: grid.resolution[0] as i64,
            stride_z: grid.resolution[0] as i64 * grid.resolution[1] as i64,
        };

        for axis in 0..3 {
            let rel = entry[axis] - grid.bounds.min[axis];
            let size = grid.cell_size[axis];
            let inv = ray.inv_direction()[axis];

            if inv >= 0.0 {
                march.delta_t[axis] = size * inv;
                march.next_crossing[axis] = t0 + ((cell[axis] + 1) as f32 * size - rel) * inv;
                march.step[axis] = 1;
                march.exit[axis] = grid.resolution[axis] as i64;
            } else {
                march.delta_t[axis] = -size * inv;
                march.next_crossing[axis] = t0 + (cell[axis] as f32 * size - rel) * inv;
                march.step[axis] = -1;
                march.exit[axis] = -1;
            }

            // Zero extents against infinite reciprocals produce NaN; such
            // an axis must simply never drive the march
            if march.delta_t[axis].is_nan() {
                march.delta_t[axis] = f32::INFINITY;
            }
            if march.next_crossing[axis].is_nan() {
                march.next_crossing[axis] = f32::INFINITY;
            }
        }

        Some(march)
    }

    /// Flattened index of the current cell.
    fn current_index(&self) -> usize {
        (self.cell[0] + self.cell[1] * self.stride_y + self.cell[2] * self.stride_z) as usize
    }

    /// Parametric distance at which the ray leaves the current cell.
    fn exit_t(&self) -> f32 {
        self.next_crossing[0]
            .min(self.next_crossing[1])
            .min(self.next_crossing[2])
    }

    /// Step into the next cell along the ray. False once the ray leaves
    /// the grid.
    fn advance(&mut self) -> bool {
        let axis = if self.next_crossing[0] < self.next_crossing[1] {
            if self.next_crossing[0] < self.next_crossing[2] {
                0
            } else {
                2
            }
        } else if self.next_crossing[1] < self.next_crossing[2] {
            1
        } else {
            2
        };

        self.cell[axis] += self.step[axis];
        if self.cell[axis] == self.exit[axis] {
            return false;
        }
        self.next_crossing[axis] += self.delta_t[axis];
        true
    }
}
