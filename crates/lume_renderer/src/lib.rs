//! LUME Renderer - Whitted-style CPU ray tracing.
//!
//! Traces one ray at a time through a uniform-grid acceleration
//! structure, shading with the classic phong / mirror / glass trio and
//! recursing for shadows, reflection, and refraction.
//!
//! The pieces, leaf to root:
//!
//! - **Primitives** ([`Primitive`], [`IsectInfo`]): the units the
//!   accelerator indexes - whole objects, or single mesh triangles
//! - **Accelerators** ([`Accelerator`], [`Grid`], [`LinearScan`]):
//!   nearest-hit and occlusion queries over the primitive soup
//! - **Integrator** ([`Renderer`]): recursive shading with a depth bound
//! - **Camera** ([`Camera`]): perspective or orthographic primary rays
//! - **Drivers** ([`render`], [`render_parallel`]): scanline and
//!   rayon-bucketed image passes, with [`RenderStats`] diagnostics

mod accel;
mod bucket;
mod camera;
mod integrator;
mod isect;
mod primitive;
mod render;
mod stats;

pub use accel::{Accelerator, BuildStats, Grid, LinearScan};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, Projection};
pub use integrator::Renderer;
pub use isect::IsectInfo;
pub use primitive::{intersect_object, Primitive};
pub use render::{
    color_to_rgba, linear_to_gamma, render, render_parallel, render_pixel, ImageBuffer,
};
pub use stats::{RenderStats, StatsSnapshot};

/// Re-export math and scene types commonly used alongside the renderer
pub use lume_core::{
    GridConfig, Light, Material, MaterialKind, Mesh, Object, ObjectKind, RenderSettings, Scene,
};
pub use lume_math::{Aabb, Interval, Ray, RayKind, Vec3};
