//! Render drivers and image buffer.
//!
//! One pixel's samples are an independent unit of work: the scanline
//! driver walks them sequentially, the parallel driver fans buckets out
//! over rayon. Both share the per-pixel sampling loop.

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{Camera, Renderer};
use lume_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Uniform f32 in [0, 1) from a type-erased rng.
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Render a single pixel: average of jittered samples.
///
/// With one sample per pixel the ray goes through the pixel center, so
/// single-sample renders are fully deterministic.
pub fn render_pixel(
    renderer: &Renderer,
    camera: &Camera,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Vec3 {
    let samples = renderer.settings().samples_per_pixel;
    let mut color = Vec3::ZERO;

    for _ in 0..samples {
        let (sx, sy) = if samples == 1 {
            (0.0, 0.0)
        } else {
            (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
        };
        let ray = camera.ray_for(x, y, sx, sy);
        color += renderer.cast_ray(&ray, 0);
    }

    color / samples as f32
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let rgba: Vec<[u8; 4]> = self.pixels.iter().map(|&c| color_to_rgba(c)).collect();
        bytemuck::cast_slice(&rgba).to_vec()
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Vec3) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render the entire image single-threaded, scanline order.
///
/// Used by tests and tiny renders; real renders go through
/// [`render_parallel`].
pub fn render(renderer: &Renderer, camera: &Camera, rng: &mut dyn RngCore) -> ImageBuffer {
    renderer.reset_stats();
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(renderer, camera, x, y, rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the entire image with buckets fanned out over rayon.
///
/// Each bucket seeds its own rng from the bucket index, so results do
/// not depend on thread scheduling. The accelerator is read-only and the
/// counters are atomic; no other state is shared.
pub fn render_parallel(renderer: &Renderer, camera: &Camera, bucket_size: u32) -> ImageBuffer {
    renderer.reset_stats();
    let buckets = generate_buckets(camera.image_width, camera.image_height, bucket_size);
    log::info!(
        "rendering {}x{} in {} buckets",
        camera.image_width,
        camera.image_height,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(0x6C75_6D65 ^ bucket.index as u64);
            BucketResult::new(*bucket, render_bucket(bucket, camera, renderer, &mut rng))
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in results {
        let bucket = result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                image.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::{Accelerator, Grid};
    use crate::Primitive;
    use lume_core::{Light, Material, Object, RenderSettings, Scene};

    fn demo_scene() -> Scene {
        let mut scene = Scene::new();
        scene.set_background(Vec3::new(0.1, 0.1, 0.1));
        scene.add_object(Object::sphere(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::phong(Vec3::new(0.2, 0.7, 0.3)),
        ));
        scene.add_light(Light::point(Vec3::new(2.0, 4.0, 0.0), 200.0, Vec3::ONE));
        scene
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-4);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Vec3::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Vec3::splat(4.0)), [255, 255, 255, 255]);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Vec3::ONE);
        assert_eq!(image.get(3, 1), Vec3::ONE);

        let bytes = image.to_rgba();
        assert_eq!(bytes.len(), 4 * 2 * 4);
        // Last pixel is white
        assert_eq!(&bytes[bytes.len() - 4..], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_parallel_matches_scanline() {
        // Single-sample renders are deterministic, so the two drivers
        // must produce identical pixels.
        let scene = demo_scene();
        let primitives = Primitive::collect(&scene);
        let mut grid = Grid::default();
        grid.construct(scene.bounds(), &primitives, &scene);

        let renderer = Renderer::new(&scene, &grid, RenderSettings::default());
        let mut camera = Camera::new().with_resolution(32, 24);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(1);
        let scanline = render(&renderer, &camera, &mut rng);
        let parallel = render_parallel(&renderer, &camera, 16);

        for y in 0..camera.image_height {
            for x in 0..camera.image_width {
                assert_eq!(scanline.get(x, y), parallel.get(x, y));
            }
        }
    }

    #[test]
    fn test_render_accumulates_stats() {
        let scene = demo_scene();
        let primitives = Primitive::collect(&scene);
        let mut grid = Grid::default();
        grid.construct(scene.bounds(), &primitives, &scene);

        let renderer = Renderer::new(&scene, &grid, RenderSettings::default());
        let mut camera = Camera::new().with_resolution(16, 16);
        camera.initialize();

        let _ = render_parallel(&renderer, &camera, 8);
        let stats = renderer.stats();
        assert_eq!(stats.primary_rays, 16 * 16);
    }
}
