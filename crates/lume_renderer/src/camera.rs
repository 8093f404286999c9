//! Camera for primary-ray generation.

use lume_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Projection model for primary rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Pinhole at the eye point with the given vertical field of view in
    /// degrees.
    Perspective { vfov: f32 },
    /// Parallel rays; `zoom` is the half-height of the image plane in
    /// world units.
    Orthographic { zoom: f32 },
}

/// Camera generating one normalized-direction primary ray per sample.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    projection: Projection,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            projection: Projection::Perspective { vfov: 90.0 },
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            w: Vec3::Z,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the projection model.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        let aspect_ratio = self.image_width as f32 / self.image_height as f32;
        let viewport_height = match self.projection {
            // Image plane at unit distance in front of the eye
            Projection::Perspective { vfov } => 2.0 * (vfov.to_radians() / 2.0).tan(),
            Projection::Orthographic { zoom } => 2.0 * zoom,
        };
        let viewport_width = viewport_height * aspect_ratio;

        // Camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(self.w).normalize();
        let v = self.w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Perspective puts the plane one unit down the view axis;
        // orthographic rays start on the plane through the eye itself
        let plane_center = match self.projection {
            Projection::Perspective { .. } => self.center - self.w,
            Projection::Orthographic { .. } => self.center,
        };
        let viewport_upper_left = plane_center - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Generate the primary ray for pixel (x, y) and a sub-pixel offset
    /// (sx, sy), each in [-0.5, 0.5] around the pixel center.
    ///
    /// The returned direction is unit length.
    pub fn ray_for(&self, x: u32, y: u32, sx: f32, sy: f32) -> Ray {
        let pixel_sample = self.pixel00_loc
            + ((x as f32) + sx) * self.pixel_delta_u
            + ((y as f32) + sy) * self.pixel_delta_v;

        match self.projection {
            Projection::Perspective { .. } => {
                Ray::primary(self.center, (pixel_sample - self.center).normalize())
            }
            Projection::Orthographic { .. } => Ray::primary(pixel_sample, -self.w),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_projection(Projection::Perspective { vfov: 90.0 });

        camera.initialize();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_center_ray_points_down_view_axis() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        camera.initialize();

        let ray = camera.ray_for(50, 50, 0.0, 0.0);
        assert!((ray.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        assert!((ray.direction().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_rays_share_origin() {
        let mut camera = Camera::new().with_resolution(64, 64).with_position(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        camera.initialize();

        let a = camera.ray_for(0, 0, 0.0, 0.0);
        let b = camera.ray_for(63, 63, 0.0, 0.0);
        assert_eq!(a.origin(), b.origin());
        assert_ne!(a.direction(), b.direction());
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let mut camera = Camera::new()
            .with_resolution(64, 64)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_projection(Projection::Orthographic { zoom: 2.0 });
        camera.initialize();

        let a = camera.ray_for(0, 0, 0.0, 0.0);
        let b = camera.ray_for(63, 63, 0.0, 0.0);
        assert!((a.direction() - b.direction()).length() < 1e-6);
        assert_ne!(a.origin(), b.origin());

        // Plane half-height of 2.0: corner origins span 4 world units on y
        assert!((a.origin().y - b.origin().y).abs() <= 4.0);
    }

    #[test]
    fn test_subpixel_offset_moves_ray() {
        let mut camera = Camera::new().with_resolution(64, 64);
        camera.initialize();

        let center = camera.ray_for(10, 10, 0.0, 0.0);
        let jittered = camera.ray_for(10, 10, 0.4, -0.3);
        assert_ne!(center.direction(), jittered.direction());
    }
}
