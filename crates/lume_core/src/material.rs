//! Surface material description.
//!
//! Materials are plain data attached to an object at scene-build time and
//! immutable for the duration of a render; the integrator dispatches on
//! [`MaterialKind`].

use lume_math::Vec3;
use serde::{Deserialize, Serialize};

/// How the integrator shades a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Ambient + Lambertian diffuse + Phong specular, lit by shadow rays.
    Phong,
    /// Mirror reflection blended with local phong shading.
    Reflective,
    /// Snell refraction with a Fresnel-weighted reflection component.
    Refractive,
}

/// A material definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Material {
    /// Surface color (RGB, 0-1)
    pub color: Vec3,

    /// Shading model
    pub kind: MaterialKind,

    /// Ambient reflection constant
    pub ambient: f32,

    /// Diffuse reflection constant
    pub diffuse: f32,

    /// Specular reflection constant
    pub specular: f32,

    /// Phong specular exponent (higher = tighter highlight)
    pub specular_exp: f32,

    /// Fraction of reflected light mixed in by reflective surfaces (0-1)
    pub reflectivity: f32,

    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::new(0.5, 0.5, 0.5), // Grey default
            kind: MaterialKind::Phong,
            ambient: 0.1,
            diffuse: 0.8,
            specular: 0.5,
            specular_exp: 25.0,
            reflectivity: 0.8,
            ior: 1.5,
        }
    }
}

impl Material {
    /// Create a phong-shaded material with the given color.
    pub fn phong(color: Vec3) -> Self {
        Self {
            color,
            kind: MaterialKind::Phong,
            ..Default::default()
        }
    }

    /// Create a mirror material.
    ///
    /// `reflectivity` is the weight of the traced reflection; the
    /// remainder is local phong shading.
    pub fn reflective(color: Vec3, reflectivity: f32) -> Self {
        Self {
            color,
            kind: MaterialKind::Reflective,
            reflectivity: reflectivity.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Create a transparent material with the given index of refraction.
    pub fn refractive(ior: f32) -> Self {
        Self {
            color: Vec3::ONE,
            kind: MaterialKind::Refractive,
            ior,
            ..Default::default()
        }
    }

    /// Override the specular highlight shape.
    pub fn with_specular(mut self, specular: f32, specular_exp: f32) -> Self {
        self.specular = specular;
        self.specular_exp = specular_exp;
        self
    }

    /// Override the ambient/diffuse constants.
    pub fn with_diffuse(mut self, ambient: f32, diffuse: f32) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_constructors() {
        let m = Material::phong(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.kind, MaterialKind::Phong);
        assert_eq!(m.color, Vec3::new(1.0, 0.0, 0.0));

        let m = Material::reflective(Vec3::ONE, 1.5);
        assert_eq!(m.kind, MaterialKind::Reflective);
        assert_eq!(m.reflectivity, 1.0); // clamped

        let m = Material::refractive(1.33);
        assert_eq!(m.kind, MaterialKind::Refractive);
        assert_eq!(m.ior, 1.33);
    }

    #[test]
    fn test_material_builders() {
        let m = Material::phong(Vec3::ONE).with_specular(0.9, 100.0);
        assert_eq!(m.specular, 0.9);
        assert_eq!(m.specular_exp, 100.0);
    }
}
