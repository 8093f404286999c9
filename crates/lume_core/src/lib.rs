//! LUME Core - Scene representation for the LUME ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Mesh`, `Object` (sphere / triangle / triangle mesh)
//! - **Shading inputs**: `Material`, `Light`
//! - **Aggregation**: `Scene`
//! - **Boundary validation**: `GridConfig`, `RenderSettings`
//!
//! # Example
//!
//! ```
//! use lume_core::{Material, Object, Scene};
//! use lume_math::Vec3;
//!
//! let mut scene = Scene::new();
//! scene.add_object(Object::sphere(
//!     Vec3::ZERO,
//!     1.0,
//!     Material::phong(Vec3::new(0.8, 0.2, 0.2)),
//! ));
//! assert_eq!(scene.objects().len(), 1);
//! ```

pub mod config;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod scene;

// Re-export commonly used types
pub use config::{ConfigError, GridConfig, RenderSettings};
pub use light::Light;
pub use material::{Material, MaterialKind};
pub use mesh::{Mesh, MeshError};
pub use object::{Object, ObjectKind};
pub use scene::Scene;
