//! Boundary validation of tunable parameters.
//!
//! The core algorithms assume their parameters are sane; anything a
//! caller can get wrong is rejected here, at construction, with a typed
//! error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by parameter validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid density alpha must be > 0, got {0}")]
    NonPositiveAlpha(f32),

    #[error("grid max_resolution must be >= 1")]
    ZeroMaxResolution,

    #[error("shadow bias must be > 0, got {0}")]
    NonPositiveShadowBias(f32),

    #[error("samples_per_pixel must be >= 1")]
    ZeroSamples,
}

/// Tuning parameters for grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Target density: primitives per cell. Higher alpha yields finer grids.
    pub alpha: f32,
    /// Upper clamp on the per-axis cell count.
    pub max_resolution: u32,
}

impl GridConfig {
    pub const DEFAULT_ALPHA: f32 = 3.5;
    pub const DEFAULT_MAX_RESOLUTION: u32 = 128;

    /// Create a validated grid configuration.
    pub fn new(alpha: f32, max_resolution: u32) -> Result<Self, ConfigError> {
        if !(alpha > 0.0) {
            return Err(ConfigError::NonPositiveAlpha(alpha));
        }
        if max_resolution == 0 {
            return Err(ConfigError::ZeroMaxResolution);
        }
        Ok(Self {
            alpha,
            max_resolution,
        })
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            max_resolution: Self::DEFAULT_MAX_RESOLUTION,
        }
    }
}

/// Integrator and sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Recursion bound for secondary rays. Zero renders background only.
    pub max_depth: u32,
    /// Offset applied along the surface normal to secondary-ray origins,
    /// preventing self-intersection ("shadow acne").
    pub shadow_bias: f32,
    /// Samples per pixel for anti-aliasing.
    pub samples_per_pixel: u32,
}

impl RenderSettings {
    pub const DEFAULT_MAX_DEPTH: u32 = 5;
    pub const DEFAULT_SHADOW_BIAS: f32 = 1e-4;

    /// Create validated render settings.
    pub fn new(
        max_depth: u32,
        shadow_bias: f32,
        samples_per_pixel: u32,
    ) -> Result<Self, ConfigError> {
        if !(shadow_bias > 0.0) {
            return Err(ConfigError::NonPositiveShadowBias(shadow_bias));
        }
        if samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(Self {
            max_depth,
            shadow_bias,
            samples_per_pixel,
        })
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            shadow_bias: Self::DEFAULT_SHADOW_BIAS,
            samples_per_pixel: 1,
        }
    }
}
