//! Light sources.
//!
//! The integrator only ever asks a light four questions: which way it
//! lies from a point, how far it is, how intense it is at that distance,
//! and what color it is. Both kinds answer through the same methods, so
//! shading code does not branch on the light type.

use lume_math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// A light source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Light {
    /// A point emitter with inverse-square falloff.
    Point {
        position: Vec3,
        intensity: f32,
        color: Vec3,
    },
    /// A directional emitter infinitely far away (sun-like).
    Distant {
        /// Direction the light travels, unit length.
        direction: Vec3,
        intensity: f32,
        color: Vec3,
    },
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, intensity: f32, color: Vec3) -> Self {
        Self::Point {
            position,
            intensity,
            color,
        }
    }

    /// Create a distant light travelling along `direction`.
    pub fn distant(direction: Vec3, intensity: f32, color: Vec3) -> Self {
        Self::Distant {
            direction: direction.normalize(),
            intensity,
            color,
        }
    }

    /// Unit vector from `p` toward the light.
    pub fn direction_to(&self, p: Vec3) -> Vec3 {
        match self {
            Self::Point { position, .. } => (*position - p).normalize(),
            Self::Distant { direction, .. } => -*direction,
        }
    }

    /// Distance from `p` to the light. Infinite for distant lights, which
    /// makes any finite occluder cast a shadow.
    pub fn distance_to(&self, p: Vec3) -> f32 {
        match self {
            Self::Point { position, .. } => (*position - p).length(),
            Self::Distant { .. } => f32::INFINITY,
        }
    }

    /// Incident intensity at the given distance from the light.
    pub fn intensity_at(&self, distance: f32) -> f32 {
        match self {
            Self::Point { intensity, .. } => intensity / (4.0 * PI * distance * distance),
            Self::Distant { intensity, .. } => *intensity,
        }
    }

    /// Light color (RGB, 0-1).
    pub fn color(&self) -> Vec3 {
        match self {
            Self::Point { color, .. } | Self::Distant { color, .. } => *color,
        }
    }
}
