//! Render diagnostics.
//!
//! Counters are an explicit collaborator handed around by reference, not
//! ambient global state, and atomic so buckets rendering in parallel can
//! share one instance. They never influence the shading result.

use lume_math::RayKind;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process counters for one render invocation.
///
/// Reset at the start of a render pass; read back as a
/// [`StatsSnapshot`] once the pass is done.
#[derive(Debug, Default)]
pub struct RenderStats {
    primary_rays: AtomicU64,
    shadow_rays: AtomicU64,
    reflection_rays: AtomicU64,
    refraction_rays: AtomicU64,
    primitive_tests: AtomicU64,
    object_hits: AtomicU64,
}

impl RenderStats {
    /// Create a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.primary_rays.store(0, Ordering::Relaxed);
        self.shadow_rays.store(0, Ordering::Relaxed);
        self.reflection_rays.store(0, Ordering::Relaxed);
        self.refraction_rays.store(0, Ordering::Relaxed);
        self.primitive_tests.store(0, Ordering::Relaxed);
        self.object_hits.store(0, Ordering::Relaxed);
    }

    /// Attribute one traced ray to its kind.
    pub fn count_ray(&self, kind: RayKind) {
        let counter = match kind {
            RayKind::Primary => &self.primary_rays,
            RayKind::Shadow => &self.shadow_rays,
            RayKind::Reflection => &self.reflection_rays,
            RayKind::Refraction => &self.refraction_rays,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Add the primitive tests performed by one query.
    pub fn add_primitive_tests(&self, tests: u64) {
        self.primitive_tests.fetch_add(tests, Ordering::Relaxed);
    }

    /// Count one query that found an object.
    pub fn count_object_hit(&self) {
        self.object_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            primary_rays: self.primary_rays.load(Ordering::Relaxed),
            shadow_rays: self.shadow_rays.load(Ordering::Relaxed),
            reflection_rays: self.reflection_rays.load(Ordering::Relaxed),
            refraction_rays: self.refraction_rays.load(Ordering::Relaxed),
            primitive_tests: self.primitive_tests.load(Ordering::Relaxed),
            object_hits: self.object_hits.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value copy of [`RenderStats`] for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub primary_rays: u64,
    pub shadow_rays: u64,
    pub reflection_rays: u64,
    pub refraction_rays: u64,
    pub primitive_tests: u64,
    pub object_hits: u64,
}

impl StatsSnapshot {
    /// Total rays of all kinds.
    pub fn total_rays(&self) -> u64 {
        self.primary_rays + self.shadow_rays + self.reflection_rays + self.refraction_rays
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rays ({} primary, {} shadow, {} reflection, {} refraction), \
             {} primitive tests, {} object hits",
            self.total_rays(),
            self.primary_rays,
            self.shadow_rays,
            self.reflection_rays,
            self.refraction_rays,
            self.primitive_tests,
            self.object_hits,
        )
    }
}
