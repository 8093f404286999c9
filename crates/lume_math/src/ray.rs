use crate::Vec3;

/// What a ray is being traced for.
///
/// The tag has no effect on intersection math; the renderer uses it to
/// attribute rays to the right diagnostic counter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RayKind {
    Primary,
    Shadow,
    Reflection,
    Refraction,
}

/// A ray in 3D space with origin, direction, and a kind tag.
///
/// The reciprocal of the direction and the per-axis direction signs are
/// computed once at construction and kept in sync with the direction, so
/// slab tests and grid traversal never divide per query. A direction
/// component of zero yields an infinite reciprocal, which the slab test
/// relies on for well-defined comparisons.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    sign: [usize; 3],
    kind: RayKind,
}

impl Ray {
    /// Create a new ray. The direction is expected to be normalized by
    /// the caller; intersection parameters are distances only when it is.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        let (inv_direction, sign) = derived(direction);
        Self {
            origin,
            direction,
            inv_direction,
            sign,
            kind,
        }
    }

    /// Create a primary (camera) ray.
    pub fn primary(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, RayKind::Primary)
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the component-wise reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Per-axis direction sign: 0 for non-negative, 1 for negative.
    ///
    /// Indexes the "near" bound of an axis-aligned slab without branching.
    #[inline]
    pub fn sign(&self) -> [usize; 3] {
        self.sign
    }

    /// Get the ray's kind tag.
    #[inline]
    pub fn kind(&self) -> RayKind {
        self.kind
    }

    /// Replace the direction, recomputing the cached reciprocal and signs.
    ///
    /// This is the only way to mutate the direction; the derived fields
    /// can never go stale.
    pub fn set_direction(&mut self, direction: Vec3) {
        let (inv_direction, sign) = derived(direction);
        self.direction = direction;
        self.inv_direction = inv_direction;
        self.sign = sign;
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// Reciprocal and sign bits for a direction.
///
/// Signs are read off the reciprocal rather than the direction so that a
/// `-0.0` component (reciprocal `-inf`) selects the same slab bound as a
/// small negative one.
fn derived(direction: Vec3) -> (Vec3, [usize; 3]) {
    let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
    let sign = [
        (inv.x < 0.0) as usize,
        (inv.y < 0.0) as usize,
        (inv.z < 0.0) as usize,
    ];
    (inv, sign)
}
