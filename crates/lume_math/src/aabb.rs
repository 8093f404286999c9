use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures.
///
/// Stored as the two extreme corners. A freshly created box is empty
/// (min = +inf, max = -inf) and grows monotonically through
/// [`extend_by`](Aabb::extend_by); an empty box must never be handed to
/// the slab test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty AABB (contains nothing, inverted bounds).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from explicit corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Create an AABB enclosing two arbitrary points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow the box to include a point. Bounds only ever widen.
    pub fn extend_by(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// True if the box has inverted bounds on any axis.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// The corner-to-corner extent of the box.
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Enclosed volume. Zero for flat or empty boxes.
    pub fn volume(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Select the min (0) or max (1) corner, matching a ray's sign bits.
    #[inline]
    pub fn bound(&self, sign: usize) -> Vec3 {
        if sign == 0 {
            self.min
        } else {
            self.max
        }
    }

    /// Slab-method ray intersection, returning the entry distance.
    ///
    /// The ray's precomputed sign bits pick the near and far bound per
    /// axis, so the three slab intervals come out already ordered. A zero
    /// direction component makes the reciprocal infinite; the products
    /// below stay comparable under IEEE rules, so no axis needs a special
    /// case. Slab intervals are closed: a ray grazing a face counts as a
    /// hit.
    ///
    /// Returns `Some(t_near)` when the interval intersection is non-empty
    /// and reaches t >= 0. `t_near` is negative when the origin is inside
    /// the box.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let origin = ray.origin();
        let inv = ray.inv_direction();
        let sign = ray.sign();

        let mut t_min = (self.bound(sign[0]).x - origin.x) * inv.x;
        let mut t_max = (self.bound(1 - sign[0]).x - origin.x) * inv.x;

        let ty_min = (self.bound(sign[1]).y - origin.y) * inv.y;
        let ty_max = (self.bound(1 - sign[1]).y - origin.y) * inv.y;

        if t_min > ty_max || ty_min > t_max {
            return None;
        }
        t_min = t_min.max(ty_min);
        t_max = t_max.min(ty_max);

        let tz_min = (self.bound(sign[2]).z - origin.z) * inv.z;
        let tz_max = (self.bound(1 - sign[2]).z - origin.z) * inv.z;

        if t_min > tz_max || tz_min > t_max {
            return None;
        }
        t_min = t_min.max(tz_min);
        t_max = t_max.min(tz_max);

        if t_max < 0.0 {
            return None;
        }
        Some(t_min)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_by() {
        let mut aabb = Aabb::empty();
        aabb.extend_by(Vec3::new(1.0, -2.0, 3.0));
        aabb.extend_by(Vec3::new(-1.0, 4.0, 0.0));

        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));

        // Extending by an interior point changes nothing
        let before = aabb;
        aabb.extend_by(Vec3::ZERO);
        assert_eq!(aabb, before);
    }

    #[test]
    fn test_empty_is_empty() {
        assert!(Aabb::empty().is_empty());
        assert_eq!(Aabb::empty().volume(), 0.0);

        let mut aabb = Aabb::empty();
        aabb.extend_by(Vec3::ZERO);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min.x, 0.0);
        assert_eq!(surrounding.max.x, 10.0);
    }

    #[test]
    fn test_intersect_hit_and_miss() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center enters the near face at t=4
        let ray = Ray::primary(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let t = aabb.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        // Ray pointing away
        let ray = Ray::primary(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect(&ray).is_none());

        // Ray missing the box
        let ray = Ray::primary(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect(&ray).is_none());
    }

    #[test]
    fn test_intersect_origin_inside() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::primary(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

        // Entry distance is behind the origin
        let t = aabb.intersect(&ray).unwrap();
        assert!(t < 0.0);
    }

    #[test]
    fn test_intersect_zero_direction_component() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Axis-parallel ray whose y and z components are exactly zero:
        // the infinite reciprocals must not break the interval math.
        let ray = Ray::primary(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let t = aabb.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        // Same ray shifted outside the slab on y must miss
        let ray = Ray::primary(Vec3::new(-5.0, 2.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(aabb.intersect(&ray).is_none());
    }

    #[test]
    fn test_intersect_negative_direction() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::primary(Vec3::new(5.0, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0));

        let t = aabb.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_intersect_tangent_is_deterministic() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray grazing the y = 1 face: closed slab intervals report a hit,
        // and repeated queries agree.
        let ray = Ray::primary(Vec3::new(-5.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let first = aabb.intersect(&ray);
        let second = aabb.intersect(&ray);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
