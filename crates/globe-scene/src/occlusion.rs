//! Line-of-sight test against an opaque sphere.

use glam::Vec3;

/// Default tolerance subtracted from the target distance.
///
/// Keeps icons sitting exactly on the silhouette from flickering between
/// visible and hidden.
pub const DEFAULT_EPSILON: f32 = 1.0e-3;

/// An opaque sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Ray parameters `(t0, t1)` where the ray enters and leaves the sphere,
    /// or `None` if it misses. `direction` must be normalized.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
        let oc = origin - self.center;
        let b = oc.dot(direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        Some((-b - root, -b + root))
    }
}

/// Whether the segment from `viewpoint` to `target` passes through `sphere`.
///
/// Occluded iff some strictly positive intersection parameter lies before
/// `distance(viewpoint, target) - epsilon`. A zero-length segment is never
/// occluded.
pub fn is_occluded(viewpoint: Vec3, target: Vec3, sphere: Sphere, epsilon: f32) -> bool {
    let to_target = target - viewpoint;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return false;
    }
    let direction = to_target / distance;

    let Some((t0, t1)) = sphere.intersect(viewpoint, direction) else {
        return false;
    };
    let limit = distance - epsilon;
    [t0, t1].into_iter().any(|t| t > 0.0 && t < limit)
}
