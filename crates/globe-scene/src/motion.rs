//! Frame-rate independent interpolation helpers.

use glam::Vec3;

/// Exponentially damp `current` towards `target`.
///
/// `rate` is the decay constant in 1/s: after `1/rate` seconds about 63% of
/// the gap is closed. The result always lies between `current` and `target`.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = 1.0 - (-rate * dt.max(0.0)).exp();
    current + (target - current) * t
}

/// Move `current` a fraction `dt * speed` of the way to `target`.
///
/// The fraction is clamped to `[0, 1]` so a long frame can never overshoot.
pub fn approach(current: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    current.lerp(target, (dt * speed).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damp_converges_without_overshoot() {
        let mut value = 0.36;
        for _ in 0..200 {
            let next = damp(value, 0.62, 10.0, 1.0 / 60.0);
            assert!(next >= value && next <= 0.62);
            value = next;
        }
        assert!((value - 0.62).abs() < 1e-4);
    }

    #[test]
    fn test_damp_zero_dt_is_identity() {
        assert_eq!(damp(0.5, 1.0, 10.0, 0.0), 0.5);
        assert_eq!(damp(0.5, 1.0, 10.0, -1.0), 0.5);
    }

    #[test]
    fn test_approach_clamps_large_steps() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(approach(Vec3::ZERO, target, 0.4, 10.0), target);
        let half = approach(Vec3::ZERO, target, 0.5, 1.0);
        assert!((half - target * 0.5).length() < 1e-6);
    }
}
