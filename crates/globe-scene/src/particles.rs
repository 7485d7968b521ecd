//! Procedural particle clouds around the globe.
//!
//! Points are distributed uniformly in direction (the polar angle is drawn
//! through an inverse cosine so the poles are not over-sampled) with a radius
//! drawn uniformly from a closed range. Placement is cosmetic: callers pass
//! whatever random source they like and nothing depends on reproducibility.

use glam::Vec3;
use rand::Rng;

use crate::error::{SceneError, SceneResult, ensure_non_negative};

/// Sample `count` points inside the spherical shell `[radius_min, radius_max]`.
///
/// # Errors
///
/// Returns [`SceneError::InvalidConfiguration`] when `count` is zero or the
/// radius range is negative, non-finite, or inverted.
pub fn sample_shell<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    radius_min: f32,
    radius_max: f32,
) -> SceneResult<Vec<Vec3>> {
    if count == 0 {
        return Err(SceneError::invalid("particles.count", "expected at least one particle"));
    }
    validate_radius_range("particles.radius", radius_min, radius_max)?;

    Ok((0..count)
        .map(|_| random_shell_point(rng, radius_min, radius_max))
        .collect())
}

/// Draw one point inside the shell. The range must already be validated.
pub fn random_shell_point<R: Rng + ?Sized>(rng: &mut R, radius_min: f32, radius_max: f32) -> Vec3 {
    let radius = if radius_max > radius_min {
        rng.random_range(radius_min..=radius_max)
    } else {
        radius_min
    };
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    let phi = rng.random_range(-1.0_f32..=1.0).acos();
    let point = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()) * radius;

    // Rounding in sin/cos can push a point a hair outside the range.
    let length = point.length();
    if length > 0.0 {
        point * (length.clamp(radius_min, radius_max) / length)
    } else {
        point
    }
}

pub(crate) fn validate_radius_range(
    field: &'static str,
    radius_min: f32,
    radius_max: f32,
) -> SceneResult<()> {
    ensure_non_negative(field, radius_min)?;
    ensure_non_negative(field, radius_max)?;
    if radius_max < radius_min {
        return Err(SceneError::invalid(
            field,
            format!("range is inverted: min {radius_min} > max {radius_max}"),
        ));
    }
    Ok(())
}

/// Parameters of one drifting particle layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleLayerConfig {
    pub count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Yaw rate in radians per second at full speed.
    pub spin: f32,
    /// Amplitude of the pitch wobble in radians (0 disables it).
    pub wobble_amplitude: f32,
    /// Angular frequency of the pitch wobble.
    pub wobble_frequency: f32,
    pub point_size: f32,
    pub opacity: f32,
}

/// A sampled particle cloud plus its current orientation.
#[derive(Debug, Clone)]
pub struct ParticleLayer {
    config: ParticleLayerConfig,
    points: Vec<Vec3>,
    yaw: f32,
    pitch: f32,
}

impl ParticleLayer {
    /// Sample the layer's points.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: ParticleLayerConfig) -> SceneResult<Self> {
        let points = sample_shell(rng, config.count, config.radius_min, config.radius_max)?;
        Ok(Self {
            config,
            points,
            yaw: 0.0,
            pitch: 0.0,
        })
    }

    /// Advance the drift. `delta` is already scaled by the scene speed;
    /// the wobble follows the unscaled clock.
    pub fn advance(&mut self, elapsed: f32, delta: f32) {
        self.yaw = (self.yaw + delta * self.config.spin).rem_euclid(std::f32::consts::TAU);
        self.pitch = (elapsed * self.config.wobble_frequency).sin() * self.config.wobble_amplitude;
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn config(&self) -> &ParticleLayerConfig {
        &self.config
    }

    /// Current `(yaw, pitch)` in radians.
    pub fn orientation(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }
}
