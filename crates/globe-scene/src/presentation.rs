//! Choosing between the animated globe and the static fallback.
//!
//! Without an accelerated rendering context, or when the visitor asked for
//! reduced motion, the host draws a flat orb instead of the 3D scene.

use glam::Vec2;

use crate::error::{SceneError, SceneResult};

/// What the host can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCapabilities {
    pub gpu_available: bool,
    pub prefers_reduced_motion: bool,
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self {
            gpu_available: true,
            prefers_reduced_motion: false,
        }
    }
}

impl RenderCapabilities {
    /// Check that the 3D scene can be rendered.
    pub fn require_gpu(&self) -> SceneResult<()> {
        if self.gpu_available {
            Ok(())
        } else {
            Err(SceneError::RenderingUnavailable {
                reason: "no accelerated rendering context".to_owned(),
            })
        }
    }
}

/// How the globe is presented.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Animated,
    Static(FallbackOrb),
}

impl Presentation {
    /// Pick a presentation. Missing GPU support degrades, it does not fail.
    pub fn choose(capabilities: RenderCapabilities) -> Self {
        if capabilities.prefers_reduced_motion {
            tracing::info!("reduced motion requested, using static orb");
            return Self::Static(FallbackOrb::default());
        }
        if let Err(err) = capabilities.require_gpu() {
            tracing::warn!("falling back to static orb: {err}");
            return Self::Static(FallbackOrb {
                pulse_period: PULSE_PERIOD,
                ..FallbackOrb::default()
            });
        }
        Self::Animated
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated)
    }
}

/// Halo pulse period when motion is allowed.
const PULSE_PERIOD: f32 = 3.0;

/// Flat orb drawn in a square of side `diameter`, centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackOrb {
    pub spokes: usize,
    pub dots: usize,
    /// Dot ring radius as a fraction of the diameter.
    pub dot_ring: f32,
    /// Inner ring diameter as a fraction of the outer diameter.
    pub ring: f32,
    /// Period of the halo pulse in seconds (0 when motion is reduced).
    pub pulse_period: f32,
}

impl Default for FallbackOrb {
    fn default() -> Self {
        Self {
            spokes: 12,
            dots: 8,
            dot_ring: 80.0 / 256.0,
            ring: 0.75,
            pulse_period: 0.0,
        }
    }
}

impl FallbackOrb {
    /// Spoke segments through the centre, one every `360 / spokes` degrees.
    #[allow(clippy::cast_precision_loss)]
    pub fn spokes(&self, diameter: f32) -> Vec<[Vec2; 2]> {
        let half = diameter / 2.0;
        (0..self.spokes)
            .map(|i| {
                let angle = (i as f32 * 360.0 / self.spokes as f32).to_radians();
                let dir = Vec2::new(angle.sin(), -angle.cos()) * half;
                [-dir, dir]
            })
            .collect()
    }

    /// Accent dot centres.
    #[allow(clippy::cast_precision_loss)]
    pub fn dots(&self, diameter: f32) -> Vec<Vec2> {
        let r = self.dot_ring * diameter;
        (0..self.dots)
            .map(|i| {
                let angle = i as f32 / self.dots as f32 * std::f32::consts::TAU;
                Vec2::new(angle.cos(), angle.sin()) * r
            })
            .collect()
    }

    /// Inner ring radius.
    pub fn ring_radius(&self, diameter: f32) -> f32 {
        self.ring * diameter / 2.0
    }

    /// Halo opacity in `[0.1, 0.2]` at `elapsed` seconds.
    pub fn halo_opacity(&self, elapsed: f32) -> f32 {
        if self.pulse_period <= 0.0 {
            return 0.2;
        }
        let phase = (elapsed / self.pulse_period * std::f32::consts::TAU).cos();
        0.15 + phase * 0.05
    }
}
