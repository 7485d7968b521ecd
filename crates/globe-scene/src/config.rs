//! Scene configuration.
//!
//! Every tunable of the globe lives here, grouped the way the scene is
//! composed. Two presets cover the variants the site uses: the interactive
//! services globe on the home page and the decorative hero orb.

use crate::error::{SceneError, SceneResult, ensure_finite, ensure_non_negative, ensure_positive};
use crate::particles::{ParticleLayerConfig, validate_radius_range};
use crate::shell::{EdgeMode, ShellParams};

/// Largest accepted icon pool.
pub const MAX_POOL_SIZE: usize = 256;

/// What happens to the animation while the pointer is over the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverBehavior {
    /// Keep animating at the given fraction of full speed.
    SlowDown(f32),
    /// Freeze all speed-scaled motion.
    Pause,
}

impl HoverBehavior {
    /// Speed multiplier for the given hover state.
    pub fn speed(self, hovered: bool) -> f32 {
        match (self, hovered) {
            (_, false) => 1.0,
            (Self::SlowDown(factor), true) => factor,
            (Self::Pause, true) => 0.0,
        }
    }
}

/// Core sphere and wireframe shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbConfig {
    /// Radius of the opaque core; also the occluder for icons.
    pub core_radius: f32,
    /// Whether the core is drawn opaque (services globe) or as a faint tint.
    pub core_opacity: f32,
    pub shell_radius: f32,
    pub subdivision: i32,
    pub edges: EdgeMode,
    pub line_opacity: f32,
    pub node_size: f32,
    /// Radius of the translucent atmosphere halo (0 disables it).
    pub atmosphere_radius: f32,
}

/// Drifting particle layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlesConfig {
    pub aura: Option<ParticleLayerConfig>,
    pub field: Option<ParticleLayerConfig>,
}

/// Post-process glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomConfig {
    pub enabled: bool,
    pub intensity: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Light platform with expanding ripple rings under the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformConfig {
    pub enabled: bool,
    pub height: f32,
    pub ripple_speed: f32,
    pub ripple_count: usize,
}

/// Floating service icons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconConfig {
    pub pool_size: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Seconds of (speed-scaled) time between repopulations.
    pub repopulate_interval: f32,
    pub move_speed: f32,
    /// Chance that a slot switches service on repopulation.
    pub reassign_probability: f32,
    pub base_scale: f32,
    pub hovered_scale: f32,
    pub selected_scale: f32,
    /// Decay rate for scale and visibility damping.
    pub damping: f32,
    /// Pick radius at scale 1.
    pub pick_radius: f32,
}

/// Rotation and pulse rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Yaw rate of the whole globe group (icons included).
    pub globe_spin: f32,
    /// Additional yaw rate of the shell inside the group.
    pub shell_spin: f32,
    /// Amplitude and angular frequency of the line-opacity pulse.
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    /// Pitch wobble of the whole orb (hero variant).
    pub tilt_amplitude: f32,
    pub tilt_frequency: f32,
    /// Vertical float of the whole orb (hero variant).
    pub float_amplitude: f32,
    pub float_frequency: f32,
    pub hover: HoverBehavior,
}

/// Full scene configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeConfig {
    pub orb: OrbConfig,
    pub particles: ParticlesConfig,
    pub bloom: BloomConfig,
    pub platform: PlatformConfig,
    pub icons: IconConfig,
    pub motion: MotionConfig,
    /// Tolerance for the icon occlusion test.
    pub occlusion_epsilon: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self::services_globe()
    }
}

impl GlobeConfig {
    /// Interactive globe with floating service icons.
    pub fn services_globe() -> Self {
        Self {
            orb: OrbConfig {
                core_radius: 1.4,
                core_opacity: 1.0,
                shell_radius: 1.5,
                subdivision: 4,
                edges: EdgeMode::Mesh,
                line_opacity: 0.3,
                node_size: 0.016,
                atmosphere_radius: 1.78,
            },
            particles: ParticlesConfig {
                aura: Some(ParticleLayerConfig {
                    count: 200,
                    radius_min: 1.7,
                    radius_max: 2.2,
                    spin: 0.2,
                    wobble_amplitude: 0.0,
                    wobble_frequency: 0.0,
                    point_size: 0.015,
                    opacity: 0.35,
                }),
                field: Some(ParticleLayerConfig {
                    count: 320,
                    radius_min: 2.2,
                    radius_max: 4.4,
                    spin: 0.02,
                    wobble_amplitude: 0.06,
                    wobble_frequency: 0.08,
                    point_size: 0.014,
                    opacity: 0.32,
                }),
            },
            bloom: BloomConfig {
                enabled: true,
                intensity: 0.55,
                radius: 0.4,
                threshold: 0.18,
            },
            platform: PlatformConfig {
                enabled: true,
                height: -2.2,
                ripple_speed: 0.15,
                ripple_count: 5,
            },
            icons: IconConfig {
                pool_size: 24,
                radius_min: 2.0,
                radius_max: 2.6,
                repopulate_interval: 5.5,
                move_speed: 0.4,
                reassign_probability: 0.4,
                base_scale: 0.36,
                hovered_scale: 0.48,
                selected_scale: 0.62,
                damping: 10.0,
                pick_radius: 0.5,
            },
            motion: MotionConfig {
                globe_spin: 0.14,
                shell_spin: 0.12,
                pulse_amplitude: 0.02,
                pulse_frequency: 0.8,
                tilt_amplitude: 0.0,
                tilt_frequency: 0.0,
                float_amplitude: 0.0,
                float_frequency: 0.0,
                hover: HoverBehavior::SlowDown(0.6),
            },
            occlusion_epsilon: crate::occlusion::DEFAULT_EPSILON,
        }
    }

    /// Decorative network orb for the hero section.
    pub fn hero_orb() -> Self {
        Self {
            orb: OrbConfig {
                core_radius: 1.15,
                core_opacity: 0.15,
                shell_radius: 1.2,
                subdivision: 2,
                edges: EdgeMode::Proximity(0.5),
                line_opacity: 0.4,
                node_size: 0.035,
                atmosphere_radius: 0.0,
            },
            particles: ParticlesConfig {
                aura: None,
                field: Some(ParticleLayerConfig {
                    count: 200,
                    radius_min: 1.5,
                    radius_max: 3.0,
                    spin: 0.02,
                    wobble_amplitude: 0.0,
                    wobble_frequency: 0.0,
                    point_size: 0.015,
                    opacity: 0.5,
                }),
            },
            bloom: BloomConfig {
                enabled: false,
                intensity: 0.0,
                radius: 0.0,
                threshold: 1.0,
            },
            platform: PlatformConfig {
                enabled: false,
                height: 0.0,
                ripple_speed: 0.0,
                ripple_count: 0,
            },
            icons: IconConfig {
                pool_size: 0,
                ..Self::services_globe().icons
            },
            motion: MotionConfig {
                globe_spin: 0.15,
                shell_spin: 0.0,
                pulse_amplitude: 0.0,
                pulse_frequency: 0.0,
                tilt_amplitude: 0.1,
                tilt_frequency: 0.1,
                float_amplitude: 0.05,
                float_frequency: 0.5,
                hover: HoverBehavior::Pause,
            },
            occlusion_epsilon: crate::occlusion::DEFAULT_EPSILON,
        }
    }

    /// Shell parameters derived from the orb section.
    pub fn shell_params(&self) -> ShellParams {
        ShellParams {
            subdivision: self.orb.subdivision,
            radius: self.orb.shell_radius,
            edges: self.orb.edges,
        }
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns the first [`SceneError::InvalidConfiguration`] found. Values
    /// are never clamped.
    pub fn validate(&self) -> SceneResult<()> {
        let orb = &self.orb;
        ensure_positive("orb.core_radius", orb.core_radius)?;
        ensure_unit("orb.core_opacity", orb.core_opacity)?;
        ensure_positive("orb.shell_radius", orb.shell_radius)?;
        ensure_unit("orb.line_opacity", orb.line_opacity)?;
        ensure_non_negative("orb.node_size", orb.node_size)?;
        ensure_non_negative("orb.atmosphere_radius", orb.atmosphere_radius)?;
        if orb.subdivision < 0 {
            return Err(SceneError::invalid(
                "orb.subdivision",
                format!("expected a level >= 0, got {}", orb.subdivision),
            ));
        }
        if let EdgeMode::Proximity(max_len) = orb.edges {
            ensure_positive("orb.edges", max_len)?;
        }

        for (field, layer) in [
            ("particles.aura", self.particles.aura),
            ("particles.field", self.particles.field),
        ] {
            let Some(layer) = layer else { continue };
            if layer.count == 0 {
                return Err(SceneError::invalid(field, "expected at least one particle"));
            }
            validate_radius_range(field, layer.radius_min, layer.radius_max)?;
            ensure_finite(field, layer.spin)?;
            ensure_finite(field, layer.wobble_amplitude)?;
            ensure_finite(field, layer.wobble_frequency)?;
            ensure_non_negative(field, layer.point_size)?;
            ensure_unit(field, layer.opacity)?;
        }

        if self.bloom.enabled {
            ensure_non_negative("bloom.intensity", self.bloom.intensity)?;
            ensure_non_negative("bloom.radius", self.bloom.radius)?;
            ensure_non_negative("bloom.threshold", self.bloom.threshold)?;
        }

        if self.platform.enabled {
            ensure_finite("platform.height", self.platform.height)?;
            ensure_non_negative("platform.ripple_speed", self.platform.ripple_speed)?;
        }

        let icons = &self.icons;
        if icons.pool_size > MAX_POOL_SIZE {
            return Err(SceneError::invalid(
                "icons.pool_size",
                format!("{} exceeds the maximum of {MAX_POOL_SIZE}", icons.pool_size),
            ));
        }
        validate_radius_range("icons.radius", icons.radius_min, icons.radius_max)?;
        ensure_positive("icons.repopulate_interval", icons.repopulate_interval)?;
        ensure_non_negative("icons.move_speed", icons.move_speed)?;
        ensure_unit("icons.reassign_probability", icons.reassign_probability)?;
        ensure_positive("icons.base_scale", icons.base_scale)?;
        ensure_positive("icons.hovered_scale", icons.hovered_scale)?;
        ensure_positive("icons.selected_scale", icons.selected_scale)?;
        ensure_positive("icons.damping", icons.damping)?;
        ensure_positive("icons.pick_radius", icons.pick_radius)?;

        let motion = &self.motion;
        for (field, value) in [
            ("motion.globe_spin", motion.globe_spin),
            ("motion.shell_spin", motion.shell_spin),
            ("motion.pulse_amplitude", motion.pulse_amplitude),
            ("motion.pulse_frequency", motion.pulse_frequency),
            ("motion.tilt_amplitude", motion.tilt_amplitude),
            ("motion.tilt_frequency", motion.tilt_frequency),
            ("motion.float_amplitude", motion.float_amplitude),
            ("motion.float_frequency", motion.float_frequency),
        ] {
            ensure_finite(field, value)?;
        }
        if let HoverBehavior::SlowDown(factor) = motion.hover {
            ensure_unit("motion.hover", factor)?;
        }

        ensure_non_negative("occlusion_epsilon", self.occlusion_epsilon)?;
        Ok(())
    }
}

fn ensure_unit(field: &'static str, value: f32) -> SceneResult<f32> {
    let value = ensure_non_negative(field, value)?;
    if value > 1.0 {
        return Err(SceneError::invalid(
            field,
            format!("expected a value in [0, 1], got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        GlobeConfig::services_globe().validate().unwrap();
        GlobeConfig::hero_orb().validate().unwrap();
    }

    #[test]
    fn test_hover_speed() {
        assert_eq!(HoverBehavior::SlowDown(0.6).speed(false), 1.0);
        assert_eq!(HoverBehavior::SlowDown(0.6).speed(true), 0.6);
        assert_eq!(HoverBehavior::Pause.speed(true), 0.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut config = GlobeConfig::services_globe();
        config.icons.move_speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(SceneError::InvalidConfiguration { field: "icons.move_speed", .. })
        ));

        let mut config = GlobeConfig::services_globe();
        config.motion.globe_spin = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut config = GlobeConfig::services_globe();
        config.icons.reassign_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GlobeConfig::services_globe();
        config.icons.pool_size = MAX_POOL_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = GlobeConfig::services_globe();
        config.orb.subdivision = -2;
        assert!(config.validate().is_err());

        let mut config = GlobeConfig::services_globe();
        config.icons.radius_min = 3.0;
        assert!(config.validate().is_err());
    }
}
