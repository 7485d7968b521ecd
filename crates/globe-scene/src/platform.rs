//! Light platform under the globe: a glowing disc with expanding ripples.

use crate::config::PlatformConfig;

/// Transform of one ripple ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    /// Phase in `[0, 1)`.
    pub phase: f32,
    pub scale: f32,
    pub opacity: f32,
}

/// Ripple state driven by speed-scaled time.
#[derive(Debug, Clone)]
pub struct Platform {
    config: PlatformConfig,
    time: f32,
}

impl Platform {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config, time: 0.0 }
    }

    pub fn advance(&mut self, scaled_delta: f32) {
        self.time += scaled_delta * self.config.ripple_speed;
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }

    /// Ring `i` of `ripple_count`, evenly staggered in phase.
    #[allow(clippy::cast_precision_loss)]
    pub fn ripples(&self) -> impl Iterator<Item = Ripple> + '_ {
        let count = self.config.ripple_count;
        (0..count).map(move |i| {
            let phase = (self.time + i as f32 / count as f32).rem_euclid(1.0);
            Ripple {
                phase,
                scale: 0.4 + phase * 3.2,
                opacity: ((1.0 - phase).powi(2) * 0.28).max(0.0),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Platform {
        Platform::new(PlatformConfig {
            enabled: true,
            height: -2.2,
            ripple_speed: 0.15,
            ripple_count: 5,
        })
    }

    #[test]
    fn test_initial_phases_staggered() {
        let ripples: Vec<_> = platform().ripples().collect();
        assert_eq!(ripples.len(), 5);
        for (i, ripple) in ripples.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = i as f32 / 5.0;
            assert!((ripple.phase - expected).abs() < 1e-6);
        }
        assert!((ripples[0].scale - 0.4).abs() < 1e-6);
        assert!((ripples[0].opacity - 0.28).abs() < 1e-6);
    }

    #[test]
    fn test_paused_time_freezes_ripples() {
        let mut p = platform();
        p.advance(1.0);
        let before: Vec<_> = p.ripples().collect();
        p.advance(0.0);
        let after: Vec<_> = p.ripples().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_phase_wraps() {
        let mut p = platform();
        // 0.15 * 10 = 1.5 cycles.
        p.advance(10.0);
        let first = p.ripples().next().unwrap();
        assert!((first.phase - 0.5).abs() < 1e-4);
    }
}
