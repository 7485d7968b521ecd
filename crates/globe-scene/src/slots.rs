//! Fixed-size pool of floating icon slots.
//!
//! Each slot is bound to one catalog entry and drifts towards a target point
//! in a spherical shell around the globe. Every repopulation period all slots
//! receive new targets and some switch service. Positions and scales are
//! interpolated every frame, so target changes never show up as jumps.

use glam::Vec3;
use rand::Rng;

use crate::config::IconConfig;
use crate::error::{SceneError, SceneResult, ensure_non_negative, ensure_positive};
use crate::frame::{FrameRegistry, IntervalTimer};
use crate::motion::{approach, damp};
use crate::particles::{random_shell_point, validate_radius_range};

/// One icon slot.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSlot {
    pub(crate) position: Vec3,
    pub(crate) target: Vec3,
    pub(crate) service: usize,
    pub(crate) scale: f32,
}

impl IconSlot {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Index of the bound service in the catalog.
    pub fn service(&self) -> usize {
        self.service
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Emphasis applied to a slot's service for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emphasis {
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
}

/// Owns all icon slots of one scene.
#[derive(Debug)]
pub struct SlotPool {
    config: IconConfig,
    service_count: usize,
    slots: Vec<IconSlot>,
    repopulate: IntervalTimer,
}

impl SlotPool {
    /// Create the pool with randomized positions.
    ///
    /// Slot `i` starts bound to service `i % service_count`, so every service
    /// is on screen from the first frame when the pool is large enough.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfiguration`] for non-finite or
    /// inconsistent values, or a non-empty pool over an empty catalog.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        config: IconConfig,
        service_count: usize,
        registry: &FrameRegistry,
    ) -> SceneResult<Self> {
        validate_radius_range("icons.radius", config.radius_min, config.radius_max)?;
        for (field, value) in [
            ("icons.move_speed", config.move_speed),
            ("icons.damping", config.damping),
            ("icons.base_scale", config.base_scale),
            ("icons.hovered_scale", config.hovered_scale),
            ("icons.selected_scale", config.selected_scale),
            ("icons.reassign_probability", config.reassign_probability),
        ] {
            ensure_non_negative(field, value)?;
        }
        ensure_positive("icons.repopulate_interval", config.repopulate_interval)?;
        if config.reassign_probability > 1.0 {
            return Err(SceneError::invalid(
                "icons.reassign_probability",
                format!("expected a probability, got {}", config.reassign_probability),
            ));
        }
        if config.pool_size > 0 && service_count == 0 {
            return Err(SceneError::invalid(
                "icons.pool_size",
                "icon slots need at least one service in the catalog",
            ));
        }

        let slots = (0..config.pool_size)
            .map(|i| {
                let position = random_shell_point(rng, config.radius_min, config.radius_max);
                IconSlot {
                    position,
                    target: position,
                    service: i % service_count,
                    scale: config.base_scale,
                }
            })
            .collect();

        Ok(Self {
            config,
            service_count,
            slots,
            repopulate: registry.start_interval(config.repopulate_interval),
        })
    }

    pub fn slots(&self) -> &[IconSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of completed repopulations.
    pub fn generation(&self) -> u64 {
        self.repopulate.fired()
    }

    /// Target scale for a slot bound to `service`.
    pub fn target_scale(&self, service: usize, emphasis: Emphasis) -> f32 {
        let mut scale = self.config.base_scale;
        if emphasis.hovered == Some(service) {
            scale = scale.max(self.config.hovered_scale);
        }
        if emphasis.selected == Some(service) {
            scale = scale.max(self.config.selected_scale);
        }
        scale
    }

    /// Give every slot a new target and maybe a new service.
    pub fn repopulate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (radius_min, radius_max) = (self.config.radius_min, self.config.radius_max);
        let mut reassigned = 0;
        for slot in &mut self.slots {
            slot.target = random_shell_point(rng, radius_min, radius_max);
            if rng.random_bool(f64::from(self.config.reassign_probability)) {
                slot.service = rng.random_range(0..self.service_count);
                reassigned += 1;
            }
        }
        tracing::debug!(
            slots = self.slots.len(),
            reassigned,
            generation = self.repopulate.fired(),
            "repopulated icon slots"
        );
    }

    /// Advance one frame.
    ///
    /// `scaled_delta` is the frame delta multiplied by the scene speed and
    /// drives drift and the repopulation timer; `delta` is the raw frame
    /// delta and drives scale damping, so emphasis stays responsive while the
    /// scene is slowed or paused.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        delta: f32,
        scaled_delta: f32,
        emphasis: Emphasis,
    ) {
        if self.repopulate.tick(scaled_delta) {
            self.repopulate(rng);
        }

        let (move_speed, damping) = (self.config.move_speed, self.config.damping);
        for i in 0..self.slots.len() {
            let target_scale = self.target_scale(self.slots[i].service, emphasis);
            let slot = &mut self.slots[i];
            slot.position = approach(slot.position, slot.target, move_speed, scaled_delta);
            slot.scale = damp(slot.scale, target_scale, damping, delta);
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut IconSlot {
        &mut self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::config::GlobeConfig;

    fn pool(seed: u64, services: usize) -> (SlotPool, StdRng, FrameRegistry) {
        let registry = FrameRegistry::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let pool = SlotPool::new(&mut rng, GlobeConfig::services_globe().icons, services, &registry)
            .unwrap();
        (pool, rng, registry)
    }

    #[test]
    fn test_initial_assignment_round_robin() {
        let (pool, _, _) = pool(1, 9);
        assert_eq!(pool.len(), 24);
        for (i, slot) in pool.slots().iter().enumerate() {
            assert_eq!(slot.service(), i % 9);
            assert_eq!(slot.position(), slot.target());
            let r = slot.position().length();
            assert!((2.0 - 1e-4..=2.6 + 1e-4).contains(&r));
        }
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let registry = FrameRegistry::new();
        let mut rng = StdRng::seed_from_u64(0);
        let result = SlotPool::new(&mut rng, GlobeConfig::services_globe().icons, 0, &registry);
        assert!(result.is_err());
        // Nothing leaked from the failed construction.
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_timer_registered_and_released() {
        let (pool, _, registry) = pool(2, 9);
        assert_eq!(registry.timers(), 1);
        drop(pool);
        assert_eq!(registry.timers(), 0);
    }

    #[test]
    fn test_repopulation_period() {
        let (mut pool, mut rng, _) = pool(3, 9);
        let before: Vec<_> = pool.slots().iter().map(IconSlot::target).collect();
        // Just under the interval: nothing changes.
        for _ in 0..5 {
            pool.update(&mut rng, 1.0, 1.0, Emphasis::default());
        }
        assert_eq!(pool.generation(), 0);
        let unchanged: Vec<_> = pool.slots().iter().map(IconSlot::target).collect();
        assert_eq!(before, unchanged);

        pool.update(&mut rng, 1.0, 1.0, Emphasis::default());
        assert_eq!(pool.generation(), 1);
        let after: Vec<_> = pool.slots().iter().map(IconSlot::target).collect();
        assert_ne!(before, after);
        for slot in pool.slots() {
            assert!(slot.service() < 9);
        }
    }

    #[test]
    fn test_paused_pool_does_not_drift() {
        let (mut pool, mut rng, _) = pool(4, 9);
        pool.slot_mut(0).target = Vec3::new(0.0, 2.5, 0.0);
        let start = pool.slots()[0].position();
        for _ in 0..120 {
            pool.update(&mut rng, 1.0 / 60.0, 0.0, Emphasis::default());
        }
        assert_eq!(pool.slots()[0].position(), start);
        assert_eq!(pool.generation(), 0);
    }

    #[test]
    fn test_scale_follows_emphasis() {
        let (mut pool, mut rng, _) = pool(5, 9);
        let emphasis = Emphasis {
            selected: Some(3),
            hovered: Some(4),
        };
        for _ in 0..240 {
            pool.update(&mut rng, 1.0 / 60.0, 0.0, emphasis);
        }
        for slot in pool.slots() {
            let expected = match slot.service() {
                3 => 0.62,
                4 => 0.48,
                _ => 0.36,
            };
            assert!((slot.scale() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_selected_wins_over_hovered() {
        let (pool, _, _) = pool(6, 9);
        let both = Emphasis {
            selected: Some(2),
            hovered: Some(2),
        };
        assert_eq!(pool.target_scale(2, both), 0.62);
        assert_eq!(pool.target_scale(1, both), 0.36);
    }

    #[test]
    fn test_scale_continuous_on_target_change() {
        let (mut pool, mut rng, _) = pool(7, 9);
        let dt = 1.0 / 60.0;
        let selected = Emphasis {
            selected: Some(0),
            hovered: None,
        };
        let mut previous = pool.slots()[0].scale();
        for frame in 0..60 {
            let emphasis = if frame % 20 < 10 { selected } else { Emphasis::default() };
            pool.update(&mut rng, dt, dt, emphasis);
            let scale = pool.slots()[0].scale();
            // Per-frame change is bounded by the damping step.
            assert!((scale - previous).abs() <= (0.62 - 0.36) * (1.0 - (-10.0 * dt).exp()) + 1e-6);
            previous = scale;
        }
    }

    proptest! {
        #[test]
        fn prop_distance_to_target_non_increasing(
            seed in any::<u64>(),
            deltas in proptest::collection::vec(0.0f32..0.5, 1..60),
        ) {
            let (mut pool, mut rng, _) = pool(seed, 9);
            for (i, slot) in pool.slots.iter_mut().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let angle = i as f32;
                slot.target = Vec3::new(angle.cos(), 0.3, angle.sin()) * 2.3;
            }
            let mut distances: Vec<f32> =
                pool.slots().iter().map(|s| s.position().distance(s.target())).collect();
            for dt in deltas {
                // Stay below the repopulation interval so targets are fixed.
                pool.update(&mut rng, dt, dt.min(0.05), Emphasis::default());
                prop_assert_eq!(pool.generation(), 0);
                for (slot, previous) in pool.slots().iter().zip(distances.iter_mut()) {
                    let d = slot.position().distance(slot.target());
                    prop_assert!(d <= *previous + 1e-5, "{} > {}", d, previous);
                    *previous = d;
                }
            }
        }
    }
}
