//! Frame-loop plumbing shared with the rendering host.
//!
//! The host owns the actual loop and hands each scene a [`FrameTick`]. What
//! the scene owns is bookkeeping: a [`Registration`] for every per-frame
//! callback and periodic timer it holds. Registrations are counted in a
//! [`FrameRegistry`] and released on drop, so a scene that is torn down leaves
//! the counters where they started.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Clock values for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTick {
    /// Seconds since the host clock started. Monotonic.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameTick {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Kind of resource a registration stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    FrameCallback,
    Timer,
}

#[derive(Debug, Default)]
struct Counters {
    frame_callbacks: AtomicUsize,
    timers: AtomicUsize,
}

impl Counters {
    fn counter(&self, kind: RegistrationKind) -> &AtomicUsize {
        match kind {
            RegistrationKind::FrameCallback => &self.frame_callbacks,
            RegistrationKind::Timer => &self.timers,
        }
    }
}

/// Counts live frame callbacks and timers across all scenes.
#[derive(Debug, Clone, Default)]
pub struct FrameRegistry {
    counters: Arc<Counters>,
}

impl FrameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a per-frame callback.
    #[must_use]
    pub fn register_frame_callback(&self) -> Registration {
        self.register(RegistrationKind::FrameCallback)
    }

    /// Start a periodic timer firing every `period` seconds of scene time.
    #[must_use]
    pub fn start_interval(&self, period: f32) -> IntervalTimer {
        IntervalTimer {
            period,
            accumulated: 0.0,
            fired: 0,
            _registration: self.register(RegistrationKind::Timer),
        }
    }

    fn register(&self, kind: RegistrationKind) -> Registration {
        self.counters.counter(kind).fetch_add(1, Ordering::Relaxed);
        Registration {
            kind,
            counters: self.counters.clone(),
        }
    }

    /// Live per-frame callbacks.
    pub fn frame_callbacks(&self) -> usize {
        self.counters.frame_callbacks.load(Ordering::Relaxed)
    }

    /// Live timers.
    pub fn timers(&self) -> usize {
        self.counters.timers.load(Ordering::Relaxed)
    }

    /// Total live registrations.
    pub fn active(&self) -> usize {
        self.frame_callbacks() + self.timers()
    }
}

/// A live registration. Dropping it deregisters.
#[derive(Debug)]
pub struct Registration {
    kind: RegistrationKind,
    counters: Arc<Counters>,
}

impl Registration {
    pub fn kind(&self) -> RegistrationKind {
        self.kind
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.counters.counter(self.kind).fetch_sub(1, Ordering::Relaxed);
    }
}

/// Periodic timer advanced by the frame loop.
#[derive(Debug)]
pub struct IntervalTimer {
    period: f32,
    accumulated: f32,
    fired: u64,
    _registration: Registration,
}

impl IntervalTimer {
    /// Advance by `delta` seconds; returns true when the period elapsed.
    ///
    /// The accumulator resets on firing, so a stalled frame fires at most once.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulated += delta.max(0.0);
        if self.accumulated > self.period {
            self.accumulated = 0.0;
            self.fired += 1;
            true
        } else {
            false
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Number of times the timer has fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrations_released_on_drop() {
        let registry = FrameRegistry::new();
        let callback = registry.register_frame_callback();
        let timer = registry.start_interval(1.0);
        assert_eq!(registry.frame_callbacks(), 1);
        assert_eq!(registry.timers(), 1);
        assert_eq!(callback.kind(), RegistrationKind::FrameCallback);

        drop(callback);
        assert_eq!(registry.frame_callbacks(), 0);
        drop(timer);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let registry = FrameRegistry::new();
        let other = registry.clone();
        let _a = other.register_frame_callback();
        assert_eq!(registry.frame_callbacks(), 1);
    }

    #[test]
    fn test_interval_fires_after_period() {
        let registry = FrameRegistry::new();
        let mut timer = registry.start_interval(5.5);
        let mut fired = 0;
        for _ in 0..600 {
            if timer.tick(1.0 / 60.0) {
                fired += 1;
            }
        }
        // 10 seconds at 60 Hz.
        assert_eq!(fired, 1);
        assert_eq!(timer.fired(), 1);

        // A single huge frame fires once.
        assert!(timer.tick(100.0));
        assert!(!timer.tick(0.0));
    }

    #[test]
    fn test_interval_ignores_negative_delta() {
        let registry = FrameRegistry::new();
        let mut timer = registry.start_interval(1.0);
        assert!(!timer.tick(-10.0));
        assert!(!timer.tick(0.9));
        assert!(timer.tick(0.2));
    }
}
