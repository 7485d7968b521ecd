//! The composed globe scene.
//!
//! A [`GlobeScene`] owns everything one mounted globe needs: the shell
//! buffers, particle layers, platform ripples, the icon slot pool and its
//! frame registrations. The host calls [`GlobeScene::advance`] once per frame
//! and reads back poses and icon views to draw; pointer input comes in as
//! rays and goes out as [`SceneEvent`]s.

use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::catalog::ServiceCatalog;
use crate::config::GlobeConfig;
use crate::error::SceneResult;
use crate::frame::{FrameRegistry, FrameTick, Registration};
use crate::motion::damp;
use crate::occlusion::{Sphere, is_occluded};
use crate::particles::ParticleLayer;
use crate::platform::Platform;
use crate::selection::Selection;
use crate::shell::{Shell, ShellCache};
use crate::slots::{Emphasis, SlotPool};

/// Event emitted towards the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// The visitor clicked the icon of this service.
    Select { id: String },
}

/// Shared state for mounting scenes: frame registrations and shell buffers.
#[derive(Debug, Default)]
pub struct SceneHost {
    registry: FrameRegistry,
    shells: ShellCache,
}

impl SceneHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &FrameRegistry {
        &self.registry
    }

    /// Number of shells built so far.
    pub fn shell_builds(&self) -> usize {
        self.shells.builds()
    }

    /// Build a scene for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SceneError::InvalidConfiguration`] if the
    /// configuration does not validate or the catalog cannot back the icon
    /// pool.
    pub fn mount<R: Rng + ?Sized>(
        &mut self,
        config: GlobeConfig,
        catalog: Arc<ServiceCatalog>,
        rng: &mut R,
    ) -> SceneResult<GlobeScene> {
        config.validate()?;
        let shell = self.shells.get(config.shell_params())?;
        let aura = config
            .particles
            .aura
            .map(|layer| ParticleLayer::new(rng, layer))
            .transpose()?;
        let field = config
            .particles
            .field
            .map(|layer| ParticleLayer::new(rng, layer))
            .transpose()?;
        let slots = SlotPool::new(rng, config.icons, catalog.len(), &self.registry)?;
        let icons = vec![IconState::default(); slots.len()];

        tracing::info!(
            services = catalog.len(),
            slots = slots.len(),
            shell_edges = shell.edge_count(),
            "mounted globe scene"
        );

        Ok(GlobeScene {
            platform: config.platform.enabled.then(|| Platform::new(config.platform)),
            config,
            catalog,
            shell,
            aura,
            field,
            slots,
            icons,
            pose: ScenePose::initial(&config),
            scene_time: 0.0,
            scene_hovered: false,
            hovered_slot: None,
            emphasis: Emphasis::default(),
            _frame: self.registry.register_frame_callback(),
        })
    }
}

/// Transform and shading values for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePose {
    /// Yaw of the globe group, icons included.
    pub globe_yaw: f32,
    /// Pitch wobble of the globe group.
    pub globe_pitch: f32,
    /// Vertical float of the globe group.
    pub globe_lift: f32,
    /// Extra yaw of the shell within the group.
    pub shell_yaw: f32,
    pub line_opacity: f32,
}

impl ScenePose {
    fn initial(config: &GlobeConfig) -> Self {
        Self {
            globe_yaw: 0.0,
            globe_pitch: 0.0,
            globe_lift: 0.0,
            shell_yaw: 0.0,
            line_opacity: config.orb.line_opacity,
        }
    }

    pub fn globe_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.globe_yaw, self.globe_pitch, 0.0)
    }

    pub fn globe_translation(&self) -> Vec3 {
        Vec3::new(0.0, self.globe_lift, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IconState {
    occluded: bool,
    visibility: f32,
}

impl Default for IconState {
    fn default() -> Self {
        Self {
            occluded: false,
            visibility: 1.0,
        }
    }
}

/// Everything the host needs to draw one icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconView {
    pub slot: usize,
    /// Catalog index of the bound service.
    pub service: usize,
    /// World-space position.
    pub position: Vec3,
    pub scale: f32,
    /// Damped opacity, 0 when fully hidden behind the core.
    pub visibility: f32,
    /// False while occluded: the icon must not react to the pointer.
    pub interactive: bool,
    pub hovered: bool,
    pub selected: bool,
}

/// One mounted globe.
#[derive(Debug)]
pub struct GlobeScene {
    config: GlobeConfig,
    catalog: Arc<ServiceCatalog>,
    shell: Arc<Shell>,
    aura: Option<ParticleLayer>,
    field: Option<ParticleLayer>,
    platform: Option<Platform>,
    slots: SlotPool,
    icons: Vec<IconState>,
    pose: ScenePose,
    /// Speed-scaled clock.
    scene_time: f32,
    scene_hovered: bool,
    hovered_slot: Option<usize>,
    emphasis: Emphasis,
    _frame: Registration,
}

impl GlobeScene {
    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<ServiceCatalog> {
        &self.catalog
    }

    pub fn shell(&self) -> &Arc<Shell> {
        &self.shell
    }

    pub fn aura(&self) -> Option<&ParticleLayer> {
        self.aura.as_ref()
    }

    pub fn field(&self) -> Option<&ParticleLayer> {
        self.field.as_ref()
    }

    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    pub fn slots(&self) -> &SlotPool {
        &self.slots
    }

    pub fn pose(&self) -> ScenePose {
        self.pose
    }

    /// Current animation speed multiplier.
    pub fn speed(&self) -> f32 {
        self.config.motion.hover.speed(self.scene_hovered)
    }

    pub fn is_hovered(&self) -> bool {
        self.scene_hovered
    }

    /// Pointer entered or left the scene.
    pub fn set_scene_hovered(&mut self, hovered: bool) {
        if self.scene_hovered != hovered {
            tracing::trace!(hovered, "scene hover changed");
        }
        self.scene_hovered = hovered;
        if !hovered {
            self.hovered_slot = None;
        }
    }

    /// The opaque core in world space.
    pub fn occluder(&self) -> Sphere {
        Sphere::new(self.pose.globe_translation(), self.config.orb.core_radius)
    }

    /// Advance all animation by one frame.
    ///
    /// Every slot is updated from the same `tick` and the same pose, and
    /// occlusion is evaluated against `viewpoint` after the update.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        tick: FrameTick,
        selection: &Selection,
        viewpoint: Vec3,
        rng: &mut R,
    ) {
        let scaled = tick.delta.max(0.0) * self.speed();
        self.scene_time += scaled;

        let motion = &self.config.motion;
        let pose = &mut self.pose;
        pose.globe_yaw = (pose.globe_yaw + scaled * motion.globe_spin).rem_euclid(std::f32::consts::TAU);
        pose.globe_pitch = (self.scene_time * motion.tilt_frequency).sin() * motion.tilt_amplitude;
        pose.globe_lift = (self.scene_time * motion.float_frequency).sin() * motion.float_amplitude;
        pose.shell_yaw = (pose.shell_yaw + scaled * motion.shell_spin).rem_euclid(std::f32::consts::TAU);
        pose.line_opacity = self.config.orb.line_opacity
            + (tick.elapsed * motion.pulse_frequency).sin() * motion.pulse_amplitude;

        if let Some(aura) = &mut self.aura {
            aura.advance(tick.elapsed, scaled);
        }
        if let Some(field) = &mut self.field {
            field.advance(tick.elapsed, scaled);
        }
        if let Some(platform) = &mut self.platform {
            platform.advance(scaled);
        }

        self.emphasis = Emphasis {
            selected: selection.index(&self.catalog),
            hovered: self
                .hovered_slot
                .and_then(|slot| self.slots.slots().get(slot))
                .map(crate::slots::IconSlot::service),
        };
        self.slots.update(rng, tick.delta, scaled, self.emphasis);

        let occluder = self.occluder();
        let epsilon = self.config.occlusion_epsilon;
        let damping = self.config.icons.damping;
        for slot in 0..self.icons.len() {
            let position = self.icon_position(slot);
            let state = &mut self.icons[slot];
            state.occluded = is_occluded(viewpoint, position, occluder, epsilon);
            let target = if state.occluded { 0.0 } else { 1.0 };
            state.visibility = damp(state.visibility, target, damping, tick.delta);
        }

        if self
            .hovered_slot
            .is_some_and(|slot| self.icons.get(slot).is_none_or(|s| s.occluded))
        {
            self.hovered_slot = None;
        }
    }

    /// World-space position of a slot's icon.
    fn icon_position(&self, slot: usize) -> Vec3 {
        let local = self.slots.slots()[slot].position();
        self.pose.globe_rotation() * local + self.pose.globe_translation()
    }

    /// Views of all icons for drawing.
    pub fn icons(&self) -> impl Iterator<Item = IconView> + '_ {
        self.slots.slots().iter().enumerate().map(|(i, slot)| {
            let state = self.icons[i];
            IconView {
                slot: i,
                service: slot.service(),
                position: self.icon_position(i),
                scale: slot.scale(),
                visibility: state.visibility,
                interactive: !state.occluded,
                hovered: self.emphasis.hovered == Some(slot.service()),
                selected: self.emphasis.selected == Some(slot.service()),
            }
        })
    }

    /// Nearest interactive icon hit by the ray, if any.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<usize> {
        let direction = direction.try_normalize()?;
        let pick_radius = self.config.icons.pick_radius;
        self.icons()
            .filter(|icon| icon.interactive)
            .filter_map(|icon| {
                let bounds = Sphere::new(icon.position, pick_radius * icon.scale);
                let (t0, t1) = bounds.intersect(origin, direction)?;
                let t = if t0 > 0.0 { t0 } else { t1 };
                (t > 0.0).then_some((icon.slot, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }

    /// Update the hovered icon from a pointer ray.
    pub fn hover_ray(&mut self, origin: Vec3, direction: Vec3) -> Option<usize> {
        self.hovered_slot = self.pick(origin, direction);
        self.hovered_slot
    }

    pub fn hovered_slot(&self) -> Option<usize> {
        self.hovered_slot
    }

    /// Click on a specific slot. Occluded slots do not respond.
    pub fn click_slot(&self, slot: usize) -> Option<SceneEvent> {
        let state = self.icons.get(slot)?;
        if state.occluded {
            tracing::trace!(slot, "ignored click on occluded icon");
            return None;
        }
        let service = self.catalog.get(self.slots.slots()[slot].service())?;
        Some(SceneEvent::Select {
            id: service.id.clone(),
        })
    }

    /// Click along a pointer ray.
    pub fn click(&self, origin: Vec3, direction: Vec3) -> Option<SceneEvent> {
        self.pick(origin, direction)
            .and_then(|slot| self.click_slot(slot))
    }

    #[cfg(test)]
    pub(crate) fn slots_mut(&mut self) -> &mut SlotPool {
        &mut self.slots
    }
}

impl Drop for GlobeScene {
    fn drop(&mut self) {
        tracing::info!(slots = self.slots.len(), "unmounted globe scene");
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::config::HoverBehavior;

    const DT: f32 = 1.0 / 60.0;

    fn single_icon_scene() -> (SceneHost, GlobeScene, StdRng) {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut config = GlobeConfig::services_globe();
        config.icons.pool_size = 1;
        config.motion.globe_spin = 0.0;
        let mut scene = host
            .mount(config, Arc::new(ServiceCatalog::default()), &mut rng)
            .unwrap();
        let slot = scene.slots_mut().slot_mut(0);
        slot.position = Vec3::new(0.0, 0.0, 2.2);
        slot.target = slot.position;
        (host, scene, rng)
    }

    #[test]
    fn test_mount_registers_and_drop_releases() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(1);
        let scene = host
            .mount(
                GlobeConfig::services_globe(),
                Arc::new(ServiceCatalog::default()),
                &mut rng,
            )
            .unwrap();
        assert_eq!(host.registry().frame_callbacks(), 1);
        assert_eq!(host.registry().timers(), 1);
        drop(scene);
        assert_eq!(host.registry().active(), 0);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = GlobeConfig::services_globe();
        config.orb.subdivision = -1;
        let result = host.mount(config, Arc::new(ServiceCatalog::default()), &mut rng);
        assert!(result.is_err());
        assert_eq!(host.registry().active(), 0);
    }

    #[test]
    fn test_shell_reused_across_mounts() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = Arc::new(ServiceCatalog::default());
        let a = host
            .mount(GlobeConfig::services_globe(), catalog.clone(), &mut rng)
            .unwrap();
        let b = host
            .mount(GlobeConfig::services_globe(), catalog, &mut rng)
            .unwrap();
        assert!(Arc::ptr_eq(a.shell(), b.shell()));
        assert_eq!(host.shell_builds(), 1);
    }

    #[test]
    fn test_icon_behind_core_is_not_clickable() {
        let (_host, mut scene, mut rng) = single_icon_scene();
        let selection = Selection::new();

        // Camera in front: visible and clickable.
        scene.advance(FrameTick::new(DT, DT), &selection, Vec3::new(0.0, 0.0, 8.0), &mut rng);
        assert_eq!(
            scene.click_slot(0),
            Some(SceneEvent::Select {
                id: "consultation".to_owned()
            })
        );
        assert_eq!(scene.pick(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z), Some(0));

        // Camera behind the globe: hidden and inert.
        scene.advance(FrameTick::new(2.0 * DT, DT), &selection, Vec3::new(0.0, 0.0, -8.0), &mut rng);
        let icon = scene.icons().next().unwrap();
        assert!(!icon.interactive);
        assert!(icon.visibility < 1.0);
        assert_eq!(scene.click_slot(0), None);
        assert_eq!(scene.click(Vec3::new(0.0, 0.0, -8.0), Vec3::Z), None);
    }

    #[test]
    fn test_visibility_fades_back() {
        let (_host, mut scene, mut rng) = single_icon_scene();
        let selection = Selection::new();
        for i in 0..60 {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 * DT;
            scene.advance(FrameTick::new(t, DT), &selection, Vec3::new(0.0, 0.0, -8.0), &mut rng);
        }
        assert!(scene.icons().next().unwrap().visibility < 0.01);
        let mut previous = 0.0;
        for i in 60..120 {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 * DT;
            scene.advance(FrameTick::new(t, DT), &selection, Vec3::new(0.0, 0.0, 8.0), &mut rng);
            let v = scene.icons().next().unwrap().visibility;
            assert!(v >= previous);
            previous = v;
        }
        assert!(previous > 0.99);
    }

    #[test]
    fn test_hover_slows_or_pauses() {
        let (_host, mut scene, mut rng) = single_icon_scene();
        assert_eq!(scene.speed(), 1.0);
        scene.set_scene_hovered(true);
        assert!((scene.speed() - 0.6).abs() < 1e-6);

        let mut host = SceneHost::new();
        let mut config = GlobeConfig::services_globe();
        config.motion.hover = HoverBehavior::Pause;
        let mut paused = host
            .mount(config, Arc::new(ServiceCatalog::default()), &mut rng)
            .unwrap();
        paused.set_scene_hovered(true);
        let before = paused.pose();
        paused.advance(FrameTick::new(1.0, 0.5), &Selection::new(), Vec3::Z * 8.0, &mut rng);
        assert_eq!(paused.pose().globe_yaw, before.globe_yaw);
        assert_eq!(paused.pose().shell_yaw, before.shell_yaw);
    }

    #[test]
    fn test_hovered_icon_grows() {
        let (_host, mut scene, mut rng) = single_icon_scene();
        let selection = Selection::new();
        let eye = Vec3::new(0.0, 0.0, 8.0);
        scene.advance(FrameTick::new(DT, DT), &selection, eye, &mut rng);
        assert_eq!(scene.hover_ray(eye, Vec3::NEG_Z), Some(0));
        for i in 0..120 {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 * DT;
            scene.advance(FrameTick::new(t, DT), &selection, eye, &mut rng);
        }
        let icon = scene.icons().next().unwrap();
        assert!(icon.hovered);
        assert!((icon.scale - 0.48).abs() < 1e-3);

        scene.set_scene_hovered(false);
        assert_eq!(scene.hovered_slot(), None);
    }

    #[test]
    fn test_selected_icon_grows() {
        let (_host, mut scene, mut rng) = single_icon_scene();
        let mut selection = Selection::new();
        selection.select(scene.catalog(), "consultation");
        for i in 0..120 {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 * DT;
            scene.advance(FrameTick::new(t, DT), &selection, Vec3::Z * 8.0, &mut rng);
        }
        let icon = scene.icons().next().unwrap();
        assert!(icon.selected);
        assert!((icon.scale - 0.62).abs() < 1e-3);
    }

    #[test]
    fn test_pulse_and_spin() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = host
            .mount(
                GlobeConfig::services_globe(),
                Arc::new(ServiceCatalog::default()),
                &mut rng,
            )
            .unwrap();
        scene.advance(FrameTick::new(1.0, 1.0), &Selection::new(), Vec3::Z * 8.0, &mut rng);
        let pose = scene.pose();
        assert!((pose.globe_yaw - 0.14).abs() < 1e-6);
        assert!((pose.shell_yaw - 0.12).abs() < 1e-6);
        assert!((pose.line_opacity - (0.3 + 0.8_f32.sin() * 0.02)).abs() < 1e-6);
        assert!(scene.platform().is_some());
        assert_eq!(scene.aura().unwrap().points().len(), 200);
        assert_eq!(scene.field().unwrap().points().len(), 320);
    }

    #[test]
    fn test_hero_orb_has_no_icons() {
        let mut host = SceneHost::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = host
            .mount(
                GlobeConfig::hero_orb(),
                Arc::new(ServiceCatalog::default()),
                &mut rng,
            )
            .unwrap();
        scene.advance(FrameTick::new(1.0, 1.0), &Selection::new(), Vec3::Z * 4.0, &mut rng);
        assert_eq!(scene.icons().count(), 0);
        assert!(scene.platform().is_none());
        assert!(scene.aura().is_none());
        assert!(scene.pose().globe_pitch.abs() <= 0.1);
        assert_eq!(scene.pick(Vec3::Z * 4.0, Vec3::NEG_Z), None);
    }
}
