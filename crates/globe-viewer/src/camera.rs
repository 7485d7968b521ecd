//! Orbit camera around the globe.
//!
//! Drag to spin, scroll to zoom. Both are damped and both stop while a modal
//! holds the page scroll lock. Rotation slows down while the globe is
//! hovered, matching the scene's own slow-down.

use std::f32::consts::FRAC_PI_2;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomPrefilter};
use bevy::prelude::*;
use bevy::render::view::Hdr;
use bevy::window::PrimaryWindow;
use globe_scene::config::BloomConfig;
use leafwing_input_manager::prelude::*;

use crate::globe::{ActiveGlobe, GlobeSystems, MountedGlobe};
use crate::input::{GlobeAction, default_input_map};
use crate::launch_params::Variant;
use crate::ui::PageScroll;

/// Fraction of the remaining distance covered per 60 Hz frame.
const DAMPING_FACTOR: f32 = 0.08;
/// Rotate speed while the globe is not hovered.
const ROTATE_SPEED: f32 = 0.85;
/// Rotate speed while the globe is hovered.
const HOVERED_ROTATE_SPEED: f32 = 0.55;
/// Distance multiplier per scroll step.
const ZOOM_STEP: f32 = 0.95;
/// Keeps the camera off the poles.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.05;

/// Plugin for the orbit camera.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera).add_systems(
            Update,
            (
                reset_camera_for_variant.run_if(resource_exists_and_changed::<ActiveGlobe>),
                orbit_camera,
            )
                .chain()
                .in_set(GlobeSystems::Input),
        );
    }
}

/// Per-variant framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl CameraFraming {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Services => Self {
                position: Vec3::new(0.0, 0.35, 8.2),
                fov_degrees: 38.0,
                min_distance: 5.0,
                max_distance: 12.0,
            },
            Variant::Hero => Self {
                position: Vec3::new(0.0, 0.0, 4.0),
                fov_degrees: 45.0,
                min_distance: 3.0,
                max_distance: 8.0,
            },
        }
    }
}

/// Spherical camera state with damped targets.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub target_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(framing: CameraFraming) -> Self {
        let distance = framing.position.length();
        let pitch = (framing.position.y / distance).asin();
        let yaw = framing.position.x.atan2(framing.position.z);
        Self {
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
            min_distance: framing.min_distance,
            max_distance: framing.max_distance,
        }
    }

    /// Rotate the targets by a pointer drag of `delta` pixels.
    pub fn drag(&mut self, delta: Vec2, viewport_height: f32, rotate_speed: f32) {
        let scale = std::f32::consts::TAU / viewport_height.max(1.0) * rotate_speed;
        self.target_yaw -= delta.x * scale;
        self.target_pitch = (self.target_pitch + delta.y * scale).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Zoom by `steps` scroll steps; positive steps move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.target_distance =
            (self.target_distance * ZOOM_STEP.powf(steps)).clamp(self.min_distance, self.max_distance);
    }

    /// Move the current values towards the targets.
    pub fn update(&mut self, dt: f32) {
        let t = 1.0 - (1.0 - DAMPING_FACTOR).powf(dt.max(0.0) * 60.0);
        self.yaw += (self.target_yaw - self.yaw) * t;
        self.pitch += (self.target_pitch - self.pitch) * t;
        self.distance += (self.target_distance - self.distance) * t;
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

fn bloom(config: &BloomConfig) -> Bloom {
    Bloom {
        intensity: config.intensity,
        low_frequency_boost: config.radius,
        prefilter: BloomPrefilter {
            threshold: config.threshold,
            threshold_softness: 0.5,
        },
        ..Bloom::NATURAL
    }
}

fn spawn_camera(mut commands: Commands) {
    let framing = CameraFraming::for_variant(Variant::default());
    let orbit = OrbitCamera::new(framing);
    commands.spawn((
        Camera3d::default(),
        Camera::default(),
        orbit.transform(),
        Projection::Perspective(PerspectiveProjection {
            fov: framing.fov_degrees.to_radians(),
            ..Default::default()
        }),
        Tonemapping::TonyMcMapface,
        // HDR is required for bloom.
        Hdr,
        orbit,
        default_input_map(),
    ));
}

/// Reframe and toggle bloom when the active preset changes.
fn reset_camera_for_variant(
    mut commands: Commands,
    active: Res<ActiveGlobe>,
    mut camera: Query<(Entity, &mut OrbitCamera, &mut Transform, &mut Projection)>,
) {
    let framing = CameraFraming::for_variant(active.variant);
    for (entity, mut orbit, mut transform, mut projection) in &mut camera {
        *orbit = OrbitCamera::new(framing);
        *transform = orbit.transform();
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = framing.fov_degrees.to_radians();
        }
        if active.config.bloom.enabled {
            commands.entity(entity).insert(bloom(&active.config.bloom));
        } else {
            commands.entity(entity).remove::<Bloom>();
        }
    }
}

pub(crate) fn orbit_camera(
    time: Res<Time>,
    scroll: Res<PageScroll>,
    window: Single<&Window, With<PrimaryWindow>>,
    mounted: Query<&MountedGlobe>,
    mut camera: Query<(&ActionState<GlobeAction>, &mut OrbitCamera, &mut Transform)>,
) {
    let hovered = mounted.iter().any(|globe| globe.scene.is_hovered());
    let rotate_speed = if hovered {
        HOVERED_ROTATE_SPEED
    } else {
        ROTATE_SPEED
    };
    let locked = scroll.0.is_locked();

    for (action_state, mut orbit, mut transform) in &mut camera {
        if !locked {
            if action_state.pressed(&GlobeAction::Drag) {
                let delta = action_state.axis_pair(&GlobeAction::Look);
                orbit.drag(delta, window.height(), rotate_speed);
            }
            let steps = action_state.value(&GlobeAction::Zoom);
            if steps != 0.0 {
                orbit.zoom(steps);
            }
        }
        orbit.update(time.delta_secs());
        *transform = orbit.transform();
    }
}
