//! Mounting the globe scene into the Bevy world.
//!
//! The [`GlobeScene`] lives inside a [`MountedGlobe`] component on a root
//! entity. Its render children (core, atmosphere, shell, nodes, particle
//! layers, platform) are plain meshes whose transforms are synced from the
//! scene every frame. Despawning the root drops the scene, which releases its
//! frame registrations.

use std::sync::Arc;

use bevy::prelude::*;
use globe_scene::{
    FrameTick, GlobeConfig, GlobeScene, Presentation, SceneHost, Selection, ServiceCatalog,
};
use leafwing_input_manager::prelude::*;

use crate::camera::OrbitCamera;
use crate::input::GlobeAction;
use crate::launch_params::{LaunchParams, Variant};
use crate::mesh::{ACCENT, ACCENT_LIGHT, CORE, glow_material, point_cloud, shell_lines};

/// Plugin that mounts the scene and drives it every frame.
pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeHost>()
            .init_resource::<Catalog>()
            .init_resource::<SelectionState>()
            .configure_sets(
                Update,
                (GlobeSystems::Input, GlobeSystems::Advance, GlobeSystems::Draw).chain(),
            )
            .add_systems(Startup, mount_initial_scene)
            .add_systems(
                Update,
                (
                    handle_remount,
                    advance_globe,
                    sync_globe_transforms,
                    sync_line_opacity,
                )
                    .chain()
                    .in_set(GlobeSystems::Advance),
            )
            .add_systems(Update, draw_platform_ripples.in_set(GlobeSystems::Draw));
    }
}

/// Per-frame ordering: pointer and camera input, then the scene step, then
/// immediate-mode drawing.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlobeSystems {
    Input,
    Advance,
    Draw,
}

/// Frame registrations and cached shells shared by every mount.
#[derive(Resource, Default)]
pub struct GlobeHost(pub SceneHost);

/// The services shown on the globe, in the grid and in the panel.
#[derive(Resource)]
pub struct Catalog(pub Arc<ServiceCatalog>);

impl Default for Catalog {
    fn default() -> Self {
        Self(Arc::new(ServiceCatalog::default()))
    }
}

/// The visitor's current selection.
#[derive(Resource, Default)]
pub struct SelectionState(pub Selection);

/// Preset and configuration of the current mount.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ActiveGlobe {
    pub variant: Variant,
    pub config: GlobeConfig,
}

/// Animated scene or static fallback, decided once at startup.
#[derive(Resource, Debug, Clone)]
pub struct ActivePresentation(pub Presentation);

/// Root entity owning the mounted scene.
#[derive(Component)]
pub struct MountedGlobe {
    pub scene: GlobeScene,
}

/// Group rotated and lifted with the globe pose. Icons live in this frame.
#[derive(Component)]
struct GlobeGroup;

/// Shell rotating inside the group.
#[derive(Component)]
struct ShellSpin;

/// Shell wireframe whose opacity pulses.
#[derive(Component)]
struct ShellLines(Handle<StandardMaterial>);

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum ParticleLayerKind {
    Aura,
    Field,
}

fn mount_initial_scene(
    mut commands: Commands,
    params: Res<LaunchParams>,
    mut host: ResMut<GlobeHost>,
    catalog: Res<Catalog>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let presentation = Presentation::choose(params.capabilities());
    let active = ActiveGlobe {
        variant: params.variant,
        config: params.config(params.variant),
    };
    commands.insert_resource(active);
    commands.insert_resource(ActivePresentation(presentation.clone()));

    if presentation.is_animated() {
        let scene = host
            .0
            .mount(active.config, catalog.0.clone(), &mut rand::rng())?;
        spawn_globe(&mut commands, &mut meshes, &mut materials, scene);
    }
    Ok(())
}

/// Remount (R) or switch variant (V).
#[allow(clippy::too_many_arguments)]
fn handle_remount(
    mut commands: Commands,
    action_query: Query<&ActionState<GlobeAction>>,
    params: Res<LaunchParams>,
    presentation: Res<ActivePresentation>,
    mut active: ResMut<ActiveGlobe>,
    mut host: ResMut<GlobeHost>,
    catalog: Res<Catalog>,
    mounted: Query<Entity, With<MountedGlobe>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let Ok(action_state) = action_query.single() else {
        return Ok(());
    };

    let switch = action_state.just_pressed(&GlobeAction::SwitchVariant);
    if !switch && !action_state.just_pressed(&GlobeAction::Remount) {
        return Ok(());
    }

    if switch {
        let variant = active.variant.other();
        *active = ActiveGlobe {
            variant,
            config: params.config(variant),
        };
        tracing::info!(%variant, "switched globe variant");
    }

    for entity in &mounted {
        commands.entity(entity).despawn();
    }
    if presentation.0.is_animated() {
        let scene = host
            .0
            .mount(active.config, catalog.0.clone(), &mut rand::rng())?;
        spawn_globe(&mut commands, &mut meshes, &mut materials, scene);
    }
    Ok(())
}

/// Spawn the render hierarchy for `scene`.
pub fn spawn_globe(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scene: GlobeScene,
) -> Entity {
    let config = *scene.config();
    let orb = config.orb;

    let line_material = materials.add(glow_material(ACCENT, orb.line_opacity));
    let shell_mesh = meshes.add(shell_lines(scene.shell()));
    let node_mesh = meshes.add(Sphere::new(orb.node_size));
    let node_material = materials.add(glow_material(ACCENT_LIGHT, 0.9));
    let nodes = scene.shell().nodes.clone();

    let core_mesh = meshes.add(Sphere::new(orb.core_radius).mesh().uv(48, 32));
    let core_material = materials.add(glow_material(CORE, orb.core_opacity));

    let layers: Vec<_> = [
        (ParticleLayerKind::Aura, scene.aura()),
        (ParticleLayerKind::Field, scene.field()),
    ]
    .into_iter()
    .filter_map(|(kind, layer)| {
        let layer = layer?;
        Some((
            kind,
            meshes.add(point_cloud(layer.points())),
            materials.add(glow_material(ACCENT, layer.config().opacity)),
        ))
    })
    .collect();

    let platform = scene.platform().map(|platform| {
        (
            platform.height(),
            meshes.add(Circle::new(1.4)),
            materials.add(glow_material(ACCENT, 0.12)),
        )
    });

    let atmosphere = (orb.atmosphere_radius > 0.0).then(|| {
        let mut material = glow_material(ACCENT, 0.06);
        material.alpha_mode = AlphaMode::Add;
        (
            meshes.add(Sphere::new(orb.atmosphere_radius).mesh().uv(48, 32)),
            materials.add(material),
        )
    });

    let root = commands
        .spawn((
            Name::new("Globe"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    commands.entity(root).with_children(|parent| {
        parent
            .spawn((GlobeGroup, Transform::default(), Visibility::default()))
            .with_children(|group| {
                group.spawn((
                    Mesh3d(core_mesh),
                    MeshMaterial3d(core_material),
                    Transform::default(),
                ));
                if let Some((mesh, material)) = atmosphere {
                    group.spawn((Mesh3d(mesh), MeshMaterial3d(material), Transform::default()));
                }
                group
                    .spawn((ShellSpin, Transform::default(), Visibility::default()))
                    .with_children(|shell| {
                        shell.spawn((
                            ShellLines(line_material.clone()),
                            Mesh3d(shell_mesh),
                            MeshMaterial3d(line_material),
                            Transform::default(),
                        ));
                        for node in nodes {
                            shell.spawn((
                                Mesh3d(node_mesh.clone()),
                                MeshMaterial3d(node_material.clone()),
                                Transform::from_translation(node),
                            ));
                        }
                    });
            });

        for (kind, mesh, material) in layers {
            parent.spawn((kind, Mesh3d(mesh), MeshMaterial3d(material), Transform::default()));
        }

        if let Some((height, mesh, material)) = platform {
            parent.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, height, 0.0)
                    .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
            ));
        }
    });

    commands.entity(root).insert(MountedGlobe { scene });
    root
}

/// Step the scene with the frame clock and the camera as viewpoint.
fn advance_globe(
    time: Res<Time>,
    selection: Res<SelectionState>,
    camera: Query<&OrbitCamera>,
    mut mounted: Query<&mut MountedGlobe>,
) {
    let Ok(camera) = camera.single() else {
        return;
    };
    let tick = FrameTick::new(time.elapsed_secs(), time.delta_secs());
    // The camera transform was updated this frame; its global transform was not.
    let viewpoint = camera.translation();
    let mut rng = rand::rng();
    for mut globe in &mut mounted {
        globe.scene.advance(tick, &selection.0, viewpoint, &mut rng);
    }
}

fn sync_globe_transforms(
    mounted: Query<(&MountedGlobe, &Children)>,
    mut groups: Query<&mut Transform, (With<GlobeGroup>, Without<ShellSpin>)>,
    mut shells: Query<&mut Transform, (With<ShellSpin>, Without<GlobeGroup>)>,
    mut layers: Query<
        (&ParticleLayerKind, &mut Transform),
        (Without<GlobeGroup>, Without<ShellSpin>),
    >,
    group_children: Query<&Children, With<GlobeGroup>>,
) {
    for (globe, children) in &mounted {
        let scene = &globe.scene;
        let pose = scene.pose();

        for &child in &**children {
            if let Ok(mut transform) = groups.get_mut(child) {
                transform.rotation = pose.globe_rotation();
                transform.translation = pose.globe_translation();

                let Ok(grandchildren) = group_children.get(child) else {
                    continue;
                };
                for &grandchild in &**grandchildren {
                    if let Ok(mut shell) = shells.get_mut(grandchild) {
                        shell.rotation = Quat::from_rotation_y(pose.shell_yaw);
                    }
                }
            } else if let Ok((kind, mut transform)) = layers.get_mut(child) {
                let layer = match kind {
                    ParticleLayerKind::Aura => scene.aura(),
                    ParticleLayerKind::Field => scene.field(),
                };
                if let Some(layer) = layer {
                    let (yaw, pitch) = layer.orientation();
                    transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
                }
            }
        }
    }
}

fn sync_line_opacity(
    mounted: Query<&MountedGlobe>,
    lines: Query<&ShellLines>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // One mount at a time.
    let Some(globe) = mounted.iter().next() else {
        return;
    };
    let opacity = globe.scene.pose().line_opacity;
    for lines in &lines {
        if let Some(mut material) = materials.get_mut(&lines.0) {
            material.base_color.set_alpha(opacity);
        }
    }
}

fn draw_platform_ripples(mounted: Query<&MountedGlobe>, mut gizmos: Gizmos) {
    for globe in &mounted {
        let Some(platform) = globe.scene.platform() else {
            continue;
        };
        let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let center = Vec3::new(0.0, platform.height() + 0.01, 0.0);
        for ripple in platform.ripples() {
            gizmos.circle(
                Isometry3d::new(center, flat),
                ripple.scale,
                ACCENT.with_alpha(ripple.opacity),
            );
        }
    }
}
