//! Service icons: pointer picking and camera-facing glyph drawing.
//!
//! Icons are immediate-mode gizmo strokes, rebuilt every frame from the
//! scene's icon views. Picking casts the pointer ray into the scene, which
//! ignores icons hidden behind the core.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use globe_scene::{GlobeScene, IconView, SceneEvent, occlusion::Sphere};
use leafwing_input_manager::prelude::*;

use crate::camera::OrbitCamera;
use crate::globe::{Catalog, GlobeSystems, MountedGlobe, SelectionState};
use crate::input::GlobeAction;
use crate::mesh::{ACCENT, ACCENT_LIGHT};

/// Backdrop disc radius relative to the icon scale.
const BACKDROP_RADIUS: f32 = 0.7;

/// Plugin for icon interaction and drawing.
pub struct IconsPlugin;

impl Plugin for IconsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                pointer_interaction
                    .in_set(GlobeSystems::Input)
                    .after(crate::camera::orbit_camera),
                draw_icons.in_set(GlobeSystems::Draw),
            ),
        )
        .add_systems(EguiPrimaryContextPass, icon_labels);
    }
}

/// World-space pointer ray from the camera.
fn pointer_ray(window: &Window, camera: &Camera, orbit: &OrbitCamera) -> Option<Ray3d> {
    let cursor = window.cursor_position()?;
    let transform = GlobalTransform::from(orbit.transform());
    camera.viewport_to_world(&transform, cursor).ok()
}

/// Radius of the region counted as "over the globe".
fn hover_radius(scene: &GlobeScene) -> f32 {
    let config = scene.config();
    let mut radius = config.orb.shell_radius.max(config.orb.atmosphere_radius);
    if config.icons.pool_size > 0 {
        radius = radius.max(config.icons.radius_max);
    }
    radius
}

fn pointer_interaction(
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &OrbitCamera, &ActionState<GlobeAction>)>,
    mut mounted: Query<&mut MountedGlobe>,
    mut selection: ResMut<SelectionState>,
    catalog: Res<Catalog>,
    mut contexts: EguiContexts,
) {
    let Ok((camera, orbit, action_state)) = camera.single() else {
        return;
    };
    let over_ui = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    let ray = if over_ui {
        None
    } else {
        pointer_ray(&window, camera, orbit)
    };

    for mut globe in &mut mounted {
        let scene = &mut globe.scene;
        let Some(ray) = ray else {
            scene.set_scene_hovered(false);
            continue;
        };
        let (origin, direction) = (ray.origin, *ray.direction);

        let bounds = Sphere::new(scene.pose().globe_translation(), hover_radius(scene));
        let over_globe = bounds
            .intersect(origin, direction)
            .is_some_and(|(_, exit)| exit > 0.0);
        scene.set_scene_hovered(over_globe);
        if !over_globe {
            continue;
        }
        scene.hover_ray(origin, direction);

        if action_state.just_pressed(&GlobeAction::Select)
            && let Some(SceneEvent::Select { id }) = scene.click(origin, direction)
        {
            selection.0.select(&catalog.0, &id);
        }
    }
}

/// Stroke colour for an icon view.
fn icon_color(view: &IconView) -> Color {
    let base = if view.selected {
        Color::WHITE
    } else if view.hovered {
        ACCENT_LIGHT
    } else {
        ACCENT
    };
    base.with_alpha(view.visibility)
}

fn draw_icons(
    mounted: Query<&MountedGlobe>,
    camera: Query<&OrbitCamera>,
    catalog: Res<Catalog>,
    mut gizmos: Gizmos,
) {
    let Ok(orbit) = camera.single() else {
        return;
    };
    let camera = orbit.transform();
    let (right, up) = (*camera.right(), *camera.up());

    for globe in &mounted {
        for view in globe.scene.icons() {
            if view.visibility < 0.01 {
                continue;
            }
            let Some(service) = catalog.0.get(view.service) else {
                continue;
            };
            let color = icon_color(&view);
            let outline = service.glyph.render(view.scale, color.to_linear().to_f32_array());
            let stroke_color = Color::linear_rgba(
                outline.color[0],
                outline.color[1],
                outline.color[2],
                outline.color[3],
            );
            for [a, b] in &outline.strokes {
                gizmos.line(
                    view.position + right * a.x + up * a.y,
                    view.position + right * b.x + up * b.y,
                    stroke_color,
                );
            }
            gizmos.circle(
                Isometry3d::new(view.position, camera.rotation),
                view.scale * BACKDROP_RADIUS,
                ACCENT.with_alpha(0.35 * view.visibility),
            );
        }
    }
}

/// Title label next to the hovered or selected icon.
fn icon_labels(
    mut contexts: EguiContexts,
    mounted: Query<&MountedGlobe>,
    camera: Query<(&Camera, &OrbitCamera)>,
    catalog: Res<Catalog>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Ok((camera, orbit)) = camera.single() else {
        return Ok(());
    };
    let transform = GlobalTransform::from(orbit.transform());

    for globe in &mounted {
        for view in globe.scene.icons() {
            if !(view.hovered || view.selected) || !view.interactive {
                continue;
            }
            let Some(service) = catalog.0.get(view.service) else {
                continue;
            };
            let Ok(screen) = camera.world_to_viewport(&transform, view.position) else {
                continue;
            };
            egui::Area::new(egui::Id::new(("icon-label", view.slot)))
                .fixed_pos(egui::pos2(screen.x + 14.0, screen.y - 10.0))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(&service.title)
                            .color(egui::Color32::from_rgb(0xc7, 0xf0, 0xff))
                            .small(),
                    );
                });
        }
    }
    Ok(())
}
