//! Page UI around the globe: description panel, services grid, detail modal
//! and a diagnostics window.
//!
//! Everything here is a view over the scene crate's state. The panel renders
//! [`PanelView`], the grid and modal drive [`ServicesGrid`], and the modal's
//! scroll guard is what stops the orbit camera from zooming.

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    ecs::system::SystemParam,
    prelude::*,
};
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use globe_scene::{Key, PanelView, ScrollLock, ServicesGrid};
use leafwing_input_manager::prelude::*;

use crate::globe::{ActiveGlobe, ActivePresentation, Catalog, GlobeHost, MountedGlobe, SelectionState};
use crate::input::GlobeAction;

/// Accent colour for headings (`#7dd3fc`).
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x7d, 0xd3, 0xfc);
/// Muted body text (`#94a3b8`).
const MUTED: egui::Color32 = egui::Color32::from_rgb(0x94, 0xa3, 0xb8);

/// Plugin for the page UI.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_plugins(FrameTimeDiagnosticsPlugin::default())
            .init_resource::<PageScroll>()
            .init_resource::<GridState>()
            .init_resource::<UiVisible>()
            .add_systems(Update, (toggle_ui_visible, dismiss_modal))
            .add_systems(
                EguiPrimaryContextPass,
                (
                    description_panel,
                    services_grid,
                    service_modal,
                    diagnostics_window.run_if(|visible: Res<UiVisible>| visible.0),
                )
                    .chain(),
            );
    }
}

/// Scroll lock of the page. Held while the modal is open.
#[derive(Resource, Default)]
pub struct PageScroll(pub ScrollLock);

/// The services grid and its modal.
#[derive(Resource)]
pub struct GridState(pub ServicesGrid);

impl FromWorld for GridState {
    fn from_world(world: &mut World) -> Self {
        let catalog = world.get_resource_or_init::<Catalog>().0.clone();
        let scroll = world.get_resource_or_init::<PageScroll>().0.clone();
        Self(ServicesGrid::new(catalog, scroll))
    }
}

/// Resource controlling whether the diagnostics window is visible.
#[derive(Resource)]
pub struct UiVisible(pub bool);

impl Default for UiVisible {
    fn default() -> Self {
        Self(true)
    }
}

/// Toggle diagnostics with Q.
fn toggle_ui_visible(
    action_query: Query<&ActionState<GlobeAction>>,
    mut visible: ResMut<UiVisible>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&GlobeAction::ToggleUi) {
        visible.0 = !visible.0;
    }
}

/// Close the modal with ESC.
fn dismiss_modal(action_query: Query<&ActionState<GlobeAction>>, mut grid: ResMut<GridState>) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&GlobeAction::Dismiss) {
        grid.0.key(Key::Escape);
    }
}

/// Welcome message or the selected service, under the globe.
fn description_panel(
    mut contexts: EguiContexts,
    mut selection: ResMut<SelectionState>,
    catalog: Res<Catalog>,
    active: Res<ActiveGlobe>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let view = PanelView::render(&selection.0, &catalog.0, active.config.motion.hover);

    egui::Window::new("Description")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .default_width(420.0)
        .show(ctx, |ui| match view {
            PanelView::Welcome { message, hint } => {
                ui.label(egui::RichText::new(message).color(ACCENT).strong());
                ui.label(egui::RichText::new(hint).color(MUTED).small());
            }
            PanelView::Service {
                title,
                description,
                reset_label,
                ..
            } => {
                ui.label(egui::RichText::new(title).color(ACCENT).heading());
                ui.label(description);
                if ui.button(reset_label).clicked() {
                    selection.0.reset();
                }
            }
        });

    Ok(())
}

/// One entry per service. Buttons take focus, so Enter and Space activate
/// them like a click.
fn services_grid(mut contexts: EguiContexts, mut grid: ResMut<GridState>) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut activated = None;
    egui::SidePanel::left("services")
        .resizable(false)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Services");
            ui.add_space(8.0);
            egui::Grid::new("services-grid")
                .num_columns(3)
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    for (index, service) in grid.0.entries().enumerate() {
                        let response = ui
                            .add(egui::Button::new(&service.title).min_size(egui::vec2(88.0, 48.0)))
                            .on_hover_text(&service.description);
                        if response.clicked() {
                            activated = Some(index);
                        }
                        if index % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        });

    if let Some(index) = activated {
        grid.0.activate(index);
    }
    Ok(())
}

/// Detail dialog over a dimmed backdrop.
fn service_modal(mut contexts: EguiContexts, mut grid: ResMut<GridState>) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Some(service) = grid.0.modal_service() else {
        return Ok(());
    };
    let (title, description) = (service.title.clone(), service.description.clone());

    let mut backdrop_clicked = false;
    egui::Area::new(egui::Id::new("modal-backdrop"))
        .order(egui::Order::Middle)
        .fixed_pos(egui::Pos2::ZERO)
        .show(ctx, |ui| {
            let screen = ctx.screen_rect();
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(170));
            backdrop_clicked = ui.allocate_rect(screen, egui::Sense::click()).clicked();
        });

    let mut open = true;
    let mut close_clicked = false;
    egui::Window::new(title)
        .id(egui::Id::new("service-modal"))
        .order(egui::Order::Foreground)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.label(description);
            ui.add_space(12.0);
            close_clicked = ui.button("Close").clicked();
        });

    if close_clicked || !open {
        grid.0.click_close();
    } else if backdrop_clicked {
        grid.0.click_backdrop();
    }
    Ok(())
}

/// Resources for the diagnostics window.
#[derive(SystemParam)]
struct DiagnosticsParams<'w, 's> {
    diagnostics: Res<'w, DiagnosticsStore>,
    host: Res<'w, GlobeHost>,
    active: Res<'w, ActiveGlobe>,
    presentation: Res<'w, ActivePresentation>,
    selection: Res<'w, SelectionState>,
    scroll: Res<'w, PageScroll>,
    mounted: Query<'w, 's, &'static MountedGlobe>,
}

fn diagnostics_window(mut contexts: EguiContexts, params: DiagnosticsParams) -> Result {
    let ctx = contexts.ctx_mut()?;

    let fps = params
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(bevy::diagnostic::Diagnostic::smoothed)
        .unwrap_or(0.0);
    let registry = params.host.0.registry();

    egui::Window::new("Diagnostics")
        .default_pos([320.0, 10.0])
        .default_open(false)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps:.0}"));
            ui.label(format!("Variant: {}", params.active.variant));
            ui.label(format!(
                "Presentation: {}",
                if params.presentation.0.is_animated() {
                    "animated"
                } else {
                    "static"
                }
            ));
            ui.separator();
            ui.label(format!("Frame callbacks: {}", registry.frame_callbacks()));
            ui.label(format!("Timers: {}", registry.timers()));
            ui.label(format!("Shell builds: {}", params.host.0.shell_builds()));
            ui.label(format!("Scroll locked: {}", params.scroll.0.is_locked()));
            ui.label(format!(
                "Selected: {}",
                params.selection.0.selected_id().unwrap_or("none")
            ));

            for globe in &params.mounted {
                let scene = &globe.scene;
                ui.separator();
                ui.label(format!("Shell edges: {}", scene.shell().edge_count()));
                ui.label(format!("Icon slots: {}", scene.slots().len()));
                ui.label(format!("Repopulations: {}", scene.slots().generation()));
                ui.label(format!("Speed: {:.2}", scene.speed()));
                ui.label(format!("Hovered slot: {:?}", scene.hovered_slot()));
            }

            ui.separator();
            ui.label(egui::RichText::new("R remount, V switch variant, Q hide").color(MUTED));
        });

    Ok(())
}
