//! Static orb painted with egui when the animated scene is not used.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use globe_scene::{FallbackOrb, Presentation};

use crate::globe::ActivePresentation;

/// Diameter of the orb in logical pixels.
const DIAMETER: f32 = 256.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x7d, 0xd3, 0xfc);

/// Plugin painting the fallback orb.
pub struct FallbackPlugin;

impl Plugin for FallbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            EguiPrimaryContextPass,
            paint_fallback_orb.run_if(presentation_is_static),
        );
    }
}

fn presentation_is_static(presentation: Option<Res<ActivePresentation>>) -> bool {
    presentation.is_some_and(|presentation| !presentation.0.is_animated())
}

fn to_egui(v: Vec2) -> egui::Vec2 {
    egui::vec2(v.x, v.y)
}

fn paint_fallback_orb(
    mut contexts: EguiContexts,
    presentation: Res<ActivePresentation>,
    time: Res<Time>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Presentation::Static(orb) = &presentation.0 else {
        return Ok(());
    };

    let center = ctx.screen_rect().center();
    let painter = ctx.layer_painter(egui::LayerId::background());
    paint(&painter, center, orb, time.elapsed_secs());
    Ok(())
}

fn paint(painter: &egui::Painter, center: egui::Pos2, orb: &FallbackOrb, elapsed: f32) {
    let radius = DIAMETER / 2.0;

    painter.circle_filled(
        center,
        radius * 1.25,
        ACCENT.gamma_multiply(orb.halo_opacity(elapsed)),
    );
    painter.circle_filled(center, radius, egui::Color32::from_rgb(0x0a, 0x16, 0x28));
    painter.circle_stroke(center, radius, egui::Stroke::new(1.5, ACCENT.gamma_multiply(0.6)));
    painter.circle_stroke(
        center,
        orb.ring_radius(DIAMETER),
        egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.3)),
    );

    let spoke = egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.2));
    for [a, b] in orb.spokes(DIAMETER) {
        painter.line_segment([center + to_egui(a), center + to_egui(b)], spoke);
    }
    for dot in orb.dots(DIAMETER) {
        painter.circle_filled(center + to_egui(dot), 3.0, ACCENT.gamma_multiply(0.8));
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn runs_with(presentation: Option<Presentation>) -> bool {
        let mut world = World::new();
        if let Some(presentation) = presentation {
            world.insert_resource(ActivePresentation(presentation));
        }
        world.run_system_once(presentation_is_static).unwrap()
    }

    #[test]
    fn test_paints_only_static_presentation() {
        assert!(!runs_with(None));
        assert!(!runs_with(Some(Presentation::Animated)));
        assert!(runs_with(Some(Presentation::Static(FallbackOrb::default()))));
    }
}
