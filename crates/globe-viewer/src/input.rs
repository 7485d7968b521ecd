//! Input action definitions and focus management.
//!
//! All pointer and keyboard bindings go through `leafwing-input-manager`. A
//! single system disables pointer actions while egui owns the pointer and
//! keyboard actions while egui owns the keyboard, so clicking a UI button
//! never also clicks an icon behind it.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

/// Actions understood by the viewer.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum GlobeAction {
    /// Pointer motion, used while dragging.
    #[actionlike(DualAxis)]
    Look,
    /// Held to orbit the camera (left mouse).
    Drag,
    /// Click an icon (left mouse).
    Select,
    /// Zoom with the scroll wheel.
    #[actionlike(Axis)]
    Zoom,
    /// Toggle the diagnostics window (Q).
    ToggleUi,
    /// Tear the scene down and mount it again (R).
    Remount,
    /// Switch between the services globe and the hero orb (V).
    SwitchVariant,
    /// Close the service modal (ESC).
    Dismiss,
}

/// Create the default input map.
pub fn default_input_map() -> InputMap<GlobeAction> {
    InputMap::default()
        .with_dual_axis(GlobeAction::Look, MouseMove::default())
        .with(GlobeAction::Drag, MouseButton::Left)
        .with(GlobeAction::Select, MouseButton::Left)
        .with_axis(GlobeAction::Zoom, MouseScrollAxis::Y)
        .with(GlobeAction::ToggleUi, KeyCode::KeyQ)
        .with(GlobeAction::Remount, KeyCode::KeyR)
        .with(GlobeAction::SwitchVariant, KeyCode::KeyV)
        .with(GlobeAction::Dismiss, KeyCode::Escape)
}

/// Plugin that registers the action type and the focus system.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<GlobeAction>::default())
            .add_systems(
                PreUpdate,
                manage_input_focus.after(InputManagerSystem::Update),
            );
    }
}

const POINTER_ACTIONS: &[GlobeAction] = &[
    GlobeAction::Look,
    GlobeAction::Drag,
    GlobeAction::Select,
    GlobeAction::Zoom,
];

const KEYBOARD_ACTIONS: &[GlobeAction] = &[
    GlobeAction::ToggleUi,
    GlobeAction::Remount,
    GlobeAction::SwitchVariant,
];

fn set_actions(action_state: &mut ActionState<GlobeAction>, actions: &[GlobeAction], enabled: bool) {
    for action in actions {
        if enabled {
            action_state.enable_action(action);
        } else {
            action_state.disable_action(action);
        }
    }
}

/// Hand pointer and keyboard to egui when it asks for them.
///
/// `Dismiss` stays enabled so ESC closes the modal even while a modal button
/// has keyboard focus.
fn manage_input_focus(
    mut action_query: Query<&mut ActionState<GlobeAction>>,
    mut contexts: EguiContexts,
) {
    let (wants_pointer, wants_keyboard) = contexts.ctx_mut().ok().map_or((false, false), |ctx| {
        (
            ctx.is_pointer_over_area() || ctx.wants_pointer_input(),
            ctx.wants_keyboard_input(),
        )
    });

    for mut action_state in &mut action_query {
        set_actions(&mut action_state, POINTER_ACTIONS, !wants_pointer);
        set_actions(&mut action_state, KEYBOARD_ACTIONS, !wants_keyboard);
        action_state.enable_action(&GlobeAction::Dismiss);
    }
}
