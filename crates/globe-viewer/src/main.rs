//! Interactive 3D services globe using Bevy.
//!
//! A wireframe globe with drifting particle layers and floating service
//! icons. Clicking an icon shows the service under the globe; the grid on the
//! left opens a detail modal for any service.

mod camera;
mod fallback;
mod globe;
mod icons;
mod input;
mod launch_params;
mod mesh;
mod ui;

use bevy::prelude::*;
use camera::OrbitCameraPlugin;
use fallback::FallbackPlugin;
use globe::GlobePlugin;
use icons::IconsPlugin;
use input::InputPlugin;
use ui::UiPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(mesh::BACKGROUND)).add_plugins((
            InputPlugin,
            GlobePlugin,
            OrbitCameraPlugin,
            IconsPlugin,
            UiPlugin,
            FallbackPlugin,
        ));
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    tracing::info!(variant = %params.variant, "starting globe viewer");

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "Services globe".to_string(),
        resolution: (1280, 800).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params).add_plugins(AppPlugin).run();
}
