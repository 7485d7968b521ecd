//! Scene model for an interactive services globe.
//!
//! This crate holds everything about the globe that does not need a GPU:
//! geodesic shell geometry, particle layers, the floating icon pool,
//! occlusion against the core, selection state and the text shown around
//! the globe. A rendering host (see the `globe-viewer` crate) drives it once
//! per frame and draws what it reports.
//!
//! # Design principles
//!
//! - **Host-agnostic**: No windowing or rendering types; only `glam` math
//! - **Deterministic**: All randomness comes from a caller-supplied `Rng`
//! - **Leak-free**: Frame callbacks and timers are RAII registrations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use globe_scene::{FrameTick, GlobeConfig, SceneHost, Selection, ServiceCatalog};
//!
//! let mut host = SceneHost::new();
//! let catalog = Arc::new(ServiceCatalog::default());
//! let mut scene = host.mount(GlobeConfig::services_globe(), catalog, &mut rand::rng())?;
//!
//! let mut selection = Selection::new();
//! scene.advance(FrameTick::new(0.016, 0.016), &selection, camera, &mut rand::rng());
//! if let Some(SceneEvent::Select { id }) = scene.click(ray_origin, ray_direction) {
//!     selection.select(scene.catalog(), &id);
//! }
//! ```

pub mod catalog;
pub mod config;
mod error;
pub mod frame;
pub mod grid;
pub mod motion;
pub mod occlusion;
pub mod panel;
pub mod particles;
pub mod platform;
pub mod presentation;
mod scene;
pub mod selection;
pub mod shell;
pub mod slots;

pub use catalog::{BuiltinGlyph, Glyph, GlyphOutline, Service, ServiceCatalog};
pub use config::{GlobeConfig, HoverBehavior};
pub use error::{SceneError, SceneResult};
pub use frame::{FrameRegistry, FrameTick};
pub use grid::{Key, ScrollLock, ServicesGrid};
pub use panel::PanelView;
pub use presentation::{FallbackOrb, Presentation, RenderCapabilities};
pub use scene::{GlobeScene, IconView, SceneEvent, SceneHost, ScenePose};
pub use selection::{SelectOutcome, Selection};
pub use shell::{EdgeMode, Shell, ShellParams};
