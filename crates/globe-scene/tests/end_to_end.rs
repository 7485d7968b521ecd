//! End-to-end flows across scene, selection, panel and grid.

use std::sync::Arc;

use globe_scene::{
    FrameTick, GlobeConfig, Key, PanelView, SceneEvent, SceneHost, ScrollLock, SelectOutcome,
    Selection, ServiceCatalog, ServicesGrid,
};
use rand::{SeedableRng, rngs::StdRng};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_click_icon_shows_description_then_reset() {
    let mut host = SceneHost::new();
    let mut rng = StdRng::seed_from_u64(42);
    let catalog = Arc::new(ServiceCatalog::default());
    let config = GlobeConfig::services_globe();
    let mut scene = host.mount(config, catalog.clone(), &mut rng).unwrap();
    let mut selection = Selection::new();

    // Slot 3 starts bound to the fourth service.
    let slot = 3;
    let icon = scene.icons().nth(slot).unwrap();
    assert_eq!(catalog.get(icon.service).unwrap().id, "web-development");

    // Look at the icon from straight outside it so the core cannot hide it.
    let viewpoint = icon.position.normalize() * 8.2;
    scene.advance(FrameTick::new(DT, DT), &selection, viewpoint, &mut rng);
    assert!(scene.icons().nth(slot).unwrap().interactive);

    let Some(SceneEvent::Select { id }) = scene.click_slot(slot) else {
        panic!("visible icon did not respond to a click");
    };
    assert_eq!(selection.select(&catalog, &id), SelectOutcome::Selected);

    let view = PanelView::render(&selection, &catalog, config.motion.hover);
    assert_eq!(
        view,
        PanelView::Service {
            id: "web-development".to_owned(),
            title: "Web Development".to_owned(),
            description: "Modern, responsive websites built for performance and conversion."
                .to_owned(),
            reset_label: "Reset".to_owned(),
        }
    );

    // The selected icon grows towards the selected scale.
    for frame in 2..120 {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = frame as f32 * DT;
        scene.advance(FrameTick::new(elapsed, DT), &selection, viewpoint, &mut rng);
    }
    let grown = scene.icons().nth(slot).unwrap();
    assert!(grown.selected);
    assert!(grown.scale > config.icons.base_scale);

    selection.reset();
    assert!(PanelView::render(&selection, &catalog, config.motion.hover).is_welcome());
}

#[test]
fn test_grid_modal_escape_restores_scroll() {
    let scroll = ScrollLock::new();
    let catalog = Arc::new(ServiceCatalog::default());
    let mut grid = ServicesGrid::new(catalog, scroll.clone());
    let selection = Selection::new();

    assert!(grid.activate_id("data-entry"));
    assert!(scroll.is_locked());
    let service = grid.modal_service().unwrap();
    assert_eq!(service.title, "Data Entry");
    assert_eq!(
        service.description,
        "Accurate, structured data support for fast operations."
    );

    assert!(grid.key(Key::Escape));
    assert!(!grid.modal().is_open());
    assert!(!scroll.is_locked());
    // The grid never touches the globe selection.
    assert_eq!(selection.selected_id(), None);
}

#[test]
fn test_unmount_mid_animation_releases_everything() {
    let mut host = SceneHost::new();
    let mut rng = StdRng::seed_from_u64(7);
    let catalog = Arc::new(ServiceCatalog::default());
    let selection = Selection::new();

    let mut scene = host
        .mount(GlobeConfig::services_globe(), catalog.clone(), &mut rng)
        .unwrap();
    assert_eq!(host.registry().active(), 2);

    // Run past one repopulation so slots are mid-flight.
    for frame in 0..400 {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = frame as f32 * DT;
        scene.advance(FrameTick::new(elapsed, DT), &selection, glam::Vec3::Z * 8.2, &mut rng);
    }
    assert!(scene.slots().generation() >= 1);

    drop(scene);
    assert_eq!(host.registry().active(), 0);

    // Remounting works and reuses the shell.
    let hero = host
        .mount(GlobeConfig::hero_orb(), catalog.clone(), &mut rng)
        .unwrap();
    drop(hero);
    let _again = host
        .mount(GlobeConfig::services_globe(), catalog, &mut rng)
        .unwrap();
    assert_eq!(host.registry().active(), 2);
}
