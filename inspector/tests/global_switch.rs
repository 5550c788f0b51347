//! The global switch is process-wide, so it lives in its own test binary.

use redlilium_inspector::{
    HeadlessBackend, Inspect, Inspector, InspectorConfig, UiEvent, globally_enabled,
    set_globally_enabled,
};

#[derive(Inspect, Default)]
struct Loadout {
    #[inspect(foldout = "Weapons")]
    pub primary: String,
    pub notes: String,
}

#[test]
fn global_switch_falls_back_to_the_default_inspector() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut inspector = Inspector::for_window(InspectorConfig::default(), Vec::new());
    let mut loadout = Loadout::default();

    assert!(globally_enabled());
    let mut backend = HeadlessBackend::new();
    inspector.show(&mut loadout, &mut backend);
    assert!(
        backend
            .events()
            .iter()
            .any(|e| matches!(e, UiEvent::FoldoutHeader { .. }))
    );

    set_globally_enabled(false);
    assert!(!inspector.uses_layout());
    let mut backend = HeadlessBackend::new();
    inspector.show(&mut loadout, &mut backend);
    assert!(
        !backend
            .events()
            .iter()
            .any(|e| matches!(e, UiEvent::FoldoutHeader { .. }))
    );
    assert_eq!(backend.field_labels(), vec!["Primary", "Notes"]);

    set_globally_enabled(true);
    assert!(inspector.uses_layout());
}
