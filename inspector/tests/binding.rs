use redlilium_inspector::{
    HeadlessBackend, Inspect, Inspector, InspectorConfig, InspectorState, SerializedObject,
    UiEvent, Value, inspect_methods,
};

#[derive(Inspect, Default)]
#[inspect(serializable)]
struct Stats {
    pub health: f32,
    pub armor: i32,
}

#[derive(Inspect, Default)]
#[inspect(methods)]
struct Hero {
    #[inspect(box_group = "Main")]
    pub name: String,
    pub stats: Stats,
    #[inspect(show)]
    scratch: i32,
    #[inspect(hide)]
    pub hidden: i32,
    _speed: f32,
}

#[inspect_methods]
impl Hero {
    #[inspect(serialize, setter = "set_speed", label = "Move Speed")]
    pub fn speed(&self) -> f32 {
        self._speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self._speed = speed;
    }
}

#[test]
fn serialized_object_lists_persisted_fields() {
    let hero = Hero::default();
    let object = SerializedObject::new(&hero, &InspectorState::new());

    let paths: Vec<_> = object.properties().iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["$type", "name", "stats", "stats.health", "stats.armor", "hidden"]
    );
    let stats = object.find("stats").unwrap();
    assert!(stats.has_children && stats.expanded);
    assert_eq!(object.find("stats.armor").unwrap().depth, 1);
}

#[test]
fn collapsed_properties_are_not_expanded() {
    let mut state = InspectorState::new();
    state.set_foldout(InspectorState::key("Hero", "stats"), false);
    let object = SerializedObject::new(&Hero::default(), &state);
    assert!(!object.find("stats").unwrap().expanded);
}

#[test]
fn members_are_bound_to_serialized_properties() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut inspector = Inspector::new(InspectorConfig::default());
    let mut hero = Hero::default();

    let mut backend = HeadlessBackend::new();
    backend.edit("Health", Value::Float(5.0));
    inspector.show(&mut hero, &mut backend);
    assert_eq!(backend.depth(), 0);

    assert_eq!(hero.stats.health, 5.0);
    assert_eq!(
        backend.field_labels(),
        vec!["Type", "Name", "Health", "Armor", "Scratch", "Move Speed"]
    );

    let bound = |label: &str| match backend.find_field(label) {
        Some(UiEvent::Field { bound, .. }) => bound.clone(),
        _ => None,
    };
    assert_eq!(bound("Type").as_deref(), Some("$type"));
    assert_eq!(bound("Name").as_deref(), Some("name"));
    assert_eq!(bound("Health").as_deref(), Some("stats.health"));
    assert_eq!(bound("Scratch"), None);
    assert_eq!(bound("Move Speed"), None);

    assert_eq!(
        backend.field_value("Type"),
        Some(&Value::Str("Hero".to_string()))
    );
    assert!(backend.events().contains(&UiEvent::Foldout {
        label: "Stats".to_string(),
        open: true,
        bound: Some("stats".to_string()),
    }));
}

#[test]
fn unserialized_members_are_tinted() {
    let mut inspector = Inspector::new(InspectorConfig::default());
    let mut backend = HeadlessBackend::new();
    inspector.show(&mut Hero::default(), &mut backend);

    let unserialized = backend
        .events()
        .iter()
        .filter(|e| **e == UiEvent::BeginItem { serialized: false })
        .count();
    assert_eq!(unserialized, 1);

    let config = InspectorConfig {
        tint_non_serialized: false,
        ..InspectorConfig::default()
    };
    let mut inspector = Inspector::new(config);
    let mut backend = HeadlessBackend::new();
    inspector.show(&mut Hero::default(), &mut backend);
    assert!(
        !backend
            .events()
            .contains(&UiEvent::BeginItem { serialized: false })
    );
}

#[test]
fn property_edits_go_through_the_setter() {
    let mut inspector = Inspector::new(InspectorConfig::default());
    let mut hero = Hero::default();

    let mut backend = HeadlessBackend::new();
    backend.edit("Move Speed", Value::Float(2.5));
    inspector.show(&mut hero, &mut backend);
    assert_eq!(hero.speed(), 2.5);
}

#[test]
fn discovery_is_cached_per_target() {
    let mut inspector = Inspector::new(InspectorConfig::default());
    let mut hero = Hero::default();
    let mut backend = HeadlessBackend::new();

    inspector.show(&mut hero, &mut backend);
    let first = inspector.context().unwrap() as *const _;
    inspector.show(&mut hero, &mut backend);
    assert_eq!(inspector.context().unwrap() as *const _, first);

    inspector.invalidate();
    assert!(inspector.context().is_none());
}
