use redlilium_inspector::reflect::{invoke_member, lookup_member};
use redlilium_inspector::scan::is_visible;
use redlilium_inspector::{
    AnnotationKind, ButtonMode, Condition, FieldValue, GroupKind, Inspect, InspectEnum,
    InspectorBackend, MemberKind, Reflect, ReflectError, Typed, Validator, Value, ValueType,
    inspect_methods,
};

// ---------------------------------------------------------------------------
// Test types
// ---------------------------------------------------------------------------

#[derive(Inspect, Default)]
#[inspect(serializable)]
struct Stats {
    pub health: f32,
    pub armor: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, InspectEnum)]
enum Mode {
    #[default]
    Walk,
    Run,
    Swim,
}

#[derive(Inspect, Default)]
struct Player {
    pub name: String,
    #[inspect(read_only)]
    pub level: u32,
    pub mode: Mode,
    pub stats: Stats,
    secret: u8,
    #[inspect(show, label = "Visible Secret")]
    shown: u8,
    pub _generated: u8,
    #[inspect(non_serialized)]
    pub cached: f32,
    #[inspect(serialize)]
    kept: f32,
}

#[derive(Inspect, Default)]
struct Actor {
    pub id: u32,
}

#[derive(Inspect, Default)]
struct Npc {
    #[inspect(base)]
    actor: Actor,
    pub mood: f32,
}

#[derive(Inspect, Default)]
#[inspect(methods)]
struct Turret {
    pub ammo: u32,
    shots: u32,
    max_range: f32,
    pub armed: bool,
}

#[inspect_methods]
impl Turret {
    #[inspect(button = "Fire!", enable_if = "armed")]
    pub fn fire(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
        self.shots += 1;
    }

    #[inspect(button(text = "Reload", mode = "playmode"))]
    pub fn reload(&mut self) -> u32 {
        self.ammo = 10;
        self.ammo
    }

    #[inspect(show)]
    pub fn shots_fired(&self) -> u32 {
        self.shots
    }

    #[inspect(serialize, setter = "set_range")]
    pub fn range(&self) -> f32 {
        self.max_range
    }

    pub fn set_range(&mut self, range: f32) {
        self.max_range = range.max(0.0);
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    #[inspect(gui)]
    fn draw_banner(&mut self, ui: &mut dyn InspectorBackend) {
        ui.label("Turret");
    }
}

#[derive(Inspect, Default)]
struct Annotated {
    #[inspect(box_group(path = "Stats/Main", title = "Main Stats", show_title = false, back_color = 0x202020ff))]
    pub a: f32,
    #[inspect(tab = "Tabs/First", show_if(member = "mode", equals = "Run"))]
    pub b: f32,
    #[inspect(min = -1.5, max = 10, required = "Needed")]
    pub c: f32,
    #[inspect(validate(callback = "check", message = "Bad"), on_value_changed = "changed")]
    pub d: f32,
    #[inspect(info_box(text = "careful", kind = "warning"), on_gui(pre = "before"))]
    pub e: f32,
    pub mode: Mode,
}

fn member<'a>(info: &'a redlilium_inspector::TypeInfo, name: &str) -> &'a redlilium_inspector::MemberInfo {
    info.member(name).unwrap()
}

// ---------------------------------------------------------------------------
// Type metadata
// ---------------------------------------------------------------------------

#[test]
fn members_follow_declaration_order() {
    let info = Player::static_type_info();
    assert_eq!(info.name, "Player");
    let names: Vec<_> = info.members.iter().map(|m| m.name).collect();
    assert_eq!(
        names,
        vec!["name", "level", "mode", "stats", "secret", "shown", "_generated", "cached", "kept"]
    );
    assert!(info.members.iter().all(|m| m.kind == MemberKind::Field));
}

#[test]
fn value_types_are_probed() {
    let info = Player::static_type_info();
    assert!(matches!(member(info, "name").value_type, ValueType::String));
    assert!(matches!(member(info, "level").value_type, ValueType::Primitive("u32")));
    assert!(matches!(
        member(info, "mode").value_type,
        ValueType::Enum(&["Walk", "Run", "Swim"])
    ));
    let stats = member(info, "stats").value_type.composite().unwrap();
    assert_eq!(stats.name, "Stats");
    assert!(stats.flags.serializable);
}

#[test]
fn member_flags() {
    let info = Player::static_type_info();
    assert!(member(info, "name").flags.public);
    assert!(!member(info, "secret").flags.public);
    assert!(member(info, "_generated").flags.synthesized);
    assert!(member(info, "cached").flags.non_serialized);
    assert!(member(info, "kept").flags.serialize);
}

#[test]
fn visibility_rules() {
    let info = Player::static_type_info();
    let visible: Vec<_> = info
        .members
        .iter()
        .filter(|m| is_visible(m))
        .map(|m| m.name)
        .collect();
    assert_eq!(visible, vec!["name", "level", "mode", "stats", "shown", "kept"]);
}

#[test]
fn annotations_carry_source_lines() {
    let info = Player::static_type_info();
    let level = &member(info, "level").annotations;
    let shown = &member(info, "shown").annotations;
    assert_eq!(level.len(), 1);
    assert_eq!(level[0].kind, AnnotationKind::ReadOnly);
    assert_eq!(shown[0].kind, AnnotationKind::Show);
    assert_eq!(shown[1].kind, AnnotationKind::Label("Visible Secret".to_string()));
    assert!(level[0].line > 0);
    assert!(level[0].line < shown[0].line);
    assert_eq!(shown[0].line, shown[1].line);
}

#[test]
fn structured_annotations() {
    let info = Annotated::static_type_info();

    let AnnotationKind::Group(group) = &member(info, "a").annotations[0].kind else {
        panic!("expected a group");
    };
    assert_eq!(group.kind, GroupKind::Box);
    assert_eq!(group.path, "Stats/Main");
    assert_eq!(group.title.as_deref(), Some("Main Stats"));
    assert!(!group.show_title);
    assert_eq!(group.back_color, Some(0x202020ff));

    let b = &member(info, "b").annotations;
    assert!(matches!(&b[0].kind, AnnotationKind::Group(g) if g.kind == GroupKind::Tab));
    assert_eq!(
        b[1].kind,
        AnnotationKind::ShowIf(Condition {
            member: "mode".to_string(),
            equals: Some("Run".to_string()),
        })
    );

    let c: Vec<_> = member(info, "c").annotations.iter().map(|a| &a.kind).collect();
    assert_eq!(
        c,
        vec![
            &AnnotationKind::Validate(Validator::Min(-1.5)),
            &AnnotationKind::Validate(Validator::Max(10.0)),
            &AnnotationKind::Validate(Validator::Required {
                message: Some("Needed".to_string())
            }),
        ]
    );

    let d = &member(info, "d").annotations;
    assert_eq!(
        d[0].kind,
        AnnotationKind::Validate(Validator::Input {
            callback: "check".to_string(),
            message: Some("Bad".to_string()),
        })
    );
    assert_eq!(d[1].kind, AnnotationKind::OnValueChanged("changed".to_string()));

    let e = &member(info, "e").annotations;
    assert!(matches!(
        &e[0].kind,
        AnnotationKind::InfoBox { text, kind } if text == "careful" && *kind == redlilium_inspector::MessageKind::Warning
    ));
    assert_eq!(
        e[1].kind,
        AnnotationKind::OnGui {
            pre: Some("before".to_string()),
            post: None,
        }
    );
}

// ---------------------------------------------------------------------------
// Runtime access
// ---------------------------------------------------------------------------

#[test]
fn get_and_set_members() {
    let mut player = Player {
        name: "Ada".to_string(),
        ..Player::default()
    };
    assert_eq!(player.get_member("name"), Some(Value::Str("Ada".to_string())));
    assert_eq!(player.get_member("nope"), None);

    player.set_member("level", Value::Int(3)).unwrap();
    assert_eq!(player.level, 3);

    assert_eq!(
        player.set_member("level", Value::Str("x".to_string())),
        Err(ReflectError::TypeMismatch {
            member: "level".to_string(),
            found: "string",
        })
    );
    assert_eq!(
        player.set_member("nope", Value::Null),
        Err(ReflectError::NoSuchMember("nope".to_string()))
    );
}

#[test]
fn enums_convert_by_index_and_name() {
    assert_eq!(
        Mode::Run.to_value(),
        Value::Enum {
            index: 1,
            variants: &["Walk", "Run", "Swim"],
        }
    );
    assert_eq!(Mode::from_value(Value::Str("Swim".to_string())), Some(Mode::Swim));
    assert_eq!(Mode::from_value(Value::Int(0)), Some(Mode::Walk));
    assert_eq!(Mode::from_value(Value::Int(7)), None);

    let mut player = Player::default();
    player.set_member("mode", Value::Str("Run".to_string())).unwrap();
    assert_eq!(player.mode, Mode::Run);
}

#[test]
fn composites_are_reachable_through_nested() {
    let mut player = Player::default();
    player.stats.health = 42.0;

    let stats = player.nested("stats").unwrap();
    assert_eq!(stats.type_info().name, "Stats");
    assert_eq!(stats.get_member("health"), Some(Value::Float(42.0)));
    assert!(player.nested("name").is_none());

    player
        .nested_mut("stats")
        .unwrap()
        .set_member("armor", Value::Int(5))
        .unwrap();
    assert_eq!(player.stats.armor, 5);
    assert_eq!(lookup_member(&player, "stats.armor"), Some(Value::Int(5)));
}

#[test]
fn base_field_links_type_info() {
    let info = Npc::static_type_info();
    assert_eq!(info.base_info().map(|b| b.name), Some("Actor"));
    assert!(info.member("actor").is_none());
    assert!(info.find_member("id").is_some());

    let mut npc = Npc::default();
    npc.actor.id = 9;
    assert_eq!(lookup_member(&npc, "id"), Some(Value::Int(9)));
    assert_eq!(npc.get_member("id"), None);
    npc.base_mut().unwrap().set_member("id", Value::Int(4)).unwrap();
    assert_eq!(npc.actor.id, 4);
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

#[test]
fn method_members_are_listed_after_fields() {
    let info = Turret::static_type_info();

    let fire = member(info, "fire");
    assert_eq!(fire.kind, MemberKind::Method);
    assert!(matches!(fire.value_type, ValueType::Unit));
    assert_eq!(
        fire.annotations[0].kind,
        AnnotationKind::Button {
            text: Some("Fire!".to_string()),
            mode: ButtonMode::Always,
        }
    );
    assert_eq!(
        fire.annotations[1].kind,
        AnnotationKind::EnableIf(Condition::member("armed"))
    );

    let reload = member(info, "reload");
    assert!(matches!(reload.value_type, ValueType::Primitive("u32")));
    assert!(matches!(
        &reload.annotations[0].kind,
        AnnotationKind::Button { mode: ButtonMode::Playmode, .. }
    ));

    let shots = member(info, "shots_fired");
    assert_eq!(shots.kind, MemberKind::Property);
    assert!(shots.flags.readable && !shots.flags.writable);

    let range = member(info, "range");
    assert!(range.flags.serialize && range.flags.writable);

    assert!(info.member("has_ammo").is_none());
    assert!(info.member("draw_banner").is_none());
}

#[test]
fn properties_read_and_write_through_accessors() {
    let mut turret = Turret::default();
    turret.shots = 3;
    assert_eq!(turret.get_member("shots_fired"), Some(Value::Int(3)));

    turret.set_member("range", Value::Float(-4.0)).unwrap();
    assert_eq!(turret.max_range, 0.0);
    turret.set_member("range", Value::Float(12.5)).unwrap();
    assert_eq!(turret.get_member("range"), Some(Value::Float(12.5)));

    assert_eq!(
        turret.set_member("shots_fired", Value::Int(1)),
        Err(ReflectError::NoSuchMember("shots_fired".to_string()))
    );
    assert!(matches!(
        turret.set_member("range", Value::Bool(true)),
        Err(ReflectError::TypeMismatch { .. })
    ));
}

#[test]
fn any_zero_argument_method_can_be_invoked() {
    let mut turret = Turret {
        ammo: 1,
        ..Turret::default()
    };
    assert_eq!(turret.invoke("has_ammo"), Ok(Value::Bool(true)));
    assert_eq!(turret.invoke("fire"), Ok(Value::Null));
    assert_eq!(turret.ammo, 0);
    assert_eq!(turret.shots, 1);
    assert_eq!(invoke_member(&mut turret, "reload"), Ok(Value::Int(10)));
    assert_eq!(
        turret.invoke("set_range"),
        Err(ReflectError::MissingMethod("set_range".to_string()))
    );
}

#[test]
fn draw_hooks_dispatch_by_name() {
    let mut turret = Turret::default();
    let mut backend = redlilium_inspector::HeadlessBackend::new();
    turret.draw_hook("draw_banner", &mut backend).unwrap();
    assert_eq!(
        backend.events(),
        &[redlilium_inspector::UiEvent::Label("Turret".to_string())]
    );
    assert!(turret.draw_hook("nope", &mut backend).is_err());
}
