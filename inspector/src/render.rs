//! Drawing of groups and display items.

use crate::annotation::{
    Annotation, AnnotationKind, AnnotationsExt, ButtonMode, Condition, GroupKind, MessageKind,
    Validator,
};
use crate::backend::{FieldResponse, FieldView, InspectorBackend, ScopeHeader, ScopeLayout};
use crate::config::InspectorConfig;
use crate::context::MemberDescriptor;
use crate::error::RenderError;
use crate::expr::{self, Scope};
use crate::group::{GroupId, GroupTree};
use crate::names::nicify;
use crate::reflect::{
    MemberKind, Reflect, invoke_member, lookup_member, resolve_base_mut, run_draw_hook,
};
use crate::state::InspectorState;
use crate::value::Value;
use crate::walker::ScopeHooks;

// ---------------------------------------------------------------------------
// Group hooks
// ---------------------------------------------------------------------------

/// Draws group scopes through a backend.
pub(crate) struct GroupScopes<'a> {
    pub tree: &'a mut GroupTree,
    pub backend: &'a mut dyn InspectorBackend,
    pub state: &'a mut InspectorState,
    pub type_name: &'static str,
}

impl ScopeHooks for GroupScopes<'_> {
    fn start(&mut self, id: GroupId) -> bool {
        let node = self.tree.node(id);
        let Some(kind) = node.kind else {
            return true;
        };
        let header = ScopeHeader {
            path: &node.path,
            title: node.header_title(),
            back_color: node.back_color,
        };

        match kind {
            GroupKind::Placeholder => true,
            GroupKind::Box => {
                self.backend.begin_scope(ScopeLayout::Box, &header);
                true
            }
            GroupKind::Vertical => {
                self.backend.begin_scope(ScopeLayout::Vertical, &header);
                true
            }
            GroupKind::Horizontal => {
                self.backend.begin_scope(ScopeLayout::Horizontal, &header);
                true
            }
            GroupKind::Foldout => {
                let was_open = node.open;
                let mut open = was_open;
                self.backend.foldout_header(&header, &mut open);
                if open {
                    let inner = ScopeHeader {
                        title: None,
                        ..header
                    };
                    self.backend.begin_scope(ScopeLayout::Foldout, &inner);
                }
                if open != was_open {
                    let key = InspectorState::key(self.type_name, &node.path);
                    self.state.set_foldout(key, open);
                    self.tree.node_mut(id).open = open;
                }
                open
            }
            GroupKind::Tab => self.start_tab(id),
        }
    }

    fn end(&mut self, id: GroupId) {
        match self.tree.node(id).kind {
            None | Some(GroupKind::Placeholder) => {}
            Some(_) => self.backend.end_scope(),
        }
    }
}

impl GroupScopes<'_> {
    fn start_tab(&mut self, id: GroupId) -> bool {
        let node = self.tree.node(id);
        let Some(coordinator) = self.tree.coordinator_of(id) else {
            // Unparented tab: reported at discovery, drawn as a plain box.
            let header = ScopeHeader {
                path: &node.path,
                title: node.header_title(),
                back_color: node.back_color,
            };
            self.backend.begin_scope(ScopeLayout::Tab, &header);
            return true;
        };
        if coordinator.selected_group() != Some(id) {
            return false;
        }

        let parent_path = node
            .parent()
            .map(|p| self.tree.node(p).path.clone())
            .unwrap_or_default();
        let header = ScopeHeader {
            path: &parent_path,
            title: None,
            back_color: node.back_color,
        };
        let titles: Vec<&str> = coordinator
            .siblings()
            .iter()
            .map(|s| self.tree.node(*s).tab_title())
            .collect();
        let current = coordinator.selected();
        let mut selected = current;

        self.backend.begin_scope(ScopeLayout::Tab, &header);
        self.backend.tab_header(&titles, &mut selected);

        if selected != current {
            if let Some(coordinator) = self.tree.coordinator_of_mut(id) {
                coordinator.select(selected);
            }
            let key = InspectorState::key(self.type_name, &parent_path);
            self.state.set_tab(key, selected);
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Draws one display item. Errors are shown inline and never propagate.
pub(crate) fn draw_item(
    desc: &mut MemberDescriptor,
    target: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
    state: &mut InspectorState,
    config: &InspectorConfig,
) {
    let Some(owner) = resolve_base_mut(target, desc.owner_depth) else {
        let err = RenderError::MissingOwner {
            member: desc.name().to_string(),
            depth: desc.owner_depth,
        };
        log::error!("{err}");
        backend.message(&err.to_string(), MessageKind::Error);
        return;
    };

    let annotations = desc.annotations();
    for annotation in annotations {
        let shown = match &annotation.kind {
            AnnotationKind::ShowIf(cond) => condition(owner, cond, backend),
            AnnotationKind::HideIf(cond) => !condition(owner, cond, backend),
            _ => true,
        };
        if !shown {
            return;
        }
    }

    backend.begin_item(desc.is_serialized() || !config.tint_non_serialized);
    if let Some(error) = &desc.error {
        backend.message(error, MessageKind::Error);
    }

    for annotation in annotations {
        if let AnnotationKind::OnGui { pre: Some(hook), .. } = &annotation.kind {
            draw_hook(owner, hook, backend);
        }
    }
    for annotation in annotations {
        if let AnnotationKind::InfoBox { text, kind } = &annotation.kind {
            info_box(owner, text, *kind, backend, config);
        }
    }

    if let Err(err) = draw_body(desc, owner, backend, state, config) {
        log::warn!("Failed to draw '{}': {err}", desc.name());
        backend.message(&err.to_string(), MessageKind::Error);
    }

    for annotation in annotations {
        if let AnnotationKind::OnGui { post: Some(hook), .. } = &annotation.kind {
            draw_hook(owner, hook, backend);
        }
    }
    backend.end_item();
}

fn draw_body(
    desc: &mut MemberDescriptor,
    owner: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
    state: &mut InspectorState,
    config: &InspectorConfig,
) -> Result<(), RenderError> {
    if desc.is_type_property() {
        let value = Value::Str(owner.type_info().name.to_string());
        let view = FieldView {
            read_only: true,
            ..FieldView::new("Type", &value)
        };
        if let Some(bound) = &desc.bound {
            backend.native_field(bound, &view);
        }
        return Ok(());
    }
    if desc.nested.is_some() {
        return draw_nested(desc, owner, backend, state, config);
    }
    match desc.kind() {
        MemberKind::Method => draw_button(desc, owner, backend, state),
        MemberKind::Field | MemberKind::Property => draw_value(desc, owner, backend),
    }
}

fn label_of(desc: &MemberDescriptor) -> String {
    desc.annotations()
        .label()
        .map_or_else(|| nicify(desc.name()), str::to_string)
}

fn draw_nested(
    desc: &mut MemberDescriptor,
    owner: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
    state: &mut InspectorState,
    config: &InspectorConfig,
) -> Result<(), RenderError> {
    let label = label_of(desc);
    let mut open = desc.folded_out;
    match &desc.bound {
        Some(bound) => backend.native_foldout(bound, &label, &mut open),
        None => backend.foldout(&label, &mut open),
    }
    desc.folded_out = open;
    if !open {
        return Ok(());
    }

    let name = desc.name();
    let child = owner
        .nested_mut(name)
        .ok_or_else(|| RenderError::MissingNested(name.to_string()))?;
    let Some(nested) = desc.nested.as_mut() else {
        return Ok(());
    };
    let header = ScopeHeader {
        path: name,
        ..ScopeHeader::default()
    };
    backend.begin_scope(ScopeLayout::Indent, &header);
    nested.render(child, backend, state, config);
    backend.end_scope();
    Ok(())
}

fn draw_value(
    desc: &MemberDescriptor,
    owner: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
) -> Result<(), RenderError> {
    let name = desc.name();
    let annotations = desc.annotations();
    let value = owner
        .get_member(name)
        .ok_or_else(|| RenderError::MissingValue(name.to_string()))?;
    let label = label_of(desc);
    let writable = desc.member.is_some_and(|m| m.flags.writable);
    let read_only = !writable
        || annotations.has(|k| matches!(k, AnnotationKind::ReadOnly))
        || !enabled(owner, annotations, backend);

    let mut view = FieldView::new(&label, &value);
    view.read_only = read_only;
    for validator in annotations.validators() {
        match validator {
            Validator::Min(min) => view.min = Some(*min),
            Validator::Max(max) => view.max = Some(*max),
            _ => {}
        }
    }
    let (min, max) = (view.min, view.max);

    let response = match &desc.bound {
        Some(bound) => backend.native_field(bound, &view),
        None => backend.field(&view),
    };

    let current = match response {
        FieldResponse::NotDrawn => {
            backend.message(
                &format!("{label}: {} values cannot be edited here", value.type_label()),
                MessageKind::Warning,
            );
            value
        }
        FieldResponse::Changed(new) if !read_only => {
            let new = new.clamped(min, max);
            owner.set_member(name, new.clone())?;
            for annotation in annotations {
                if let AnnotationKind::OnValueChanged(callback) = &annotation.kind {
                    invoke_member(owner, callback)?;
                }
            }
            new
        }
        FieldResponse::Changed(_) | FieldResponse::Unchanged => value,
    };

    validate(owner, &label, &current, annotations.validators(), backend);
    Ok(())
}

fn draw_button(
    desc: &MemberDescriptor,
    owner: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
    state: &InspectorState,
) -> Result<(), RenderError> {
    let annotations = desc.annotations();
    let (text, mode) = annotations
        .iter()
        .find_map(|a| match &a.kind {
            AnnotationKind::Button { text, mode } => Some((text.clone(), *mode)),
            _ => None,
        })
        .unwrap_or((None, ButtonMode::Always));
    let label = text.unwrap_or_else(|| label_of(desc));
    let mode_allows = match mode {
        ButtonMode::Always => true,
        ButtonMode::Editor => !state.play_mode,
        ButtonMode::Playmode => state.play_mode,
    };
    let enabled = mode_allows && enabled(owner, annotations, backend);

    if backend.button(&label, enabled) && enabled {
        let result = invoke_member(owner, desc.name())?;
        if result != Value::Null {
            log::info!("{label}: {result}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Annotation helpers
// ---------------------------------------------------------------------------

/// Evaluates a condition; problems are shown and count as true.
fn condition(owner: &mut dyn Reflect, cond: &Condition, backend: &mut dyn InspectorBackend) -> bool {
    let value = match lookup_member(owner, &cond.member) {
        Some(value) => Ok(value),
        None => invoke_member(owner, &cond.member).map_err(|e| e.to_string()),
    };
    let result = value.and_then(|value| match &cond.equals {
        Some(expected) => Ok(value.variant_name() == Some(expected.as_str()) || value.to_string() == *expected),
        None => value
            .as_bool()
            .ok_or_else(|| format!("'{}' is a {}, not a bool", cond.member, value.type_label())),
    });
    match result {
        Ok(result) => result,
        Err(err) => {
            backend.message(&format!("Condition '{}': {err}", cond.member), MessageKind::Error);
            true
        }
    }
}

fn enabled(
    owner: &mut dyn Reflect,
    annotations: &[Annotation],
    backend: &mut dyn InspectorBackend,
) -> bool {
    annotations.iter().all(|a| match &a.kind {
        AnnotationKind::EnableIf(cond) => condition(owner, cond, backend),
        AnnotationKind::DisableIf(cond) => !condition(owner, cond, backend),
        _ => true,
    })
}

fn draw_hook(owner: &mut dyn Reflect, name: &str, backend: &mut dyn InspectorBackend) {
    if let Err(err) = run_draw_hook(owner, name, backend) {
        log::error!("Draw hook of {}: {err}", owner.type_info().name);
        backend.message(&format!("Draw hook: {err}"), MessageKind::Error);
    }
}

/// Info box text starting with `=` is an expression over the owner's
/// members; anything else is shown verbatim.
fn info_box(
    owner: &mut dyn Reflect,
    text: &str,
    kind: MessageKind,
    backend: &mut dyn InspectorBackend,
    config: &InspectorConfig,
) {
    let Some(expression) = text.strip_prefix('=') else {
        backend.message(text, kind);
        return;
    };
    let mut scope = MemberScope { target: owner };
    let (text, ok) = expr::evaluate_text(expression, &mut scope, config.eval_options());
    backend.message(&text, if ok { kind } else { MessageKind::Error });
}

fn validate<'v>(
    owner: &mut dyn Reflect,
    label: &str,
    value: &Value,
    validators: impl Iterator<Item = &'v Validator>,
    backend: &mut dyn InspectorBackend,
) {
    for validator in validators {
        match validator {
            Validator::Required { message } if value.is_missing() => {
                let text = message
                    .clone()
                    .unwrap_or_else(|| format!("{label} is required"));
                backend.message(&text, MessageKind::Error);
            }
            Validator::Input { callback, message } => match invoke_member(owner, callback) {
                Ok(result) if result.as_bool() == Some(false) => {
                    let text = message
                        .clone()
                        .unwrap_or_else(|| format!("{label} is invalid"));
                    backend.message(&text, MessageKind::Error);
                }
                Ok(_) => {}
                Err(err) => backend.message(&format!("Validation of {label}: {err}"), MessageKind::Error),
            },
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Expression scope
// ---------------------------------------------------------------------------

/// Resolves expression names against an instance: variables are members,
/// calls are either math helpers or zero-argument methods.
pub struct MemberScope<'a> {
    pub target: &'a mut dyn Reflect,
}

impl Scope for MemberScope<'_> {
    fn variable(&mut self, name: &str) -> Result<Value, String> {
        lookup_member(self.target, name).ok_or_else(|| format!("no member '{name}'"))
    }

    fn call(&mut self, name: &str, args: Value) -> Result<Value, String> {
        let numbers: Vec<f64> = match &args {
            Value::List(items) => items.iter().filter_map(Value::as_f64).collect(),
            other => other.as_f64().into_iter().collect(),
        };
        let unary = |f: fn(f64) -> f64| match numbers.as_slice() {
            [x] => Ok(Value::Float(f(*x))),
            _ => Err(format!("{name}() takes one number")),
        };
        match name {
            "abs" => unary(f64::abs),
            "floor" => unary(f64::floor),
            "ceil" => unary(f64::ceil),
            "round" => unary(f64::round),
            "sqrt" => unary(f64::sqrt),
            "sin" => unary(f64::sin),
            "cos" => unary(f64::cos),
            "min" | "max" if !numbers.is_empty() => {
                let pick = if name == "min" { f64::min } else { f64::max };
                Ok(Value::Float(numbers.iter().copied().fold(numbers[0], pick)))
            }
            _ => match args {
                Value::List(items) if items.is_empty() => {
                    invoke_member(self.target, name).map_err(|e| e.to_string())
                }
                _ => Err(format!("'{name}' takes no arguments")),
            },
        }
    }
}
