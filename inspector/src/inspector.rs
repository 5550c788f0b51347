//! Host glue: owns the per-target layout and state and decides between the
//! annotated layout and the default inspector.

use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::annotation::{AnnotationKind, AnnotationsExt};
use crate::backend::{FieldResponse, FieldView, InspectorBackend, ScopeHeader, ScopeLayout};
use crate::bind::bind;
use crate::config::InspectorConfig;
use crate::context::ClassContext;
use crate::names::nicify;
use crate::reflect::{MemberKind, Reflect, resolve_base_mut};
use crate::scan::is_visible;
use crate::serialized::SerializedObject;
use crate::state::InspectorState;

static GLOBALLY_ENABLED: AtomicBool = AtomicBool::new(true);

/// Process-wide switch, typically bound to an editor menu item. When off,
/// every [`Inspector`] draws the default inspector.
pub fn set_globally_enabled(enabled: bool) {
    GLOBALLY_ENABLED.store(enabled, Ordering::Relaxed);
    log::info!(
        "Inspector layouts {}",
        if enabled { "enabled" } else { "disabled" }
    );
}

pub fn globally_enabled() -> bool {
    GLOBALLY_ENABLED.load(Ordering::Relaxed)
}

/// Identity of an inspected object: its type, its address and the host's
/// selection key. An address alone can be reused by a new object once the
/// old one is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TargetId {
    type_id: TypeId,
    addr: usize,
    selection: u64,
}

impl TargetId {
    fn of(target: &dyn Reflect, selection: u64) -> Self {
        Self {
            type_id: target.as_any().type_id(),
            addr: target as *const dyn Reflect as *const () as usize,
            selection,
        }
    }
}

/// Inspector for one object at a time.
///
/// The layout is discovered when the target or the selection key changes or
/// after [`Inspector::invalidate`], and reused every frame in between.
#[derive(Debug)]
pub struct Inspector {
    config: InspectorConfig,
    state: InspectorState,
    context: Option<ClassContext>,
    target: Option<TargetId>,
    selection: u64,
    extra_stop_types: Vec<String>,
    bind_properties: bool,
    always_use: bool,
}

impl Inspector {
    /// Inspector for component-like objects, bound to their serialized
    /// properties.
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            config,
            state: InspectorState::default(),
            context: None,
            target: None,
            selection: 0,
            extra_stop_types: Vec::new(),
            bind_properties: true,
            always_use: false,
        }
    }

    /// Inspector for an editor window's own fields. Always uses the annotated
    /// layout, draws live values without binding, and stops the member scan
    /// at `stop_types` (the window framework's base types).
    pub fn for_window(config: InspectorConfig, stop_types: Vec<String>) -> Self {
        Self {
            extra_stop_types: stop_types,
            bind_properties: false,
            always_use: true,
            ..Self::new(config)
        }
    }

    pub fn with_state(mut self, state: InspectorState) -> Self {
        self.state = state;
        self.invalidate();
        self
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn state(&self) -> &InspectorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InspectorState {
        &mut self.state
    }

    pub fn set_play_mode(&mut self, play_mode: bool) {
        self.state.play_mode = play_mode;
    }

    /// The discovered layout, once a target has been shown.
    pub fn context(&self) -> Option<&ClassContext> {
        self.context.as_ref()
    }

    /// Tags the object the host is about to show, e.g. with an entity id or
    /// a selection counter. A new key forces rediscovery even when the new
    /// object sits at the address of a dropped one.
    pub fn set_selection(&mut self, selection: u64) {
        self.selection = selection;
    }

    pub fn selection(&self) -> u64 {
        self.selection
    }

    /// Forces rediscovery on the next frame, e.g. after a hot reload.
    pub fn invalidate(&mut self) {
        self.context = None;
        self.target = None;
    }

    /// Discovers the layout of `target` unless it is already current.
    pub fn prepare(&mut self, target: &dyn Reflect) {
        let id = TargetId::of(target, self.selection);
        if self.context.is_some() && self.target == Some(id) {
            return;
        }

        let mut context =
            ClassContext::discover_with(target, &self.config, &self.extra_stop_types, &self.state);
        if self.bind_properties {
            let serialized = SerializedObject::new(target, &self.state);
            bind(&mut context, serialized.cursor());
        }
        log::debug!(
            "Prepared inspector for {} ({} items)",
            target.type_info().name,
            context.members().len()
        );
        self.context = Some(context);
        self.target = Some(id);
    }

    /// Whether the annotated layout is used for the prepared target.
    pub fn uses_layout(&self) -> bool {
        if !self.config.enabled || !globally_enabled() {
            return false;
        }
        self.always_use
            || self.config.always_use_inspector
            || self.context.as_ref().is_some_and(ClassContext::has_annotations)
    }

    /// Draws one frame for `target`.
    pub fn show(&mut self, target: &mut dyn Reflect, backend: &mut dyn InspectorBackend) {
        self.prepare(target);
        if !self.uses_layout() {
            show_default_inspector(target, backend, self.config.max_depth);
            return;
        }

        let Self {
            config,
            state,
            context,
            ..
        } = self;
        if let Some(context) = context {
            context.render(target, backend, state, config);
        }
    }
}

/// Draws every visible field of `target` in declaration order with no
/// annotation handling, base types first. Nested composites are expanded up
/// to `max_depth` levels.
pub fn show_default_inspector(
    target: &mut dyn Reflect,
    backend: &mut dyn InspectorBackend,
    max_depth: usize,
) {
    let info = target.type_info();
    let chain: Vec<_> = info
        .chain()
        .take_while(|t| !t.flags.framework_root)
        .collect();

    for (depth, owner_info) in chain.iter().enumerate().rev() {
        let Some(owner) = resolve_base_mut(target, depth) else {
            continue;
        };
        for member in &owner_info.members {
            let hidden = member
                .annotations
                .has(|k| matches!(k, AnnotationKind::Hide));
            if hidden || member.kind == MemberKind::Method || !is_visible(member) {
                continue;
            }
            let label = nicify(member.name);

            if max_depth > 0
                && let Some(nested) = owner.nested_mut(member.name)
            {
                let mut open = true;
                backend.foldout(&label, &mut open);
                let header = ScopeHeader {
                    path: member.name,
                    ..ScopeHeader::default()
                };
                backend.begin_scope(ScopeLayout::Indent, &header);
                show_default_inspector(nested, backend, max_depth - 1);
                backend.end_scope();
                continue;
            }

            let Some(value) = owner.get_member(member.name) else {
                continue;
            };
            let mut view = FieldView::new(&label, &value);
            view.read_only = !member.flags.writable;
            if let FieldResponse::Changed(new) = backend.field(&view)
                && let Err(err) = owner.set_member(member.name, new)
            {
                log::warn!("Failed to set {}.{}: {err}", owner_info.name, member.name);
            }
        }
    }
}
