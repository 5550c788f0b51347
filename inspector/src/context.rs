//! Per-type inspector layout: discovery and rendering.

use crate::annotation::{Annotation, GroupAnnotation, GroupKind, MessageKind};
use crate::backend::{BoundProperty, InspectorBackend};
use crate::config::InspectorConfig;
use crate::group::{GroupId, GroupTree, Grouped, build_display};
use crate::order::{Ordered, resolve_order};
use crate::reflect::{MemberInfo, MemberKind, Reflect, TypeInfo};
use crate::render::{GroupScopes, draw_item};
use crate::scan::{ScanOutput, scan};
use crate::state::InspectorState;
use crate::walker::ScopeWalker;

/// Name of the pseudo-member the host serializer reports for an object's
/// type. It is always displayed first.
pub const TYPE_PROPERTY: &str = "$type";

// ---------------------------------------------------------------------------
// MemberDescriptor
// ---------------------------------------------------------------------------

/// One displayable member of an inspected type.
#[derive(Debug)]
pub struct MemberDescriptor {
    /// `None` only for the [`TYPE_PROPERTY`] pseudo-member.
    pub member: Option<&'static MemberInfo>,
    /// Number of base links from the inspected instance to the type that
    /// declares this member.
    pub owner_depth: usize,
    /// Source line of the first annotation; negative when unknown.
    pub order_hint: f64,
    pub group: GroupId,
    pub bound: Option<BoundProperty>,
    /// Layout of a composite member's value.
    pub nested: Option<Box<ClassContext>>,
    pub folded_out: bool,
    /// Configuration problems found during discovery.
    pub error: Option<String>,
}

impl MemberDescriptor {
    pub(crate) fn new(member: &'static MemberInfo, owner_depth: usize) -> Self {
        Self {
            member: Some(member),
            owner_depth,
            order_hint: member.annotations.first().map_or(-1.0, |a| a.line as f64),
            group: GroupId::ROOT,
            bound: None,
            nested: None,
            folded_out: true,
            error: None,
        }
    }

    pub(crate) fn type_property(bound: BoundProperty) -> Self {
        Self {
            member: None,
            owner_depth: 0,
            order_hint: -1.0,
            group: GroupId::ROOT,
            bound: Some(bound),
            nested: None,
            folded_out: true,
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.member.map_or(TYPE_PROPERTY, |m| m.name)
    }

    pub fn kind(&self) -> MemberKind {
        self.member.map_or(MemberKind::Field, |m| m.kind)
    }

    pub fn annotations(&self) -> &'static [Annotation] {
        match self.member {
            Some(m) => &m.annotations,
            None => &[],
        }
    }

    pub fn is_type_property(&self) -> bool {
        self.member.is_none()
    }

    /// Whether the host persists this member.
    pub fn is_serialized(&self) -> bool {
        if self.bound.is_some() {
            return true;
        }
        match self.member {
            None => true,
            Some(m) => match m.kind {
                MemberKind::Method => true,
                MemberKind::Property => m.flags.serialize,
                MemberKind::Field => m.flags.serialized_field(),
            },
        }
    }

    pub(crate) fn push_error(&mut self, message: String) {
        match &mut self.error {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(&message);
            }
            None => self.error = Some(message),
        }
    }
}

impl Ordered for MemberDescriptor {
    fn kind(&self) -> MemberKind {
        MemberDescriptor::kind(self)
    }

    fn order_hint(&self) -> f64 {
        self.order_hint
    }

    fn set_order_hint(&mut self, hint: f64) {
        self.order_hint = hint;
    }
}

impl Grouped for MemberDescriptor {
    fn group_annotations(&self) -> Vec<GroupAnnotation> {
        self.annotations()
            .iter()
            .filter_map(Annotation::group)
            .cloned()
            .collect()
    }

    fn set_group(&mut self, group: GroupId) {
        self.group = group;
    }

    fn group(&self) -> GroupId {
        self.group
    }

    fn report_error(&mut self, message: String) {
        self.push_error(message);
    }
}

// ---------------------------------------------------------------------------
// ClassContext
// ---------------------------------------------------------------------------

/// Discovered layout of one type: its display list and group tree.
///
/// Built once per inspector session (see [`ClassContext::discover`]) and
/// rendered every frame. Composite members own the context of their value.
#[derive(Debug)]
pub struct ClassContext {
    type_info: &'static TypeInfo,
    depth: usize,
    has_annotations: bool,
    members: Vec<MemberDescriptor>,
    tree: GroupTree,
    errors: Vec<String>,
}

impl ClassContext {
    /// Discovers the layout of `target`'s type with default state.
    pub fn discover(target: &dyn Reflect, config: &InspectorConfig) -> Self {
        Self::discover_with(target, config, &[], &InspectorState::default())
    }

    /// Discovers the layout of `target`'s type.
    ///
    /// `extra_stop_types` end the base-type walk in addition to the
    /// configured stop types. Foldout and tab selections are restored from
    /// `state`.
    pub fn discover_with(
        target: &dyn Reflect,
        config: &InspectorConfig,
        extra_stop_types: &[String],
        state: &InspectorState,
    ) -> Self {
        Self::build(target.type_info(), target, 0, config, extra_stop_types, state)
    }

    pub(crate) fn build(
        info: &'static TypeInfo,
        target: &dyn Reflect,
        depth: usize,
        config: &InspectorConfig,
        extra_stop_types: &[String],
        state: &InspectorState,
    ) -> Self {
        let ScanOutput {
            mut members,
            has_annotations,
        } = scan(info, target, depth, config, extra_stop_types, state);

        resolve_order(&mut members);
        let (mut tree, members) = build_display(members);
        let errors = tree.wire_tabs();
        restore_state(&mut tree, info.name, state);

        for node in tree.nodes() {
            if node.kind == Some(GroupKind::Placeholder) {
                log::error!(
                    "Group '{}' of {} never gets a layout; use a box, foldout, tab, horizontal or vertical group",
                    node.path,
                    info.name
                );
            }
        }

        log::debug!(
            "Discovered {} members and {} groups for {} (annotated: {has_annotations})",
            members.len(),
            tree.len() - 1,
            info.name
        );

        Self {
            type_info: info,
            depth,
            has_annotations,
            members,
            tree,
            errors,
        }
    }

    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    /// Nesting depth, 0 for the inspected object itself.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether any member, or any nested type, carries annotations.
    /// Hosts fall back to a default inspector when this is false.
    pub fn has_annotations(&self) -> bool {
        self.has_annotations
    }

    /// Members in display order.
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Vec<MemberDescriptor> {
        &mut self.members
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name() == name)
    }

    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    /// Configuration errors not tied to a single member.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Draws `target` with this layout.
    ///
    /// `target` must be an instance of the type this context was discovered
    /// for.
    pub fn render(
        &mut self,
        target: &mut dyn Reflect,
        backend: &mut dyn InspectorBackend,
        state: &mut InspectorState,
        config: &InspectorConfig,
    ) {
        for error in &self.errors {
            backend.message(error, MessageKind::Error);
        }

        let type_name = self.type_info.name;
        let Self { members, tree, .. } = self;
        let mut walker = ScopeWalker::new();

        for desc in members.iter_mut() {
            let chain = tree.node(desc.group).chain.clone();
            let mut scopes = GroupScopes {
                tree: &mut *tree,
                backend: &mut *backend,
                state: &mut *state,
                type_name,
            };
            if !walker.enter(&chain, &mut scopes) {
                continue;
            }
            draw_item(desc, &mut *target, &mut *backend, &mut *state, config);
        }

        walker.finish(&mut GroupScopes {
            tree: &mut *tree,
            backend: &mut *backend,
            state: &mut *state,
            type_name,
        });
    }
}

fn restore_state(tree: &mut GroupTree, type_name: &str, state: &InspectorState) {
    for index in 0..tree.len() {
        let node = &tree.nodes()[index];
        let id = node.id();
        let key = InspectorState::key(type_name, &node.path);
        let kind = node.kind;
        let node = tree.node_mut(id);
        if kind == Some(GroupKind::Foldout) {
            node.open = state.foldout(&key);
        }
        if let Some(tabs) = node.tabs.as_mut() {
            tabs.select(state.tab(&key));
        }
    }
}
