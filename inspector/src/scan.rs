//! Member discovery: which members of a type the inspector shows.

use crate::annotation::{AnnotationKind, AnnotationsExt};
use crate::config::InspectorConfig;
use crate::context::{ClassContext, MemberDescriptor};
use crate::reflect::{MemberInfo, MemberKind, Reflect, TypeInfo, ValueType, resolve_base};
use crate::state::InspectorState;

#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Visible members, base types first, each in declaration order.
    pub members: Vec<MemberDescriptor>,
    pub has_annotations: bool,
}

/// Collects the visible members of `info` and its base types.
///
/// The base walk stops before framework root types and before any type
/// named in the config's stop list or in `extra_stop_types`. Composite
/// members are expanded into nested contexts using their value in `target`.
pub fn scan(
    info: &'static TypeInfo,
    target: &dyn Reflect,
    depth: usize,
    config: &InspectorConfig,
    extra_stop_types: &[String],
    state: &InspectorState,
) -> ScanOutput {
    let mut chain = vec![info];
    let mut current = info;
    while let Some(base) = current.base_info() {
        if base.flags.framework_root
            || config.stops_at(base.name)
            || extra_stop_types.iter().any(|t| t == base.name)
        {
            break;
        }
        chain.push(base);
        current = base;
    }

    let mut out = ScanOutput::default();
    for (owner_depth, owner_info) in chain.iter().enumerate().rev() {
        let owner = resolve_base(target, owner_depth);
        if owner.is_none() {
            log::error!(
                "{} does not expose its {} base; nested members of that base are skipped",
                info.name,
                owner_info.name
            );
        }
        for member in &owner_info.members {
            let mut scanner = MemberScan {
                member,
                owner_info,
                owner,
                depth,
                config,
                state,
                has_annotations: &mut out.has_annotations,
            };
            if let Some(desc) = scanner.run(owner_depth) {
                out.members.push(desc);
            }
        }
    }
    out
}

/// Whether `member` is shown, ignoring `Hide` and composite type flags.
pub fn is_visible(member: &MemberInfo) -> bool {
    let annotations = member.annotations.as_slice();
    let show = annotations.has(|k| matches!(k, AnnotationKind::Show));

    match member.kind {
        MemberKind::Property => member.flags.readable && (show || member.flags.serialize),
        MemberKind::Method => annotations.has(|k| matches!(k, AnnotationKind::Button { .. })),
        MemberKind::Field => {
            if show {
                return true;
            }
            if member.flags.is_static || member.flags.synthesized {
                return false;
            }
            let visible = (member.flags.public && !member.flags.non_serialized) || member.flags.serialize;
            if !visible {
                return false;
            }
            match member.value_type.element() {
                ValueType::Composite(info) => {
                    let flags = info().flags;
                    flags.serializable || flags.show || flags.object_reference
                }
                _ => true,
            }
        }
    }
}

struct MemberScan<'a> {
    member: &'static MemberInfo,
    owner_info: &'static TypeInfo,
    owner: Option<&'a dyn Reflect>,
    depth: usize,
    config: &'a InspectorConfig,
    state: &'a InspectorState,
    has_annotations: &'a mut bool,
}

impl MemberScan<'_> {
    fn run(&mut self, owner_depth: usize) -> Option<MemberDescriptor> {
        let member = self.member;
        let annotations = member.annotations.as_slice();

        if annotations.has(|k| matches!(k, AnnotationKind::Hide)) {
            *self.has_annotations = true;
            return None;
        }
        if !is_visible(member) {
            return None;
        }
        if !annotations.is_empty() {
            *self.has_annotations = true;
        }

        let mut desc = MemberDescriptor::new(member, owner_depth);
        if member.kind == MemberKind::Method || member.value_type.is_list() {
            return Some(desc);
        }
        let Some(composite) = member.value_type.composite() else {
            return Some(desc);
        };

        if composite.flags.hide {
            *self.has_annotations = true;
            return None;
        }
        let expand = (composite.flags.serializable || composite.flags.show)
            && !composite.flags.object_reference;
        if !expand {
            return Some(desc);
        }

        if self.depth + 1 > self.config.max_depth {
            let message = format!(
                "'{}' is nested deeper than {} levels and is not expanded",
                member.name, self.config.max_depth
            );
            log::warn!("{message}");
            desc.push_error(message);
            return Some(desc);
        }

        let Some(value) = self.owner.and_then(|owner| owner.nested(member.name)) else {
            log::error!(
                "{}.{} has no value to inspect; it must be initialized before the inspector opens",
                self.owner_info.name,
                member.name
            );
            debug_assert!(
                false,
                "{}.{} must be initialized before inspection",
                self.owner_info.name,
                member.name
            );
            return None;
        };

        let nested = ClassContext::build(
            value.type_info(),
            value,
            self.depth + 1,
            self.config,
            &[],
            self.state,
        );
        if nested.has_annotations() {
            *self.has_annotations = true;
        }
        desc.nested = Some(Box::new(nested));
        Some(desc)
    }
}
