//! Host-side serialized view of an object.
//!
//! [`SerializedObject`] flattens the persisted members of a [`Reflect`]
//! instance into a depth-first property list, the way an editor's
//! serializer presents them. [`SerializedCursor`] walks that list and is the
//! [`PropertyCursor`] the binder consumes.

use crate::bind::PropertyCursor;
use crate::context::TYPE_PROPERTY;
use crate::reflect::{MemberKind, Reflect, TypeInfo, ValueType, resolve_base};
use crate::state::InspectorState;

/// Nested objects deeper than this are listed without children.
const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedProperty {
    pub name: String,
    /// Dotted path from the root object.
    pub path: String,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone)]
pub struct SerializedObject {
    type_name: &'static str,
    properties: Vec<SerializedProperty>,
}

impl SerializedObject {
    /// Lists the serialized members of `target`, its bases first. Expansion
    /// of nested objects is read from `state`.
    pub fn new(target: &dyn Reflect, state: &InspectorState) -> Self {
        let type_name = target.type_info().name;
        let mut properties = vec![SerializedProperty {
            name: TYPE_PROPERTY.to_string(),
            path: TYPE_PROPERTY.to_string(),
            depth: 0,
            has_children: false,
            expanded: false,
        }];
        collect(target, type_name, "", 0, state, &mut properties);
        Self {
            type_name,
            properties,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &[SerializedProperty] {
        &self.properties
    }

    pub fn find(&self, path: &str) -> Option<&SerializedProperty> {
        self.properties.iter().find(|p| p.path == path)
    }

    /// A cursor positioned before the first property.
    pub fn cursor(&self) -> SerializedCursor<'_> {
        SerializedCursor {
            properties: &self.properties,
            current: None,
        }
    }
}

fn collect(
    target: &dyn Reflect,
    root_type: &str,
    prefix: &str,
    depth: usize,
    state: &InspectorState,
    out: &mut Vec<SerializedProperty>,
) {
    let chain: Vec<&'static TypeInfo> = target
        .type_info()
        .chain()
        .take_while(|info| !info.flags.framework_root)
        .collect();

    for (owner_depth, info) in chain.iter().enumerate().rev() {
        let Some(owner) = resolve_base(target, owner_depth) else {
            continue;
        };
        for member in &info.members {
            if member.kind != MemberKind::Field || !member.flags.serialized_field() {
                continue;
            }
            let path = if prefix.is_empty() {
                member.name.to_string()
            } else {
                format!("{prefix}.{}", member.name)
            };
            let child = match &member.value_type {
                ValueType::Composite(nested_info) if nested_info().flags.serializable => {
                    owner.nested(member.name)
                }
                _ => None,
            };
            let has_children = child.is_some() && depth < MAX_DEPTH;
            let expanded = has_children && state.foldout(&InspectorState::key(root_type, &path));
            out.push(SerializedProperty {
                name: member.name.to_string(),
                path: path.clone(),
                depth,
                has_children,
                expanded,
            });
            if let Some(child) = child.filter(|_| has_children) {
                collect(child, root_type, &path, depth + 1, state, out);
            }
        }
    }
}

/// Iterator over the visible properties of a [`SerializedObject`].
#[derive(Debug, Clone)]
pub struct SerializedCursor<'a> {
    properties: &'a [SerializedProperty],
    /// `None` before the first property.
    current: Option<usize>,
}

impl SerializedCursor<'_> {
    fn property(&self) -> Option<&SerializedProperty> {
        self.current.and_then(|i| self.properties.get(i))
    }
}

impl PropertyCursor for SerializedCursor<'_> {
    fn name(&self) -> &str {
        self.property().map_or("", |p| p.name.as_str())
    }

    fn path(&self) -> &str {
        self.property().map_or("", |p| p.path.as_str())
    }

    fn has_children(&self) -> bool {
        self.property().is_some_and(|p| p.has_children)
    }

    fn is_expanded(&self) -> bool {
        self.property().is_some_and(|p| p.expanded)
    }

    fn next_visible(&mut self, enter_children: bool) -> bool {
        let next = match self.current {
            None => 0,
            Some(i) => {
                let current = &self.properties[i];
                if enter_children && current.has_children && current.expanded {
                    i + 1
                } else {
                    let skipped = self.properties[i + 1..]
                        .iter()
                        .take_while(|p| p.depth > current.depth)
                        .count();
                    i + 1 + skipped
                }
            }
        };
        if next >= self.properties.len() {
            return false;
        }
        self.current = Some(next);
        true
    }
}
