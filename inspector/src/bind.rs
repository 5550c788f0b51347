//! Attaches host serialized properties to discovered members.

use crate::backend::BoundProperty;
use crate::context::{ClassContext, MemberDescriptor, TYPE_PROPERTY};
use crate::reflect::MemberKind;

/// A position in the host's serialized property list.
///
/// Cloning yields an independent cursor at the same position.
pub trait PropertyCursor: Clone {
    fn name(&self) -> &str;

    /// Dotted path from the root object.
    fn path(&self) -> &str;

    fn has_children(&self) -> bool;

    fn is_expanded(&self) -> bool;

    /// Advances to the next visible property, descending into the current
    /// one's children when `enter_children` is set and it is expanded.
    /// Returns false at the end of the list.
    fn next_visible(&mut self, enter_children: bool) -> bool;

    fn handle(&self) -> BoundProperty {
        BoundProperty {
            name: self.name().to_string(),
            path: self.path().to_string(),
        }
    }
}

/// Binds the properties reachable from `cursor` to `ctx`'s members.
///
/// The cursor is expected before the first property. Fields match by name,
/// properties also by their `_<name>` backing field. The host's type
/// pseudo-property becomes the first display item.
pub fn bind<C: PropertyCursor>(ctx: &mut ClassContext, mut cursor: C) {
    bind_scope(ctx, &mut cursor, None);
}

fn bind_scope<C: PropertyCursor>(ctx: &mut ClassContext, cursor: &mut C, parent: Option<&str>) {
    let mut enter = true;
    while cursor.next_visible(enter) {
        enter = false;
        if let Some(parent) = parent
            && !is_child_path(parent, cursor.path())
        {
            break;
        }

        if cursor.name() == TYPE_PROPERTY {
            if !ctx.members().iter().any(MemberDescriptor::is_type_property) {
                ctx.members_mut()
                    .insert(0, MemberDescriptor::type_property(cursor.handle()));
            }
            continue;
        }

        let type_name = ctx.type_info().name;
        let Some(index) = ctx
            .members()
            .iter()
            .position(|d| d.bound.is_none() && matches_property(d, cursor.name()))
        else {
            if !is_declared(ctx, cursor.name()) {
                log::error!(
                    "Serialized property '{}' has no member on {type_name}",
                    cursor.path()
                );
            }
            continue;
        };

        let desc = &mut ctx.members_mut()[index];
        desc.bound = Some(cursor.handle());
        if !cursor.has_children() {
            continue;
        }
        desc.folded_out = cursor.is_expanded();
        match desc.nested.as_deref_mut() {
            Some(nested) if cursor.is_expanded() => {
                let path = cursor.path().to_string();
                bind_scope(nested, &mut cursor.clone(), Some(&path));
            }
            Some(_) => {}
            None => log::warn!(
                "Serialized property '{}' of {type_name} has children but its member is not expanded",
                cursor.path()
            ),
        }
    }
}

fn is_child_path(parent: &str, path: &str) -> bool {
    path.strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('.'))
}

fn matches_property(desc: &MemberDescriptor, name: &str) -> bool {
    if desc.is_type_property() {
        return false;
    }
    desc.name() == name
        || (desc.kind() == MemberKind::Property && name.strip_prefix('_') == Some(desc.name()))
}

/// Hidden members still have serialized properties; they are skipped
/// quietly.
fn is_declared(ctx: &ClassContext, name: &str) -> bool {
    let info = ctx.type_info();
    info.find_member(name).is_some()
        || name
            .strip_prefix('_')
            .is_some_and(|n| info.find_member(n).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct ListCursor {
        entries: Vec<(&'static str, bool)>,
        current: Option<usize>,
    }

    impl PropertyCursor for ListCursor {
        fn name(&self) -> &str {
            let path = self.path();
            path.rsplit('.').next().unwrap_or(path)
        }

        fn path(&self) -> &str {
            self.current.map_or("", |i| self.entries[i].0)
        }

        fn has_children(&self) -> bool {
            self.current.is_some_and(|i| self.entries[i].1)
        }

        fn is_expanded(&self) -> bool {
            self.has_children()
        }

        fn next_visible(&mut self, _enter_children: bool) -> bool {
            let next = self.current.map_or(0, |i| i + 1);
            if next >= self.entries.len() {
                return false;
            }
            self.current = Some(next);
            true
        }
    }

    #[test]
    fn child_paths() {
        assert!(is_child_path("a", "a.b"));
        assert!(!is_child_path("a", "ab"));
        assert!(!is_child_path("a", "a"));
        assert!(!is_child_path("a.b", "a.c"));
    }

    #[test]
    fn cursor_handle_carries_name_and_path() {
        let mut cursor = ListCursor {
            entries: vec![("inner", true), ("inner.value", false)],
            current: None,
        };
        assert!(cursor.next_visible(true));
        assert!(cursor.next_visible(true));
        assert_eq!(
            cursor.handle(),
            BoundProperty {
                name: "value".to_string(),
                path: "inner.value".to_string(),
            }
        );
        assert!(!cursor.next_visible(true));
    }
}
