//! Static type metadata and the runtime reflection capability.
//!
//! [`TypeInfo`] describes a type's members as the derive macro saw them;
//! [`Reflect`] gives dynamic access to one instance. The inspector never
//! touches concrete types directly, everything goes through these two.

use std::any::Any;

use crate::annotation::Annotation;
use crate::backend::InspectorBackend;
use crate::value::Value;

/// Kind of a reflected member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    /// A getter, optionally paired with a setter.
    Property,
    Method,
}

impl MemberKind {
    /// Stable ordinal used to derive fallback ordering hints.
    pub fn ordinal(self) -> u32 {
        match self {
            MemberKind::Field => 1,
            MemberKind::Property => 2,
            MemberKind::Method => 3,
        }
    }
}

/// Declaration-level facts about a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberFlags {
    pub public: bool,
    pub is_static: bool,
    /// Compiler- or convention-generated member (leading underscore).
    pub synthesized: bool,
    /// Explicitly marked for serialization.
    pub serialize: bool,
    /// Explicitly excluded from serialization.
    pub non_serialized: bool,
    pub readable: bool,
    pub writable: bool,
}

impl MemberFlags {
    /// Whether a field with these flags is persisted by the host.
    pub fn serialized_field(&self) -> bool {
        !self.is_static && ((self.public && !self.non_serialized) || self.serialize)
    }
}

/// Type-level annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeFlags {
    pub serializable: bool,
    pub show: bool,
    pub hide: bool,
    /// Framework base type; the member scan stops before it.
    pub framework_root: bool,
    /// Reference to an external object; shown as a handle, never expanded.
    pub object_reference: bool,
}

/// Static type of a member's value.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// Nothing (methods returning `()`).
    Unit,
    Primitive(&'static str),
    String,
    Enum(&'static [&'static str]),
    ObjectRef,
    Composite(fn() -> &'static TypeInfo),
    List(Box<ValueType>),
    /// A type the inspector cannot represent.
    Opaque(&'static str),
}

impl ValueType {
    /// Composite type info, if the value type is a composite.
    pub fn composite(&self) -> Option<&'static TypeInfo> {
        match self {
            ValueType::Composite(info) => Some(info()),
            _ => None,
        }
    }

    /// Unwraps one level of list.
    pub fn element(&self) -> &ValueType {
        match self {
            ValueType::List(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }
}

#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: &'static str,
    pub kind: MemberKind,
    pub flags: MemberFlags,
    /// Field type, property type, or method return type.
    pub value_type: ValueType,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug)]
pub struct TypeInfo {
    pub name: &'static str,
    pub flags: TypeFlags,
    pub members: Vec<MemberInfo>,
    pub base: Option<fn() -> &'static TypeInfo>,
}

impl TypeInfo {
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn base_info(&self) -> Option<&'static TypeInfo> {
        self.base.map(|base| base())
    }

    /// This type followed by its base chain, most derived first.
    pub fn chain(&'static self) -> impl Iterator<Item = &'static TypeInfo> {
        std::iter::successors(Some(self), |info| info.base_info())
    }

    /// Looks a member up on this type or any of its bases.
    pub fn find_member(&'static self, name: &str) -> Option<&'static MemberInfo> {
        self.chain().find_map(|info| info.member(name))
    }
}

// ---------------------------------------------------------------------------
// Runtime access
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    #[error("no member named '{0}'")]
    NoSuchMember(String),
    #[error("member '{0}' is read-only")]
    ReadOnly(String),
    #[error("cannot assign a {found} value to '{member}'")]
    TypeMismatch { member: String, found: &'static str },
    #[error("method '{0}' not found")]
    MissingMethod(String),
}

/// Dynamic access to an instance of a reflected type.
///
/// Implemented by `#[derive(Inspect)]`. Members of base types are reached
/// through [`Reflect::base`], not through the derived type's accessors.
pub trait Reflect: Any {
    fn type_info(&self) -> &'static TypeInfo;

    /// Current value of a field or readable property.
    fn get_member(&self, name: &str) -> Option<Value>;

    fn set_member(&mut self, name: &str, value: Value) -> Result<(), ReflectError>;

    /// Calls a zero-argument method.
    fn invoke(&mut self, name: &str) -> Result<Value, ReflectError> {
        Err(ReflectError::MissingMethod(name.to_string()))
    }

    /// Composite member value, `None` when absent or not composite.
    fn nested(&self, _name: &str) -> Option<&dyn Reflect> {
        None
    }

    fn nested_mut(&mut self, _name: &str) -> Option<&mut dyn Reflect> {
        None
    }

    /// Embedded base-type instance.
    fn base(&self) -> Option<&dyn Reflect> {
        None
    }

    fn base_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    /// Runs a custom draw hook declared with `#[inspect(gui)]`.
    fn draw_hook(&mut self, name: &str, _ui: &mut dyn InspectorBackend) -> Result<(), ReflectError> {
        Err(ReflectError::MissingMethod(name.to_string()))
    }

    fn as_any(&self) -> &dyn Any;
}

/// Static access to a type's metadata.
pub trait Typed {
    fn static_type_info() -> &'static TypeInfo;
}

/// Properties, buttons and draw hooks generated by `#[inspect_methods]`.
pub trait InspectMethods {
    fn method_members() -> Vec<MemberInfo>;

    fn get_property(&self, name: &str) -> Option<Value>;

    /// `None` when `name` is not a writable property.
    fn set_property(&mut self, name: &str, value: Value) -> Option<Result<(), ReflectError>>;

    /// `None` when `name` is not an invocable method.
    fn invoke_method(&mut self, name: &str) -> Option<Value>;

    /// `false` when `name` is not a draw hook.
    fn draw_hook(&mut self, name: &str, ui: &mut dyn InspectorBackend) -> bool;
}

/// Follows `depth` base links from `target`.
pub fn resolve_base(target: &dyn Reflect, depth: usize) -> Option<&dyn Reflect> {
    let mut current = target;
    for _ in 0..depth {
        current = current.base()?;
    }
    Some(current)
}

pub fn resolve_base_mut(target: &mut dyn Reflect, depth: usize) -> Option<&mut dyn Reflect> {
    let mut current = target;
    for _ in 0..depth {
        current = current.base_mut()?;
    }
    Some(current)
}

/// Reads a member by name, searching `target` and then its bases. A dotted
/// name walks into nested composites.
pub fn lookup_member(target: &dyn Reflect, name: &str) -> Option<Value> {
    let (head, rest) = match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };
    let mut current = Some(target);
    while let Some(t) = current {
        match rest {
            None => {
                if let Some(value) = t.get_member(head) {
                    return Some(value);
                }
            }
            Some(rest) => {
                if let Some(nested) = t.nested(head) {
                    return lookup_member(nested, rest);
                }
            }
        }
        current = t.base();
    }
    None
}

/// Invokes a method declared on `target` or one of its bases.
pub fn invoke_member(target: &mut dyn Reflect, name: &str) -> Result<Value, ReflectError> {
    match target.invoke(name) {
        Err(ReflectError::MissingMethod(_)) => match target.base_mut() {
            Some(base) => invoke_member(base, name),
            None => Err(ReflectError::MissingMethod(name.to_string())),
        },
        result => result,
    }
}

/// Runs a draw hook declared on `target` or one of its bases.
pub fn run_draw_hook(
    target: &mut dyn Reflect,
    name: &str,
    ui: &mut dyn InspectorBackend,
) -> Result<(), ReflectError> {
    match target.draw_hook(name, ui) {
        Err(ReflectError::MissingMethod(_)) => match target.base_mut() {
            Some(base) => run_draw_hook(base, name, ui),
            None => Err(ReflectError::MissingMethod(name.to_string())),
        },
        result => result,
    }
}
