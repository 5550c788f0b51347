//! Dynamic values exchanged between reflected types, the expression
//! evaluator and inspector backends.

use std::fmt;

/// A dynamically typed value read from or written to a reflected member.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Unmultiplied RGBA in `0.0..=1.0`.
    Color([f32; 4]),
    /// A unit enum variant: index into `variants`.
    Enum {
        index: usize,
        variants: &'static [&'static str],
    },
    List(Vec<Value>),
    /// Reference to an external object (asset, entity). `None` when unassigned.
    ObjectRef(Option<String>),
    /// A value the inspector can name but not edit.
    Opaque(&'static str),
}

impl Value {
    /// Short type label used in diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Vec2(_) => "vec2",
            Value::Vec3(_) => "vec3",
            Value::Vec4(_) => "vec4",
            Value::Color(_) => "color",
            Value::Enum { .. } => "enum",
            Value::List(_) => "list",
            Value::ObjectRef(_) => "object",
            Value::Opaque(name) => name,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Enum { index, .. } => Some(*index as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::Float(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Name of the selected variant for enum values.
    pub fn variant_name(&self) -> Option<&'static str> {
        match self {
            Value::Enum { index, variants } => variants.get(*index).copied(),
            _ => None,
        }
    }

    /// Whether the value counts as "not provided" for required members.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null | Value::ObjectRef(None) => true,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the value with numeric components clamped to `min..=max`.
    pub fn clamped(self, min: Option<f64>, max: Option<f64>) -> Value {
        let clamp = |v: f64| {
            let v = min.map_or(v, |m| v.max(m));
            max.map_or(v, |m| v.min(m))
        };
        let clamp32 = |v: f32| clamp(v as f64) as f32;
        match self {
            Value::Int(v) => Value::Int(clamp(v as f64).round() as i64),
            Value::Float(v) => Value::Float(clamp(v)),
            Value::Vec2(v) => Value::Vec2(v.map(clamp32)),
            Value::Vec3(v) => Value::Vec3(v.map(clamp32)),
            Value::Vec4(v) => Value::Vec4(v.map(clamp32)),
            other => other,
        }
    }
}

fn write_components(f: &mut fmt::Formatter<'_>, components: &[f32]) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Vec2(v) => write_components(f, v),
            Value::Vec3(v) => write_components(f, v),
            Value::Vec4(v) | Value::Color(v) => write_components(f, v),
            Value::Enum { .. } => write!(f, "{}", self.variant_name().unwrap_or("?")),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::ObjectRef(Some(name)) => write!(f, "{name}"),
            Value::ObjectRef(None) => write!(f, "None"),
            Value::Opaque(name) => write!(f, "({name})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_display_without_fraction() {
        assert_eq!(Value::Float(7.0).to_string(), "7");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
    }

    #[test]
    fn enum_displays_variant_name() {
        let v = Value::Enum {
            index: 1,
            variants: &["Low", "High"],
        };
        assert_eq!(v.to_string(), "High");
        assert_eq!(v.variant_name(), Some("High"));
    }

    #[test]
    fn clamping_applies_to_each_component() {
        let v = Value::Vec3([-2.0, 0.5, 9.0]).clamped(Some(0.0), Some(1.0));
        assert_eq!(v, Value::Vec3([0.0, 0.5, 1.0]));
        assert_eq!(Value::Int(12).clamped(None, Some(10.0)), Value::Int(10));
        assert_eq!(
            Value::Str("x".into()).clamped(Some(0.0), None),
            Value::Str("x".into())
        );
    }

    #[test]
    fn missing_values() {
        assert!(Value::Null.is_missing());
        assert!(Value::ObjectRef(None).is_missing());
        assert!(Value::Str(String::new()).is_missing());
        assert!(!Value::Int(0).is_missing());
    }
}
