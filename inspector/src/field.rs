//! Conversions between concrete member types and [`Value`].
//!
//! Every field type that should be editable implements [`FieldValue`].
//! `#[derive(Inspect)]` implements it for the deriving struct so composites
//! can be nested, and `#[derive(InspectEnum)]` does the same for unit enums.
//! Types without an implementation still show up, as read-only opaque values.

use crate::reflect::{Reflect, ValueType};
use crate::value::Value;

pub trait FieldValue {
    fn value_type() -> ValueType
    where
        Self: Sized;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Option<Self>
    where
        Self: Sized;

    /// Replaces `self` with `value`. Returns `false` when the value does not
    /// fit this type.
    fn apply_value(&mut self, value: Value) -> bool
    where
        Self: Sized,
    {
        match Self::from_value(value) {
            Some(v) => {
                *self = v;
                true
            }
            None => false,
        }
    }

    fn as_reflect(&self) -> Option<&dyn Reflect> {
        None
    }

    fn as_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

macro_rules! impl_int_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn value_type() -> ValueType {
                    ValueType::Primitive(stringify!($ty))
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).ok(),
                        Value::Float(v) if v.is_finite() => <$ty>::try_from(v.round() as i64).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_int_field!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! impl_float_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn value_type() -> ValueType {
                    ValueType::Primitive(stringify!($ty))
                }

                fn to_value(&self) -> Value {
                    Value::Float(*self as f64)
                }

                fn from_value(value: Value) -> Option<Self> {
                    value.as_f64().map(|v| v as $ty)
                }
            }
        )*
    };
}

impl_float_field!(f32, f64);

impl FieldValue for bool {
    fn value_type() -> ValueType {
        ValueType::Primitive("bool")
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldValue for () {
    fn value_type() -> ValueType {
        ValueType::Unit
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(_value: Value) -> Option<Self> {
        Some(())
    }
}

impl FieldValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldValue for &'static str {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }

    fn from_value(_value: Value) -> Option<Self> {
        None
    }
}

// ---------------------------------------------------------------------------
// Math and color types
// ---------------------------------------------------------------------------

macro_rules! impl_vec_field {
    ($ty:ty, $variant:ident) => {
        impl FieldValue for $ty {
            fn value_type() -> ValueType {
                ValueType::Primitive(stringify!($ty))
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.to_array())
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(<$ty>::from_array(v)),
                    _ => None,
                }
            }
        }
    };
}

impl_vec_field!(glam::Vec2, Vec2);
impl_vec_field!(glam::Vec3, Vec3);
impl_vec_field!(glam::Vec4, Vec4);

impl FieldValue for egui::Color32 {
    fn value_type() -> ValueType {
        ValueType::Primitive("Color32")
    }

    fn to_value(&self) -> Value {
        Value::Color(egui::Rgba::from(*self).to_rgba_unmultiplied())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Color([r, g, b, a]) => Some(egui::Rgba::from_rgba_unmultiplied(r, g, b, a).into()),
            _ => None,
        }
    }
}

/// Handle to an external object such as an asset, identified by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetRef {
    pub path: Option<String>,
}

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl FieldValue for AssetRef {
    fn value_type() -> ValueType {
        ValueType::ObjectRef
    }

    fn to_value(&self) -> Value {
        Value::ObjectRef(self.path.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::ObjectRef(path) => Some(Self { path }),
            Value::Null => Some(Self::default()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

impl<T: FieldValue> FieldValue for Option<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn apply_value(&mut self, value: Value) -> bool {
        if value == Value::Null {
            *self = None;
            return true;
        }
        match self {
            Some(inner) => inner.apply_value(value),
            None => match T::from_value(value) {
                Some(v) => {
                    *self = Some(v);
                    true
                }
                None => false,
            },
        }
    }

    fn as_reflect(&self) -> Option<&dyn Reflect> {
        self.as_ref()?.as_reflect()
    }

    fn as_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut()?.as_reflect_mut()
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Box::new)
    }

    fn apply_value(&mut self, value: Value) -> bool {
        (**self).apply_value(value)
    }

    fn as_reflect(&self) -> Option<&dyn Reflect> {
        (**self).as_reflect()
    }

    fn as_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        (**self).as_reflect_mut()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    /// Applies element-wise so composite elements keep their state.
    fn apply_value(&mut self, value: Value) -> bool {
        let Value::List(items) = value else {
            return false;
        };
        if items.len() != self.len() {
            return match Self::from_value(Value::List(items)) {
                Some(v) => {
                    *self = v;
                    true
                }
                None => false,
            };
        }
        let mut applied = true;
        for (slot, item) in self.iter_mut().zip(items) {
            applied &= slot.apply_value(item);
        }
        applied
    }
}

// ---------------------------------------------------------------------------
// Macro support
// ---------------------------------------------------------------------------

/// Probes used by the derive macros to fall back gracefully for member types
/// without a [`FieldValue`] implementation.
///
/// Each probe has a specialized trait implemented on the probe itself and a
/// fallback implemented on a reference to it, so method resolution picks
/// the specialized one whenever its bounds hold.
#[doc(hidden)]
pub mod __private {
    use std::marker::PhantomData;

    use super::FieldValue;
    use crate::reflect::{Reflect, ValueType};
    use crate::value::Value;

    pub struct TypeProbe<T: ?Sized>(PhantomData<fn() -> Box<T>>);

    impl<T: ?Sized> TypeProbe<T> {
        #[allow(clippy::new_without_default)]
        pub fn new() -> Self {
            Self(PhantomData)
        }
    }

    pub trait ProbeType {
        fn value_type(self) -> ValueType;
    }

    impl<T: FieldValue> ProbeType for TypeProbe<T> {
        fn value_type(self) -> ValueType {
            T::value_type()
        }
    }

    pub trait ProbeTypeFallback {
        fn value_type(self) -> ValueType;
    }

    impl<T: ?Sized> ProbeTypeFallback for &TypeProbe<T> {
        fn value_type(self) -> ValueType {
            ValueType::Opaque(std::any::type_name::<T>())
        }
    }

    pub struct FieldRef<'a, T: ?Sized>(pub &'a T);

    pub trait ReadField<'a> {
        fn read(self) -> Value;
        fn reflect(self) -> Option<&'a dyn Reflect>;
    }

    impl<'a, T: FieldValue> ReadField<'a> for FieldRef<'a, T> {
        fn read(self) -> Value {
            self.0.to_value()
        }

        fn reflect(self) -> Option<&'a dyn Reflect> {
            self.0.as_reflect()
        }
    }

    pub trait ReadFieldFallback<'a> {
        fn read(self) -> Value;
        fn reflect(self) -> Option<&'a dyn Reflect>;
    }

    impl<'a, T: ?Sized> ReadFieldFallback<'a> for &FieldRef<'a, T> {
        fn read(self) -> Value {
            Value::Opaque(std::any::type_name::<T>())
        }

        fn reflect(self) -> Option<&'a dyn Reflect> {
            None
        }
    }

    pub struct FieldMut<'a, T: ?Sized>(pub &'a mut T);

    pub trait WriteField<'a> {
        fn write(self, value: Value) -> bool;
        fn reflect_mut(self) -> Option<&'a mut dyn Reflect>;
    }

    impl<'a, T: FieldValue> WriteField<'a> for FieldMut<'a, T> {
        fn write(self, value: Value) -> bool {
            self.0.apply_value(value)
        }

        fn reflect_mut(self) -> Option<&'a mut dyn Reflect> {
            self.0.as_reflect_mut()
        }
    }

    pub trait WriteFieldFallback<'a> {
        fn write(self, value: Value) -> bool;
        fn reflect_mut(self) -> Option<&'a mut dyn Reflect>;
    }

    impl<'a, T: ?Sized> WriteFieldFallback<'a> for &FieldMut<'a, T> {
        fn write(self, _value: Value) -> bool {
            false
        }

        fn reflect_mut(self) -> Option<&'a mut dyn Reflect> {
            None
        }
    }

    /// Converts a setter argument.
    pub fn from_value<T: FieldValue>(value: Value) -> Option<T> {
        T::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::__private::*;
    use super::*;

    #[test]
    fn integers_reject_out_of_range_values() {
        assert_eq!(u8::from_value(Value::Int(300)), None);
        assert_eq!(u8::from_value(Value::Int(3)), Some(3));
        assert_eq!(i32::from_value(Value::Float(2.6)), Some(3));
    }

    #[test]
    fn option_clears_on_null() {
        let mut v = Some(4.0f32);
        assert!(v.apply_value(Value::Null));
        assert_eq!(v, None);
        assert!(v.apply_value(Value::Float(1.5)));
        assert_eq!(v, Some(1.5));
    }

    #[test]
    fn vec_applies_element_wise() {
        let mut v = vec![1u32, 2, 3];
        assert!(v.apply_value(Value::List(vec![
            Value::Int(4),
            Value::Int(5),
            Value::Int(6)
        ])));
        assert_eq!(v, vec![4, 5, 6]);
        assert!(v.apply_value(Value::List(vec![Value::Int(7)])));
        assert_eq!(v, vec![7]);
        assert!(!v.apply_value(Value::Bool(true)));
    }

    #[test]
    fn glam_vectors_round_trip() {
        let v = glam::Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.to_value(), Value::Vec3([1.0, 2.0, 3.0]));
    }

    #[test]
    fn probes_fall_back_for_unsupported_types() {
        struct Unsupported;
        let value = Unsupported;
        let number = 5i32;

        assert!(matches!(
            TypeProbe::<Unsupported>::new().value_type(),
            ValueType::Opaque(_)
        ));
        assert!(matches!(
            TypeProbe::<i32>::new().value_type(),
            ValueType::Primitive("i32")
        ));
        assert!(matches!(FieldRef(&value).read(), Value::Opaque(_)));
        assert_eq!(FieldRef(&number).read(), Value::Int(5));
    }
}
