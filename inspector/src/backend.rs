//! Drawing surface used by the inspector.
//!
//! The layout engine only talks to [`InspectorBackend`]. The editor uses
//! [`crate::ui::EguiBackend`]; tests and tools use
//! [`crate::headless::HeadlessBackend`].

use crate::annotation::MessageKind;
use crate::value::Value;

/// Visual nesting opened by a group or a nested composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLayout {
    Box,
    Vertical,
    Horizontal,
    Tab,
    Foldout,
    Indent,
}

/// Presentation of a scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeHeader<'a> {
    /// Group path, unique within one inspected type.
    pub path: &'a str,
    /// Title to draw, if any.
    pub title: Option<&'a str>,
    /// Background color as `0xRRGGBBAA`.
    pub back_color: Option<u32>,
}

/// An editable value handed to a leaf renderer.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a Value,
    pub read_only: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl<'a> FieldView<'a> {
    pub fn new(label: &'a str, value: &'a Value) -> Self {
        Self {
            label,
            value,
            read_only: false,
            min: None,
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldResponse {
    /// The backend cannot draw this value type.
    NotDrawn,
    Unchanged,
    Changed(Value),
}

/// Host-native handle of a serialized member, attached by the binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundProperty {
    pub name: String,
    /// Dotted path from the inspected root object.
    pub path: String,
}

pub trait InspectorBackend {
    fn begin_scope(&mut self, layout: ScopeLayout, header: &ScopeHeader<'_>);
    fn end_scope(&mut self);

    /// Foldout group header; toggles `open` on click.
    fn foldout_header(&mut self, header: &ScopeHeader<'_>, open: &mut bool);

    /// Shared header of a set of tab groups; updates `selected` on click.
    fn tab_header(&mut self, titles: &[&str], selected: &mut usize);

    /// Wraps one display item. `serialized` is false for members that are
    /// not persisted, which backends may tint.
    fn begin_item(&mut self, serialized: bool);
    fn end_item(&mut self);

    fn message(&mut self, text: &str, kind: MessageKind);
    fn label(&mut self, text: &str);

    /// Draws an editor for `field.value`.
    fn field(&mut self, field: &FieldView<'_>) -> FieldResponse;

    /// Draws a member through its serialized handle.
    fn native_field(&mut self, property: &BoundProperty, field: &FieldView<'_>) -> FieldResponse {
        let _ = property;
        self.field(field)
    }

    /// Returns true when clicked.
    fn button(&mut self, label: &str, enabled: bool) -> bool;

    /// Foldout for a nested composite member.
    fn foldout(&mut self, label: &str, open: &mut bool);

    fn native_foldout(&mut self, property: &BoundProperty, label: &str, open: &mut bool) {
        let _ = property;
        self.foldout(label, open)
    }

    /// Direct egui access for custom draw hooks.
    fn egui_ui(&mut self) -> Option<&mut egui::Ui> {
        None
    }
}
