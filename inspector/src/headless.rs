//! A backend that records what would be drawn.
//!
//! Used by tests and tools. User input is scripted ahead of a frame: edits
//! and clicks are keyed by label, foldout toggles by group path or label,
//! tab selections by the path of the group that owns the tabs. Each scripted
//! input is consumed by the first widget it matches.

use std::collections::{HashMap, HashSet};

use crate::annotation::MessageKind;
use crate::backend::{
    BoundProperty, FieldResponse, FieldView, InspectorBackend, ScopeHeader, ScopeLayout,
};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    BeginScope {
        layout: ScopeLayout,
        path: String,
        title: Option<String>,
    },
    EndScope,
    FoldoutHeader {
        path: String,
        open: bool,
    },
    TabHeader {
        titles: Vec<String>,
        selected: usize,
    },
    BeginItem {
        serialized: bool,
    },
    EndItem,
    Message {
        text: String,
        kind: MessageKind,
    },
    Label(String),
    Field {
        label: String,
        value: Value,
        read_only: bool,
        bound: Option<String>,
    },
    Button {
        label: String,
        enabled: bool,
    },
    Foldout {
        label: String,
        open: bool,
        bound: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    events: Vec<UiEvent>,
    depth: usize,
    last_tab_path: String,
    edits: HashMap<String, Value>,
    clicks: HashSet<String>,
    toggles: HashSet<String>,
    tab_selections: HashMap<String, usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Scripted input --

    /// The next field labeled `label` reports `value` as edited.
    pub fn edit(&mut self, label: impl Into<String>, value: Value) {
        self.edits.insert(label.into(), value);
    }

    /// The next enabled button labeled `label` reports a click.
    pub fn click(&mut self, label: impl Into<String>) {
        self.clicks.insert(label.into());
    }

    /// Flips the foldout header of the group at `path_or_label`, or the
    /// nested-member foldout with that label.
    pub fn toggle(&mut self, path_or_label: impl Into<String>) {
        self.toggles.insert(path_or_label.into());
    }

    /// Selects tab `index` in the tab header of the group at `owner_path`.
    pub fn select_tab(&mut self, owner_path: impl Into<String>, index: usize) {
        self.tab_selections.insert(owner_path.into(), index);
    }

    // -- Recorded output --

    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    /// Returns and clears the recorded events.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of scopes currently open. Zero after a complete frame.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Labels of drawn fields, in draw order.
    pub fn field_labels(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Field { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn find_field(&self, label: &str) -> Option<&UiEvent> {
        self.events
            .iter()
            .find(|e| matches!(e, UiEvent::Field { label: l, .. } if l == label))
    }

    pub fn field_value(&self, label: &str) -> Option<&Value> {
        match self.find_field(label)? {
            UiEvent::Field { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn messages(&self) -> Vec<(&str, MessageKind)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Message { text, kind } => Some((text.as_str(), *kind)),
                _ => None,
            })
            .collect()
    }

    pub fn buttons(&self) -> Vec<(&str, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Button { label, enabled } => Some((label.as_str(), *enabled)),
                _ => None,
            })
            .collect()
    }

    fn respond(&mut self, label: &str, field: &FieldView<'_>) -> FieldResponse {
        if matches!(field.value, Value::Opaque(_)) {
            return FieldResponse::NotDrawn;
        }
        match self.edits.remove(label) {
            Some(value) if !field.read_only => FieldResponse::Changed(value),
            Some(value) => {
                self.edits.insert(label.to_string(), value);
                FieldResponse::Unchanged
            }
            None => FieldResponse::Unchanged,
        }
    }
}

impl InspectorBackend for HeadlessBackend {
    fn begin_scope(&mut self, layout: ScopeLayout, header: &ScopeHeader<'_>) {
        if layout == ScopeLayout::Tab {
            self.last_tab_path = header.path.to_string();
        }
        self.depth += 1;
        self.events.push(UiEvent::BeginScope {
            layout,
            path: header.path.to_string(),
            title: header.title.map(str::to_string),
        });
    }

    fn end_scope(&mut self) {
        debug_assert!(self.depth > 0, "end_scope without begin_scope");
        self.depth = self.depth.saturating_sub(1);
        self.events.push(UiEvent::EndScope);
    }

    fn foldout_header(&mut self, header: &ScopeHeader<'_>, open: &mut bool) {
        if self.toggles.remove(header.path) {
            *open = !*open;
        }
        self.events.push(UiEvent::FoldoutHeader {
            path: header.path.to_string(),
            open: *open,
        });
    }

    fn tab_header(&mut self, titles: &[&str], selected: &mut usize) {
        if let Some(index) = self.tab_selections.remove(&self.last_tab_path) {
            *selected = index.min(titles.len().saturating_sub(1));
        }
        self.events.push(UiEvent::TabHeader {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            selected: *selected,
        });
    }

    fn begin_item(&mut self, serialized: bool) {
        self.events.push(UiEvent::BeginItem { serialized });
    }

    fn end_item(&mut self) {
        self.events.push(UiEvent::EndItem);
    }

    fn message(&mut self, text: &str, kind: MessageKind) {
        self.events.push(UiEvent::Message {
            text: text.to_string(),
            kind,
        });
    }

    fn label(&mut self, text: &str) {
        self.events.push(UiEvent::Label(text.to_string()));
    }

    fn field(&mut self, field: &FieldView<'_>) -> FieldResponse {
        let response = self.respond(field.label, field);
        self.events.push(UiEvent::Field {
            label: field.label.to_string(),
            value: field.value.clone(),
            read_only: field.read_only,
            bound: None,
        });
        response
    }

    fn native_field(&mut self, property: &BoundProperty, field: &FieldView<'_>) -> FieldResponse {
        let response = self.respond(field.label, field);
        self.events.push(UiEvent::Field {
            label: field.label.to_string(),
            value: field.value.clone(),
            read_only: field.read_only,
            bound: Some(property.path.clone()),
        });
        response
    }

    fn button(&mut self, label: &str, enabled: bool) -> bool {
        let clicked = enabled && self.clicks.remove(label);
        self.events.push(UiEvent::Button {
            label: label.to_string(),
            enabled,
        });
        clicked
    }

    fn foldout(&mut self, label: &str, open: &mut bool) {
        if self.toggles.remove(label) {
            *open = !*open;
        }
        self.events.push(UiEvent::Foldout {
            label: label.to_string(),
            open: *open,
            bound: None,
        });
    }

    fn native_foldout(&mut self, property: &BoundProperty, label: &str, open: &mut bool) {
        if self.toggles.remove(label) {
            *open = !*open;
        }
        self.events.push(UiEvent::Foldout {
            label: label.to_string(),
            open: *open,
            bound: Some(property.path.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_consumed_once() {
        let mut backend = HeadlessBackend::new();
        backend.edit("Speed", Value::Float(2.0));
        let value = Value::Float(1.0);
        let view = FieldView::new("Speed", &value);

        assert_eq!(backend.field(&view), FieldResponse::Changed(Value::Float(2.0)));
        assert_eq!(backend.field(&view), FieldResponse::Unchanged);
        assert_eq!(backend.field_labels(), vec!["Speed", "Speed"]);
    }

    #[test]
    fn read_only_fields_keep_pending_edits() {
        let mut backend = HeadlessBackend::new();
        backend.edit("Speed", Value::Float(2.0));
        let value = Value::Float(1.0);
        let mut view = FieldView::new("Speed", &value);
        view.read_only = true;
        assert_eq!(backend.field(&view), FieldResponse::Unchanged);

        view.read_only = false;
        assert_eq!(backend.field(&view), FieldResponse::Changed(Value::Float(2.0)));
    }

    #[test]
    fn opaque_values_are_not_drawn() {
        let mut backend = HeadlessBackend::new();
        let value = Value::Opaque("Handle");
        assert_eq!(
            backend.field(&FieldView::new("Handle", &value)),
            FieldResponse::NotDrawn
        );
    }

    #[test]
    fn disabled_buttons_never_click() {
        let mut backend = HeadlessBackend::new();
        backend.click("Fire");
        assert!(!backend.button("Fire", false));
        assert!(backend.button("Fire", true));
        assert!(!backend.button("Fire", true));
    }

    #[test]
    fn scopes_balance() {
        let mut backend = HeadlessBackend::new();
        let header = ScopeHeader {
            path: "Stats",
            ..ScopeHeader::default()
        };
        backend.begin_scope(ScopeLayout::Box, &header);
        assert_eq!(backend.depth(), 1);
        backend.end_scope();
        assert_eq!(backend.depth(), 0);
    }
}
