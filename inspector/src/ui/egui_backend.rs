//! [`InspectorBackend`] drawing into an [`egui::Ui`].

use egui::{Align, Color32, CornerRadius, Layout, RichText, Shape, Stroke, StrokeKind};

use crate::annotation::MessageKind;
use crate::backend::{
    BoundProperty, FieldResponse, FieldView, InspectorBackend, ScopeHeader, ScopeLayout,
};
use crate::inspector::Inspector;
use crate::reflect::Reflect;
use crate::value::Value;

const INDENT: f32 = 12.0;
const BOX_MARGIN: f32 = 4.0;
const NON_SERIALIZED_TINT: Color32 = Color32::from_rgba_premultiplied(40, 24, 0, 24);

/// An open scope or item: a child `Ui` placed inside its parent, plus an
/// optional background painted behind it once its size is known.
struct OpenScope {
    ui: egui::Ui,
    background: Option<egui::layers::ShapeIdx>,
    fill: Option<Color32>,
    border: bool,
    margin: f32,
}

/// Draws inspector layouts with egui widgets.
///
/// Scopes are laid out as child `Ui`s. Call [`EguiBackend::finish`] at the
/// end of the frame so the parent's cursor advances past everything drawn.
pub struct EguiBackend<'a> {
    root: &'a mut egui::Ui,
    stack: Vec<OpenScope>,
    widgets: usize,
}

impl<'a> EguiBackend<'a> {
    pub fn new(root: &'a mut egui::Ui) -> Self {
        Self {
            root,
            stack: Vec::new(),
            widgets: 0,
        }
    }

    /// Closes any scope left open.
    pub fn finish(mut self) {
        if !self.stack.is_empty() {
            log::warn!("{} inspector scopes left open at end of frame", self.stack.len());
        }
        while !self.stack.is_empty() {
            self.pop();
        }
    }

    fn ui(&mut self) -> &mut egui::Ui {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.ui,
            None => &mut *self.root,
        }
    }

    fn push(&mut self, layout: Layout, indent: f32, margin: f32, fill: Option<Color32>, border: bool) {
        let parent = self.ui();
        let background = (fill.is_some() || border).then(|| parent.painter().add(Shape::Noop));
        let mut rect = parent.available_rect_before_wrap();
        rect.min.x += indent + margin;
        rect.min.y += margin;
        rect.max.x -= margin;
        let ui = parent.new_child(egui::UiBuilder::new().max_rect(rect).layout(layout));
        self.stack.push(OpenScope {
            ui,
            background,
            fill,
            border,
            margin,
        });
    }

    fn pop(&mut self) {
        let Some(frame) = self.stack.pop() else {
            log::error!("Inspector scope closed more often than opened");
            return;
        };
        let rect = frame.ui.min_rect().expand(frame.margin);
        let parent = self.ui();
        if let Some(index) = frame.background {
            let radius = CornerRadius::same(4);
            let mut shapes = Vec::new();
            if let Some(fill) = frame.fill {
                shapes.push(Shape::rect_filled(rect, radius, fill));
            }
            if frame.border {
                let stroke = parent.visuals().widgets.noninteractive.bg_stroke;
                shapes.push(Shape::rect_stroke(rect, radius, stroke, StrokeKind::Inside));
            }
            parent.painter().set(index, Shape::Vec(shapes));
        }
        parent.advance_cursor_after_rect(rect);
    }

    fn next_id(&mut self) -> usize {
        self.widgets += 1;
        self.widgets
    }

    fn draw_field(&mut self, field: &FieldView<'_>) -> FieldResponse {
        if matches!(field.value, Value::Opaque(_)) {
            return FieldResponse::NotDrawn;
        }
        let id = self.next_id();
        let ui = self.ui();
        let edited = ui
            .horizontal(|ui| {
                ui.label(field.label);
                ui.add_enabled_ui(!field.read_only, |ui| edit_value(ui, id, field))
                    .inner
            })
            .inner;
        match edited {
            Some(value) => FieldResponse::Changed(value),
            None => FieldResponse::Unchanged,
        }
    }

    fn draw_foldout(&mut self, label: &str, open: &mut bool) {
        self.ui().horizontal(|ui| {
            if ui.small_button(if *open { "v" } else { ">" }).clicked() {
                *open = !*open;
            }
            ui.label(RichText::new(label).strong());
        });
    }
}

fn color_of(rgba: u32) -> Color32 {
    let [r, g, b, a] = rgba.to_be_bytes();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn drag<'v>(value: &'v mut f64, field: &FieldView<'_>, speed: f64) -> egui::DragValue<'v> {
    egui::DragValue::new(value)
        .speed(speed)
        .range(field.min.unwrap_or(f64::NEG_INFINITY)..=field.max.unwrap_or(f64::INFINITY))
}

fn edit_components(ui: &mut egui::Ui, components: &mut [f32]) -> bool {
    const AXES: [&str; 4] = ["x: ", "y: ", "z: ", "w: "];
    let mut changed = false;
    for (component, axis) in components.iter_mut().zip(AXES) {
        changed |= ui
            .add(egui::DragValue::new(component).speed(0.01).prefix(axis))
            .changed();
    }
    changed
}

/// Draws the editor for one value and returns the new value on change.
fn edit_value(ui: &mut egui::Ui, id: usize, field: &FieldView<'_>) -> Option<Value> {
    match field.value {
        Value::Null => {
            ui.label(RichText::new("None").weak());
            None
        }
        Value::Bool(v) => {
            let mut v = *v;
            ui.checkbox(&mut v, "").changed().then_some(Value::Bool(v))
        }
        Value::Int(v) => {
            let mut f = *v as f64;
            ui.add(drag(&mut f, field, 1.0))
                .changed()
                .then(|| Value::Int(f.round() as i64))
        }
        Value::Float(v) => {
            let mut f = *v;
            ui.add(drag(&mut f, field, 0.01))
                .changed()
                .then_some(Value::Float(f))
        }
        Value::Str(s) => {
            let mut s = s.clone();
            ui.text_edit_singleline(&mut s)
                .changed()
                .then_some(Value::Str(s))
        }
        Value::Vec2(v) => {
            let mut v = *v;
            edit_components(ui, &mut v).then_some(Value::Vec2(v))
        }
        Value::Vec3(v) => {
            let mut v = *v;
            edit_components(ui, &mut v).then_some(Value::Vec3(v))
        }
        Value::Vec4(v) => {
            let mut v = *v;
            edit_components(ui, &mut v).then_some(Value::Vec4(v))
        }
        Value::Color(c) => {
            let mut c = *c;
            ui.color_edit_button_rgba_unmultiplied(&mut c)
                .changed()
                .then_some(Value::Color(c))
        }
        Value::Enum { index, variants } => {
            let mut selected = *index;
            egui::ComboBox::from_id_salt(("inspector_enum", id))
                .selected_text(variants.get(*index).copied().unwrap_or("?"))
                .show_ui(ui, |ui| {
                    for (i, name) in variants.iter().enumerate() {
                        ui.selectable_value(&mut selected, i, *name);
                    }
                });
            (selected != *index).then_some(Value::Enum {
                index: selected,
                variants: *variants,
            })
        }
        Value::ObjectRef(path) => {
            let mut text = path.clone().unwrap_or_default();
            ui.add(egui::TextEdit::singleline(&mut text).hint_text("None"))
                .changed()
                .then(|| Value::ObjectRef((!text.is_empty()).then_some(text)))
        }
        Value::List(items) => {
            ui.label(RichText::new(format!("{} items", items.len())).weak());
            None
        }
        Value::Opaque(name) => {
            ui.label(RichText::new(*name).weak().italics());
            None
        }
    }
}

impl InspectorBackend for EguiBackend<'_> {
    fn begin_scope(&mut self, layout: ScopeLayout, header: &ScopeHeader<'_>) {
        let fill = header.back_color.map(color_of);
        match layout {
            ScopeLayout::Box | ScopeLayout::Tab => {
                self.push(Layout::top_down(Align::Min), 0.0, BOX_MARGIN, fill, true);
            }
            ScopeLayout::Vertical => {
                self.push(Layout::top_down(Align::Min), 0.0, 0.0, fill, false);
            }
            ScopeLayout::Horizontal => {
                self.push(Layout::left_to_right(Align::Center), 0.0, 0.0, fill, false);
            }
            ScopeLayout::Foldout | ScopeLayout::Indent => {
                self.push(Layout::top_down(Align::Min), INDENT, 0.0, fill, false);
            }
        }
        if let Some(title) = header.title {
            self.ui().label(RichText::new(title).strong());
        }
    }

    fn end_scope(&mut self) {
        self.pop();
    }

    fn foldout_header(&mut self, header: &ScopeHeader<'_>, open: &mut bool) {
        let title = header.title.unwrap_or(header.path);
        self.draw_foldout(title, open);
    }

    fn tab_header(&mut self, titles: &[&str], selected: &mut usize) {
        self.ui().horizontal(|ui| {
            for (i, title) in titles.iter().enumerate() {
                if ui.add(egui::Button::selectable(i == *selected, *title)).clicked() {
                    *selected = i;
                }
            }
        });
        self.ui().separator();
    }

    fn begin_item(&mut self, serialized: bool) {
        let fill = (!serialized).then_some(NON_SERIALIZED_TINT);
        self.push(Layout::top_down(Align::Min), 0.0, 0.0, fill, false);
    }

    fn end_item(&mut self) {
        self.pop();
    }

    fn message(&mut self, text: &str, kind: MessageKind) {
        let (color, icon) = match kind {
            MessageKind::Info => (Color32::from_rgb(120, 170, 255), "i"),
            MessageKind::Warning => (Color32::from_rgb(255, 200, 60), "!"),
            MessageKind::Error => (Color32::from_rgb(255, 90, 90), "x"),
        };
        egui::Frame::new()
            .inner_margin(egui::Margin::same(6))
            .corner_radius(CornerRadius::same(4))
            .stroke(Stroke::new(1.0, color))
            .show(self.ui(), |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(icon).color(color).strong());
                    ui.label(text);
                });
            });
    }

    fn label(&mut self, text: &str) {
        self.ui().label(text);
    }

    fn field(&mut self, field: &FieldView<'_>) -> FieldResponse {
        self.draw_field(field)
    }

    fn native_field(&mut self, property: &BoundProperty, field: &FieldView<'_>) -> FieldResponse {
        let response = self.draw_field(field);
        if matches!(response, FieldResponse::Changed(_)) {
            log::trace!("Edited serialized property {}", property.path);
        }
        response
    }

    fn button(&mut self, label: &str, enabled: bool) -> bool {
        self.ui()
            .add_enabled(enabled, egui::Button::new(label))
            .clicked()
    }

    fn foldout(&mut self, label: &str, open: &mut bool) {
        self.draw_foldout(label, open);
    }

    fn egui_ui(&mut self) -> Option<&mut egui::Ui> {
        Some(self.ui())
    }
}

/// Draws `target` with `inspector` into `ui`.
pub fn show_inspector(ui: &mut egui::Ui, inspector: &mut Inspector, target: &mut dyn Reflect) {
    let mut backend = EguiBackend::new(ui);
    inspector.show(target, &mut backend);
    backend.finish();
}
