//! # RedLilium Inspector
//!
//! Attribute-driven inspector layouts. Annotate a struct's fields and
//! methods with `#[inspect(...)]` and the inspector groups, orders, hides,
//! validates and decorates them when the object is shown in the editor.
//!
//! ## Pipeline
//!
//! - [`scan`]: collects the visible members of a type and its bases
//! - [`order`]: fills in missing ordering hints and sorts members
//! - [`group`]: builds the group tree and a display list where every
//!   group's members are contiguous
//! - [`walker`]: opens and closes group scopes while drawing
//! - [`ClassContext`]: runs the pipeline and renders the result
//!
//! ## Drawing
//!
//! - [`InspectorBackend`]: what the layout engine draws through
//! - [`ui::EguiBackend`]: egui implementation used by the editor
//! - [`HeadlessBackend`]: recording implementation for tests and tools
//! - [`Inspector`]: host glue with caching, binding and fallback
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_inspector::{Inspect, Inspector, InspectorConfig};
//!
//! #[derive(Inspect, Default)]
//! #[inspect(serializable)]
//! struct Player {
//!     #[inspect(box_group = "Stats", min = 0.0)]
//!     pub health: f32,
//!     #[inspect(box_group = "Stats")]
//!     pub speed: f32,
//!     #[inspect(info_box = "=health * 2")]
//!     pub shield: f32,
//! }
//!
//! let mut inspector = Inspector::new(InspectorConfig::default());
//! redlilium_inspector::ui::show_inspector(ui, &mut inspector, &mut player);
//! ```

extern crate self as redlilium_inspector;

pub mod annotation;
pub mod backend;
pub mod bind;
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod field;
pub mod group;
pub mod headless;
mod inspector;
pub mod names;
pub mod order;
pub mod reflect;
mod render;
pub mod scan;
pub mod serialized;
pub mod state;
pub mod ui;
pub mod value;
pub mod walker;

pub use annotation::{
    Annotation, AnnotationKind, ButtonMode, Condition, GroupAnnotation, GroupKind, MessageKind,
    Validator,
};
pub use backend::{
    BoundProperty, FieldResponse, FieldView, InspectorBackend, ScopeHeader, ScopeLayout,
};
pub use bind::{PropertyCursor, bind};
pub use config::{InspectorConfig, load_config, load_or_default};
pub use context::{ClassContext, MemberDescriptor, TYPE_PROPERTY};
pub use error::{ConfigError, RenderError, StateError};
pub use expr::{EmptyScope, EvalError, EvalOptions, FnScope, Scope, evaluate, evaluate_with};
pub use field::{AssetRef, FieldValue};
pub use group::{GroupId, GroupNode, GroupTree, TabCoordinator};
pub use headless::{HeadlessBackend, UiEvent};
pub use inspector::{Inspector, globally_enabled, set_globally_enabled, show_default_inspector};
pub use inspector_macro::{Inspect, InspectEnum, inspect_methods};
pub use reflect::{
    InspectMethods, MemberFlags, MemberInfo, MemberKind, Reflect, ReflectError, TypeFlags,
    TypeInfo, Typed, ValueType,
};
pub use render::MemberScope;
pub use serialized::{SerializedCursor, SerializedObject};
pub use state::InspectorState;
pub use value::Value;
