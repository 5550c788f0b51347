//! Inspector UI built on [egui](https://docs.rs/egui).
//!
//! # Usage
//!
//! ```ignore
//! use redlilium_inspector::{Inspector, InspectorConfig};
//! use redlilium_inspector::ui::show_inspector;
//!
//! let mut inspector = Inspector::new(InspectorConfig::default());
//!
//! // During frame, render into any egui::Ui container:
//! show_inspector(ui, &mut inspector, &mut player);
//! ```

mod egui_backend;

pub use egui_backend::{EguiBackend, show_inspector};
