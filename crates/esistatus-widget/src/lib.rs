//! Browser driver for the status refresher.
//!
//! Compiles to a wasm-bindgen cdylib exposing two mount points: the
//! one-shot index panel and the focus-gated, polling dashboard widget.

mod settings;

#[cfg(target_arch = "wasm32")]
mod bootstrap;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod mount;

pub use settings::{DashboardWidgetSettings, UrlSettings, WidgetSettings};
