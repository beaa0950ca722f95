//! Bindings to the host page's Bootstrap widget library.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    /// `bootstrap.Tooltip` instance bound to one anchor element.
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Tooltip)]
    pub type Tooltip;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Tooltip")]
    fn new(element: &Element, options: &JsValue) -> Tooltip;

    /// Destroy the instance and its floating bubble, if shown.
    #[wasm_bindgen(method)]
    pub fn dispose(this: &Tooltip);

    /// `bootstrap.Collapse` instance driving the reveal transition.
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Collapse)]
    pub type Collapse;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Collapse")]
    fn new(element: &Element, options: &JsValue) -> Collapse;
}

/// Attach a tooltip that renders its title as HTML.
pub fn tooltip_with_html(element: &Element) -> Tooltip {
    let options = Object::new();
    let _ = Reflect::set(&options, &JsValue::from_str("html"), &JsValue::TRUE);

    Tooltip::new(element, &options)
}

/// Expand a collapsed element.
pub fn collapse_show(element: &Element) {
    let options = Object::new();
    let _ = Reflect::set(&options, &JsValue::from_str("show"), &JsValue::TRUE);

    let _ = Collapse::new(element, &options);
}
