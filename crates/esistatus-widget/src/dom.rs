use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use esistatus_core::refresh::{StatusPanel, TOOLTIP_MARKER};

use crate::bootstrap;

/// [`StatusPanel`] over a real DOM element.
///
/// Owns the tooltip instances attached to the current content so they can
/// be disposed before the next fragment replaces their anchors.
pub struct DomPanel {
    document: Document,
    element: Element,
    loading: Option<Element>,
    reveal_on_content: bool,
    tooltips: RefCell<Vec<bootstrap::Tooltip>>,
}

impl DomPanel {
    /// Look up the target region by CSS selector.
    pub fn mount(document: &Document, selector: &str) -> Option<Self> {
        let element = document.query_selector(selector).ok().flatten()?;

        Some(Self {
            document: document.clone(),
            element,
            loading: None,
            reveal_on_content: false,
            tooltips: RefCell::new(Vec::new()),
        })
    }

    /// Hide the element matching `selector` once content arrives.
    pub fn with_loading(mut self, selector: &str) -> Self {
        self.loading = self.document.query_selector(selector).ok().flatten();
        self
    }

    /// Run the reveal transition when content first arrives.
    pub fn with_reveal(mut self) -> Self {
        self.reveal_on_content = true;
        self
    }
}

impl StatusPanel for DomPanel {
    fn set_content(&self, html: &str) {
        self.element.set_inner_html(html);

        if let Some(loading) = &self.loading {
            let _ = loading.class_list().add_1("d-none");
        }
    }

    fn is_revealed(&self) -> bool {
        if !self.reveal_on_content {
            return true;
        }

        // Bootstrap marks an expanded collapse with the "show" class.
        self.element.class_list().contains("show")
    }

    fn reveal(&self) {
        bootstrap::collapse_show(&self.element);
    }

    fn dispose_decorations(&self) {
        for tooltip in self.tooltips.borrow_mut().drain(..) {
            tooltip.dispose();
        }

        // Bubbles whose anchor was replaced mid-hover are left attached to
        // the body; sweep them out.
        if let Ok(orphans) = self.document.query_selector_all(".tooltip[role=\"tooltip\"]") {
            for i in 0..orphans.length() {
                if let Some(orphan) = orphans.item(i) {
                    if let Ok(element) = orphan.dyn_into::<Element>() {
                        element.remove();
                    }
                }
            }
        }
    }

    fn attach_decorations(&self) {
        let selector = format!("[data-bs-tooltip=\"{}\"]", TOOLTIP_MARKER);

        let Ok(anchors) = self.element.query_selector_all(&selector) else {
            return;
        };

        let mut tooltips = self.tooltips.borrow_mut();

        for i in 0..anchors.length() {
            if let Some(anchor) = anchors.item(i) {
                if let Ok(element) = anchor.dyn_into::<Element>() {
                    tooltips.push(bootstrap::tooltip_with_html(&element));
                }
            }
        }
    }
}
