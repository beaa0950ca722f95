use std::future::Future;
use std::pin::Pin;

use crate::Result;

/// Attribute value marking tooltip anchors inside fragments.
pub const TOOLTIP_MARKER: &str = "aa-esi-status";

/// An HTML snippet returned by the status endpoint, applied verbatim.
///
/// An empty fragment means "nothing to show yet" and is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_html(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fragment {
    fn from(html: &str) -> Self {
        Self::new(html)
    }
}

/// The page region a refresher renders into.
///
/// Implemented over the real DOM in the widget crate and by a recording
/// mock in tests. All operations are synchronous; the refresher drives
/// them from its completion path only.
pub trait StatusPanel {
    /// Replace the region's inner markup, verbatim.
    fn set_content(&self, html: &str);

    /// Whether the region is already in its revealed visual state,
    /// checked via the element's state class rather than an internal flag.
    fn is_revealed(&self) -> bool;

    /// Trigger the one-shot reveal transition.
    fn reveal(&self);

    /// Dispose decorations attached to the previous content and remove
    /// orphaned floating tooltip bubbles.
    fn dispose_decorations(&self);

    /// Scan the current content for tooltip anchors and attach fresh
    /// decoration instances.
    fn attach_decorations(&self);
}

/// Future returned by a fragment fetch.
///
/// Not `Send`: the refresher runs on single-threaded event loops
/// (the browser main thread, or a current-thread runtime in tests).
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Fragment>> + 'a>>;

/// Transport seam for the status endpoint.
pub trait FragmentSource {
    /// GET the configured URL and return its body as a fragment.
    fn fetch(&self) -> FetchFuture<'_>;
}
