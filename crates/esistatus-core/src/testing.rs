//! Test doubles for the refresh seams.
//!
//! A recording panel, a scripted fragment source, and a drop-counting
//! schedule handle. Compiled for tests and behind the `testing` feature so
//! downstream crates can drive the refresher without a browser.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::refresh::{FetchFuture, Fragment, FragmentSource, StatusPanel};
use crate::Result;

/// Recording [`StatusPanel`] double.
///
/// Tracks content history, reveal state, and a decoration instance count
/// (one per configured anchor on attach, zeroed on dispose) so tests can
/// assert that instances never accumulate.
#[derive(Debug)]
pub struct MockPanel {
    content: RefCell<Vec<String>>,
    revealed: Cell<bool>,
    reveal_count: Cell<usize>,
    anchors: usize,
    live_decorations: Cell<usize>,
    events: RefCell<Vec<&'static str>>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self::with_anchors(1)
    }

    /// A panel whose fragments contain `anchors` tooltip anchors.
    pub fn with_anchors(anchors: usize) -> Self {
        Self {
            content: RefCell::new(Vec::new()),
            revealed: Cell::new(false),
            reveal_count: Cell::new(0),
            anchors,
            live_decorations: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn set_revealed(&self, revealed: bool) {
        self.revealed.set(revealed);
    }

    /// The most recently applied content, if any.
    pub fn current_content(&self) -> Option<String> {
        self.content.borrow().last().cloned()
    }

    /// Every content value applied, in order.
    pub fn content_history(&self) -> Vec<String> {
        self.content.borrow().clone()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveal_count.get()
    }

    pub fn live_decorations(&self) -> usize {
        self.live_decorations.get()
    }

    /// Panel operations in call order.
    pub fn events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPanel for MockPanel {
    fn set_content(&self, html: &str) {
        self.content.borrow_mut().push(html.to_string());
        self.events.borrow_mut().push("set_content");
    }

    fn is_revealed(&self) -> bool {
        self.revealed.get()
    }

    fn reveal(&self) {
        self.revealed.set(true);
        self.reveal_count.set(self.reveal_count.get() + 1);
        self.events.borrow_mut().push("reveal");
    }

    fn dispose_decorations(&self) {
        self.live_decorations.set(0);
        self.events.borrow_mut().push("dispose");
    }

    fn attach_decorations(&self) {
        self.live_decorations
            .set(self.live_decorations.get() + self.anchors);
        self.events.borrow_mut().push("attach");
    }
}

/// Scripted [`FragmentSource`] double.
///
/// Responses are consumed front to back; once the script runs out, every
/// further fetch yields an empty fragment.
#[derive(Debug, Default)]
pub struct MockFragmentSource {
    responses: RefCell<VecDeque<Result<Fragment>>>,
    calls: Cell<usize>,
}

impl MockFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response.
    pub fn push(&self, outcome: Result<Fragment>) {
        self.responses.borrow_mut().push_back(outcome);
    }

    /// Number of fetches performed.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FragmentSource for MockFragmentSource {
    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            self.calls.set(self.calls.get() + 1);

            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Fragment::empty()))
        })
    }
}

/// Issues schedule handles and counts how many are still alive, so tests
/// can assert the single-schedule invariant across activate/deactivate
/// toggles.
#[derive(Debug, Default, Clone)]
pub struct HandleCounter {
    live: Rc<Cell<usize>>,
}

impl HandleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> CountedHandle {
        self.live.set(self.live.get() + 1);

        CountedHandle {
            live: Rc::clone(&self.live),
        }
    }

    /// Handles issued and not yet dropped.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

/// A schedule handle stand-in; dropping it "cancels the timer".
#[derive(Debug)]
pub struct CountedHandle {
    live: Rc<Cell<usize>>,
}

impl Drop for CountedHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}
