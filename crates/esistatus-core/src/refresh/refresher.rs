use std::cell::{Cell, RefCell};

use super::panel::{Fragment, FragmentSource, StatusPanel};
use crate::Result;

/// Tag for one outstanding fragment request, issued by [`StatusRefresher::begin`].
#[derive(Debug)]
pub struct RefreshTicket {
    seq: u64,
}

/// Drives one status panel: owns the panel, the repeating-schedule handle,
/// and the guards against stale or post-deactivation completions.
///
/// `H` is the platform's timer handle; dropping it must cancel the timer
/// (gloo's `Interval` behaves this way). At most one handle is held at a
/// time, so re-activation can never leave two schedules running.
pub struct StatusRefresher<P, H> {
    panel: P,
    /// Completions apply only while true; cleared by `deactivate`.
    accepting: Cell<bool>,
    /// Sequence number of the most recently issued request.
    issued: Cell<u64>,
    schedule: RefCell<Option<H>>,
}

impl<P: StatusPanel, H> StatusRefresher<P, H> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            accepting: Cell::new(true),
            issued: Cell::new(0),
            schedule: RefCell::new(None),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Whether a repeating schedule is currently held.
    pub fn is_active(&self) -> bool {
        self.schedule.borrow().is_some()
    }

    /// Issue a sequence ticket for a request about to go out.
    pub fn begin(&self) -> RefreshTicket {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);

        RefreshTicket { seq }
    }

    /// Apply the outcome of a request, subject to the guards.
    ///
    /// Failures are logged and swallowed here; nothing propagates to the
    /// timer or the caller, and the displayed content stays as it was.
    pub fn complete(&self, ticket: RefreshTicket, outcome: Result<Fragment>) {
        if !self.accepting.get() {
            tracing::debug!(seq = ticket.seq, "Discarding completion after deactivation");
            return;
        }

        if ticket.seq != self.issued.get() {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued.get(),
                "Discarding stale completion"
            );
            return;
        }

        match outcome {
            Err(err) => {
                tracing::warn!(error = %err, "Status refresh failed");
            }
            Ok(fragment) if fragment.is_empty() => {
                tracing::debug!("Empty status fragment, nothing to show yet");
            }
            Ok(fragment) => {
                self.panel.set_content(fragment.as_html());

                if !self.panel.is_revealed() {
                    self.panel.reveal();
                }

                self.panel.dispose_decorations();
                self.panel.attach_decorations();
            }
        }
    }

    /// Perform one fetch-and-apply cycle.
    pub async fn refresh<S: FragmentSource + ?Sized>(&self, source: &S) {
        let ticket = self.begin();
        let outcome = source.fetch().await;
        self.complete(ticket, outcome);
    }

    /// Start refreshing: one immediate refresh, then the repeating schedule
    /// produced by `schedule`. Replaces (and thereby cancels) any schedule
    /// already held.
    pub async fn activate<S: FragmentSource + ?Sized>(
        &self,
        source: &S,
        schedule: impl FnOnce() -> H,
    ) {
        self.accepting.set(true);
        *self.schedule.borrow_mut() = Some(schedule());

        self.refresh(source).await;
    }

    /// Stop refreshing: drop the schedule handle and stop accepting
    /// completions from requests still in flight. A no-op when inactive.
    pub fn deactivate(&self) {
        self.accepting.set(false);
        self.schedule.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EsiStatusError;
    use crate::testing::{HandleCounter, MockFragmentSource, MockPanel};

    fn refresher() -> StatusRefresher<MockPanel, ()> {
        StatusRefresher::new(MockPanel::new())
    }

    #[tokio::test]
    async fn test_empty_body_leaves_content_unchanged() {
        let r = refresher();
        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>initial</p>")));
        source.push(Ok(Fragment::empty()));
        source.push(Ok(Fragment::empty()));
        source.push(Ok(Fragment::empty()));

        for _ in 0..4 {
            r.refresh(&source).await;
        }

        assert_eq!(r.panel().content_history(), vec!["<p>initial</p>"]);
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_non_empty_body_applied_verbatim() {
        let r = refresher();
        let source = MockFragmentSource::new();
        let body = r#"<div class="esi-status"><span title="5 &gt; 4">ok</span></div>"#;
        source.push(Ok(Fragment::from(body)));

        r.refresh(&source).await;

        assert_eq!(r.panel().current_content().as_deref(), Some(body));
    }

    #[tokio::test]
    async fn test_failed_request_is_swallowed_and_next_tick_applies() {
        let r = refresher();
        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>one</p>")));
        source.push(Err(EsiStatusError::request_failed("/ajax", "500")));
        source.push(Ok(Fragment::from("<p>two</p>")));

        r.refresh(&source).await;
        r.refresh(&source).await;
        assert_eq!(r.panel().current_content().as_deref(), Some("<p>one</p>"));

        // The schedule is untouched by the failure; the next tick applies.
        r.refresh(&source).await;
        assert_eq!(r.panel().current_content().as_deref(), Some("<p>two</p>"));
    }

    #[tokio::test]
    async fn test_reveal_triggers_at_most_once() {
        let r = refresher();
        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>a</p>")));
        source.push(Ok(Fragment::from("<p>b</p>")));

        r.refresh(&source).await;
        r.refresh(&source).await;

        assert_eq!(r.panel().reveal_count(), 1);
    }

    #[tokio::test]
    async fn test_already_revealed_panel_is_not_revealed_again() {
        let panel = MockPanel::new();
        panel.set_revealed(true);
        let r: StatusRefresher<_, ()> = StatusRefresher::new(panel);

        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>a</p>")));
        r.refresh(&source).await;

        assert_eq!(r.panel().reveal_count(), 0);
    }

    #[tokio::test]
    async fn test_decorations_never_accumulate() {
        let panel = MockPanel::with_anchors(3);
        let r: StatusRefresher<_, ()> = StatusRefresher::new(panel);
        let source = MockFragmentSource::new();

        for _ in 0..5 {
            source.push(Ok(Fragment::from("<p>tick</p>")));
            r.refresh(&source).await;
        }

        // One live instance per anchor, regardless of refresh count.
        assert_eq!(r.panel().live_decorations(), 3);
    }

    #[tokio::test]
    async fn test_teardown_happens_before_attach() {
        let r = refresher();
        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>a</p>")));

        r.refresh(&source).await;

        assert_eq!(
            r.panel().events(),
            vec!["set_content", "reveal", "dispose", "attach"]
        );
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let r = refresher();

        let first = r.begin();
        let second = r.begin();

        r.complete(second, Ok(Fragment::from("<p>fresh</p>")));
        r.complete(first, Ok(Fragment::from("<p>stale</p>")));

        assert_eq!(r.panel().current_content().as_deref(), Some("<p>fresh</p>"));
        assert_eq!(r.panel().content_history().len(), 1);
    }

    #[test]
    fn test_completion_after_deactivation_is_discarded() {
        let r: StatusRefresher<MockPanel, u8> = StatusRefresher::new(MockPanel::new());

        let ticket = r.begin();
        r.deactivate();
        r.complete(ticket, Ok(Fragment::from("<p>late</p>")));

        assert!(r.panel().current_content().is_none());
    }

    #[tokio::test]
    async fn test_single_schedule_across_toggles() {
        let counter = HandleCounter::new();
        let r = StatusRefresher::new(MockPanel::new());
        let source = MockFragmentSource::new();

        r.activate(&source, || counter.issue()).await;
        assert_eq!(counter.live(), 1);

        r.deactivate();
        assert_eq!(counter.live(), 0);

        r.activate(&source, || counter.issue()).await;
        assert_eq!(counter.live(), 1);

        // Re-activating without deactivating replaces the old handle.
        r.activate(&source, || counter.issue()).await;
        assert_eq!(counter.live(), 1);
        assert!(r.is_active());
    }

    #[test]
    fn test_deactivate_when_inactive_is_noop() {
        let r: StatusRefresher<MockPanel, u8> = StatusRefresher::new(MockPanel::new());

        r.deactivate();
        r.deactivate();

        assert!(!r.is_active());
    }

    #[tokio::test]
    async fn test_activate_performs_immediate_refresh() {
        let r: StatusRefresher<MockPanel, u8> = StatusRefresher::new(MockPanel::new());
        let source = MockFragmentSource::new();
        source.push(Ok(Fragment::from("<p>now</p>")));

        r.activate(&source, || 0u8).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(r.panel().current_content().as_deref(), Some("<p>now</p>"));
    }

    #[tokio::test]
    async fn test_reactivation_accepts_completions_again() {
        let r: StatusRefresher<MockPanel, u8> = StatusRefresher::new(MockPanel::new());
        let source = MockFragmentSource::new();

        r.deactivate();
        source.push(Ok(Fragment::from("<p>ignored</p>")));
        r.refresh(&source).await;
        assert!(r.panel().current_content().is_none());

        source.push(Ok(Fragment::from("<p>visible</p>")));
        r.activate(&source, || 0u8).await;
        assert_eq!(
            r.panel().current_content().as_deref(),
            Some("<p>visible</p>")
        );
    }
}
