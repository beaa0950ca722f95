//! The status refresher: fetch an HTML fragment on a cadence and apply it
//! to a panel, with stale-completion and deactivation guards.

mod panel;
mod refresher;

pub use panel::{FetchFuture, Fragment, FragmentSource, StatusPanel, TOOLTIP_MARKER};
pub use refresher::{RefreshTicket, StatusRefresher};
