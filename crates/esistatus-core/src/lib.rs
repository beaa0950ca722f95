pub mod config;
pub mod error;
pub mod meta;
pub mod refresh;
pub mod schedule;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::EsiStatusConfig;
pub use error::{EsiStatusError, Result};
pub use meta::{EsiRoute, MetaCache, RouteHealth, StatusSnapshot, TagGroup};
pub use refresh::{Fragment, FragmentSource, StatusPanel, StatusRefresher};
pub use schedule::UpdateSchedule;
