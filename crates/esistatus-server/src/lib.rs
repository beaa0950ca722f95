pub mod esi;
pub mod store;
pub mod updater;
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use esi::{EsiClient, MetaTransport, ReqwestTransport};
pub use store::StatusStore;
pub use updater::StatusUpdater;
pub use web::{create_router, AppState};
