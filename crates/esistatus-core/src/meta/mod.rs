//! ESI meta API domain: route status, OpenAPI tag enrichment, meta cache.

mod cache;
mod enrich;
mod status;

pub use cache::MetaCache;
pub use enrich::enrich_routes_with_tags;
pub use status::{
    latest_compatibility_date, CompatibilityDates, EsiRoute, RouteHealth, StatusDocument,
    StatusSnapshot, TagGroup,
};
