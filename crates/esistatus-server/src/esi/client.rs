use chrono::NaiveDate;

use esistatus_core::config::EsiConfig;
use esistatus_core::meta::{
    latest_compatibility_date, CompatibilityDates, EsiRoute, MetaCache, StatusDocument,
};
use esistatus_core::Result;

use super::transport::MetaTransport;

/// High-level client for the three meta documents the updater needs.
///
/// The compatibility-date list and the OpenAPI spec barely change and are
/// read cache-first; the status document is always fetched fresh.
pub struct EsiClient<T> {
    transport: T,
    config: EsiConfig,
    cache: MetaCache,
}

impl<T: MetaTransport> EsiClient<T> {
    pub fn new(transport: T, config: EsiConfig) -> Self {
        Self {
            transport,
            config,
            cache: MetaCache::new(),
        }
    }

    /// Resolve the most recent published compatibility date.
    ///
    /// Returns `Ok(None)` when the listing contains no parseable dates.
    pub async fn latest_compatibility_date(&self) -> Result<Option<NaiveDate>> {
        let url = self.config.compatibility_dates_url();

        if let Some(cached) = self.cache.get(&url) {
            if let Some(date) = cached.as_str().and_then(parse_date) {
                tracing::debug!(%date, "Using cached compatibility date");
                return Ok(Some(date));
            }
        }

        let value = self.transport.get_json(&url).await?;
        let listing: CompatibilityDates = serde_json::from_value(value).unwrap_or_default();

        let Some(latest) = latest_compatibility_date(&listing.compatibility_dates) else {
            tracing::warn!("No valid compatibility dates in listing");
            return Ok(None);
        };

        self.cache
            .put(&url, serde_json::Value::String(latest.to_string()));

        Ok(Some(latest))
    }

    /// Fetch the per-route status document for a compatibility date.
    pub async fn status_routes(&self, compatibility_date: NaiveDate) -> Result<Vec<EsiRoute>> {
        let url = self.config.status_url(&compatibility_date.to_string());
        let value = self.transport.get_json(&url).await?;
        let document: StatusDocument = serde_json::from_value(value).unwrap_or_default();

        tracing::debug!(
            routes = document.routes.len(),
            %compatibility_date,
            "Fetched ESI status document"
        );

        Ok(document.routes)
    }

    /// Fetch the OpenAPI spec for a compatibility date, cache-first.
    pub async fn openapi_spec(&self, compatibility_date: NaiveDate) -> Result<serde_json::Value> {
        let url = self.config.openapi_url(&compatibility_date.to_string());

        if let Some(cached) = self.cache.get(&url) {
            tracing::debug!(%compatibility_date, "Using cached OpenAPI spec");
            return Ok(cached);
        }

        let value = self.transport.get_json(&url).await?;
        self.cache.put(&url, value.clone());

        Ok(value)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
