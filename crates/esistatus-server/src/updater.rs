use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use esistatus_core::meta::enrich_routes_with_tags;
use esistatus_core::{Result, StatusSnapshot, UpdateSchedule};

use crate::esi::{EsiClient, MetaTransport};
use crate::store::StatusStore;

/// Background runner that keeps the status store fresh.
///
/// One update runs at startup so the page has data soon after boot; after
/// that the cron schedule drives the cadence. A failed update is logged
/// and leaves the store unchanged until the next run.
pub struct StatusUpdater<T> {
    client: EsiClient<T>,
    store: StatusStore,
    schedule: UpdateSchedule,
    timezone: String,
    is_running: Arc<RwLock<bool>>,
}

impl<T: MetaTransport> StatusUpdater<T> {
    pub fn new(
        client: EsiClient<T>,
        store: StatusStore,
        schedule: UpdateSchedule,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            schedule,
            timezone: timezone.into(),
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the updater loop.
    pub async fn run(&self) -> Result<()> {
        {
            let mut running = self.is_running.write().await;
            if *running {
                return Ok(());
            }
            *running = true;
        }

        tracing::info!(
            schedule = self.schedule.expression(),
            timezone = %self.timezone,
            "Status updater starting"
        );

        self.tick_logged().await;

        loop {
            let Some(next) = self.schedule.next_after_in_tz(Utc::now(), &self.timezone) else {
                tracing::error!(timezone = %self.timezone, "Cannot compute next update run");
                break;
            };

            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;

            if !*self.is_running.read().await {
                break;
            }

            self.tick_logged().await;
        }

        tracing::info!("Status updater stopped");
        Ok(())
    }

    /// Stop the updater loop after the current wait elapses.
    pub async fn stop(&self) {
        let mut running = self.is_running.write().await;
        *running = false;
    }

    async fn tick_logged(&self) {
        if let Err(e) = self.tick().await {
            tracing::error!(error = %e, "Status update failed");
        }
    }

    /// Execute one update: resolve date, fetch status and spec, enrich,
    /// publish.
    async fn tick(&self) -> Result<()> {
        let run_id = Uuid::new_v4();

        tracing::debug!(%run_id, "Starting ESI status update");

        let Some(compatibility_date) = self.client.latest_compatibility_date().await? else {
            return Ok(());
        };

        let routes = self.client.status_routes(compatibility_date).await?;
        let spec = self.client.openapi_spec(compatibility_date).await?;

        let snapshot = StatusSnapshot::new(
            compatibility_date,
            enrich_routes_with_tags(routes, &spec),
        );

        if !snapshot.has_tags() {
            tracing::debug!(%run_id, "Enriched status carries no tags; keeping previous snapshot");
            return Ok(());
        }

        tracing::info!(
            %run_id,
            compatibility_date = %snapshot.compatibility_date,
            endpoints = snapshot.total_endpoints(),
            "Publishing ESI status snapshot"
        );

        self.store.publish(snapshot).await;

        Ok(())
    }
}
