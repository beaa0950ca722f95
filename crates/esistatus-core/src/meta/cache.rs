use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// URL-keyed cache for slow-moving ESI meta documents.
///
/// CCP publishes new compatibility dates at 11:30 UTC, so entries expire at
/// the next 11:30 horizon rather than after a fixed TTL.
#[derive(Debug, Default)]
pub struct MetaCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached value for a URL; expired entries read as misses.
    pub fn get(&self, url: &str) -> Option<serde_json::Value> {
        self.get_at(url, Utc::now())
    }

    /// Cache a value for a URL until the next publication horizon.
    pub fn put(&self, url: &str, value: serde_json::Value) {
        self.put_at(url, value, Utc::now());
    }

    fn get_at(&self, url: &str, now: DateTime<Utc>) -> Option<serde_json::Value> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(url)?;

        if entry.expires_at <= now {
            return None;
        }

        Some(entry.value.clone())
    }

    fn put_at(&self, url: &str, value: serde_json::Value, now: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            url.to_string(),
            CacheEntry {
                value,
                expires_at: expiry_after(now),
            },
        );
    }
}

/// The 11:30 UTC horizon following `now`.
///
/// Past noon the horizon is the next day; within the 11:00 hour it is the
/// same day's 11:30, which keeps entries stored just before publication
/// short-lived.
fn expiry_after(now: DateTime<Utc>) -> DateTime<Utc> {
    use chrono::Timelike;

    let mut date = now.date_naive();

    if now.hour() > 11 {
        date += Duration::days(1);
    }

    date.and_hms_opt(11, 30, 0).unwrap().and_utc()
}
