use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Health of a single ESI route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteHealth {
    Green,
    Yellow,
    Red,
}

impl RouteHealth {
    /// String form matching the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// Bootstrap contextual class used when rendering badges.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Green => "success",
            Self::Yellow => "warning",
            Self::Red => "danger",
        }
    }
}

impl std::fmt::Display for RouteHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One route entry from the ESI meta status document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsiRoute {
    /// HTTP method, lowercase on the wire.
    pub method: String,
    /// Route path template, e.g. `/characters/{character_id}/`.
    pub path: String,
    /// Current health.
    pub status: RouteHealth,
    /// OpenAPI tags, filled in by enrichment.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Wire form of `GET /meta/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub routes: Vec<EsiRoute>,
}

/// Wire form of `GET /meta/compatibility-dates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompatibilityDates {
    #[serde(default)]
    pub compatibility_dates: Vec<String>,
}

/// Pick the most recent date from a list of `YYYY-MM-DD` strings.
///
/// Unparseable entries are skipped rather than treated as errors.
pub fn latest_compatibility_date(dates: &[String]) -> Option<NaiveDate> {
    dates
        .iter()
        .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .max()
}

/// A published, tag-enriched view of ESI's status at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Compatibility date the status was fetched for.
    pub compatibility_date: NaiveDate,
    /// All known routes with their health and tags.
    pub routes: Vec<EsiRoute>,
    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn new(compatibility_date: NaiveDate, routes: Vec<EsiRoute>) -> Self {
        Self {
            compatibility_date,
            routes,
            fetched_at: Utc::now(),
        }
    }

    /// Total number of known endpoints.
    pub fn total_endpoints(&self) -> usize {
        self.routes.len()
    }

    /// Whether enrichment produced any tags at all.
    ///
    /// A snapshot without tags renders as one unnamed blob and must not
    /// replace a previously published snapshot.
    pub fn has_tags(&self) -> bool {
        self.routes.iter().any(|r| !r.tags.is_empty())
    }

    /// Group routes by their primary OpenAPI tag, sorted by tag name.
    ///
    /// Routes without tags are collected under "Other".
    pub fn tag_groups(&self) -> Vec<TagGroup<'_>> {
        let mut groups: BTreeMap<&str, Vec<&EsiRoute>> = BTreeMap::new();

        for route in &self.routes {
            let tag = route.tags.first().map(String::as_str).unwrap_or("Other");
            groups.entry(tag).or_default().push(route);
        }

        groups
            .into_iter()
            .map(|(tag, routes)| TagGroup { tag, routes })
            .collect()
    }
}

/// Routes sharing a primary OpenAPI tag.
#[derive(Debug, Clone)]
pub struct TagGroup<'a> {
    pub tag: &'a str,
    pub routes: Vec<&'a EsiRoute>,
}

impl TagGroup<'_> {
    /// Number of routes with the given health.
    pub fn count(&self, health: RouteHealth) -> usize {
        self.routes.iter().filter(|r| r.status == health).count()
    }

    /// Share of green routes, in percent.
    pub fn green_percent(&self) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }

        self.count(RouteHealth::Green) as f64 * 100.0 / self.routes.len() as f64
    }

    /// Worst-case oriented group health: green only when everything is
    /// green, red once less than half of the group is.
    pub fn overall(&self) -> RouteHealth {
        let pct = self.green_percent();

        if pct >= 100.0 {
            RouteHealth::Green
        } else if pct < 50.0 {
            RouteHealth::Red
        } else {
            RouteHealth::Yellow
        }
    }

    /// Routes that are not green, for the detail tooltip.
    pub fn troubled(&self) -> Vec<&EsiRoute> {
        self.routes
            .iter()
            .copied()
            .filter(|r| r.status != RouteHealth::Green)
            .collect()
    }
}
