use serde::Deserialize;

/// Settings object injected by the index page as `window.esistatusSettings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    /// Fragment endpoints for the index page.
    pub url: UrlSettings,

    /// Dashboard widget endpoint.
    pub dashboard_widget: DashboardWidgetSettings,

    /// Refresh interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,

    /// Only poll while the browser tab has focus.
    #[serde(default = "default_focus_gated")]
    pub focus_gated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlSettings {
    /// Endpoint of the index status fragment.
    pub esistatus: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetSettings {
    /// Endpoint of the dashboard widget fragment.
    pub ajax_url: String,
}

impl WidgetSettings {
    /// Refresh interval in milliseconds, for timer APIs.
    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_secs.saturating_mul(1000)
    }
}

fn default_poll_interval() -> u32 {
    30
}

fn default_focus_gated() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialization() {
        let json = r#"{
            "url": {"esistatus": "/-/ajax/esi-status"},
            "dashboardWidget": {"ajaxUrl": "/-/ajax/dashboard-widget"},
            "pollIntervalSecs": 60,
            "focusGated": false
        }"#;

        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.url.esistatus, "/-/ajax/esi-status");
        assert_eq!(settings.dashboard_widget.ajax_url, "/-/ajax/dashboard-widget");
        assert_eq!(settings.poll_interval_ms(), 60_000);
        assert!(!settings.focus_gated);
    }

    #[test]
    fn test_settings_defaults() {
        let json = r#"{
            "url": {"esistatus": "/a"},
            "dashboardWidget": {"ajaxUrl": "/b"}
        }"#;

        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.poll_interval_secs, 30);
        assert!(settings.focus_gated);
    }
}
