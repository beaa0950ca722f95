use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EsiStatusError, Result};

/// Project repository, used in the default User-Agent.
pub const GITHUB_URL: &str = "https://github.com/example/esistatus";

/// Root configuration for the ESI status service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EsiStatusConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// ESI meta API configuration.
    #[serde(default)]
    pub esi: EsiConfig,

    /// Background updater configuration.
    #[serde(default)]
    pub updater: UpdaterConfig,

    /// Browser widget configuration.
    #[serde(default)]
    pub widget: WidgetConfig,
}

impl EsiStatusConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EsiStatusError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| EsiStatusError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Project version.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            version: default_version(),
        }
    }
}

fn default_project_name() -> String {
    "esistatus".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port.
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Enable CORS.
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,

    /// Directory with the built widget bundle (wasm-bindgen output),
    /// served under `/assets/widget/` when set.
    #[serde(default)]
    pub widget_dist_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            cors_enabled: default_cors_enabled(),
            widget_dist_dir: None,
        }
    }
}

fn default_http_port() -> u16 {
    8042
}

fn default_cors_enabled() -> bool {
    true
}

/// ESI meta API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsiConfig {
    /// Base URL of the ESI meta API.
    #[serde(default = "default_esi_base_url")]
    pub base_url: String,

    /// User-Agent sent with every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_esi_timeout")]
    pub timeout_secs: u64,
}

impl EsiConfig {
    /// URL of the compatibility-dates listing.
    pub fn compatibility_dates_url(&self) -> String {
        format!("{}/meta/compatibility-dates", self.base_url)
    }

    /// URL of the per-route status document for a compatibility date.
    pub fn status_url(&self, compatibility_date: &str) -> String {
        format!(
            "{}/meta/status?compatibility_date={}",
            self.base_url, compatibility_date
        )
    }

    /// URL of the OpenAPI spec for a compatibility date.
    pub fn openapi_url(&self, compatibility_date: &str) -> String {
        format!(
            "{}/meta/openapi.json?compatibility_date={}",
            self.base_url, compatibility_date
        )
    }
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: default_esi_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_esi_timeout(),
        }
    }
}

fn default_esi_base_url() -> String {
    "https://esi.evetech.net".to_string()
}

fn default_user_agent() -> String {
    format!("esistatus v{} {}", env!("CARGO_PKG_VERSION"), GITHUB_URL)
}

fn default_esi_timeout() -> u64 {
    10
}

/// Background updater configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Cron expression for the update cadence.
    #[serde(default = "default_update_schedule")]
    pub schedule: String,

    /// Timezone for the schedule.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            schedule: default_update_schedule(),
            timezone: default_timezone(),
        }
    }
}

fn default_update_schedule() -> String {
    "0 */30 * * * *".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Browser widget configuration, embedded into the index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Refresh interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,

    /// Only poll while the browser tab has focus.
    #[serde(default = "default_focus_gated")]
    pub focus_gated: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            focus_gated: default_focus_gated(),
        }
    }
}

fn default_poll_interval() -> u32 {
    30
}

fn default_focus_gated() -> bool {
    true
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EsiStatusConfig::default();
        assert_eq!(config.server.port, 8042);
        assert_eq!(config.esi.base_url, "https://esi.evetech.net");
        assert_eq!(config.widget.poll_interval_secs, 30);
        assert!(config.widget.focus_gated);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
            [server]
            port = 3000
        "#;

        let config = EsiStatusConfig::parse_toml(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.updater.schedule, "0 */30 * * * *");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [project]
            name = "esi-status"

            [server]
            port = 8080
            cors_enabled = false

            [esi]
            base_url = "https://esi.example.test"
            timeout_secs = 5

            [updater]
            schedule = "0 0 * * * *"
            timezone = "Europe/Berlin"

            [widget]
            poll_interval_secs = 60
            focus_gated = false
        "#;

        let config = EsiStatusConfig::parse_toml(toml).unwrap();
        assert_eq!(config.project.name, "esi-status");
        assert!(!config.server.cors_enabled);
        assert_eq!(config.esi.timeout_secs, 5);
        assert_eq!(config.updater.timezone, "Europe/Berlin");
        assert_eq!(config.widget.poll_interval_secs, 60);
        assert!(!config.widget.focus_gated);
    }

    #[test]
    fn test_meta_urls() {
        let esi = EsiConfig::default();
        assert_eq!(
            esi.compatibility_dates_url(),
            "https://esi.evetech.net/meta/compatibility-dates"
        );
        assert_eq!(
            esi.status_url("2025-11-06"),
            "https://esi.evetech.net/meta/status?compatibility_date=2025-11-06"
        );
        assert_eq!(
            esi.openapi_url("2025-11-06"),
            "https://esi.evetech.net/meta/openapi.json?compatibility_date=2025-11-06"
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ESISTATUS_TEST_BASE_URL", "https://mirror.example.test");

        let toml = r#"
            [esi]
            base_url = "${ESISTATUS_TEST_BASE_URL}"
        "#;

        let config = EsiStatusConfig::parse_toml(toml).unwrap();
        assert_eq!(config.esi.base_url, "https://mirror.example.test");

        std::env::remove_var("ESISTATUS_TEST_BASE_URL");
    }
}
