use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sitewatch_types::MatchRule;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How classified failures reach durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    /// One uniquely named JSON file per incident
    Snapshot,

    /// One growing JSON array file, rewritten on every append
    Ledger,
}

impl Default for PersistenceMode {
    fn default() -> Self {
        PersistenceMode::Snapshot
    }
}

/// Login-detection knobs. All durations are named configuration so tests can
/// shrink them; none of them are magic constants in the detector itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// URL fragment of the login API endpoint to watch for a 200
    #[serde(default = "default_login_fragment")]
    pub endpoint_fragment: String,

    /// URL-path fragment whose presence denotes successful post-login routing
    #[serde(default = "default_landing_marker")]
    pub landing_marker: String,

    /// Wall-clock budget for the whole login attempt
    #[serde(default = "default_login_timeout_secs")]
    pub timeout_secs: u64,

    /// Sleep between polls of the log and the location
    #[serde(default = "default_login_poll_ms")]
    pub poll_ms: u64,

    /// Secondary wait used to re-confirm the landing location
    #[serde(default = "default_confirm_secs")]
    pub confirm_secs: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            endpoint_fragment: default_login_fragment(),
            landing_marker: default_landing_marker(),
            timeout_secs: default_login_timeout_secs(),
            poll_ms: default_login_poll_ms(),
            confirm_secs: default_confirm_secs(),
        }
    }
}

/// Timing of the phases around and inside the monitor loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Bound on the navigation gate
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Steady-state monitoring tick. Coarser for low-frequency API traffic,
    /// finer for high-frequency streaming segments.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: default_navigation_timeout_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl TimingConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Full monitoring configuration. Read once at startup, never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// WebDriver endpoint the session is created against
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Base URL of the monitored application
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the login page, joined onto base_url
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Path of the monitored page, joined onto base_url
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Credential pair, opaque to the monitor
    #[serde(default = "default_account")]
    pub account: String,

    #[serde(default)]
    pub password: String,

    /// Directory for textual logs and persisted records
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub persistence: PersistenceMode,

    #[serde(default = "default_rules")]
    pub rules: Vec<MatchRule>,

    #[serde(default)]
    pub login: LoginConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            base_url: default_base_url(),
            login_path: default_login_path(),
            target_path: default_target_path(),
            account: default_account(),
            password: String::new(),
            log_dir: default_log_dir(),
            persistence: PersistenceMode::default(),
            rules: default_rules(),
            login: LoginConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::Config("at least one match rule is required".to_string()));
        }
        if self.rules.iter().any(|r| r.fragments.is_empty()) {
            return Err(Error::Config(
                "match rules must carry at least one URL fragment".to_string(),
            ));
        }
        Ok(())
    }

    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn target_url(&self) -> String {
        join_url(&self.base_url, &self.target_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_base_url() -> String {
    "http://localhost:4200".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_target_path() -> String {
    "/case-live/14".to_string()
}

fn default_account() -> String {
    "admin".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_rules() -> Vec<MatchRule> {
    vec![
        MatchRule::api("/api/"),
        MatchRule::api("/xhr/"),
        MatchRule::stream("/live/", ".ts"),
    ]
}

fn default_login_fragment() -> String {
    "/api/user/login".to_string()
}

fn default_landing_marker() -> String {
    "library-list".to_string()
}

fn default_login_timeout_secs() -> u64 {
    10
}

fn default_login_poll_ms() -> u64 {
    500
}

fn default_confirm_secs() -> u64 {
    5
}

fn default_navigation_timeout_secs() -> u64 {
    10
}

fn default_tick_interval_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = MonitorConfig::load_from(&temp_dir.path().join("absent.toml"))?;
        assert_eq!(config.base_url, "http://localhost:4200");
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.persistence, PersistenceMode::Snapshot);
        Ok(())
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("sitewatch.toml");

        let mut config = MonitorConfig::default();
        config.base_url = "http://monitor.example".to_string();
        config.persistence = PersistenceMode::Ledger;
        config.timing.tick_interval_ms = 250;
        config.save_to(&path)?;

        let loaded = MonitorConfig::load_from(&path)?;
        assert_eq!(loaded.base_url, "http://monitor.example");
        assert_eq!(loaded.persistence, PersistenceMode::Ledger);
        assert_eq!(loaded.timing.tick_interval(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn test_urls_join_without_doubled_slashes() {
        let mut config = MonitorConfig::default();
        config.base_url = "http://host:4200/".to_string();
        assert_eq!(config.login_url(), "http://host:4200/login");
        assert_eq!(config.target_url(), "http://host:4200/case-live/14");
    }

    #[test]
    fn test_empty_rule_set_is_rejected() {
        let mut config = MonitorConfig::default();
        config.rules.clear();
        assert!(config.validate().is_err());
    }
}
