use std::time::Duration;

use serde::Deserialize;

/// Default file read by [`FloorPollerConfig::load`].
pub const CONFIG_FILE: &str = "floorwatch-monitor.toml";

/// Configuration for the floor poller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FloorPollerConfig {
    /// Base URL of the service hosting `/api/manager/floor` and `/api/manager/agents`.
    pub base_url: String,
    /// Auto-refresh period in milliseconds.
    pub poll_interval_ms: u64,
    /// Whether scheduled refreshes start on mount.
    pub auto_refresh: bool,
    /// Per-request timeout. Requests wait indefinitely when unset.
    pub request_timeout_ms: Option<u64>,
    /// Buffered slot events per subscriber before it starts lagging.
    pub event_capacity: usize,
}

impl Default for FloorPollerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            poll_interval_ms: 2500,
            auto_refresh: true,
            request_timeout_ms: None,
            event_capacity: 256,
        }
    }
}

impl FloorPollerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// First configuration problem found, if any.
    pub fn check(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("base_url '{}' must be an http(s) URL", self.base_url));
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be > 0".to_string());
        }
        if self.request_timeout_ms == Some(0) {
            return Err("request_timeout_ms must be > 0 when set".to_string());
        }
        if self.event_capacity == 0 {
            return Err("event_capacity must be > 0".to_string());
        }
        Ok(())
    }

    /// Validate configuration, exiting on unusable values.
    pub fn validate(&self) {
        if let Err(problem) = self.check() {
            tracing::error!("{problem}");
            std::process::exit(1);
        }
    }

    /// Load config from `floorwatch-monitor.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => match toml::from_str::<FloorPollerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {CONFIG_FILE}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {CONFIG_FILE}: {e}, using defaults");
                    FloorPollerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {CONFIG_FILE} found, using defaults");
                FloorPollerConfig::default()
            },
        };

        if let Ok(url) = std::env::var("FLOORWATCH_BASE_URL")
            && !url.is_empty()
        {
            config.base_url = url;
        }
        if let Ok(val) = std::env::var("FLOORWATCH_POLL_INTERVAL_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.poll_interval_ms = ms;
        }
        if let Ok(val) = std::env::var("FLOORWATCH_AUTO_REFRESH")
            && let Ok(enabled) = val.parse::<bool>()
        {
            config.auto_refresh = enabled;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FloorPollerConfig::default();
        assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.poll_interval(), Duration::from_millis(2500));
        assert!(cfg.auto_refresh);
        assert!(cfg.request_timeout().is_none());
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn parse_toml() {
        let toml_str = r#"
base_url = "https://floor.example.com"
poll_interval_ms = 1000
auto_refresh = false
request_timeout_ms = 800
"#;
        let cfg: FloorPollerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.base_url, "https://floor.example.com");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert!(!cfg.auto_refresh);
        assert_eq!(cfg.request_timeout(), Some(Duration::from_millis(800)));
        assert_eq!(cfg.event_capacity, 256);
    }

    #[test]
    fn check_rejects_zero_interval() {
        let cfg = FloorPollerConfig {
            poll_interval_ms: 0,
            ..FloorPollerConfig::default()
        };
        assert!(cfg.check().unwrap_err().contains("poll_interval_ms"));
    }

    #[test]
    fn check_rejects_non_http_url() {
        let cfg = FloorPollerConfig {
            base_url: "ftp://floor".to_string(),
            ..FloorPollerConfig::default()
        };
        assert!(cfg.check().is_err());
    }
}
