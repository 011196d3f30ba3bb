use serde::Deserialize;

/// Upper bound for `floor.max_call_age_secs`: one day.
pub const MAX_CALL_AGE_SECS: u64 = 86_400;

/// Top-level server configuration, loaded from `floorwatch.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub floor: FloorConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            floor: FloorConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Shape of the synthesized floor served by `/api/manager/floor`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Fewest calls generated per request.
    pub min_calls: usize,
    /// Most calls generated per request. Capped by the roster size.
    pub max_calls: usize,
    /// Oldest call start, in seconds before the request.
    pub max_call_age_secs: u64,
    /// Probability (0.0 to 1.0) that the floor endpoint answers HTTP 500.
    pub failure_rate: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            min_calls: 3,
            max_calls: 7,
            max_call_age_secs: 900,
            failure_rate: 0.0,
        }
    }
}

/// Infrastructure limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per-request handler timeout.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Validate configuration, logging errors for unusable values.
    pub fn validate(&self) {
        if let Err(problem) = self.check() {
            tracing::error!("{problem}");
            std::process::exit(1);
        }
    }

    /// First configuration problem found, if any.
    pub fn check(&self) -> Result<(), String> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "listen_addr '{}' is not a valid socket address",
                self.listen_addr
            ));
        }
        if self.floor.min_calls > self.floor.max_calls {
            return Err(format!(
                "floor.min_calls ({}) must not exceed floor.max_calls ({})",
                self.floor.min_calls, self.floor.max_calls
            ));
        }
        if self.floor.max_call_age_secs > MAX_CALL_AGE_SECS {
            return Err(format!(
                "floor.max_call_age_secs ({}) must not exceed {MAX_CALL_AGE_SECS}",
                self.floor.max_call_age_secs
            ));
        }
        if !(0.0..=1.0).contains(&self.floor.failure_rate) {
            return Err("floor.failure_rate must be between 0.0 and 1.0".to_string());
        }
        if self.limits.request_timeout_secs == 0 {
            return Err("limits.request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Load config from `floorwatch.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("floorwatch.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from floorwatch.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse floorwatch.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No floorwatch.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("FLOORWATCH_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(val) = std::env::var("FLOORWATCH_FAILURE_RATE")
            && let Ok(rate) = val.parse::<f64>()
        {
            config.floor.failure_rate = rate;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.floor.min_calls, 3);
        assert_eq!(cfg.floor.max_calls, 7);
        assert_eq!(cfg.floor.failure_rate, 0.0);
        assert_eq!(cfg.limits.request_timeout_secs, 10);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ServerConfig::default().check().is_ok());
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
listen_addr = "127.0.0.1:9090"

[floor]
min_calls = 1
max_calls = 4
failure_rate = 0.25

[limits]
request_timeout_secs = 3
"#;
        let cfg: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9090");
        assert_eq!(cfg.floor.min_calls, 1);
        assert_eq!(cfg.floor.max_calls, 4);
        assert_eq!(cfg.floor.max_call_age_secs, 900);
        assert!((cfg.floor.failure_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(cfg.limits.request_timeout_secs, 3);
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: ServerConfig = toml::from_str(r#"listen_addr = "0.0.0.0:3000""#).unwrap();
        assert_eq!(cfg.floor.max_calls, 7);
        assert_eq!(cfg.limits.request_timeout_secs, 10);
    }

    #[test]
    fn check_rejects_invalid_addr() {
        let cfg = ServerConfig {
            listen_addr: "not-an-address".to_string(),
            ..ServerConfig::default()
        };
        assert!(cfg.check().unwrap_err().contains("listen_addr"));
    }

    #[test]
    fn check_rejects_inverted_call_range() {
        let cfg = ServerConfig {
            floor: FloorConfig {
                min_calls: 5,
                max_calls: 2,
                ..FloorConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(cfg.check().unwrap_err().contains("min_calls"));
    }

    #[test]
    fn check_rejects_out_of_range_failure_rate() {
        let cfg = ServerConfig {
            floor: FloorConfig {
                failure_rate: 1.5,
                ..FloorConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn check_rejects_huge_call_age() {
        let cfg = ServerConfig {
            floor: FloorConfig {
                max_call_age_secs: u64::MAX,
                ..FloorConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(cfg.check().unwrap_err().contains("max_call_age_secs"));

        let cfg = ServerConfig {
            floor: FloorConfig {
                max_call_age_secs: MAX_CALL_AGE_SECS,
                ..FloorConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(cfg.check().is_ok());
    }
}
