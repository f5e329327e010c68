// src/core/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use log::LevelFilter;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid password length bounds: min {min}, max {max}")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("Invalid service URL '{0}'")]
    InvalidServiceUrl(String),

    #[error("Debounce window must be greater than zero")]
    ZeroDebounce,
}

// Configuration for the interactive client
#[derive(Debug, Clone)]
pub struct Config {
    // Service
    pub service_url: String,
    pub request_timeout: Duration,

    // Interaction timing
    pub analyze_debounce: Duration,
    pub notice_duration: Duration,

    // Password Generation
    pub min_password_length: usize,
    pub max_password_length: usize,
    pub default_password_length: usize,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Service
            service_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(10),

            // Interaction timing
            analyze_debounce: Duration::from_millis(300),
            notice_duration: Duration::from_millis(1500),

            // Password Generation
            min_password_length: 8,
            max_password_length: 64,
            default_password_length: 12,

            // Logging
            log_level: LevelFilter::Info,
            log_file: PathBuf::from("./logs/passcheck.log"),
        }
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());

        if env::var("LOG_FILE").is_err() {
            if let Some(data_dir) = crate::utils::get_app_data_dir() {
                config.log_file = data_dir.join("passcheck.log");
            }
        }

        config
    }

    /// Build a configuration from any key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // Service
        if let Some(url) = lookup("PASSCHECK_SERVICE_URL") {
            config.service_url = url;
        }

        if let Some(val) = lookup("REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(_) => log::warn!("Ignoring invalid REQUEST_TIMEOUT_SECS '{}'", val),
            }
        }

        // Interaction timing
        if let Some(val) = lookup("ANALYZE_DEBOUNCE_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.analyze_debounce = Duration::from_millis(ms),
                Err(_) => log::warn!("Ignoring invalid ANALYZE_DEBOUNCE_MS '{}'", val),
            }
        }

        if let Some(val) = lookup("NOTICE_DURATION_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.notice_duration = Duration::from_millis(ms),
                Err(_) => log::warn!("Ignoring invalid NOTICE_DURATION_MS '{}'", val),
            }
        }

        // Password Generation
        if let Some(val) = lookup("MIN_PASSWORD_LENGTH") {
            match val.parse::<usize>() {
                Ok(length) => config.min_password_length = length,
                Err(_) => log::warn!("Ignoring invalid MIN_PASSWORD_LENGTH '{}'", val),
            }
        }

        if let Some(val) = lookup("MAX_PASSWORD_LENGTH") {
            match val.parse::<usize>() {
                Ok(length) => config.max_password_length = length,
                Err(_) => log::warn!("Ignoring invalid MAX_PASSWORD_LENGTH '{}'", val),
            }
        }

        if let Some(val) = lookup("DEFAULT_PASSWORD_LENGTH") {
            match val.parse::<usize>() {
                Ok(length) => config.default_password_length = length,
                Err(_) => log::warn!("Ignoring invalid DEFAULT_PASSWORD_LENGTH '{}'", val),
            }
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            match parse_level(&level) {
                Some(filter) => config.log_level = filter,
                None => log::warn!("Unknown log level '{}', using {}", level, config.log_level),
            }
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        config
    }

    /// Apply command-line overrides, which take precedence over the environment.
    pub fn apply_args(&mut self, args: &crate::cli::Args) {
        if let Some(url) = &args.service_url {
            self.service_url = url.clone();
        }
        if let Some(ms) = args.debounce_ms {
            self.analyze_debounce = Duration::from_millis(ms);
        }
        if let Some(level) = args.log_level.as_deref() {
            match parse_level(level) {
                Some(filter) => self.log_level = filter,
                None => log::warn!("Unknown log level '{}', using {}", level, self.log_level),
            }
        }
        if let Some(file) = &args.log_file {
            self.log_file = file.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_password_length == 0 || self.min_password_length > self.max_password_length {
            return Err(ConfigError::InvalidLengthBounds {
                min: self.min_password_length,
                max: self.max_password_length,
            });
        }

        if reqwest::Url::parse(&self.service_url).is_err() {
            return Err(ConfigError::InvalidServiceUrl(self.service_url.clone()));
        }

        if self.analyze_debounce.is_zero() {
            return Err(ConfigError::ZeroDebounce);
        }

        Ok(())
    }

    /// Default length pulled into the configured bounds.
    pub fn initial_length(&self) -> usize {
        self.default_password_length
            .clamp(self.min_password_length, self.max_password_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_service_contract() {
        let config = config_from(&[]);
        assert_eq!(config.analyze_debounce, Duration::from_millis(300));
        assert_eq!(config.min_password_length, 8);
        assert_eq!(config.max_password_length, 64);
        assert_eq!(config.default_password_length, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            ("PASSCHECK_SERVICE_URL", "http://scores.internal:8080/api"),
            ("ANALYZE_DEBOUNCE_MS", "150"),
            ("DEFAULT_PASSWORD_LENGTH", "20"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE", "/tmp/pc.log"),
        ]);
        assert_eq!(config.service_url, "http://scores.internal:8080/api");
        assert_eq!(config.analyze_debounce, Duration::from_millis(150));
        assert_eq!(config.default_password_length, 20);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, PathBuf::from("/tmp/pc.log"));
    }

    #[test]
    fn unparseable_values_are_ignored() {
        let config = config_from(&[("ANALYZE_DEBOUNCE_MS", "soon"), ("LOG_LEVEL", "loud")]);
        assert_eq!(config.analyze_debounce, Duration::from_millis(300));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn unparseable_lengths_keep_defaults() {
        let config = config_from(&[
            ("MIN_PASSWORD_LENGTH", "eight"),
            ("MAX_PASSWORD_LENGTH", "-1"),
            ("DEFAULT_PASSWORD_LENGTH", "12.5"),
        ]);
        assert_eq!(config.min_password_length, 8);
        assert_eq!(config.max_password_length, 64);
        assert_eq!(config.default_password_length, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn command_line_overrides_environment() {
        let args = <crate::cli::Args as clap::Parser>::try_parse_from([
            "passcheck",
            "--service-url",
            "http://127.0.0.1:9000",
            "--log-level",
            "WARN",
        ])
        .unwrap();
        let mut config = config_from(&[("PASSCHECK_SERVICE_URL", "http://127.0.0.1:5000"), ("LOG_LEVEL", "debug")]);
        config.apply_args(&args);
        assert_eq!(config.service_url, "http://127.0.0.1:9000");
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        let config = config_from(&[("MIN_PASSWORD_LENGTH", "40"), ("MAX_PASSWORD_LENGTH", "16")]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLengthBounds { min: 40, max: 16 })));
    }

    #[test]
    fn bad_service_url_is_rejected() {
        let config = config_from(&[("PASSCHECK_SERVICE_URL", "localhost 5000")]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidServiceUrl(_))));
    }

    #[test]
    fn initial_length_is_clamped() {
        let config = config_from(&[("DEFAULT_PASSWORD_LENGTH", "200")]);
        assert_eq!(config.initial_length(), 64);
    }
}
