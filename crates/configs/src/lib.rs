//! # configs
//!
//! Runtime settings of the gateway, layered lowest to highest:
//!
//! 1. built-in defaults;
//! 2. an optional `config/gateway.{toml,yaml,json}` file;
//! 3. `GATEWAY_*` environment variables, nested with `__`
//!    (`GATEWAY_SERVER__PORT=8080`);
//! 4. `API_BASE_URL`, the variable deployments already set.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::time::Duration;

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "config/gateway";
const ENV_PREFIX: &str = "GATEWAY";
const BASE_URL_VAR: &str = "API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default)]
    base_url: Option<String>,
    pub list_timeout_secs: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Placeholder login tokens when the upstream omits one or is down.
    /// Never enable outside development.
    pub dev_token_fallback: bool,
}

impl UpstreamSettings {
    /// The upstream base URL; `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Settings {
    /// Loads settings from every layer.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let builder = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("upstream.base_url", std::env::var(BASE_URL_VAR).ok())?;

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.list_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "upstream.list_timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.upstream.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                key: "upstream.request_timeout_secs",
                reason: "must be greater than zero when set".into(),
            });
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000_i64)?
        .set_default("upstream.list_timeout_secs", 10_i64)?
        .set_default("upstream.dev_token_fallback", false)?
        .set_default("log.filter", "info")?
        .set_default("log.format", "pretty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_builder(
            defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = from_toml("").unwrap();

        assert_eq!(settings.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(settings.upstream.base_url(), None);
        assert_eq!(settings.upstream.list_timeout(), Duration::from_secs(10));
        assert_eq!(settings.upstream.request_timeout(), None);
        assert!(!settings.upstream.dev_token_fallback);
        assert_eq!(settings.log.filter, "info");
        assert_eq!(settings.log.format, LogFormat::Pretty);
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            r#"
            [server]
            port = 8081

            [upstream]
            base_url = "http://api.interna:8080"
            request_timeout_secs = 30
            dev_token_fallback = true

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.upstream.base_url(), Some("http://api.interna:8080"));
        assert_eq!(settings.upstream.request_timeout(), Some(Duration::from_secs(30)));
        assert!(settings.upstream.dev_token_fallback);
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn blank_base_url_counts_as_missing() {
        let settings = Settings::from_builder(
            defaults()
                .unwrap()
                .set_override_option("upstream.base_url", Some("   "))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(settings.upstream.base_url(), None);
    }

    #[test]
    fn zero_list_timeout_is_rejected() {
        let err = from_toml("[upstream]\nlist_timeout_secs = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "upstream.list_timeout_secs", .. }
        ));
    }

    #[test]
    fn unknown_log_format_is_a_load_error() {
        assert!(matches!(
            from_toml("[log]\nformat = \"xml\""),
            Err(ConfigError::Load(_))
        ));
    }
}
