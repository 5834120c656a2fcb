use config::Config;
use error_stack::{report, ResultExt};
use serde::Deserialize;
use thiserror::Error;

use super::sheets_config::SpreadsheetConfig;
use super::web_config::{SecretKey, TelemetryConfig, WebConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SHEET_NAME: &str = "MoodTracker";

/// Process-wide settings, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub web: WebConfig,
    pub sheets: SpreadsheetConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read configuration sources")]
    Unreadable,
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Flat view of the sources. Environment keys arrive lower-cased.
#[derive(Deserialize, Debug, Default)]
struct RawSettings {
    secret_key: Option<String>,
    google_sheets_id: Option<String>,
    google_application_credentials: Option<String>,
    debug: Option<String>,
    host: Option<String>,
    port: Option<String>,
    mood_sheet_name: Option<String>,
    otel_exporter_otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the optional file named by `CONFIG_PATH`, then the environment,
    /// which wins on conflicts.
    pub fn load() -> error_stack::Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            builder = builder.add_source(config::File::with_name(&config_path));
        }

        let config = builder
            .add_source(config::Environment::default())
            .build()
            .change_context(ConfigError::Unreadable)?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> error_stack::Result<Self, ConfigError> {
        let raw: RawSettings = config
            .try_deserialize()
            .change_context(ConfigError::Unreadable)?;

        let secret_key = required("SECRET_KEY", raw.secret_key)?;
        let spreadsheet_id = required("GOOGLE_SHEETS_ID", raw.google_sheets_id)?;
        let priv_key = required(
            "GOOGLE_APPLICATION_CREDENTIALS",
            raw.google_application_credentials,
        )?;

        let port = match optional(raw.port) {
            Some(port) => port.parse::<u16>().map_err(|e| {
                report!(ConfigError::Invalid {
                    name: "PORT",
                    reason: e.to_string(),
                })
            })?,
            None => DEFAULT_PORT,
        };

        let debug = match optional(raw.debug) {
            Some(flag) => parse_flag("DEBUG", &flag)?,
            None => false,
        };

        Ok(AppConfig {
            web: WebConfig {
                secret_key: SecretKey::new(secret_key),
                host: optional(raw.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            sheets: SpreadsheetConfig {
                priv_key: priv_key.into(),
                spreadsheet_id: spreadsheet_id.into(),
                sheet_name: optional(raw.mood_sheet_name)
                    .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string())
                    .into(),
            },
            telemetry: TelemetryConfig {
                debug,
                otlp_endpoint: optional(raw.otel_exporter_otlp_endpoint),
            },
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &'static str, value: Option<String>) -> error_stack::Result<String, ConfigError> {
    optional(value).ok_or_else(|| {
        report!(ConfigError::Missing(name))
            .attach_printable(format!("Set the {name} environment variable"))
    })
}

fn parse_flag(name: &'static str, value: &str) -> error_stack::Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(report!(ConfigError::Invalid {
            name,
            reason: format!("'{other}' is not a boolean"),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("secret_key", "s3cret"),
        ("google_sheets_id", "1AbCdEf"),
        ("google_application_credentials", "/etc/mood/key.json"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_config(config_with(&REQUIRED)).unwrap();
        assert_eq!(config.web.secret_key.expose(), "s3cret");
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.web.port, DEFAULT_PORT);
        assert_eq!(config.web.listen_addr(), "0.0.0.0:5000");
        assert_eq!(&*config.sheets.spreadsheet_id, "1AbCdEf");
        assert_eq!(&*config.sheets.priv_key, "/etc/mood/key.json");
        assert_eq!(&*config.sheets.sheet_name, DEFAULT_SHEET_NAME);
        assert!(!config.telemetry.debug);
        assert_eq!(config.telemetry.otlp_endpoint, None);
    }

    #[test]
    fn test_each_required_setting_is_reported() {
        let expected = [
            "SECRET_KEY",
            "GOOGLE_SHEETS_ID",
            "GOOGLE_APPLICATION_CREDENTIALS",
        ];
        for (skip, name) in expected.iter().enumerate() {
            let pairs: Vec<(&str, &str)> = REQUIRED
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, pair)| *pair)
                .collect();
            let report = AppConfig::from_config(config_with(&pairs)).unwrap_err();
            assert_eq!(report.current_context(), &ConfigError::Missing(*name));
        }
    }

    #[test]
    fn test_blank_required_setting_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("secret_key", "   ");
        let report = AppConfig::from_config(config_with(&pairs)).unwrap_err();
        assert_eq!(report.current_context(), &ConfigError::Missing("SECRET_KEY"));
    }

    #[test]
    fn test_optional_settings() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("debug", "True"),
            ("port", "8080"),
            ("host", "127.0.0.1"),
            ("mood_sheet_name", "Journal"),
            ("otel_exporter_otlp_endpoint", "http://localhost:4317"),
        ]);
        let config = AppConfig::from_config(config_with(&pairs)).unwrap();
        assert!(config.telemetry.debug);
        assert_eq!(config.web.listen_addr(), "127.0.0.1:8080");
        assert_eq!(&*config.sheets.sheet_name, "Journal");
        assert_eq!(
            config.telemetry.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("port", "99999"));
        let report = AppConfig::from_config(config_with(&pairs)).unwrap_err();
        assert!(matches!(
            report.current_context(),
            ConfigError::Invalid { name: "PORT", .. }
        ));
    }

    #[test]
    fn test_debug_flag_values() {
        for value in ["1", "yes", "ON"] {
            assert_eq!(parse_flag("DEBUG", value).unwrap(), true);
        }
        for value in ["0", "false", "Off"] {
            assert_eq!(parse_flag("DEBUG", value).unwrap(), false);
        }
        assert!(parse_flag("DEBUG", "maybe").is_err());
    }

    #[test]
    fn test_secret_key_is_redacted() {
        let config = AppConfig::from_config(config_with(&REQUIRED)).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("s3cret"));
    }
}
