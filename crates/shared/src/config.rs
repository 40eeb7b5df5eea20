//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Property configuration.
    pub property: PropertyConfig,
    /// Scheduled job configuration.
    pub schedule: ScheduleConfig,
}

/// Property configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyConfig {
    /// Display name of the hotel property.
    #[serde(default = "default_property_name")]
    pub name: String,
    /// IANA timezone the property operates in (business-day boundaries).
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_property_name() -> String {
    "Folio Hotel".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl PropertyConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone string is not a valid IANA name.
    pub fn tz(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| format!("Unknown timezone: {}", self.timezone))
    }
}

/// Scheduled job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Local hour of day (0-23) after which the end-of-day snapshot runs.
    #[serde(default = "default_snapshot_hour")]
    pub snapshot_hour: u32,
    /// Interval in seconds between safety checks for a missed snapshot.
    #[serde(default = "default_safety_check_secs")]
    pub safety_check_secs: u64,
}

fn default_snapshot_hour() -> u32 {
    23
}

fn default_safety_check_secs() -> u64 {
    3600 // hourly
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
