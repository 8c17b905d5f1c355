use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::models::{MatchLimits, ScoringWeights};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub ghl: GhlSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Echo storage error text to clients in `details`
    #[serde(default)]
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout_secs() -> u64 { 5 }
fn default_idle_timeout_secs() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Zero disables the match cache
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 { 60 }
fn default_cache_max_entries() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_single_limit")]
    pub book_limit: usize,
    #[serde(default = "default_single_limit")]
    pub podcast_limit: usize,
    #[serde(default = "default_single_limit")]
    pub event_limit: usize,
    #[serde(default = "default_partner_limit")]
    pub partner_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            book_limit: default_single_limit(),
            podcast_limit: default_single_limit(),
            event_limit: default_single_limit(),
            partner_limit: default_partner_limit(),
        }
    }
}

fn default_single_limit() -> usize { 1 }
fn default_partner_limit() -> usize { 2 }

impl MatchingSettings {
    pub fn limits(&self) -> MatchLimits {
        MatchLimits {
            books: self.book_limit,
            podcasts: self.podcast_limit,
            events: self.event_limit,
            partners: self.partner_limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_primary_weight")]
    pub primary: f64,
    #[serde(default = "default_secondary_weight")]
    pub secondary: f64,
    #[serde(default = "default_confidence_divisor")]
    pub confidence_divisor: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_weight(),
            secondary: default_secondary_weight(),
            confidence_divisor: default_confidence_divisor(),
        }
    }
}

fn default_primary_weight() -> f64 { 3.0 }
fn default_secondary_weight() -> f64 { 1.0 }
fn default_confidence_divisor() -> f64 { 20.0 }

impl WeightsConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            primary: self.primary,
            secondary: self.secondary,
            confidence_divisor: self.confidence_divisor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhlSettings {
    /// Inbound webhook for contact pushes; trigger-sync is unavailable without it
    pub webhook_url: Option<String>,
    #[serde(default = "default_ghl_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GhlSettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_ghl_timeout_secs(),
        }
    }
}

fn default_ghl_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Formats understood by the tracing subscriber setup
pub const LOG_FORMATS: [&str; 4] = ["json", "pretty", "compact", "full"];

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TPE__)
    /// 5. DATABASE_URL / GHL_WEBHOOK_URL
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TPE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = apply_env_overrides(settings)?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = apply_env_overrides(settings)?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject weights and limits the matcher cannot honour
    pub fn validate(&self) -> Result<(), SettingsError> {
        let weights = &self.scoring.weights;

        if !(weights.secondary > 0.0) {
            return Err(SettingsError::Invalid(
                "scoring.weights.secondary must be positive".to_string(),
            ));
        }
        if !(weights.primary > weights.secondary) {
            return Err(SettingsError::Invalid(format!(
                "scoring.weights.primary ({}) must be greater than secondary ({})",
                weights.primary, weights.secondary
            )));
        }
        if !(weights.confidence_divisor > 0.0) {
            return Err(SettingsError::Invalid(
                "scoring.weights.confidence_divisor must be positive".to_string(),
            ));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }

        let limits = self.matching.limits();
        if limits.books == 0 || limits.podcasts == 0 || limits.events == 0 {
            return Err(SettingsError::Invalid(
                "matching book/podcast/event limits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Let the conventional unprefixed variables override file values
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    apply_overrides(
        settings,
        std::env::var("DATABASE_URL").ok(),
        std::env::var("GHL_WEBHOOK_URL").ok(),
    )
}

fn apply_overrides(
    settings: Config,
    database_url: Option<String>,
    webhook_url: Option<String>,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Some(database_url) = database_url {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Some(webhook_url) = webhook_url {
        builder = builder.set_override("ghl.webhook_url", webhook_url)?;
    }

    builder.build()
}
