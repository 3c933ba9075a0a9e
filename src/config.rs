use crate::models::WeightConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration failures are fatal at startup; the engine refuses to run
/// with invalid weights rather than silently normalizing them
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("scoring weight {dimension} must be non-negative, got {value}")]
    NegativeWeight { dimension: &'static str, value: f64 },

    #[error("scoring weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    #[error("engagement saturation must be at least 1, got {value}")]
    EngagementSaturation { value: f64 },
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub index: IndexSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub mentor_profiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    pub refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u8>,
    pub max_limit: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsSettings,
    #[serde(default = "default_engagement_saturation")]
    pub engagement_saturation: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsSettings::default(),
            engagement_saturation: default_engagement_saturation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsSettings {
    #[serde(default = "default_expertise_weight")]
    pub expertise: f64,
    #[serde(default = "default_stage_weight")]
    pub stage: f64,
    #[serde(default = "default_engagement_weight")]
    pub engagement: f64,
    #[serde(default = "default_style_weight")]
    pub style: f64,
    #[serde(default = "default_story_weight")]
    pub story: f64,
}

impl WeightsSettings {
    pub fn weight_config(&self) -> WeightConfig {
        WeightConfig {
            expertise: self.expertise,
            stage: self.stage,
            engagement: self.engagement,
            style: self.style,
            story: self.story,
        }
    }
}

impl Default for WeightsSettings {
    fn default() -> Self {
        Self {
            expertise: default_expertise_weight(),
            stage: default_stage_weight(),
            engagement: default_engagement_weight(),
            style: default_style_weight(),
            story: default_story_weight(),
        }
    }
}

fn default_expertise_weight() -> f64 {
    0.30
}
fn default_stage_weight() -> f64 {
    0.20
}
fn default_engagement_weight() -> f64 {
    0.15
}
fn default_style_weight() -> f64 {
    0.10
}
fn default_story_weight() -> f64 {
    0.25
}
fn default_engagement_saturation() -> f64 {
    25.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with SONDER_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SONDER_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SONDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_appwrite_env(settings)?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SONDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Override Appwrite settings from the plain variable names the Appwrite
/// CLI and dashboard export, so deploys don't need the SONDER__ prefix
fn apply_appwrite_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
    ] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsSettings::default();
        assert_eq!(weights.expertise, 0.30);
        assert_eq!(weights.story, 0.25);
        assert_eq!(weights.stage, 0.20);
        assert_eq!(weights.engagement, 0.15);
        assert_eq!(weights.style, 0.10);
        assert!(weights.weight_config().is_normalized());
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_shipped_config_file_is_valid() {
        let raw = include_str!("../config/default.toml");
        let parsed: toml::Value = toml::from_str(raw).unwrap();

        let weights = &parsed["scoring"]["weights"];
        let sum: f64 = ["expertise", "stage", "engagement", "style", "story"]
            .into_iter()
            .map(|dim| weights[dim].as_float().unwrap_or(0.0))
            .sum();
        assert!((sum - 1.0).abs() < 1e-6, "shipped weights sum to {}", sum);
    }
}
