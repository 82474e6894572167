//! Loading application configuration (scoring policy, points values, and an
//! optional assessment/content bank) from TOML.
//!
//! See `AppConfig` for the expected schema. Everything is optional; missing
//! sections fall back to defaults so the app runs with no config at all.

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::Dimension;
use crate::scoring::DEFAULT_CLOSENESS_THRESHOLD;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub scoring: ScoringCfg,
  #[serde(default)]
  pub points: PointsCfg,
  #[serde(default)]
  pub assessments: Vec<AssessmentCfg>,
  #[serde(default)]
  pub content: Vec<ContentCfg>,
}

/// Scoring policy knobs. The closeness threshold is deliberately a config
/// value: deployments have historically disagreed on it (10 vs 20).
#[derive(Clone, Debug, Deserialize)]
pub struct ScoringCfg {
  #[serde(default = "default_closeness_threshold")]
  pub closeness_threshold: u8,
}

impl Default for ScoringCfg {
  fn default() -> Self {
    Self { closeness_threshold: DEFAULT_CLOSENESS_THRESHOLD }
  }
}

fn default_closeness_threshold() -> u8 {
  DEFAULT_CLOSENESS_THRESHOLD
}

/// Points awarded per user action.
#[derive(Clone, Debug, Deserialize)]
pub struct PointsCfg {
  #[serde(default = "default_registration_points")]
  pub registration: u32,
  #[serde(default = "default_daily_login_points")]
  pub daily_login: u32,
  #[serde(default = "default_content_read_points")]
  pub content_read: u32,
  #[serde(default = "default_test_completion_points")]
  pub test_completion: u32,
}

impl Default for PointsCfg {
  fn default() -> Self {
    Self {
      registration: default_registration_points(),
      daily_login: default_daily_login_points(),
      content_read: default_content_read_points(),
      test_completion: default_test_completion_points(),
    }
  }
}

fn default_registration_points() -> u32 { 50 }
fn default_daily_login_points() -> u32 { 5 }
fn default_content_read_points() -> u32 { 10 }
fn default_test_completion_points() -> u32 { 25 }

/// Assessment entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct AssessmentCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  #[serde(default)] pub questions: Vec<QuestionCfg>,
}

/// Question entry. Option labels default to the dimension's trait names
/// when omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  pub dimension: Dimension,
  pub prompt: String,
  #[serde(default)] pub first_label: Option<String>,
  #[serde(default)] pub second_label: Option<String>,
}

/// Content page entry (type profiles or general reading material).
#[derive(Clone, Debug, Deserialize)]
pub struct ContentCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  pub body: String,
  #[serde(default)] pub type_code: Option<String>,
}

/// Attempt to load `AppConfig` from APP_CONFIG_PATH. On any parsing/IO error,
/// returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("APP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "persona_backend", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "persona_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "persona_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
