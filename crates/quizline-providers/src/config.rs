//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Simulated latency for each mock collaborator, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_categories_ms")]
    pub categories_ms: u64,
    #[serde(default = "default_questions_ms")]
    pub questions_ms: u64,
    #[serde(default = "default_submit_ms")]
    pub submit_ms: u64,
    #[serde(default = "default_auth_ms")]
    pub auth_ms: u64,
}

fn default_categories_ms() -> u64 {
    800
}
fn default_questions_ms() -> u64 {
    1000
}
fn default_submit_ms() -> u64 {
    800
}
fn default_auth_ms() -> u64 {
    1000
}

impl LatencyConfig {
    /// No simulated delay anywhere.
    pub fn instant() -> Self {
        Self {
            categories_ms: 0,
            questions_ms: 0,
            submit_ms: 0,
            auth_ms: 0,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            categories_ms: default_categories_ms(),
            questions_ms: default_questions_ms(),
            submit_ms: default_submit_ms(),
            auth_ms: default_auth_ms(),
        }
    }
}

/// Top-level quizline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizlineConfig {
    /// Seconds allowed per attempt.
    #[serde(default = "default_time_budget")]
    pub time_budget_secs: u32,
    /// Where the signed-in user is persisted.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub latency: LatencyConfig,
}

fn default_time_budget() -> u32 {
    quizline_core::session::DEFAULT_TIME_BUDGET_SECS
}

fn default_store_path() -> PathBuf {
    config_dir()
        .map(|d| d.join("store.json"))
        .unwrap_or_else(|| PathBuf::from(".quizline-store.json"))
}

impl Default for QuizlineConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget(),
            store_path: default_store_path(),
            latency: LatencyConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the well-known locations.
///
/// Search order:
/// 1. `quizline.toml` in the current directory
/// 2. `~/.config/quizline/config.toml`
///
/// Environment variable overrides: `QUIZLINE_STORE`, `QUIZLINE_TIME_BUDGET`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlineConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizline.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|d| d.join("config.toml"))
                    .filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizlineConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizlineConfig::default(),
    };

    if let Ok(store) = std::env::var("QUIZLINE_STORE") {
        config.store_path = PathBuf::from(store);
    }
    if let Ok(budget) = std::env::var("QUIZLINE_TIME_BUDGET") {
        config.time_budget_secs = budget
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZLINE_TIME_BUDGET: '{budget}'"))?;
    }

    config.store_path = PathBuf::from(resolve_env_vars(&config.store_path.to_string_lossy()));

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizline"))
}
