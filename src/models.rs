//! Data models and structures
//!
//! Defines the response bodies exposed over HTTP and the runtime
//! configuration read from the environment.

use crate::ai::openai::client::DEFAULT_BASE_URL;
use crate::ai::openai::vision::{DEFAULT_ANALYSIS_LEVEL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// One construction the model reports as crossing or lying outside a lot
/// boundary.
///
/// The HTTP pipeline never validates model output against this shape; it is
/// provided for callers that want typed access to the usual fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    #[serde(rename = "numeroLot")]
    pub numero_lot: String,
    pub position: String,
    pub description: String,
    pub gravite: String,
}

/// Body of a successful detection: the model's parsed answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResponse {
    pub lots: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub vision_model: String,
    pub max_tokens: u32,
    pub analysis_level: u32,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
    pub bind_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY")
                .ok_or_else(|| Error::Config("OPENAI_API_KEY not set".to_string()))?,
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            vision_model: var("VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(var("MAX_TOKENS"), "MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            analysis_level: parse_or(
                var("ANALYSIS_LEVEL"),
                "ANALYSIS_LEVEL",
                DEFAULT_ANALYSIS_LEVEL,
            )?,
            upstream_timeout: Duration::from_secs(parse_or(
                var("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
        None => Ok(default),
    }
}
