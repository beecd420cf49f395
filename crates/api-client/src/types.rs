// In crates/api-client/src/types.rs

use core_types::Parameters;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// The client for the backtest service.
///
/// One client belongs to one backtest panel. Clones share the in-flight flag,
/// so at most one request runs across all of them.
#[derive(Debug, Clone)]
pub struct BacktestClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
    pub(crate) in_flight: Arc<AtomicBool>,
}

/// The error body the service sends with a non-success status.
#[derive(Debug, Deserialize, Default)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// The human-readable part of the payload, preferring `detail`.
    pub fn text(&self) -> Option<String> {
        let detail = match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            // Field-validation errors arrive as structured JSON.
            Some(other) => Some(other.to_string()),
        };
        detail
            .or_else(|| self.message.clone())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplatesResponse {
    #[serde(default)]
    pub templates: Vec<RemoteTemplate>,
}

/// A strategy template as reported by `GET /api/backtest/templates`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RemoteTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "strategyType", alias = "id")]
    pub strategy_type: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default, alias = "default_parameters", alias = "defaultParameters")]
    pub parameters: Parameters,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub api_key_id: &'a str,
    pub secret_key: &'a str,
    pub is_paper: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateResponse {
    #[serde(default)]
    pub valid: bool,
}
