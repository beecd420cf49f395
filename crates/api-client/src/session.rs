// In crates/api-client/src/session.rs

use crate::types::{LoginRequest, LoginResponse, ValidateResponse};
use crate::{Error, Result, decode};
use app_config::types::{BrokerSettings, ServiceSettings};
use std::time::Duration;

const LOGIN_PATH: &str = "/api/auth/login";
const VALIDATE_PATH: &str = "/api/auth/validate";

/// An authenticated brokerage session on the backtest service.
///
/// The service keeps the credentials server-side; this handle only remembers
/// which key it logged in with.
#[derive(Debug)]
pub struct Session {
    http_client: reqwest::Client,
    base_url: String,
    api_key_id: String,
    is_paper: bool,
}

impl Session {
    /// Logs in with the configured brokerage credentials.
    ///
    /// This corresponds to the `POST /api/auth/login` endpoint.
    pub async fn login(service: &ServiceSettings, broker: &BrokerSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        let base_url = service.base_url.trim_end_matches('/').to_string();

        let body = LoginRequest {
            api_key_id: &broker.api_key_id,
            secret_key: &broker.secret_key,
            is_paper: broker.paper,
        };
        let response = http_client
            .post(format!("{base_url}{LOGIN_PATH}"))
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let login: LoginResponse = decode(response, LOGIN_PATH, "Login failed").await?;

        if !login.success {
            return Err(Error::Unauthorized(
                login.message.unwrap_or_else(|| "credentials were not accepted".to_string()),
            ));
        }

        tracing::info!(paper = broker.paper, "Brokerage session opened.");
        Ok(Self {
            http_client,
            base_url,
            api_key_id: broker.api_key_id.clone(),
            is_paper: broker.paper,
        })
    }

    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    pub fn is_paper(&self) -> bool {
        self.is_paper
    }

    /// Asks the service whether the stored credentials are still good.
    ///
    /// This corresponds to the `GET /api/auth/validate` endpoint.
    pub async fn validate(&self) -> Result<bool> {
        let response = self
            .http_client
            .get(format!("{}{VALIDATE_PATH}", self.base_url))
            .send()
            .await
            .map_err(Error::Transport)?;
        let payload: ValidateResponse = decode(response, VALIDATE_PATH, "Validation failed").await?;
        Ok(payload.valid)
    }

    /// Ends the session. Failures are logged and otherwise ignored.
    pub async fn logout(self) {
        let outcome = self
            .http_client
            .post(format!("{}/api/auth/logout", self.base_url))
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match outcome {
            Ok(_) => tracing::info!("Brokerage session closed."),
            Err(e) => tracing::warn!(error = %e, "Logout failed; the session will expire on its own."),
        }
    }
}
