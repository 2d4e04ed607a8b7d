use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::error::ForwardError;
use super::{Endpoint, PartnerApi, APPLICATION_ENDPOINT, TECHNICAL_DOCUMENT_ENDPOINT};
use crate::config::PartnerConfig;
use crate::credentials::CredentialResolver;
use crate::validation::{ApplicationRequest, TechnicalAnalysisRequest};

pub const AUTH_HEADER: &str = "X-Auth-Key";

/// HTTP client for the partner API.
///
/// Idle pooling is disabled, so every call opens its own connection and drops it when the
/// call returns, whatever the outcome.
#[derive(Debug, Clone)]
pub struct PartnerClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialResolver,
    timeout: Duration,
}

impl PartnerClient {
    pub fn new(config: &PartnerConfig) -> Result<Self, ForwardError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|err| ForwardError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            credentials: CredentialResolver::from_config(config),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip_all, fields(phase = endpoint.phase.label(), path = endpoint.path))]
    async fn forward<T>(
        &self,
        endpoint: Endpoint,
        body: &T,
        credential_override: Option<&str>,
    ) -> Result<Value, ForwardError>
    where
        T: Serialize + Sync,
    {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let key = self.credentials.resolve(endpoint.phase, credential_override);
        let started = Instant::now();

        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let err = ForwardError::from_reqwest(err, self.timeout);
                let elapsed_ms = started.elapsed().as_millis() as u64;
                warn!(error = %err, elapsed_ms, "partner call failed before a response arrived");
                err
            })?;

        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            let body = response.text().await.map_err(|err| {
                let err = ForwardError::from_reqwest(err, self.timeout);
                warn!(
                    status = status.as_u16(),
                    error = %err,
                    "partner error body could not be read"
                );
                err
            })?;
            warn!(status = status.as_u16(), elapsed_ms, "partner rejected the call");
            return Err(ForwardError::UpstreamStatus { status, body });
        }

        let payload = response.json::<Value>().await.map_err(|err| {
            if err.is_decode() {
                ForwardError::InvalidResponseBody(err.to_string())
            } else {
                ForwardError::from_reqwest(err, self.timeout)
            }
        })?;

        info!(status = status.as_u16(), elapsed_ms, "partner call completed");
        Ok(payload)
    }
}

#[async_trait]
impl PartnerApi for PartnerClient {
    async fn submit_application(
        &self,
        request: &ApplicationRequest,
        credential_override: Option<&str>,
    ) -> Result<Value, ForwardError> {
        self.forward(APPLICATION_ENDPOINT, request, credential_override)
            .await
    }

    async fn analyze_technical_document(
        &self,
        request: &TechnicalAnalysisRequest,
        credential_override: Option<&str>,
    ) -> Result<Value, ForwardError> {
        self.forward(TECHNICAL_DOCUMENT_ENDPOINT, request, credential_override)
            .await
    }
}
