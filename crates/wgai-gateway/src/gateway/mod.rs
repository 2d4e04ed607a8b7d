//! Outbound relay to the partner API.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde_json::Value;

use crate::credentials::Phase;
use crate::validation::{ApplicationRequest, TechnicalAnalysisRequest};

pub use client::PartnerClient;
pub use error::ForwardError;

/// Partner endpoint for one credential phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub phase: Phase,
    pub path: &'static str,
}

pub const APPLICATION_ENDPOINT: Endpoint = Endpoint {
    phase: Phase::One,
    path: "/v1/api/hire/me",
};

pub const TECHNICAL_DOCUMENT_ENDPOINT: Endpoint = Endpoint {
    phase: Phase::Two,
    path: "/v2/api/analyze/technical-document",
};

/// Seam between the HTTP routes and the partner service so routes can run against doubles.
#[async_trait]
pub trait PartnerApi: Send + Sync {
    async fn submit_application(
        &self,
        request: &ApplicationRequest,
        credential_override: Option<&str>,
    ) -> Result<Value, ForwardError>;

    async fn analyze_technical_document(
        &self,
        request: &TechnicalAnalysisRequest,
        credential_override: Option<&str>,
    ) -> Result<Value, ForwardError>;
}
