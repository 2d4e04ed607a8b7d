use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::gateway::{ForwardError, PartnerApi};
use crate::validation::{
    ApplicationRequest, ErrorKind, FieldError, TechnicalAnalysisRequest, ValidationFailure,
};

pub const APPLICATION_INVALID_MESSAGE: &str = "Invalid application data";
pub const TECHNICAL_DOCUMENT_INVALID_MESSAGE: &str = "Invalid technical document data";

/// Router exposing the submission endpoints and the health check.
pub fn gateway_router<P>(partner: Arc<P>) -> Router
where
    P: PartnerApi + 'static,
{
    Router::new()
        .route("/submit/application", post(submit_application_handler::<P>))
        .route(
            "/analyze/tech-documents",
            post(analyze_tech_documents_handler::<P>),
        )
        .route("/health", get(healthcheck))
        .with_state(partner)
}

/// Body returned with status 400 when a payload fails validation.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<FieldErrorView>,
}

#[derive(Debug, Serialize)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl From<FieldError> for FieldErrorView {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.path.to_string(),
            message: error.message,
            kind: error.kind,
        }
    }
}

impl ValidationErrorBody {
    pub fn new(message: &'static str, failure: ValidationFailure) -> Self {
        Self {
            status: "validation_error",
            message,
            errors: failure
                .into_errors()
                .into_iter()
                .map(FieldErrorView::from)
                .collect(),
        }
    }
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn submit_application_handler<P>(
    State(partner): State<Arc<P>>,
    body: Bytes,
) -> Response
where
    P: PartnerApi + 'static,
{
    let request = match parse_body(&body).and_then(|value| ApplicationRequest::from_value(&value))
    {
        Ok(request) => request,
        Err(failure) => return validation_response(APPLICATION_INVALID_MESSAGE, failure),
    };

    match partner.submit_application(&request, None).await {
        Ok(payload) => {
            info!("application relayed to partner");
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => forward_error_response(err),
    }
}

pub(crate) async fn analyze_tech_documents_handler<P>(
    State(partner): State<Arc<P>>,
    body: Bytes,
) -> Response
where
    P: PartnerApi + 'static,
{
    let request =
        match parse_body(&body).and_then(|value| TechnicalAnalysisRequest::from_value(&value)) {
            Ok(request) => request,
            Err(failure) => {
                return validation_response(TECHNICAL_DOCUMENT_INVALID_MESSAGE, failure)
            }
        };

    match partner.analyze_technical_document(&request, None).await {
        Ok(payload) => {
            info!("technical document relayed to partner");
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => forward_error_response(err),
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ValidationFailure> {
    serde_json::from_slice(body).map_err(ValidationFailure::invalid_json)
}

fn validation_response(message: &'static str, failure: ValidationFailure) -> Response {
    info!(errors = failure.errors().len(), "rejected invalid payload");
    let body = ValidationErrorBody::new(message, failure);
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn forward_error_response(err: ForwardError) -> Response {
    warn!(error = %err, "partner relay failed");
    let payload = json!({ "detail": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
