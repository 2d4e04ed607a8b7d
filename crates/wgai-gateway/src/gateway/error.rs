use std::time::Duration;

use reqwest::StatusCode;

/// Failure of a single outbound call. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("partner API responded with status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },
    #[error("partner API did not respond within {}s", .0.as_secs_f32())]
    TransportTimeout(Duration),
    #[error("partner API is unreachable: {0}")]
    TransportUnreachable(String),
    #[error("partner API request failed: {0}")]
    Transport(String),
    #[error("partner API returned a body that is not JSON: {0}")]
    InvalidResponseBody(String),
}

impl ForwardError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ForwardError::TransportTimeout(timeout)
        } else if err.is_connect() {
            ForwardError::TransportUnreachable(err.to_string())
        } else {
            ForwardError::Transport(err.to_string())
        }
    }

    /// Upstream status code when the partner answered with a non-2xx response.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            ForwardError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
