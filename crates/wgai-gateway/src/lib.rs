//! Validating relay for job applications and technical-document analyses bound for the
//! WGAI partner API.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod telemetry;
pub mod validation;

pub use gateway::{ForwardError, PartnerApi, PartnerClient};
pub use routes::gateway_router;
pub use validation::{ApplicationRequest, TechnicalAnalysisRequest, ValidationFailure};
