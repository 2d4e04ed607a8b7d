use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use wgai_gateway::error::AppError;
use wgai_gateway::{ApplicationRequest, TechnicalAnalysisRequest, ValidationFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PayloadKind {
    /// Job application (phase 1)
    Application,
    /// Technical-document analysis (phase 2)
    TechDocument,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Which submission schema to apply
    #[arg(value_enum)]
    pub(crate) kind: PayloadKind,
    /// Path to the JSON payload
    pub(crate) path: PathBuf,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read(&args.path)?;

    match validate_payload(args.kind, &raw) {
        Ok(()) => {
            println!("valid");
            Ok(())
        }
        Err(failure) => {
            for error in failure.errors() {
                println!("- {}: {} [{}]", error.path, error.message, error.kind);
            }
            Err(AppError::Validation(failure))
        }
    }
}

pub(crate) fn validate_payload(kind: PayloadKind, raw: &[u8]) -> Result<(), ValidationFailure> {
    let value: Value = serde_json::from_slice(raw).map_err(ValidationFailure::invalid_json)?;
    match kind {
        PayloadKind::Application => ApplicationRequest::from_value(&value).map(|_| ()),
        PayloadKind::TechDocument => TechnicalAnalysisRequest::from_value(&value).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_schema_problems_for_the_selected_kind() {
        let payload = json!({
            "synopsis": "too short",
            "key_concepts": ["a", "b", "c"],
            "technical_details": ["x", "y", "z"],
            "analysis": "A".repeat(200),
            "submitted_by": "angela@example.com"
        });
        let raw = serde_json::to_vec(&payload).expect("payload encodes");

        let failure =
            validate_payload(PayloadKind::TechDocument, &raw).expect_err("synopsis too short");
        assert!(failure.has_field("synopsis"));

        let failure =
            validate_payload(PayloadKind::Application, &raw).expect_err("wrong schema");
        assert!(failure.has_field("github_url"));
    }

    #[test]
    fn unparseable_files_are_rejected() {
        let failure = validate_payload(PayloadKind::Application, b"not json")
            .expect_err("invalid json");
        assert_eq!(failure.errors()[0].path.to_string(), "body");
    }
}
