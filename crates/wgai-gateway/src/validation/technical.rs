use serde::Serialize;
use serde_json::Value;

use super::rules::FieldReader;
use super::ValidationFailure;

const MIN_SYNOPSIS_CHARS: usize = 100;
const MIN_ANALYSIS_CHARS: usize = 200;
const MIN_KEY_CONCEPTS: usize = 3;
const MIN_TECHNICAL_DETAILS: usize = 3;

/// Validated technical-document analysis, serialized as the phase 2 wire body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalAnalysisRequest {
    synopsis: String,
    key_concepts: Vec<String>,
    technical_details: Vec<String>,
    analysis: String,
    submitted_by: String,
}

impl TechnicalAnalysisRequest {
    pub fn from_value(input: &Value) -> Result<Self, ValidationFailure> {
        let mut fields = FieldReader::new(input)?;

        let synopsis = fields.string("synopsis", MIN_SYNOPSIS_CHARS);
        let key_concepts = fields.string_list("key_concepts", MIN_KEY_CONCEPTS);
        let technical_details = fields.string_list("technical_details", MIN_TECHNICAL_DETAILS);
        let analysis = fields.string("analysis", MIN_ANALYSIS_CHARS);
        let submitted_by = fields.email("submitted_by");

        match (
            synopsis,
            key_concepts,
            technical_details,
            analysis,
            submitted_by,
        ) {
            (
                Some(synopsis),
                Some(key_concepts),
                Some(technical_details),
                Some(analysis),
                Some(submitted_by),
            ) if fields.is_clean() => Ok(Self {
                synopsis,
                key_concepts,
                technical_details,
                analysis,
                submitted_by,
            }),
            _ => Err(fields.into_failure()),
        }
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn key_concepts(&self) -> &[String] {
        &self.key_concepts
    }

    pub fn technical_details(&self) -> &[String] {
        &self.technical_details
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn submitted_by(&self) -> &str {
        &self.submitted_by
    }
}

impl TryFrom<Value> for TechnicalAnalysisRequest {
    type Error = ValidationFailure;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}
