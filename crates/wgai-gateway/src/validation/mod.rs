//! Schema validation for inbound submissions.
//!
//! Each entity is built from an untyped `serde_json::Value` in one pass that collects every
//! violated constraint, so callers receive the full list of field problems rather than the
//! first one encountered. A successfully built entity is immutable and always valid.

pub mod application;
pub(crate) mod rules;
pub mod technical;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::Serialize;

pub use application::ApplicationRequest;
pub use technical::TechnicalAnalysisRequest;

/// One step of a field path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a problem inside the payload. The empty path denotes the payload itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(name: &str) -> Self {
        Self(vec![PathSegment::Key(name.to_string())])
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("body");
        }

        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" -> ")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

/// Machine-readable tag describing which constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    StringType,
    IntType,
    ListType,
    ModelType,
    JsonInvalid,
    StringTooShort,
    TooShort,
    GreaterThanEqual,
    InvalidFormat,
    InvalidEmail,
    BlankEntry,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::StringType => "string_type",
            ErrorKind::IntType => "int_type",
            ErrorKind::ListType => "list_type",
            ErrorKind::ModelType => "model_type",
            ErrorKind::JsonInvalid => "json_invalid",
            ErrorKind::StringTooShort => "string_too_short",
            ErrorKind::TooShort => "too_short",
            ErrorKind::GreaterThanEqual => "greater_than_equal",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::InvalidEmail => "invalid_email",
            ErrorKind::BlankEntry => "blank_entry",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            kind,
        }
    }

    /// Whether the problem sits on `field` or anywhere beneath it.
    pub fn concerns(&self, field: &str) -> bool {
        matches!(self.path.segments().first(), Some(PathSegment::Key(key)) if key == field)
    }
}

/// Every problem found while validating one payload, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} validation error(s): {}", .errors.len(), summarize(.errors))]
pub struct ValidationFailure {
    errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Failure for a body that could not be parsed as JSON at all.
    pub fn invalid_json(detail: impl fmt::Display) -> Self {
        Self::new(vec![FieldError::new(
            FieldPath::root(),
            ErrorKind::JsonInvalid,
            format!("JSON decode error: {detail}"),
        )])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.concerns(field))
    }

    pub fn kinds_for(&self, field: &str) -> Vec<ErrorKind> {
        self.errors
            .iter()
            .filter(|error| error.concerns(field))
            .map(|error| error.kind)
            .collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.path, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}
