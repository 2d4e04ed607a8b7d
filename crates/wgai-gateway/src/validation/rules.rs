use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{ErrorKind, FieldError, FieldPath, ValidationFailure};

static GITHUB_PROFILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/[A-Za-z0-9]([A-Za-z0-9_-]*[A-Za-z0-9])?$")
        .expect("static regex should not panic")
});

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    ))
    .expect("static regex should not panic")
});

const MAX_EMAIL_LEN: usize = 254;

pub(crate) fn is_github_profile_url(value: &str) -> bool {
    GITHUB_PROFILE.is_match(value)
}

pub(crate) fn is_email_address(value: &str) -> bool {
    value.len() <= MAX_EMAIL_LEN && EMAIL_ADDRESS.is_match(value)
}

/// Reads typed fields out of an untyped object, recording every problem it meets.
///
/// Each accessor returns `None` when the field produced at least one error, so entity
/// constructors can match on the full set of values once all fields have been visited.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(input: &'a Value) -> Result<Self, ValidationFailure> {
        match input {
            Value::Object(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            _ => Err(ValidationFailure::new(vec![FieldError::new(
                FieldPath::root(),
                ErrorKind::ModelType,
                "Input should be a valid JSON object",
            )])),
        }
    }

    pub(crate) fn string(&mut self, field: &str, min_chars: usize) -> Option<String> {
        let value = self.lookup(field)?.as_str();
        let Some(value) = value else {
            self.reject(FieldPath::field(field), ErrorKind::StringType, STRING_TYPE);
            return None;
        };

        if value.chars().count() < min_chars {
            let unit = if min_chars == 1 { "character" } else { "characters" };
            self.reject(
                FieldPath::field(field),
                ErrorKind::StringTooShort,
                format!("String should have at least {min_chars} {unit}"),
            );
            return None;
        }

        Some(value.to_string())
    }

    pub(crate) fn email(&mut self, field: &str) -> Option<String> {
        let value = self.string(field, 0)?;
        if is_email_address(&value) {
            Some(value)
        } else {
            self.reject(
                FieldPath::field(field),
                ErrorKind::InvalidEmail,
                "value is not a valid email address",
            );
            None
        }
    }

    pub(crate) fn github_url(&mut self, field: &str) -> Option<String> {
        let value = self.string(field, 0)?;
        if is_github_profile_url(&value) {
            Some(value)
        } else {
            self.reject(
                FieldPath::field(field),
                ErrorKind::InvalidFormat,
                "Invalid GitHub URL. Must be format: https://github.com/username",
            );
            None
        }
    }

    /// Integral JSON number that is zero or greater. Floats with no fractional part count.
    pub(crate) fn non_negative_integer(&mut self, field: &str) -> Option<u64> {
        let value = self.lookup(field)?;
        let parsed = match value {
            Value::Number(number) => number.as_i64().map(i128::from).or_else(|| {
                number.as_u64().map(i128::from).or_else(|| {
                    number
                        .as_f64()
                        .filter(|float| float.is_finite() && float.fract() == 0.0)
                        .filter(|float| float.abs() < 9.0e15)
                        .map(|float| float as i128)
                })
            }),
            _ => None,
        };

        let Some(parsed) = parsed else {
            self.reject(
                FieldPath::field(field),
                ErrorKind::IntType,
                "Input should be a valid integer",
            );
            return None;
        };

        match u64::try_from(parsed) {
            Ok(value) => Some(value),
            Err(_) => {
                self.reject(
                    FieldPath::field(field),
                    ErrorKind::GreaterThanEqual,
                    "Input should be greater than or equal to 0",
                );
                None
            }
        }
    }

    /// List of strings with at least `min_items` entries, none blank after trimming.
    pub(crate) fn string_list(&mut self, field: &str, min_items: usize) -> Option<Vec<String>> {
        let value = self.lookup(field)?;
        let Some(items) = value.as_array() else {
            self.reject(
                FieldPath::field(field),
                ErrorKind::ListType,
                "Input should be a valid list",
            );
            return None;
        };

        let mut valid = true;
        if items.len() < min_items {
            let unit = if min_items == 1 { "item" } else { "items" };
            self.reject(
                FieldPath::field(field),
                ErrorKind::TooShort,
                format!(
                    "List should have at least {min_items} {unit} after validation, not {}",
                    items.len()
                ),
            );
            valid = false;
        }

        let mut entries = Vec::with_capacity(items.len());
        let mut has_blank = false;
        for (index, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(entry) => {
                    has_blank |= entry.trim().is_empty();
                    entries.push(entry.to_string());
                }
                None => {
                    self.reject(
                        FieldPath::field(field).index(index),
                        ErrorKind::StringType,
                        STRING_TYPE,
                    );
                    valid = false;
                }
            }
        }

        if has_blank {
            self.reject(
                FieldPath::field(field),
                ErrorKind::BlankEntry,
                format!("{} cannot contain empty strings", field_label(field)),
            );
            valid = false;
        }

        valid.then_some(entries)
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_failure(self) -> ValidationFailure {
        ValidationFailure::new(self.errors)
    }

    fn lookup(&mut self, field: &str) -> Option<&'a Value> {
        match self.object.get(field) {
            Some(Value::Null) | None => {
                self.reject(FieldPath::field(field), ErrorKind::Missing, "Field required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn reject(&mut self, path: FieldPath, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, kind, message));
    }
}

const STRING_TYPE: &str = "Input should be a valid string";

/// `key_concepts` -> `Key concepts`
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
