use serde::Serialize;
use serde_json::Value;

use super::rules::FieldReader;
use super::ValidationFailure;

const MIN_BACKGROUND_CHARS: usize = 50;
const MIN_FULL_NAME_CHARS: usize = 2;
const MIN_POSITION_CHARS: usize = 1;
const MIN_SKILLS: usize = 1;

/// Validated job application, serialized as the phase 1 wire body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRequest {
    github_url: String,
    background: String,
    full_name: String,
    email: String,
    years_experience: u64,
    skills: Vec<String>,
    position_applied: String,
}

impl ApplicationRequest {
    pub fn from_value(input: &Value) -> Result<Self, ValidationFailure> {
        let mut fields = FieldReader::new(input)?;

        let github_url = fields.github_url("github_url");
        let background = fields.string("background", MIN_BACKGROUND_CHARS);
        let full_name = fields.string("full_name", MIN_FULL_NAME_CHARS);
        let email = fields.email("email");
        let years_experience = fields.non_negative_integer("years_experience");
        let skills = fields.string_list("skills", MIN_SKILLS);
        let position_applied = fields.string("position_applied", MIN_POSITION_CHARS);

        match (
            github_url,
            background,
            full_name,
            email,
            years_experience,
            skills,
            position_applied,
        ) {
            (
                Some(github_url),
                Some(background),
                Some(full_name),
                Some(email),
                Some(years_experience),
                Some(skills),
                Some(position_applied),
            ) if fields.is_clean() => Ok(Self {
                github_url,
                background,
                full_name,
                email,
                years_experience,
                skills,
                position_applied,
            }),
            _ => Err(fields.into_failure()),
        }
    }

    pub fn github_url(&self) -> &str {
        &self.github_url
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn years_experience(&self) -> u64 {
        self.years_experience
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn position_applied(&self) -> &str {
        &self.position_applied
    }
}

impl TryFrom<Value> for ApplicationRequest {
    type Error = ValidationFailure;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}
