use std::fmt;

use crate::config::PartnerConfig;

/// Partner API key; `Debug` is redacted so configuration dumps never leak it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Partner API credential scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Application submission.
    One,
    /// Technical-document analysis.
    Two,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::One => "phase1",
            Phase::Two => "phase2",
        }
    }
}

/// Picks the outbound key for a phase, honoring a caller-supplied override.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    phase1: ApiKey,
    phase2: ApiKey,
}

impl CredentialResolver {
    pub fn new(phase1: ApiKey, phase2: ApiKey) -> Self {
        Self { phase1, phase2 }
    }

    pub fn from_config(config: &PartnerConfig) -> Self {
        Self::new(config.phase1_key.clone(), config.phase2_key.clone())
    }

    pub fn resolve<'a>(&'a self, phase: Phase, override_key: Option<&'a str>) -> &'a str {
        match override_key {
            Some(key) if !key.is_empty() => key,
            _ => match phase {
                Phase::One => self.phase1.expose(),
                Phase::Two => self.phase2.expose(),
            },
        }
    }
}
