//! Classification error types and the per-key validation issue record.

use serde::Serialize;
use thiserror::Error;

/// Why a value that claims to be a Key Vault secret reference is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultReferenceError {
    #[error("Key Vault reference is missing its closing parenthesis")]
    Unterminated,

    #[error("missing SecretUri in Key Vault reference")]
    MissingSecretUri,

    #[error("invalid Key Vault URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("not a valid Key Vault URI: host '{0}' is not a Key Vault host")]
    NotKeyVaultHost(String),

    #[error("invalid Key Vault secret path '{0}', expected /secrets/<name>[/<version>]")]
    InvalidSecretPath(String),

    #[error("invalid secret name: {0}")]
    InvalidSecretName(String),

    #[error("invalid vault URL format: {0}")]
    InvalidVaultUrl(String),

    #[error("secret name cannot be empty")]
    EmptySecretName,
}

impl VaultReferenceError {
    /// True for failures of the post-parse structural checks.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            VaultReferenceError::InvalidVaultUrl(_) | VaultReferenceError::EmptySecretName
        )
    }
}

/// Why a feature-flag entry is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureFlagError {
    #[error("invalid feature flag value: {0}")]
    InvalidValue(String),

    #[error("feature flag should have a description")]
    MissingDescription,
}

/// Errors raised while classifying a single `(key, value)` pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Key Vault reference error: {0}")]
    VaultReference(#[from] VaultReferenceError),

    #[error("feature flag error: {0}")]
    FeatureFlag(#[from] FeatureFlagError),
}

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The value could not be parsed as the type its key or prefix claims.
    ParsingError,
    /// A parsed secret reference failed structural validation.
    KeyvaultError,
    /// A parsed feature flag failed validation.
    FeatureFlagError,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::ParsingError => write!(f, "parsing_error"),
            IssueKind::KeyvaultError => write!(f, "keyvault_error"),
            IssueKind::FeatureFlagError => write!(f, "feature_flag_error"),
        }
    }
}

impl From<&ClassificationError> for IssueKind {
    fn from(err: &ClassificationError) -> Self {
        match err {
            ClassificationError::VaultReference(e) if e.is_validation_failure() => {
                IssueKind::KeyvaultError
            }
            ClassificationError::FeatureFlag(FeatureFlagError::MissingDescription) => {
                IssueKind::FeatureFlagError
            }
            _ => IssueKind::ParsingError,
        }
    }
}

/// A classification failure for one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub key: String,
    pub value: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(key: &str, value: &str, error: &ClassificationError) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            message: error.to_string(),
            kind: IssueKind::from(error),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.key, self.message)
    }
}
