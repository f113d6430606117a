use serde::Serialize;

use super::error::{ClassificationError, ValidationIssue};
use super::feature_flag::{is_feature_flag_key, FeatureFlag};
use super::secret_ref::{
    has_marker_prefix, is_bare_vault_uri, parse_secret_reference, parse_secret_uri,
    SecretReference,
};
use crate::document::FlatConfig;

/// The interpretation of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifiedValue {
    Regular,
    FeatureFlag(FeatureFlag),
    SecretReference(SecretReference),
}

/// Classifies a single entry.
///
/// Checks run in a fixed order and the first one that claims the value wins:
/// the `@Microsoft.KeyVault(` marker, then a bare Key Vault `https://` URI,
/// then the feature-flag key patterns. Once a value claims to be a secret
/// reference it must fully validate as one; it is never downgraded to
/// `Regular`. Other `https://` URLs are regular values.
pub fn classify(key: &str, value: &str) -> Result<ClassifiedValue, ClassificationError> {
    if has_marker_prefix(value) {
        let reference = parse_secret_reference(value)?;
        reference.validate()?;
        return Ok(ClassifiedValue::SecretReference(reference));
    }

    if is_bare_vault_uri(value) {
        let reference = parse_secret_uri(value)?;
        reference.validate()?;
        return Ok(ClassifiedValue::SecretReference(reference));
    }

    if is_feature_flag_key(key) {
        let flag = FeatureFlag::parse(key, value)?;
        flag.validate()?;
        return Ok(ClassifiedValue::FeatureFlag(flag));
    }

    Ok(ClassifiedValue::Regular)
}

/// Classifies every entry and collects the failures, ordered by key.
pub fn validate_configuration(config: &FlatConfig) -> Vec<ValidationIssue> {
    let issues: Vec<ValidationIssue> = config
        .iter()
        .filter_map(|(key, value)| {
            classify(key, value)
                .err()
                .map(|e| ValidationIssue::new(key, value, &e))
        })
        .collect();

    if !issues.is_empty() {
        log::debug!(
            "Validation found {} issue(s) across {} entries",
            issues.len(),
            config.len()
        );
    }
    issues
}
