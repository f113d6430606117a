//! Feature flags identified by key naming convention.

use regex::RegexSet;
use serde::Serialize;
use std::sync::LazyLock;

use super::error::FeatureFlagError;

// Key patterns that mark an entry as a feature flag, matched case-insensitively.
static FEATURE_FLAG_KEYS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^feature\.",
        r"(?i)^flag\.",
        r"(?i)\.enabled$",
        r"(?i)\.disabled$",
        r"(?i)^enable\.",
        r"(?i)^disable\.",
        r"(?i)\.feature$",
        r"(?i)\.flag$",
    ])
    .unwrap()
});

const TRUTHY: &[&str] = &["true", "1", "yes", "on", "enabled"];
const FALSY: &[&str] = &["false", "0", "no", "off", "disabled"];

/// A boolean configuration entry with a description derived from its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlag {
    pub enabled: bool,
    pub description: String,
}

impl FeatureFlag {
    /// Parses the flag value for `key`. The key is assumed to already match
    /// the naming convention.
    pub fn parse(key: &str, value: &str) -> Result<Self, FeatureFlagError> {
        Ok(Self {
            enabled: parse_flag_value(value)?,
            description: describe_key(key),
        })
    }

    pub fn validate(&self) -> Result<(), FeatureFlagError> {
        if self.description.trim().is_empty() {
            return Err(FeatureFlagError::MissingDescription);
        }
        Ok(())
    }
}

/// True if the key follows one of the feature-flag naming patterns.
pub fn is_feature_flag_key(key: &str) -> bool {
    FEATURE_FLAG_KEYS.is_match(key)
}

/// Interprets a flag value case-insensitively.
pub fn parse_flag_value(value: &str) -> Result<bool, FeatureFlagError> {
    let lower = value.to_lowercase();
    if TRUTHY.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(FeatureFlagError::InvalidValue(value.to_string()))
    }
}

/// Human-readable description: path separators and underscores become spaces
/// and every word gets an upper-case first letter.
///
/// The capitalization is naive; `api.url_v2` becomes `Api Url V2` rather than
/// `API URL v2`.
pub fn describe_key(key: &str) -> String {
    title_case(&key.replace(['.', '_'], " "))
}

fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = is_word_separator(c);
    }
    result
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
