use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::store::Tags;
use crate::sync::retry::{RetryPolicy, DEFAULT_MAX_RETRIES};

/// Tool settings, read from YAML in camelCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Store endpoint: `https://...`, `http://...` or `file:<path>`.
    #[serde(default)]
    pub endpoint: String,
    /// Label used to fetch, and given to added keys.
    #[serde(default)]
    pub label: Option<String>,
    /// Tags given to added keys.
    #[serde(default)]
    pub tags: Tags,
    /// Delete remote keys missing from the local file.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub credentials: CredentialSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }
}

/// Where the store access token comes from, tried in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSettings {
    /// Token inline. For local testing only.
    #[serde(default)]
    pub token: Option<String>,
    /// File holding the token, e.g. a mounted secret.
    #[serde(default)]
    pub token_file: Option<String>,
    /// Environment variable holding the token.
    #[serde(default)]
    pub token_env_var: Option<String>,
}

/// Values given on the command line, applied over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub label: Option<String>,
    pub tags: Option<Tags>,
    /// Only ever switches strict mode on.
    pub strict: bool,
}

impl Settings {
    pub fn merge_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(label) = overrides.label {
            self.label = Some(label);
        }
        if let Some(tags) = overrides.tags {
            self.tags.extend(tags);
        }
        self.strict |= overrides.strict;
    }
}
