//! Key Vault secret references.
//!
//! Two textual forms are recognized:
//! - `@Microsoft.KeyVault(SecretUri=https://myvault.vault.azure.net/secrets/name/version)`
//! - `https://myvault.vault.azure.net/secrets/name/version`

use std::collections::HashMap;

use reqwest::Url;
use serde::Serialize;

use super::error::VaultReferenceError;

/// Prefix of the marker form.
pub const KEY_VAULT_PREFIX: &str = "@Microsoft.KeyVault(";

/// Host fragment every Key Vault URI contains.
pub const VAULT_HOST_MARKER: &str = "vault.azure.net";

/// Marker parameter holding the secret URI.
pub const SECRET_URI_PARAM: &str = "SecretUri";

/// Key Vault secret names are limited to 127 characters.
const MAX_SECRET_NAME_LEN: usize = 127;

/// A parsed pointer to a secret in a Key Vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretReference {
    /// `https://<host>` of the vault.
    pub vault_url: String,
    pub secret_name: String,
    /// `None` means the latest version.
    pub secret_version: Option<String>,
}

impl SecretReference {
    /// Structural checks applied after parsing.
    pub fn validate(&self) -> Result<(), VaultReferenceError> {
        if !self.vault_url.starts_with("https://") || !self.vault_url.contains(VAULT_HOST_MARKER) {
            return Err(VaultReferenceError::InvalidVaultUrl(self.vault_url.clone()));
        }
        if self.secret_name.is_empty() {
            return Err(VaultReferenceError::EmptySecretName);
        }
        Ok(())
    }

    /// The secret URI this reference points to.
    pub fn secret_uri(&self) -> String {
        match &self.secret_version {
            Some(version) => format!("{}/secrets/{}/{}", self.vault_url, self.secret_name, version),
            None => format!("{}/secrets/{}", self.vault_url, self.secret_name),
        }
    }
}

/// True if the value uses the `@Microsoft.KeyVault(` marker prefix.
pub fn has_marker_prefix(value: &str) -> bool {
    value.starts_with(KEY_VAULT_PREFIX)
}

/// True if the value is an `https://` URL pointing at a Key Vault host.
pub fn is_bare_vault_uri(value: &str) -> bool {
    value.starts_with("https://") && value.contains(VAULT_HOST_MARKER)
}

/// Parses the `key=value;key=value` list inside a marker.
///
/// Returns `None` when the value is not a complete `@Microsoft.KeyVault(...)`
/// expression. Keys and values are trimmed; pairs without `=` are ignored.
pub fn marker_params(value: &str) -> Option<HashMap<String, String>> {
    let content = value.strip_prefix(KEY_VAULT_PREFIX)?.strip_suffix(')')?;
    let params = content
        .split(';')
        .filter_map(|param| param.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    Some(params)
}

/// Extracts the secret URI from either textual form without validating it.
pub fn extract_secret_uri(value: &str) -> Option<String> {
    if has_marker_prefix(value) {
        return marker_params(value)?.remove(SECRET_URI_PARAM);
    }
    if is_bare_vault_uri(value) {
        return Some(value.to_string());
    }
    None
}

/// Parses a secret reference in either textual form.
pub fn parse_secret_reference(value: &str) -> Result<SecretReference, VaultReferenceError> {
    if has_marker_prefix(value) {
        let mut params = marker_params(value).ok_or(VaultReferenceError::Unterminated)?;
        let uri = params
            .remove(SECRET_URI_PARAM)
            .ok_or(VaultReferenceError::MissingSecretUri)?;
        return parse_secret_uri(&uri);
    }
    parse_secret_uri(value)
}

/// Parses `https://<vault-host>/secrets/<name>[/<version>]`.
pub fn parse_secret_uri(uri: &str) -> Result<SecretReference, VaultReferenceError> {
    let parsed = Url::parse(uri).map_err(|e| VaultReferenceError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed.host_str().unwrap_or_default();
    if !host.contains(VAULT_HOST_MARKER) {
        return Err(VaultReferenceError::NotKeyVaultHost(host.to_string()));
    }

    let parts: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    if !(2..=3).contains(&parts.len()) || parts[0] != "secrets" {
        return Err(VaultReferenceError::InvalidSecretPath(
            parsed.path().to_string(),
        ));
    }

    let secret_name = parts[1];
    if !is_valid_secret_name(secret_name) {
        return Err(VaultReferenceError::InvalidSecretName(
            secret_name.to_string(),
        ));
    }

    let vault_url = match parsed.port() {
        Some(port) => format!("https://{}:{}", host, port),
        None => format!("https://{}", host),
    };

    Ok(SecretReference {
        vault_url,
        secret_name: secret_name.to_string(),
        secret_version: parts.get(2).map(|v| v.to_string()),
    })
}

/// 1–127 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_secret_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_SECRET_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
