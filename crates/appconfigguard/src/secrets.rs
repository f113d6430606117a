//! Resolution of the store access token.
//!
//! The token may be given inline, in a file (mounted secrets) or in an
//! environment variable, tried in that order. It is held as a
//! [`SecretString`] so it never shows up in `Debug` output or logs.

use secrecy::SecretString;

use crate::config::CredentialSettings;

/// Environment variable read when the settings name none.
pub const DEFAULT_TOKEN_ENV_VAR: &str = "APP_CONFIG_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No token source provided (need an inline token, a token file or an env var)")]
    NoSourceProvided,

    #[error("Failed to read token from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Returns the first non-empty source among `direct`, the contents of
/// `file_path` and the variable `env_var`. File and env values are trimmed.
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = direct.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = file_path.filter(|p| !p.is_empty()) {
        let expanded = expand_home(path);
        return std::fs::read_to_string(&expanded)
            .map(|content| SecretString::from(content.trim().to_string()))
            .map_err(|source| SecretError::FileReadError {
                path: expanded,
                source,
            });
    }

    if let Some(name) = env_var.filter(|n| !n.is_empty()) {
        return match std::env::var(name) {
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                name: name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSourceProvided)
}

/// Like [`resolve_secret`], but a missing source is `None` rather than an error.
pub fn resolve_secret_optional(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<Option<SecretString>> {
    match resolve_secret(direct, file_path, env_var) {
        Ok(secret) => Ok(Some(secret)),
        Err(SecretError::NoSourceProvided) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolves the store token from settings.
///
/// Without an explicit source, `APP_CONFIG_TOKEN` is consulted and its
/// absence yields `None`. An explicitly named variable that is unset is an
/// error.
pub fn resolve_store_token(credentials: &CredentialSettings) -> Result<Option<SecretString>> {
    let explicit = resolve_secret_optional(
        credentials.token.as_deref(),
        credentials.token_file.as_deref(),
        credentials.token_env_var.as_deref(),
    )?;
    if explicit.is_some() {
        return Ok(explicit);
    }

    match resolve_secret(None, None, Some(DEFAULT_TOKEN_ENV_VAR)) {
        Ok(token) => Ok(Some(token)),
        Err(SecretError::EnvVarNotSet { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Expands a leading `~` or `~/` to the home directory.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let home = home.to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
