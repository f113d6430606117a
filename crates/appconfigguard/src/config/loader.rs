use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::schema::Settings;
use crate::store::{Tags, FILE_ENDPOINT_PREFIX};

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "APPCONFIGGUARD_CONFIG";

/// Highest accepted `retry.maxRetries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// `<config dir>/appconfigguard/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("appconfigguard").join("config.yaml"))
}

/// Picks the settings file: the explicit path, then `$APPCONFIGGUARD_CONFIG`,
/// then the default path when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|p| p.is_file())
}

/// Loads settings from the resolved file, or defaults when there is none.
///
/// The result is not validated; the endpoint may still come from the
/// command line.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match resolve_config_path(explicit) {
        Some(path) => {
            log::debug!("Loading settings from {}", path.display());
            load_settings_from_file(&path)
        }
        None => Ok(Settings::default()),
    }
}

pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_settings_from_str(&content)
}

pub fn load_settings_from_str(content: &str) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Checks settings before they are used to reach a store.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    let endpoint = settings.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ConfigError::Validation {
            message: "an endpoint is required (--endpoint or `endpoint:` in the settings file)"
                .to_string(),
        });
    }

    let known_scheme = endpoint.starts_with("https://")
        || endpoint.starts_with("http://")
        || endpoint.starts_with(FILE_ENDPOINT_PREFIX);
    if !known_scheme {
        return Err(ConfigError::Validation {
            message: format!(
                "unsupported endpoint '{}': expected https://, http:// or file:",
                crate::sanitize::redact_endpoint(endpoint)
            ),
        });
    }
    if endpoint == FILE_ENDPOINT_PREFIX {
        return Err(ConfigError::Validation {
            message: "file: endpoint needs a path".to_string(),
        });
    }

    if settings.retry.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation {
            message: format!(
                "retry.maxRetries is {} but may be at most {}",
                settings.retry.max_retries, MAX_RETRIES_LIMIT
            ),
        });
    }

    if let Some(label) = &settings.label {
        if label.is_empty() {
            return Err(ConfigError::Validation {
                message: "label must not be empty when set".to_string(),
            });
        }
    }

    for name in settings.tags.keys() {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidTag { tag: name.clone() });
        }
    }

    Ok(())
}

/// Parses `k=v,k2=v2`. Whitespace around names and values is trimmed.
pub fn parse_tags(input: &str) -> Result<Tags> {
    let mut tags = Tags::new();
    for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidTag {
            tag: pair.to_string(),
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidTag {
                tag: pair.to_string(),
            });
        }
        tags.insert(name.to_string(), value.trim().to_string());
    }
    Ok(tags)
}
