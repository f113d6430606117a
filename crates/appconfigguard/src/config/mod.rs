pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::{
    default_config_path, load_settings, load_settings_from_file, load_settings_from_str,
    parse_tags, resolve_config_path, validate_settings, CONFIG_ENV_VAR,
};
pub use schema::{CredentialSettings, RetrySettings, Settings, SettingsOverrides};
