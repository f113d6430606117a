//! Remote configuration stores.
//!
//! A store holds settings addressed by key and optional label. Three
//! implementations exist:
//! - [`AppConfigClient`] - the key-value REST API over HTTPS
//! - [`FileStore`] - a local JSON snapshot, selected with a `file:` endpoint
//! - [`InMemoryStore`] - in-process, for tests

pub mod error;
pub mod file;
pub mod http;
pub mod memory;
pub mod setting;
pub mod wire;

use async_trait::async_trait;
use secrecy::SecretString;

pub use error::{Result, StoreError};
pub use file::{FileStore, FILE_ENDPOINT_PREFIX};
pub use http::AppConfigClient;
pub use memory::{InMemoryStore, StoreCall};
pub use setting::{RemoteItem, SettingWrite, StoredSetting, Tags, NULL_LABEL_FILTER};
pub use wire::{
    canonical_value, encode_for_store, normalize_retrieved_value, EncodedValue,
    KEY_VAULT_CONTENT_TYPE, PLAIN_TEXT_CONTENT_TYPE,
};

/// Remote key-value store operations.
///
/// `fetch` returns values in canonical textual form; secret references come
/// back as `@Microsoft.KeyVault(SecretUri=...)` whatever their wire shape.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Lists settings, optionally restricted to one label.
    async fn fetch(&self, label_filter: Option<&str>) -> Result<Vec<RemoteItem>>;

    /// Creates or replaces the setting at the write's key and label.
    async fn write(&self, setting: &SettingWrite) -> Result<()>;

    /// Removes the setting at key and label. Removing an absent setting succeeds.
    async fn delete(&self, key: &str, label: Option<&str>) -> Result<()>;

    /// Short, credential-free name for logs.
    fn describe(&self) -> String;
}

/// Opens the store an endpoint points at.
///
/// `file:<path>` opens a [`FileStore`]; `http(s)://` opens an
/// [`AppConfigClient`], which needs a token.
pub fn open_store(endpoint: &str, token: Option<SecretString>) -> Result<Box<dyn ConfigStore>> {
    if endpoint.starts_with(FILE_ENDPOINT_PREFIX) {
        return Ok(Box::new(FileStore::from_endpoint(endpoint)?));
    }

    let token = token.ok_or_else(|| {
        StoreError::MissingCredentials(format!(
            "an access token is required for {}",
            crate::sanitize::redact_endpoint(endpoint)
        ))
    })?;
    Ok(Box::new(AppConfigClient::new(endpoint, token)?))
}
