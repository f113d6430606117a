//! REST client for an App Configuration store.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{classify_status, Result, StoreError};
use super::setting::{RemoteItem, SettingWrite, StoredSetting, Tags};
use super::ConfigStore;
use crate::sanitize::{redact_endpoint, sanitize_body};

/// REST API version sent with every request.
pub const API_VERSION: &str = "1.0";

const KV_MEDIA_TYPE: &str = "application/vnd.microsoft.appconfig.kv+json";
const KV_SET_MEDIA_TYPE: &str = "application/vnd.microsoft.appconfig.kvset+json";

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct KvPage {
    #[serde(default)]
    items: Vec<KvItem>,
    #[serde(rename = "@nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KvItem {
    key: String,
    label: Option<String>,
    value: Option<String>,
    content_type: Option<String>,
    tags: Option<Tags>,
}

impl From<KvItem> for StoredSetting {
    fn from(item: KvItem) -> Self {
        Self {
            key: item.key,
            label: item.label,
            value: item.value.unwrap_or_default(),
            content_type: item.content_type,
            tags: item.tags.unwrap_or_default(),
        }
    }
}

fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| StoreError::Request(format!("Failed to create HTTP client: {}", e)))
}

/// Client for the key-value REST API, authenticated with a bearer token.
pub struct AppConfigClient {
    client: Client,
    endpoint: Url,
    token: SecretString,
}

impl AppConfigClient {
    pub fn new(endpoint: &str, token: SecretString) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|_| StoreError::InvalidEndpoint(redact_endpoint(endpoint)))?;
        if !matches!(endpoint.scheme(), "https" | "http") || endpoint.cannot_be_a_base() {
            return Err(StoreError::InvalidEndpoint(redact_endpoint(endpoint.as_str())));
        }

        Ok(Self {
            client: create_http_client()?,
            endpoint,
            token,
        })
    }

    fn kv_url(&self, key: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidEndpoint(redact_endpoint(self.endpoint.as_str())))?;
            segments.pop_if_empty().push("kv");
            if let Some(key) = key {
                segments.push(key);
            }
        }
        url.set_query(None);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), sanitize_body(&body)))
    }
}

#[async_trait]
impl ConfigStore for AppConfigClient {
    async fn fetch(&self, label_filter: Option<&str>) -> Result<Vec<RemoteItem>> {
        let mut url = self.kv_url(None)?;
        if let Some(label) = label_filter {
            url.query_pairs_mut().append_pair("label", label);
        }

        let mut items = Vec::new();
        let mut pages = 0usize;
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            let response = self
                .client
                .get(page_url)
                .bearer_auth(self.token.expose_secret())
                .header(ACCEPT, KV_SET_MEDIA_TYPE)
                .send()
                .await?;
            let page: KvPage = Self::check(response).await?.json().await?;
            pages += 1;

            items.extend(
                page.items
                    .into_iter()
                    .filter(|item| item.value.is_some())
                    .map(|item| StoredSetting::from(item).to_remote_item()),
            );

            if let Some(link) = page.next_link.filter(|l| !l.is_empty()) {
                let resolved = self
                    .endpoint
                    .join(&link)
                    .map_err(|e| StoreError::Decode(format!("Invalid @nextLink '{}': {}", link, e)))?;
                next = Some(resolved);
            }
        }

        log::debug!(
            "Fetched {} setting(s) in {} page(s) from {}",
            items.len(),
            pages,
            redact_endpoint(self.endpoint.as_str())
        );
        Ok(items)
    }

    async fn write(&self, setting: &SettingWrite) -> Result<()> {
        let mut url = self.kv_url(Some(&setting.key))?;
        if let Some(label) = &setting.label {
            url.query_pairs_mut().append_pair("label", label);
        }

        let body = serde_json::json!({
            "value": setting.value,
            "content_type": setting.content_type,
            "tags": setting.tags,
        });

        let response = self
            .client
            .put(url)
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, KV_MEDIA_TYPE)
            .header(ACCEPT, KV_MEDIA_TYPE)
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, key: &str, label: Option<&str>) -> Result<()> {
        let mut url = self.kv_url(Some(key))?;
        if let Some(label) = label {
            url.query_pairs_mut().append_pair("label", label);
        }

        let response = self
            .client
            .delete(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("Setting '{}' was already absent", key);
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        redact_endpoint(self.endpoint.as_str())
    }
}
