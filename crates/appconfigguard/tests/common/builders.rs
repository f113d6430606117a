//! Builders for test settings and store contents.

#![allow(dead_code)]

use appconfigguard::store::{RemoteItem, Tags};
use appconfigguard::Settings;

/// Builder for `Settings` with millisecond retries so failure tests stay fast.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let mut settings = Settings {
            endpoint: endpoint.into(),
            ..Settings::default()
        };
        settings.retry.base_delay_ms = 1;
        Self { settings }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.settings.strict = strict;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.settings.label = Some(label.to_string());
        self
    }

    pub fn tag(mut self, name: &str, value: &str) -> Self {
        self.settings.tags.insert(name.to_string(), value.to_string());
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.settings.retry.max_retries = max_retries;
        self
    }

    pub fn base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.settings.retry.base_delay_ms = base_delay_ms;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

/// Shorthand for a list of unlabeled remote items.
pub fn remote(pairs: &[(&str, &str)]) -> Vec<RemoteItem> {
    pairs.iter().map(|(k, v)| RemoteItem::new(*k, *v)).collect()
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
