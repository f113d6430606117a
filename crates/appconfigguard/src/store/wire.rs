//! Wire encoding of Key Vault references.
//!
//! Secret references are written as `{"uri":"<secret-uri>"}` with the Key
//! Vault content type. The store may echo them back in that JSON shape, in
//! the legacy `@Microsoft.KeyVault(...)` shape or as a bare URI; all three
//! are read back as `@Microsoft.KeyVault(SecretUri=<uri>)` so a value does
//! not look changed just because of its encoding.
//!
//! Only values that validate as Key Vault references get this treatment.
//! Anything else, including a marker pointing at a non-vault host, is stored
//! and compared as plain text.

use std::borrow::Cow;

use crate::document::looks_like_json_container;
use crate::validator::{
    extract_secret_uri, has_marker_prefix, is_bare_vault_uri, parse_secret_reference,
};

/// Content type for Key Vault references.
pub const KEY_VAULT_CONTENT_TYPE: &str =
    "application/vnd.microsoft.appconfig.keyvaultref+json;charset=utf-8";

/// Content type for every other value.
pub const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain";

/// A value ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedValue {
    pub value: String,
    pub content_type: &'static str,
}

/// The secret URI of a marker or bare URI that parses and validates as a
/// Key Vault reference.
fn valid_secret_uri(value: &str) -> Option<String> {
    if !has_marker_prefix(value) && !is_bare_vault_uri(value) {
        return None;
    }
    parse_secret_reference(value).ok()?.validate().ok()?;
    extract_secret_uri(value)
}

/// True if the value is written as a Key Vault reference.
pub fn is_secret_reference_value(value: &str) -> bool {
    valid_secret_uri(value).is_some()
}

/// Encodes a value for the store.
///
/// Values that do not validate as secret references, such as a marker
/// without a `SecretUri` or one naming a foreign host, are written verbatim
/// as plain text.
pub fn encode_for_store(value: &str) -> EncodedValue {
    if let Some(uri) = valid_secret_uri(value) {
        return EncodedValue {
            value: serde_json::json!({ "uri": uri }).to_string(),
            content_type: KEY_VAULT_CONTENT_TYPE,
        };
    }
    EncodedValue {
        value: value.to_string(),
        content_type: PLAIN_TEXT_CONTENT_TYPE,
    }
}

/// Canonical textual form of a value, used both when reading values back
/// and when comparing local against remote values.
pub fn canonical_value(value: &str) -> Cow<'_, str> {
    if let Some(uri) = json_reference_uri(value) {
        return Cow::Owned(marker_for(&uri));
    }
    match valid_secret_uri(value) {
        Some(uri) => Cow::Owned(marker_for(&uri)),
        None => Cow::Borrowed(value),
    }
}

/// Normalizes a value read from the store.
///
/// Unlike [`canonical_value`], a legacy marker is returned untouched.
pub fn normalize_retrieved_value(value: &str) -> String {
    if has_marker_prefix(value) {
        return value.to_string();
    }
    canonical_value(value).into_owned()
}

fn marker_for(uri: &str) -> String {
    format!("@Microsoft.KeyVault(SecretUri={})", uri)
}

fn json_reference_uri(value: &str) -> Option<String> {
    if !looks_like_json_container(value) || !value.starts_with('{') {
        return None;
    }
    let parsed: serde_json::Value = serde_json::from_str(value).ok()?;
    valid_secret_uri(parsed.get("uri")?.as_str()?)
}
