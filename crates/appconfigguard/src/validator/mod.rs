//! Classification and validation of flattened configuration values.
//!
//! Every value is either a regular string, a feature flag (recognized by its
//! key) or a Key Vault secret reference (recognized by its value).

pub mod classify;
pub mod error;
pub mod feature_flag;
pub mod report;
pub mod secret_ref;

pub use classify::{classify, validate_configuration, ClassifiedValue};
pub use error::{
    ClassificationError, FeatureFlagError, IssueKind, ValidationIssue, VaultReferenceError,
};
pub use feature_flag::{describe_key, is_feature_flag_key, parse_flag_value, FeatureFlag};
pub use report::ValidationReport;
pub use secret_ref::{
    extract_secret_uri, has_marker_prefix, is_bare_vault_uri, parse_secret_reference,
    parse_secret_uri, SecretReference, KEY_VAULT_PREFIX, VAULT_HOST_MARKER,
};
