//! Storage account access keys.

use serde::{Deserialize, Serialize};

/// One of the two access keys of an account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    /// `key1` or `key2`.
    pub key_name: String,
    /// Base64 secret. Never print in full.
    pub value: String,
    /// Permission scope, `FULL` or `READ`.
    pub permissions: String,
}

/// Response of both listKeys and regenerateKey.
#[derive(Deserialize, Debug)]
pub struct KeyList {
    /// Keys in provider order.
    #[serde(default)]
    pub keys: Vec<AccountKey>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateKeyRequest {
    pub key_name: String,
}
