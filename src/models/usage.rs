//! Subscription usage records.

use serde::{Deserialize, Serialize};

/// One quota counter for the subscription.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Unit of the counter, usually `Count`.
    pub unit: Option<String>,
    /// Amount in use.
    pub current_value: i64,
    /// Quota ceiling.
    pub limit: i64,
    /// Metric name.
    pub name: UsageName,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageName {
    /// Invariant metric name, e.g. `StorageAccounts`.
    pub value: String,
    /// Display name in the caller's locale.
    pub localized_value: Option<String>,
}
