//! Storage account resource.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A storage account as returned by GET/PUT/PATCH and list calls.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    /// Full ARM resource ID.
    pub id: String,
    /// Account name, unique across Azure.
    pub name: String,
    /// Resource type, `Microsoft.Storage/storageAccounts`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Azure region.
    pub location: String,
    /// Replication tier.
    pub sku: Option<Sku>,
    /// Account kind, e.g. `StorageV2`.
    pub kind: Option<String>,
    /// Resource tags (empty when none are set).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Provider-reported properties.
    #[serde(default)]
    pub properties: AccountProperties,
}

impl StorageAccount {
    pub fn sku_name(&self) -> &str {
        self.sku.as_ref().map(|s| s.name.as_str()).unwrap_or("None")
    }

    pub fn provisioning_state(&self) -> &str {
        self.properties
            .provisioning_state
            .as_deref()
            .unwrap_or("Unknown")
    }
}

/// Storage SKU.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sku {
    /// SKU name, e.g. `Standard_LRS`.
    pub name: String,
    /// Performance tier, `Standard` or `Premium`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// Only the fields printed by the demo; the rest of the properties bag is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    /// Lifecycle state, e.g. `Creating` or `Succeeded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// PUT body for account creation.
#[derive(Serialize, Debug, Clone)]
pub struct AccountCreateRequest {
    pub sku: Sku,
    pub kind: String,
    pub location: String,
    pub properties: AccountProperties,
}

/// PATCH body. Tags replace the account's tag set wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountUpdateRequest {
    pub tags: BTreeMap<String, String>,
}
