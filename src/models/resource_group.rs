//! Resource group resource.

use serde::{Deserialize, Serialize};

/// A resource group as returned by create-or-update.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    /// Full ARM resource ID.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Azure region holding the group's metadata.
    pub location: String,
    /// Provider-reported properties.
    #[serde(default)]
    pub properties: ResourceGroupProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    /// Lifecycle state, e.g. `Succeeded` or `Deleting`.
    pub provisioning_state: Option<String>,
}

/// PUT body for create-or-update.
#[derive(Serialize, Debug, Clone)]
pub struct ResourceGroupRequest {
    pub location: String,
}
