//! Account name availability check.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct NameAvailabilityRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
    /// Whether the name can be used.
    pub name_available: bool,
    /// `AccountNameInvalid` or `AlreadyExists` when unavailable.
    pub reason: Option<String>,
    /// Human-readable explanation when unavailable.
    pub message: Option<String>,
}
