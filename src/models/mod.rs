//! ARM request and response bodies.
//!
//! Field names follow the JSON the Resource Manager sends:
//! - [`StorageAccount`] and its create/update bodies
//! - [`ResourceGroup`]
//! - [`AccountKey`] list and regenerate bodies
//! - [`Usage`] records
//! - [`NameAvailability`] check

mod keys;
mod name_availability;
mod resource_group;
mod storage_account;
mod usage;

use serde::Deserialize;

pub use keys::{AccountKey, KeyList, RegenerateKeyRequest};
pub use name_availability::{NameAvailability, NameAvailabilityRequest};
pub use resource_group::{ResourceGroup, ResourceGroupProperties, ResourceGroupRequest};
pub use storage_account::{
    AccountCreateRequest, AccountProperties, AccountUpdateRequest, Sku, StorageAccount,
};
pub use usage::{Usage, UsageName};

/// One page of an ARM list response.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, absent on the last one.
    pub next_link: Option<String>,
}

/// `{"error": {...}}` envelope returned with failing statuses.
#[derive(Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Resource provider registration state.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRegistration {
    /// Provider namespace, e.g. `Microsoft.Storage`.
    pub namespace: String,
    /// `Registering`, `Registered` or `NotRegistered`.
    pub registration_state: Option<String>,
}

/// Body of an `Azure-AsyncOperation` status resource.
#[derive(Deserialize, Debug)]
pub struct OperationStatus {
    pub status: String,
    pub error: Option<ErrorDetail>,
}
