//! The remote operations the demo needs, as one trait.
//!
//! [`ArmClient`] implements it over REST; tests implement it in memory.

use super::client::ArmClient;
use crate::config::{RESOURCES_API_VERSION, STORAGE_ACCOUNT_TYPE, STORAGE_API_VERSION};
use crate::error::ApiError;
use crate::models::{
    AccountCreateRequest, AccountKey, AccountUpdateRequest, KeyList, NameAvailability,
    NameAvailabilityRequest, ProviderRegistration, RegenerateKeyRequest, ResourceGroup,
    ResourceGroupRequest, StorageAccount, Usage,
};
use reqwest::Method;

/// Provider registry, resource groups, storage accounts and usage.
#[allow(async_fn_in_trait)]
pub trait StorageManagement {
    async fn register_provider(&self, namespace: &str) -> Result<ProviderRegistration, ApiError>;

    async fn check_name_availability(&self, account: &str) -> Result<NameAvailability, ApiError>;

    /// Create-or-update.
    async fn create_resource_group(
        &self,
        group: &str,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ApiError>;

    /// Long-running; returns once the provider reports a terminal state.
    async fn create_storage_account(
        &self,
        group: &str,
        account: &str,
        request: &AccountCreateRequest,
    ) -> Result<StorageAccount, ApiError>;

    async fn get_properties(&self, group: &str, account: &str)
        -> Result<StorageAccount, ApiError>;

    async fn list_by_resource_group(&self, group: &str) -> Result<Vec<StorageAccount>, ApiError>;

    async fn list_accounts(&self) -> Result<Vec<StorageAccount>, ApiError>;

    async fn list_keys(&self, group: &str, account: &str) -> Result<Vec<AccountKey>, ApiError>;

    async fn regenerate_key(
        &self,
        group: &str,
        account: &str,
        key_name: &str,
    ) -> Result<Vec<AccountKey>, ApiError>;

    async fn update_account(
        &self,
        group: &str,
        account: &str,
        request: &AccountUpdateRequest,
    ) -> Result<StorageAccount, ApiError>;

    async fn list_usage(&self, location: &str) -> Result<Vec<Usage>, ApiError>;

    async fn delete_storage_account(&self, group: &str, account: &str) -> Result<(), ApiError>;

    /// Long-running.
    async fn delete_resource_group(&self, group: &str) -> Result<(), ApiError>;
}

impl ArmClient {
    fn group_url(&self, group: &str) -> String {
        self.subscription_url(&format!("/resourcegroups/{group}"))
    }

    fn account_url(&self, group: &str, account: &str) -> String {
        self.subscription_url(&format!(
            "/resourceGroups/{group}/providers/Microsoft.Storage/storageAccounts/{account}"
        ))
    }
}

impl StorageManagement for ArmClient {
    async fn register_provider(&self, namespace: &str) -> Result<ProviderRegistration, ApiError> {
        let url = self.subscription_url(&format!("/providers/{namespace}/register"));
        self.send_json::<(), _>(Method::POST, &url, RESOURCES_API_VERSION, None)
            .await
    }

    async fn check_name_availability(&self, account: &str) -> Result<NameAvailability, ApiError> {
        let url =
            self.subscription_url("/providers/Microsoft.Storage/checkNameAvailability");
        let body = NameAvailabilityRequest {
            name: account.to_string(),
            resource_type: STORAGE_ACCOUNT_TYPE.to_string(),
        };
        self.send_json(Method::POST, &url, STORAGE_API_VERSION, Some(&body))
            .await
    }

    async fn create_resource_group(
        &self,
        group: &str,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ApiError> {
        self.send_json(
            Method::PUT,
            &self.group_url(group),
            RESOURCES_API_VERSION,
            Some(request),
        )
        .await
    }

    async fn create_storage_account(
        &self,
        group: &str,
        account: &str,
        request: &AccountCreateRequest,
    ) -> Result<StorageAccount, ApiError> {
        self.put_long_running(
            &self.account_url(group, account),
            STORAGE_API_VERSION,
            request,
        )
        .await
    }

    async fn get_properties(
        &self,
        group: &str,
        account: &str,
    ) -> Result<StorageAccount, ApiError> {
        self.get_json(&self.account_url(group, account), STORAGE_API_VERSION)
            .await
    }

    async fn list_by_resource_group(&self, group: &str) -> Result<Vec<StorageAccount>, ApiError> {
        let url = self.subscription_url(&format!(
            "/resourceGroups/{group}/providers/Microsoft.Storage/storageAccounts"
        ));
        self.list_all(&url, STORAGE_API_VERSION).await
    }

    async fn list_accounts(&self) -> Result<Vec<StorageAccount>, ApiError> {
        let url = self.subscription_url("/providers/Microsoft.Storage/storageAccounts");
        self.list_all(&url, STORAGE_API_VERSION).await
    }

    async fn list_keys(&self, group: &str, account: &str) -> Result<Vec<AccountKey>, ApiError> {
        let url = format!("{}/listKeys", self.account_url(group, account));
        let list: KeyList = self
            .send_json::<(), _>(Method::POST, &url, STORAGE_API_VERSION, None)
            .await?;
        Ok(list.keys)
    }

    async fn regenerate_key(
        &self,
        group: &str,
        account: &str,
        key_name: &str,
    ) -> Result<Vec<AccountKey>, ApiError> {
        let url = format!("{}/regenerateKey", self.account_url(group, account));
        let body = RegenerateKeyRequest {
            key_name: key_name.to_string(),
        };
        let list: KeyList = self
            .send_json(Method::POST, &url, STORAGE_API_VERSION, Some(&body))
            .await?;
        Ok(list.keys)
    }

    async fn update_account(
        &self,
        group: &str,
        account: &str,
        request: &AccountUpdateRequest,
    ) -> Result<StorageAccount, ApiError> {
        self.send_json(
            Method::PATCH,
            &self.account_url(group, account),
            STORAGE_API_VERSION,
            Some(request),
        )
        .await
    }

    async fn list_usage(&self, location: &str) -> Result<Vec<Usage>, ApiError> {
        let url = self.subscription_url(&format!(
            "/providers/Microsoft.Storage/locations/{location}/usages"
        ));
        self.list_all(&url, STORAGE_API_VERSION).await
    }

    async fn delete_storage_account(&self, group: &str, account: &str) -> Result<(), ApiError> {
        self.delete(&self.account_url(group, account), STORAGE_API_VERSION)
            .await
    }

    async fn delete_resource_group(&self, group: &str) -> Result<(), ApiError> {
        self.delete(&self.group_url(group), RESOURCES_API_VERSION)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_resource_urls() {
        let settings = Settings {
            management_endpoint: "https://arm.example".to_string(),
            ..Settings::default()
        };
        let client = ArmClient::new(&settings, "sub-1", "tok".to_string()).unwrap();
        assert_eq!(
            client.account_url("grp", "acct"),
            "https://arm.example/subscriptions/sub-1/resourceGroups/grp/providers/Microsoft.Storage/storageAccounts/acct"
        );
        assert_eq!(
            client.group_url("grp"),
            "https://arm.example/subscriptions/sub-1/resourcegroups/grp"
        );
    }
}
