//! Terminal output utilities.
//!
//! Builds the lines the demo prints; callers decide where they go.

use crate::config::KEY_PREFIX_LEN;
use crate::models::{AccountKey, StorageAccount, Usage};

const LABEL_WIDTH: usize = 18;

/// Right-align `label` so the values of a block line up.
fn format_label(label: &str, value: &str) -> String {
    format!("\t{label:>width$}: {value}", width = LABEL_WIDTH)
}

/// Properties block printed after the account is read back.
pub fn format_account_properties(account: &StorageAccount) -> String {
    [
        format!("'{}' storage account properties", account.name),
        format_label("ID", &account.id),
        format_label("Sku Name", account.sku_name()),
        format_label("Type", &account.resource_type),
        format_label("Location", &account.location),
        format_label("Provisioning State", account.provisioning_state()),
    ]
    .join("\n")
}

/// Leading characters of a secret; never panics on short or multi-byte values.
pub fn key_prefix(value: &str) -> &str {
    match value.char_indices().nth(KEY_PREFIX_LEN) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Key name, truncated value and permissions, one per line.
pub fn format_key(key: &AccountKey) -> String {
    format!(
        "\tKey name: {}\n\tValue: {}...\n\tPermissions: {}",
        key.key_name,
        key_prefix(&key.value),
        key.permissions
    )
}

/// `name: current / limit`
pub fn format_usage(usage: &Usage) -> String {
    format!(
        "\t{}: {} / {}",
        usage.name.value, usage.current_value, usage.limit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountProperties, Sku, UsageName};

    #[test]
    fn test_key_prefix_long() {
        assert_eq!(key_prefix("abcdefghij=="), "abcde");
    }

    #[test]
    fn test_key_prefix_short() {
        assert_eq!(key_prefix("abc"), "abc");
        assert_eq!(key_prefix(""), "");
    }

    #[test]
    fn test_key_prefix_multibyte() {
        assert_eq!(key_prefix("ééééééé"), "ééééé");
    }

    #[test]
    fn test_format_key() {
        let key = AccountKey {
            key_name: "key1".to_string(),
            value: "Zm9vYmFyYmF6".to_string(),
            permissions: "FULL".to_string(),
        };
        assert_eq!(
            format_key(&key),
            "\tKey name: key1\n\tValue: Zm9vY...\n\tPermissions: FULL"
        );
    }

    #[test]
    fn test_format_usage() {
        let usage = Usage {
            unit: Some("Count".to_string()),
            current_value: 3,
            limit: 250,
            name: UsageName {
                value: "StorageAccounts".to_string(),
                localized_value: Some("Storage Accounts".to_string()),
            },
        };
        assert_eq!(format_usage(&usage), "\tStorageAccounts: 3 / 250");
    }

    #[test]
    fn test_format_account_properties_aligns_labels() {
        let account = StorageAccount {
            id: "/subscriptions/s/acct".to_string(),
            name: "acct".to_string(),
            resource_type: "Microsoft.Storage/storageAccounts".to_string(),
            location: "westus".to_string(),
            sku: Some(Sku {
                name: "Standard_LRS".to_string(),
                tier: None,
            }),
            properties: AccountProperties {
                provisioning_state: Some("Succeeded".to_string()),
            },
            ..StorageAccount::default()
        };
        let lines: Vec<String> = format_account_properties(&account)
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines[0], "'acct' storage account properties");
        assert_eq!(lines[1], "\t                ID: /subscriptions/s/acct");
        assert_eq!(lines[2], "\t          Sku Name: Standard_LRS");
        assert_eq!(lines[5], "\tProvisioning State: Succeeded");
    }
}
