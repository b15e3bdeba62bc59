//! The demo itself: a fixed sequence of remote calls.
//!
//! Each step prints what it does, calls the [`StorageManagement`] seam and
//! prints the result. The first failure ends the run; nothing already
//! created is rolled back.

use crate::azure::StorageManagement;
use crate::config::{Settings, ACCOUNT_KIND, ACCOUNT_TAGS, SKU_NAME, STORAGE_PROVIDER};
use crate::error::{ApiError, DemoError};
use crate::models::{
    AccountCreateRequest, AccountKey, AccountProperties, AccountUpdateRequest,
    ResourceGroupRequest, Sku, StorageAccount,
};
use crate::output::{format_account_properties, format_key, format_usage};
use crate::prompt;
use colored::Colorize;
use std::io::{BufRead, Write};

/// How a run ended when no call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The account name was taken or invalid; nothing was created.
    NameUnavailable,
    /// Every step ran. `deleted` is whether the operator confirmed cleanup.
    Completed { deleted: bool },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::NameUnavailable => 1,
            Outcome::Completed { .. } => 0,
        }
    }
}

/// Attach the call name to a remote error.
fn failed(call: &'static str) -> impl Fn(ApiError) -> DemoError {
    move |e| DemoError::operation(call, e)
}

fn heading<W: Write>(out: &mut W, text: &str) -> Result<(), DemoError> {
    writeln!(out, "{}", text.bold())?;
    Ok(())
}

/// Run every step after authentication, in order.
///
/// # Arguments
/// * `api` - Remote operations, already authenticated
/// * `settings` - Location, group and account names
/// * `out` - Where the status lines go
/// * `input` - Where the delete confirmation is read from
pub async fn run<A, W, R>(
    api: &A,
    settings: &Settings,
    out: &mut W,
    input: &mut R,
) -> Result<Outcome, DemoError>
where
    A: StorageManagement,
    W: Write,
    R: BufRead,
{
    log::info!(
        "#Start run() group={} account={} location={}",
        settings.group_name,
        settings.account_name,
        settings.location
    );

    register_resource_provider(api, out).await?;
    if !check_account_availability(api, settings, out).await? {
        return Ok(Outcome::NameUnavailable);
    }
    create_resource_group(api, settings, out).await?;
    create_storage_account(api, settings, out).await?;
    print_storage_account_properties(api, settings, out).await?;
    list_storage_accounts_by_resource_group(api, settings, out).await?;
    list_storage_accounts_by_subscription(api, out).await?;
    let keys = get_storage_keys(api, settings, out).await?;
    regenerate_storage_key(api, settings, &keys, out).await?;
    update_storage_account(api, settings, out).await?;
    list_usage(api, settings, out).await?;

    let question = format!(
        "Press enter to delete the resource group '{}'... (y/n)",
        settings.group_name
    );
    let deleted = prompt::confirm(&question, input, out)?;
    if deleted {
        delete_resources(api, settings, out).await?;
    } else {
        log::info!("Cleanup declined, resources left in place");
    }

    log::info!("#End run() deleted={deleted}");
    Ok(Outcome::Completed { deleted })
}

async fn register_resource_provider<A: StorageManagement, W: Write>(
    api: &A,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Register resource provider...")?;
    let registration = api
        .register_provider(STORAGE_PROVIDER)
        .await
        .map_err(failed("Register"))?;
    log::info!(
        "Provider {} state={}",
        registration.namespace,
        registration.registration_state.as_deref().unwrap_or("unknown")
    );
    Ok(())
}

async fn check_account_availability<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<bool, DemoError> {
    heading(out, "Check account name availability...")?;
    let result = api
        .check_name_availability(&settings.account_name)
        .await
        .map_err(failed("CheckNameAvailability"))?;

    if result.name_available {
        writeln!(out, "\t'{}' is available!", settings.account_name)?;
        return Ok(true);
    }
    writeln!(
        out,
        "\t'{}' is not available :(\n\tReason: {}\n\tMessage: {}",
        settings.account_name,
        result.reason.as_deref().unwrap_or("None"),
        result.message.as_deref().unwrap_or("None")
    )?;
    writeln!(out, "No resources were created.")?;
    log::warn!("Account name '{}' unavailable", settings.account_name);
    Ok(false)
}

async fn create_resource_group<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Create resource group...")?;
    let request = ResourceGroupRequest {
        location: settings.location.clone(),
    };
    let group = api
        .create_resource_group(&settings.group_name, &request)
        .await
        .map_err(failed("CreateOrUpdate"))?;
    log::info!("Resource group ready: {}", group.id);
    Ok(())
}

async fn create_storage_account<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Create storage account...")?;
    let request = AccountCreateRequest {
        sku: Sku {
            name: SKU_NAME.to_string(),
            tier: None,
        },
        kind: ACCOUNT_KIND.to_string(),
        location: settings.location.clone(),
        properties: AccountProperties::default(),
    };
    let account = api
        .create_storage_account(&settings.group_name, &settings.account_name, &request)
        .await
        .map_err(failed("Create"))?;
    log::info!(
        "Storage account {} provisioning state {}",
        account.name,
        account.provisioning_state()
    );
    Ok(())
}

async fn print_storage_account_properties<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Get storage account properties...")?;
    let account = api
        .get_properties(&settings.group_name, &settings.account_name)
        .await
        .map_err(failed("GetProperties"))?;
    writeln!(out, "{}", format_account_properties(&account))?;
    Ok(())
}

fn print_account_list<W: Write>(out: &mut W, accounts: &[StorageAccount]) -> Result<(), DemoError> {
    for account in accounts {
        writeln!(out, "\t{}", account.name)?;
    }
    Ok(())
}

async fn list_storage_accounts_by_resource_group<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(
        out,
        &format!(
            "List all storage accounts in '{}' resource group",
            settings.group_name
        ),
    )?;
    let accounts = api
        .list_by_resource_group(&settings.group_name)
        .await
        .map_err(failed("ListByResourceGroup"))?;
    print_account_list(out, &accounts)
}

async fn list_storage_accounts_by_subscription<A: StorageManagement, W: Write>(
    api: &A,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "List all storage accounts under the subscription")?;
    let accounts = api.list_accounts().await.map_err(failed("List"))?;
    print_account_list(out, &accounts)
}

async fn get_storage_keys<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<Vec<AccountKey>, DemoError> {
    heading(out, "Get storage account keys...")?;
    let keys = api
        .list_keys(&settings.group_name, &settings.account_name)
        .await
        .map_err(failed("ListKeys"))?;
    if keys.is_empty() {
        return Err(DemoError::operation("ListKeys", "account returned no keys"));
    }

    writeln!(out, "'{}' storage account keys", settings.account_name)?;
    for key in &keys {
        writeln!(out, "{}", format_key(key))?;
        writeln!(out, "\t----------------")?;
    }
    Ok(keys)
}

async fn regenerate_storage_key<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    keys: &[AccountKey],
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Regenerate account key...")?;
    let Some(first) = keys.first() else {
        return Err(DemoError::operation("RegenerateKey", "no key to regenerate"));
    };
    let new_keys = api
        .regenerate_key(&settings.group_name, &settings.account_name, &first.key_name)
        .await
        .map_err(failed("RegenerateKey"))?;

    let regenerated = new_keys
        .iter()
        .find(|k| k.key_name == first.key_name)
        .or_else(|| new_keys.first())
        .ok_or_else(|| DemoError::operation("RegenerateKey", "response contained no keys"))?;
    if regenerated.value == first.value {
        log::warn!("Key {} value unchanged after regeneration", first.key_name);
    }

    writeln!(out, "New key")?;
    writeln!(out, "{}", format_key(regenerated))?;
    Ok(())
}

async fn update_storage_account<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Update storage account...")?;
    let request = AccountUpdateRequest {
        tags: ACCOUNT_TAGS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    let account = api
        .update_account(&settings.group_name, &settings.account_name, &request)
        .await
        .map_err(failed("Update"))?;
    log::info!("Account {} tags now {:?}", account.name, account.tags);
    Ok(())
}

async fn list_usage<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "List usage for storage accounts in subscription...")?;
    let usages = api
        .list_usage(&settings.location)
        .await
        .map_err(failed("ListUsage"))?;
    for usage in &usages {
        writeln!(out, "{}", format_usage(usage))?;
    }
    Ok(())
}

async fn delete_resources<A: StorageManagement, W: Write>(
    api: &A,
    settings: &Settings,
    out: &mut W,
) -> Result<(), DemoError> {
    heading(out, "Delete storage account...")?;
    api.delete_storage_account(&settings.group_name, &settings.account_name)
        .await
        .map_err(failed("Delete"))?;

    heading(out, "Delete resource group...")?;
    api.delete_resource_group(&settings.group_name)
        .await
        .map_err(failed("Delete"))?;
    Ok(())
}
