//! Constants and environment-derived settings.

use crate::error::DemoError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

pub const STORAGE_PROVIDER: &str = "Microsoft.Storage";
pub const STORAGE_ACCOUNT_TYPE: &str = "Microsoft.Storage/storageAccounts";
pub const STORAGE_API_VERSION: &str = "2023-01-01";
pub const RESOURCES_API_VERSION: &str = "2021-04-01";
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

pub const SKU_NAME: &str = "Standard_LRS";
pub const ACCOUNT_KIND: &str = "StorageV2";

/// Tags written by the update step. Replaces whatever tags the account had.
pub const ACCOUNT_TAGS: [(&str, &str); 2] = [("who rocks", "rust"), ("where", "on azure")];

/// Answer that confirms the final delete.
pub const CONFIRM_TOKEN: &str = "y";

/// Characters of a key value shown on the console.
pub const KEY_PREFIX_LEN: usize = 5;

const DEFAULT_LOCATION: &str = "westus";
const DEFAULT_GROUP_NAME: &str = "your-azure-sample-group";
const DEFAULT_ACCOUNT_NAME: &str = "rustrocksonazure";
const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_POLL_SECS: u64 = 5;

/// Storage account names: 3-24 lowercase letters and digits.
static ACCOUNT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn account_name_regex() -> &'static Regex {
    ACCOUNT_NAME_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]{3,24}$").expect("Invalid Regex"))
}

pub fn is_valid_account_name(name: &str) -> bool {
    account_name_regex().is_match(name)
}

/// Service principal credentials. Order matches the order they are checked in.
#[derive(Clone)]
pub struct Credentials {
    pub subscription_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Resolve all four variables through `lookup`, failing on the first one
    /// that is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DemoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| -> Result<String, DemoError> {
            match lookup(var) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => {
                    log::error!("Missing environment variable {var}");
                    Err(DemoError::MissingEnv(var.to_string()))
                }
            }
        };
        Ok(Credentials {
            subscription_id: require("AZURE_SUBSCRIPTION_ID")?,
            tenant_id: require("AZURE_TENANT_ID")?,
            client_id: require("AZURE_CLIENT_ID")?,
            client_secret: require("AZURE_CLIENT_SECRET")?,
        })
    }

    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Names and endpoints for the run. Every field has a default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub location: String,
    pub group_name: String,
    pub account_name: String,
    pub management_endpoint: String,
    pub authority_host: String,
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            location: DEFAULT_LOCATION.to_string(),
            group_name: DEFAULT_GROUP_NAME.to_string(),
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}

impl Settings {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let pick = |var: &str, default: String| {
            lookup(var).filter(|v| !v.is_empty()).unwrap_or(default)
        };

        let poll_interval = match lookup("SAMPLE_POLL_INTERVAL_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    log::warn!("Ignoring SAMPLE_POLL_INTERVAL_SECS={v}, not a number");
                    defaults.poll_interval
                }
            },
            None => defaults.poll_interval,
        };

        let account_name = pick("SAMPLE_ACCOUNT_NAME", defaults.account_name);
        if !is_valid_account_name(&account_name) {
            // The provider rejects it too; the availability check reports why.
            log::warn!("Storage account name '{account_name}' looks invalid");
        }

        Settings {
            location: pick("SAMPLE_LOCATION", defaults.location),
            group_name: pick("SAMPLE_GROUP_NAME", defaults.group_name),
            account_name,
            management_endpoint: pick(
                "AZURE_RESOURCE_MANAGER_ENDPOINT",
                defaults.management_endpoint,
            )
            .trim_end_matches('/')
            .to_string(),
            authority_host: pick("AZURE_AUTHORITY_HOST", defaults.authority_host),
            poll_interval,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}
