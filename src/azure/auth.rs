//! Service principal authentication.
//!
//! Uses the client-credential flow from `azure_identity`; the token is
//! requested once per run for the Resource Manager scope.

use crate::config::{Credentials, Settings, MANAGEMENT_SCOPE};
use crate::error::DemoError;
use azure_core::auth::TokenCredential;
use azure_core::Url;
use azure_identity::{ClientSecretCredential, TokenCredentialOptions};

/// Obtain a bearer token for the Resource Manager.
///
/// # Arguments
/// * `creds` - Tenant, client ID and secret of the service principal
/// * `settings` - Supplies the authority host
///
/// # Returns
/// * `Ok(String)` - The raw bearer token
/// * `Err` - If the authority host is not a URL or the identity service refuses
pub async fn acquire_token(creds: &Credentials, settings: &Settings) -> Result<String, DemoError> {
    log::debug!(
        "Requesting token tenant={} client={} authority={}",
        creds.tenant_id,
        creds.client_id,
        settings.authority_host
    );
    let authority = Url::parse(&settings.authority_host)
        .map_err(|e| DemoError::operation("OAuthConfigForTenant", e))?;

    let credential = ClientSecretCredential::new(
        azure_core::new_http_client(),
        creds.tenant_id.clone(),
        creds.client_id.clone(),
        creds.client_secret.clone(),
        TokenCredentialOptions::new(authority),
    );

    let token = credential
        .get_token(&[MANAGEMENT_SCOPE])
        .await
        .map_err(|e| DemoError::operation("NewServicePrincipalToken", e))?;

    log::info!("Got management token, expires {}", token.expires_on);
    Ok(token.token.secret().to_string())
}
