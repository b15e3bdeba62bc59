//! Provision, inspect and tear down an Azure storage account through the
//! Resource Manager REST API.

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod prompt;
pub mod steps;

use azure::{acquire_token, ArmClient, StorageManagement};
use config::{Credentials, Settings};
use error::DemoError;
use std::future::Future;
use std::io::{self, BufRead, Write};
pub use steps::Outcome;

/// Authenticate once and build the REST client.
pub async fn connect_arm(creds: Credentials, settings: Settings) -> Result<ArmClient, DemoError> {
    let token = acquire_token(&creds, &settings).await?;
    ArmClient::new(&settings, &creds.subscription_id, token)
        .map_err(|e| DemoError::operation("NewClient", e))
}

/// Resolve credentials and settings through `lookup`, then `connect` and run
/// the demo.
///
/// `connect` is only called once every required variable is present, so a
/// missing one ends the run before anything goes over the network.
pub async fn run_from_lookup<F, C, Fut, A, W, R>(
    lookup: F,
    connect: C,
    out: &mut W,
    input: &mut R,
) -> Result<Outcome, DemoError>
where
    F: Fn(&str) -> Option<String>,
    C: FnOnce(Credentials, Settings) -> Fut,
    Fut: Future<Output = Result<A, DemoError>>,
    A: StorageManagement,
    W: Write,
    R: BufRead,
{
    let creds = Credentials::from_lookup(&lookup)?;
    let settings = Settings::from_lookup(&lookup);
    log::debug!("{creds:?} {settings:?}");

    let api = connect(creds, settings.clone()).await?;
    steps::run(&api, &settings, out, input).await
}

/// [`run_from_lookup`] against the process environment and the console.
pub async fn run_from_env() -> Result<Outcome, DemoError> {
    let mut out = io::stdout();
    let mut input = io::stdin().lock();
    run_from_lookup(
        |var| std::env::var(var).ok(),
        connect_arm,
        &mut out,
        &mut input,
    )
    .await
}
