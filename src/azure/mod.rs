//! Azure Resource Manager interaction.
//!
//! This module handles everything that talks to Azure:
//! - [`auth`] - Service principal token acquisition
//! - [`client`] - Authenticated ARM REST calls, paging and long-running operations
//! - [`api`] - The [`StorageManagement`] seam used by the demo steps

mod api;
mod auth;
mod client;

// Re-export public types and functions
pub use api::StorageManagement;
pub use auth::acquire_token;
pub use client::ArmClient;
