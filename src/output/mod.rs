//! Console output formatting.
//!
//! - [`terminal`] - Line formatting for accounts, keys and usage

mod terminal;

pub use terminal::{format_account_properties, format_key, format_usage, key_prefix};
