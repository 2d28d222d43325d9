//! CLI command implementations for brandhub.
//!
//! - [`serve`] - Run the HTTP API (default command)
//! - [`check`] - Load, validate and print the effective configuration

pub mod check;
pub mod serve;
