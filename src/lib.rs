//! brandhub - content-management backend for a brand's social-media work.
//!
//! Stores a product catalog and social post drafts, tracks which social
//! platforms are connected, reports basic analytics, and relays prompts to a
//! text-generation provider to draft marketing copy. Everything is served as a
//! JSON API under `/api`.
//!
//! Layers, bottom-up:
//!
//! - [`store`] - document collections over redb or memory
//! - [`model`] - entity schemas and controlled vocabularies
//! - [`query`] - list filters
//! - [`services`] - per-entity operations and the content gateway
//! - [`http`] - axum router, extractors and error rendering

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod metrics;
pub mod model;
pub mod query;
pub mod services;
pub mod store;

pub use error::{Error, Result};
