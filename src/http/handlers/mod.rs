//! HTTP API handlers organized by resource.

pub mod accounts;
pub mod analytics;
pub mod content;
pub mod posts;
pub mod products;
pub mod system;

// Re-export all handlers for use in routing
pub(crate) use accounts::accounts_list;
pub(crate) use analytics::analytics_get;
pub(crate) use content::content_generate;
pub(crate) use posts::{posts_create, posts_delete, posts_list};
pub(crate) use products::{products_create, products_delete, products_get, products_list};
pub(crate) use system::{metrics, not_found, root};
