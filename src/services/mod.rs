//! Service operations over the document store.
//!
//! Each service receives a [`Store`](crate::store::Store) handle at
//! construction and is cheap to clone.

mod accounts;
mod analytics;
pub mod content;
mod posts;
mod products;

pub use accounts::AccountService;
pub use analytics::AnalyticsService;
pub use content::{ChatCompletionsClient, CompletionClient, CompletionRequest, ContentGateway};
pub use posts::PostService;
pub use products::ProductService;
