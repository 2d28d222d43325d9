//! Entity schemas.
//!
//! Every entity comes in two shapes: a create shape holding what the caller
//! supplies, and a stored shape that adds the server-assigned `id` and
//! `created_at`. The stored shapes are what the document store persists and
//! what the API returns. Unknown fields are ignored on the way in.

mod account;
mod analytics;
mod content;
mod post;
mod product;
pub mod timestamp;
mod vocab;

pub use account::SocialAccount;
pub use analytics::{AnalyticsData, PLACEHOLDER_FIELDS};
pub use content::{ContentGenerateRequest, GeneratedContent};
pub use post::{SocialPost, SocialPostCreate};
pub use product::{Product, ProductCreate};
pub use vocab::{Category, Mood, Platform, PostStatus, Tone};

pub(crate) use vocab::non_blank;

/// Generates a fresh record id: a random 128-bit UUID rendered as text.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
