//! Social posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use super::vocab::{Platform, PostStatus, non_blank};
use crate::store::Document;

/// Fields a caller supplies when drafting a post.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialPostCreate {
    pub platform: Platform,
    pub content: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "non_blank")]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub product_id: Option<String>,
}

/// A stored post. `product_id` is not checked against the product catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub platform: Platform,
    pub content: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl SocialPost {
    pub fn new(input: SocialPostCreate, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            platform: input.platform,
            content: input.content,
            caption: input.caption,
            scheduled_time: input.scheduled_time,
            status: input.status.unwrap_or_default(),
            product_id: input.product_id,
            created_at,
        }
    }
}

impl Document for SocialPost {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }
}
