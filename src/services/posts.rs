//! Social post operations.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Platform, PostStatus, SocialPost, SocialPostCreate, new_id};
use crate::query::PostQuery;
use crate::store::{Collection, Filter, Store};

#[derive(Clone)]
pub struct PostService {
    posts: Collection<SocialPost>,
}

impl PostService {
    pub fn new(store: &Store) -> Self {
        Self {
            posts: store.collection(),
        }
    }

    /// Stores a new post. `product_id` is recorded as given, without checking
    /// that the product exists.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the write fails.
    pub async fn create(&self, input: SocialPostCreate) -> Result<SocialPost> {
        let post = SocialPost::new(input, new_id(), Utc::now());
        if !post.platform.is_known() {
            warn!(platform = %post.platform, known = ?Platform::KNOWN, "Storing post for unrecognized platform");
        }
        if !post.status.is_known() {
            warn!(status = %post.status, known = ?PostStatus::KNOWN, "Storing post with unrecognized status");
        }
        self.posts.insert(&post).await.map_err(Error::storage)?;
        info!(id = %post.id, platform = %post.platform, status = %post.status, "Post created");
        Ok(post)
    }

    /// Lists posts, newest first.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the read fails.
    pub async fn list(&self, query: &PostQuery) -> Result<Vec<SocialPost>> {
        let posts = self
            .posts
            .find(&query.filter(), &query.options())
            .await
            .map_err(Error::storage)?;
        debug!(count = posts.len(), "Posts listed");
        Ok(posts)
    }

    /// # Errors
    ///
    /// `NotFound` if no post has this id, `StorageUnavailable` if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = self
            .posts
            .delete_one(&Filter::by_id(id))
            .await
            .map_err(Error::storage)?;
        if removed == 0 {
            return Err(Error::not_found("Post"));
        }
        info!(%id, "Post deleted");
        Ok(())
    }

    /// Number of stored posts.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the read fails.
    pub async fn count(&self) -> Result<u64> {
        self.posts
            .count(&Filter::all())
            .await
            .map_err(Error::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(platform: &str, content: &str) -> SocialPostCreate {
        serde_json::from_value(json!({"platform": platform, "content": content})).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let service = PostService::new(&Store::memory());
        let a = service.create(post("instagram", "A")).await.unwrap();
        let b = service.create(post("instagram", "B")).await.unwrap();
        let c = service.create(post("instagram", "C")).await.unwrap();

        let listed = service.list(&PostQuery::default()).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, [c.id.as_str(), b.id.as_str(), a.id.as_str()]);
    }

    #[tokio::test]
    async fn test_list_filters_by_platform_and_status() {
        let service = PostService::new(&Store::memory());
        service.create(post("instagram", "A")).await.unwrap();
        service.create(post("twitter", "B")).await.unwrap();
        let scheduled: SocialPostCreate = serde_json::from_value(json!({
            "platform": "twitter",
            "content": "C",
            "status": "scheduled",
            "scheduled_time": "2030-01-01T10:00:00Z",
        }))
        .unwrap();
        service.create(scheduled).await.unwrap();

        let query = PostQuery {
            platform: Some(Platform::Twitter),
            status: Some(PostStatus::Draft),
        };
        let found = service.list(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "B");
    }

    #[tokio::test]
    async fn test_dangling_product_reference_is_accepted() {
        let service = PostService::new(&Store::memory());
        let input: SocialPostCreate = serde_json::from_value(json!({
            "platform": "facebook",
            "content": "New arrival",
            "product_id": "does-not-exist",
        }))
        .unwrap();

        let created = service.create(input).await.unwrap();
        assert_eq!(created.product_id.as_deref(), Some("does-not-exist"));
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let service = PostService::new(&Store::memory());
        let created = service.create(post("pinterest", "A")).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 1);

        service.delete(&created.id).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 0);
        assert!(matches!(service.delete(&created.id).await, Err(Error::NotFound { .. })));
    }
}
