//! Analytics summary.

use crate::error::Result;
use crate::model::AnalyticsData;
use crate::services::PostService;

#[derive(Clone)]
pub struct AnalyticsService {
    posts: PostService,
}

impl AnalyticsService {
    pub fn new(posts: PostService) -> Self {
        Self { posts }
    }

    /// Live post count plus the placeholder engagement figures.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the count fails.
    pub async fn summary(&self) -> Result<AnalyticsData> {
        let total_posts = self.posts.count().await?;
        Ok(AnalyticsData::with_post_count(total_posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PLACEHOLDER_FIELDS, SocialPostCreate};
    use crate::store::Store;
    use serde_json::json;

    #[tokio::test]
    async fn test_total_posts_is_live_count() {
        let posts = PostService::new(&Store::memory());
        let analytics = AnalyticsService::new(posts.clone());

        assert_eq!(analytics.summary().await.unwrap().total_posts, 0);

        for i in 0..3 {
            let input: SocialPostCreate =
                serde_json::from_value(json!({"platform": "instagram", "content": format!("post {i}")}))
                    .unwrap();
            posts.create(input).await.unwrap();
        }

        let summary = analytics.summary().await.unwrap();
        assert_eq!(summary.total_posts, 3);
        assert_eq!(summary.placeholder_fields, PLACEHOLDER_FIELDS);
    }
}
