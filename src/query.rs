//! Query parameters for list operations and their store predicates.
//!
//! Absent or blank parameters impose no constraint; present ones become exact
//! equality on the canonical stored text. Vocabulary values are normalized
//! before matching, so `mood=Sensual` and `mood=sensual` select the same
//! products.

use serde::Deserialize;

use crate::model::{Category, Mood, Platform, PostStatus, non_blank};
use crate::store::{Filter, FindOptions, SortOrder};

/// Upper bound on records returned by any list operation.
///
/// Larger result sets are truncated silently; this is not pagination.
pub const LIST_LIMIT: usize = 1000;

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "non_blank")]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "non_blank")]
    pub category: Option<Category>,
}

impl ProductQuery {
    pub fn filter(&self) -> Filter {
        Filter::all()
            .eq_opt("mood", self.mood.as_ref().map(Mood::as_str))
            .eq_opt("category", self.category.as_ref().map(Category::as_str))
    }

    pub fn options(&self) -> FindOptions {
        FindOptions::default().limit(LIST_LIMIT)
    }
}

/// Filters for `GET /posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    #[serde(default, deserialize_with = "non_blank")]
    pub platform: Option<Platform>,
    #[serde(default, deserialize_with = "non_blank")]
    pub status: Option<PostStatus>,
}

impl PostQuery {
    pub fn filter(&self) -> Filter {
        Filter::all()
            .eq_opt("platform", self.platform.as_ref().map(Platform::as_str))
            .eq_opt("status", self.status.as_ref().map(PostStatus::as_str))
    }

    /// Newest posts first.
    pub fn options(&self) -> FindOptions {
        FindOptions::default()
            .sort_by("created_at", SortOrder::Descending)
            .limit(LIST_LIMIT)
    }
}

/// Listing options for social accounts.
pub fn account_options() -> FindOptions {
    FindOptions::default().limit(LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_parameters_is_full_scan() {
        let query = ProductQuery::default();
        assert!(query.filter().is_empty());
        assert_eq!(query.options().limit, Some(LIST_LIMIT));
    }

    #[test]
    fn test_product_filter_normalizes_values() {
        let query = ProductQuery {
            mood: Some(Mood::parse("Sensual")),
            category: None,
        };
        assert!(query.filter().matches(&json!({"mood": "sensual", "category": "men"})));
        assert!(!query.filter().matches(&json!({"mood": "fresh"})));
    }

    #[test]
    fn test_blank_parameters_are_ignored() {
        let query: PostQuery = serde_json::from_value(json!({"platform": "", "status": "draft"})).unwrap();
        assert!(query.platform.is_none());
        assert_eq!(query.filter().clauses().len(), 1);
    }

    #[test]
    fn test_post_listing_is_newest_first() {
        let options = PostQuery::default().options();
        let sort = options.sort.unwrap();
        assert_eq!(sort.field, "created_at");
        assert_eq!(sort.order, SortOrder::Descending);
    }

    #[test]
    fn test_unknown_values_match_verbatim() {
        let query = PostQuery {
            platform: Some(Platform::parse("TikTok")),
            status: None,
        };
        assert!(query.filter().matches(&json!({"platform": "TikTok"})));
        assert!(!query.filter().matches(&json!({"platform": "tiktok"})));
    }
}
