//! Analytics summary.

use serde::{Deserialize, Serialize};

use super::vocab::Platform;

/// Engagement figures until platform insights are integrated.
pub const PLACEHOLDER_ENGAGEMENT: u64 = 1247;
pub const PLACEHOLDER_FOLLOWERS_GROWTH: u64 = 156;

/// Fields of [`AnalyticsData`] that hold fixed values rather than measurements.
pub const PLACEHOLDER_FIELDS: [&str; 3] = ["total_engagement", "followers_growth", "top_platform"];

/// Aggregate analytics.
///
/// Only `total_posts` is measured. The fields named in `placeholder_fields`
/// carry fixed values and are reported as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub total_posts: u64,
    pub total_engagement: u64,
    pub followers_growth: u64,
    pub top_platform: Platform,
    pub placeholder_fields: Vec<String>,
}

impl AnalyticsData {
    pub fn with_post_count(total_posts: u64) -> Self {
        Self {
            total_posts,
            total_engagement: PLACEHOLDER_ENGAGEMENT,
            followers_growth: PLACEHOLDER_FOLLOWERS_GROWTH,
            top_platform: Platform::Instagram,
            placeholder_fields: PLACEHOLDER_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}
