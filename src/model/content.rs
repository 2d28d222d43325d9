//! Request and response shapes for drafted copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use super::vocab::{Platform, Tone};

#[derive(Debug, Clone, Deserialize)]
pub struct ContentGenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub tone: Tone,
    /// Accepted from clients but not forwarded to the provider.
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub platform: Platform,
    #[serde(with = "timestamp")]
    pub generated_at: DateTime<Utc>,
}
