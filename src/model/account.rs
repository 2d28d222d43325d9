//! Connection state of external social platforms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::timestamp;
use super::vocab::Platform;
use crate::store::Document;

/// Integration status for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub id: String,
    pub platform: Platform,
    #[serde(default)]
    pub is_connected: bool,
    /// Opaque provider credentials. Nothing in this service writes them.
    #[serde(default)]
    pub credentials: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, with = "timestamp::option")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl SocialAccount {
    /// A disconnected placeholder account.
    pub fn placeholder(platform: Platform, id: String) -> Self {
        Self {
            id,
            platform,
            is_connected: false,
            credentials: None,
            last_sync: None,
        }
    }
}

impl Document for SocialAccount {
    const COLLECTION: &'static str = "social_accounts";

    fn id(&self) -> &str {
        &self.id
    }
}
