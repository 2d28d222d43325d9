//! Closed vocabularies for enum-like string fields.
//!
//! Each vocabulary lists the values the product knows about. Known values are
//! matched case-insensitively and stored in their canonical lowercase form;
//! anything else is kept verbatim in the `Other` variant so records written
//! before a value was added to the list keep loading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value outside the known set, kept as supplied.
            Other(String),
        }

        impl $name {
            /// Canonical text of every known value, in declaration order.
            pub const KNOWN: &'static [&'static str] = &[$($text),+];

            /// Parses a raw value, normalizing known values.
            pub fn parse(raw: &str) -> Self {
                let trimmed = raw.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return Self::$variant;
                    }
                )+
                Self::Other(trimmed.to_string())
            }

            /// Canonical text for this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

vocabulary! {
    /// Social platform a post or account belongs to.
    Platform {
        Instagram => "instagram",
        Facebook => "facebook",
        Pinterest => "pinterest",
        Twitter => "twitter",
    }
}

vocabulary! {
    /// Publication state of a social post.
    PostStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        Published => "published",
    }
}

vocabulary! {
    /// Scent family used to group products.
    Mood {
        Sensual => "sensual",
        Fresh => "fresh",
        Woody => "woody",
        Floral => "floral",
    }
}

vocabulary! {
    /// Audience a product is marketed to.
    Category {
        Men => "men",
        Women => "women",
        Unisex => "unisex",
    }
}

vocabulary! {
    /// Voice requested for generated copy.
    Tone {
        Elegant => "elegant",
        Playful => "playful",
        Professional => "professional",
    }
}

impl Platform {
    /// Platforms that always have an account record.
    pub const DEFAULT_ACCOUNTS: [Platform; 4] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Pinterest,
        Platform::Twitter,
    ];

    /// Position in the default account listing; unknown platforms sort last.
    pub fn rank(&self) -> usize {
        Self::DEFAULT_ACCOUNTS
            .iter()
            .position(|p| p == self)
            .unwrap_or(Self::DEFAULT_ACCOUNTS.len())
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::Instagram
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::Elegant
    }
}

/// Deserializes an optional vocabulary value, treating blank strings as absent.
pub(crate) fn non_blank<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(T::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values_normalize_case() {
        assert_eq!(Mood::parse("Sensual"), Mood::Sensual);
        assert_eq!(Mood::parse("  WOODY "), Mood::Woody);
        assert_eq!(Mood::Sensual.as_str(), "sensual");
    }

    #[test]
    fn test_unknown_values_are_kept() {
        let mood = Mood::parse("Citrus");
        assert_eq!(mood, Mood::Other("Citrus".to_string()));
        assert_eq!(mood.as_str(), "Citrus");
        assert!(!mood.is_known());
    }

    #[test]
    fn test_serde_uses_canonical_text() {
        let json = serde_json::to_string(&Platform::parse("Instagram")).unwrap();
        assert_eq!(json, "\"instagram\"");

        let status: PostStatus = serde_json::from_str("\"Scheduled\"").unwrap();
        assert_eq!(status, PostStatus::Scheduled);
    }

    #[test]
    fn test_platform_rank() {
        assert_eq!(Platform::Instagram.rank(), 0);
        assert_eq!(Platform::Twitter.rank(), 3);
        assert_eq!(Platform::Other("tiktok".into()).rank(), 4);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PostStatus::default(), PostStatus::Draft);
        assert_eq!(Tone::default(), Tone::Elegant);
        assert_eq!(Platform::default(), Platform::Instagram);
    }
}
