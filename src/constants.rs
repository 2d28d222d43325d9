//! Default values shared by configuration, CLI and server setup.

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8001;

/// Upper bound on a single request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Store used when none is configured.
pub const DEFAULT_STORE_URL: &str = "redb://./data";

/// Database name used when none is configured.
pub const DEFAULT_DATABASE: &str = "brandhub";

/// Text-generation provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-5.2";

/// Timeout for one provider call, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Brand named in the greeting and in the content-drafting instruction.
pub const DEFAULT_BRAND: &str = "Rare Revisit";

/// Default configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "brandhub.toml";

/// Placeholder printed in place of secrets.
pub const REDACTED: &str = "********";

/// Base URL for providers that need no explicit `base_url`.
pub fn provider_base_url(provider: &str) -> Option<&'static str> {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        _ => None,
    }
}
