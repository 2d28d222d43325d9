//! Configuration for the brandhub server.
//!
//! Settings are layered: defaults, then an optional TOML file, then
//! environment variables, then CLI flags (applied by the command). The
//! sections are:
//!
//! - [`ServerConfig`] - bind address, request timeout, CORS allow-list, metrics
//! - [`StoreConfig`] - document store connection string and database name
//! - [`ProviderConfig`] - text-generation provider credential and model
//! - [`BrandConfig`] - brand name used in the greeting and drafting instruction

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("Unknown log format '{other}'. Expected 'text' or 'json'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Root configuration (brandhub.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_format: LogFormat,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub brand: BrandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Allowed cross-origin callers. `"*"` permits any origin.
    pub cors_origins: Vec<String>,
    /// Serve Prometheus metrics at `/metrics`.
    pub metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: vec!["*".to_string()],
            metrics: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// True when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `memory://` or `redb://<dir>`.
    pub url: String,
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_STORE_URL.to_string(),
            database: constants::DEFAULT_DATABASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub name: String,
    pub model: String,
    /// Overrides the provider's well-known endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: constants::DEFAULT_PROVIDER.to_string(),
            model: constants::DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout_secs: constants::DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Base URL for API calls: the explicit `base_url`, else the provider's
    /// well-known endpoint.
    pub fn endpoint(&self) -> Option<String> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => constants::provider_base_url(&self.name).map(str::to_string),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub name: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_BRAND.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from `brandhub.toml` in the
    /// working directory if it exists, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read, any file contains
    /// invalid TOML, or an environment variable has an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None if Path::new(constants::CONFIG_FILE).is_file() => {
                Self::load_from(constants::CONFIG_FILE)?
            },
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment overrides read through `lookup`. Unset and blank
    /// variables leave the current value in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric, boolean or format variable cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(host) = var("BRANDHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("BRANDHUB_PORT") {
            self.server.port = parse_var("BRANDHUB_PORT", &port)?;
        }
        if let Some(metrics) = var("BRANDHUB_METRICS") {
            self.server.metrics = parse_bool("BRANDHUB_METRICS", &metrics)?;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            self.server.cors_origins = parse_origins(&origins);
        }
        if let Some(url) = var("STORE_URL") {
            self.store.url = url;
        }
        if let Some(database) = var("DB_NAME") {
            self.store.database = database;
        }
        if let Some(key) = var("LLM_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(name) = var("LLM_PROVIDER") {
            self.provider.name = name;
        }
        if let Some(model) = var("LLM_MODEL") {
            self.provider.model = model;
        }
        if let Some(url) = var("LLM_BASE_URL") {
            self.provider.base_url = Some(url);
        }
        if let Some(secs) = var("LLM_TIMEOUT_SECS") {
            self.provider.timeout_secs = parse_var("LLM_TIMEOUT_SECS", &secs)?;
        }
        if let Some(brand) = var("BRAND_NAME") {
            self.brand.name = brand;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.log_format = format.parse().context("Invalid LOG_FORMAT")?;
        }
        Ok(())
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Port 0 or a zero timeout
    /// - Empty or malformed store URL or database name
    /// - Empty model, or a provider with no known endpoint
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Server
        if self.server.host.trim().is_empty() {
            errors.push("server.host cannot be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push(
                "server.port cannot be 0\n  \
                 Use a port between 1 and 65535 (recommended: 8001)"
                    .to_string(),
            );
        } else if self.server.port < 1024 {
            warnings.push(format!(
                "server.port {} is a privileged port (< 1024)\n  \
                 Binding may require elevated permissions",
                self.server.port
            ));
        }

        if self.server.request_timeout_secs == 0 {
            errors.push("server.request_timeout_secs must be greater than 0".to_string());
        }

        if self.server.cors_origins.is_empty() {
            warnings.push(
                "server.cors_origins is empty\n  \
                 Browsers on other origins will be refused"
                    .to_string(),
            );
        } else if self.server.allows_any_origin() && self.server.cors_origins.len() > 1 {
            warnings.push(
                "server.cors_origins contains \"*\" alongside explicit origins\n  \
                 Every origin is allowed; the explicit entries have no effect"
                    .to_string(),
            );
        }

        // 2. Store
        let url = self.store.url.trim();
        if url.trim_end_matches('/') == "memory:" {
            warnings.push(
                "store.url is memory://\n  \
                 All records are lost when the server stops"
                    .to_string(),
            );
        } else if url.starts_with("redb://") {
            if self.store.database.trim().is_empty() {
                errors.push("store.database cannot be empty".to_string());
            } else if self
                .store
                .database
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            {
                errors.push(format!(
                    "store.database '{}' contains invalid characters\n  \
                     Use letters, digits, '_' or '-'",
                    self.store.database
                ));
            }
        } else {
            errors.push(format!(
                "store.url '{url}' has an unsupported scheme\n  \
                 Expected 'memory://' or 'redb://<dir>'"
            ));
        }

        // 3. Provider
        if self.provider.model.trim().is_empty() {
            errors.push("provider.model cannot be empty".to_string());
        }

        if self.provider.timeout_secs == 0 {
            errors.push("provider.timeout_secs must be greater than 0".to_string());
        } else if self.server.request_timeout_secs > 0
            && self.provider.timeout_secs >= self.server.request_timeout_secs
        {
            warnings.push(format!(
                "provider.timeout_secs ({}) is not below server.request_timeout_secs ({})\n  \
                 Slow provider calls will end as request timeouts instead of provider errors",
                self.provider.timeout_secs, self.server.request_timeout_secs
            ));
        }

        if self.provider.endpoint().is_none() {
            errors.push(format!(
                "provider.name '{}' has no known endpoint\n  \
                 Set provider.base_url (or LLM_BASE_URL)",
                self.provider.name
            ));
        }

        if !self.provider.has_api_key() {
            warnings.push(
                "provider.api_key is not set (LLM_API_KEY)\n  \
                 Content generation requests will fail until it is configured"
                    .to_string(),
            );
        }

        // 4. Brand
        if self.brand.name.trim().is_empty() {
            warnings.push("brand.name is empty".to_string());
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }

    /// TOML rendering with the API key masked.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn redacted(&self) -> Result<String> {
        let mut copy = self.clone();
        if copy.provider.api_key.is_some() {
            copy.provider.api_key = Some(constants::REDACTED.to_string());
        }
        toml::to_string_pretty(&copy).context("Failed to render configuration")
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {name} '{value}': {e}"))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("Invalid {name} '{value}': expected true or false")),
    }
}
