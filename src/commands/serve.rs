//! `brandhub serve` - run the HTTP API.
//!
//! Startup order: load configuration, initialize logging, validate, open the
//! document store, build services, bind. On Ctrl-C or SIGTERM the server
//! stops accepting connections, drains in-flight requests, and the store is
//! closed.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::{Config, LogFormat};
use crate::http::{self, AppState};
use crate::metrics;
use crate::services::ContentGateway;
use crate::store::Store;

/// Flags that override file and environment settings.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct ServeArgs {
    /// Bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Store connection string (memory:// or redb://<dir>)
    #[arg(long)]
    pub store_url: Option<String>,

    /// Database name within the store
    #[arg(long)]
    pub database: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Disable the /metrics endpoint
    #[arg(long)]
    pub no_metrics: bool,
}

impl ServeArgs {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.store_url {
            config.store.url.clone_from(url);
        }
        if let Some(database) = &self.database {
            config.store.database.clone_from(database);
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if self.no_metrics {
            config.server.metrics = false;
        }
    }
}

/// Runs the server until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the store cannot be opened,
/// the address cannot be bound, or the server fails.
pub async fn execute(config_path: Option<&Path>, args: &ServeArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    args.apply(&mut config);

    init_tracing(config.log_format);

    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let store = Store::connect(&config.store.url, &config.store.database)
        .with_context(|| format!("Failed to open store at {}", config.store.url))?;
    let content = ContentGateway::from_config(&config.provider, &config.brand.name)?;

    let mut state = AppState::new(&store, content, config.brand.name.clone());
    if config.server.metrics {
        state = state.with_metrics(metrics::install_prometheus()?);
    }
    let app = http::router(Arc::new(state), &config.server);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        addr = %listener.local_addr().context("Failed to read bound address")?,
        store = %config.store.url,
        database = %config.store.database,
        provider = %config.provider.name,
        model = %config.provider.model,
        "Server listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    info!("Server stopped, closing document store");
    store
        .close()
        .await
        .context("Failed to close document store")?;

    served
}

/// Initialize stdout logging in the configured format.
fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
