//! Shared test harness: the real router bound to an ephemeral port.

#![allow(dead_code)]

use brandhub::config::{ProviderConfig, ServerConfig};
use brandhub::http::{self, AppState};
use brandhub::services::{CompletionClient, ContentGateway};
use brandhub::store::Store;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running brandhub server for integration tests.
pub struct TestHost {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    pub store: Store,
}

pub struct TestHostBuilder {
    server: ServerConfig,
    provider: ProviderConfig,
    brand: String,
    store: Option<Store>,
    completion_client: Option<Arc<dyn CompletionClient>>,
}

impl TestHost {
    pub fn builder() -> TestHostBuilder {
        TestHostBuilder {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            brand: "Rare Revisit".to_string(),
            store: None,
            completion_client: None,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(self.url(path)).send().await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> reqwest::Result<reqwest::Response> {
        self.client.post(self.url(path)).json(body).send().await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
    }

    pub async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.delete(self.url(path)).send().await
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Stops the server and waits for it to drain.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestHost {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl TestHostBuilder {
    pub fn api_key(mut self, key: &str) -> Self {
        self.provider.api_key = Some(key.to_string());
        self
    }

    pub fn provider_base_url(mut self, url: &str) -> Self {
        self.provider.base_url = Some(url.to_string());
        self
    }

    pub fn brand(mut self, name: &str) -> Self {
        self.brand = name.to_string();
        self
    }

    pub fn cors_origins(mut self, origins: &[&str]) -> Self {
        self.server.cors_origins = origins.iter().map(|o| (*o).to_string()).collect();
        self
    }

    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion_client = Some(client);
        self
    }

    pub async fn start(self) -> anyhow::Result<TestHost> {
        let store = self.store.unwrap_or_else(Store::memory);
        let content = match self.completion_client {
            Some(client) => ContentGateway::with_client(client, &self.provider, &self.brand),
            None => ContentGateway::from_config(&self.provider, &self.brand)?,
        };

        let state = Arc::new(AppState::new(&store, content, self.brand));
        let app = http::router(state, &self.server);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Ok(TestHost {
            addr,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            handle: Some(handle),
            store,
        })
    }
}
