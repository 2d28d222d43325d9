//! HTTP API.
//!
//! All resource routes live under `/api`. Responses are JSON; failures carry
//! a `detail` field. Every response carries an `x-request-id` header, taken
//! from the request when present and generated otherwise.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod types;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use self::types::ErrorResponse;

use crate::config::ServerConfig;
use crate::services::{AccountService, AnalyticsService, ContentGateway, PostService, ProductService};
use crate::store::Store;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Services shared by every handler.
pub struct AppState {
    pub products: ProductService,
    pub posts: PostService,
    pub accounts: AccountService,
    pub analytics: AnalyticsService,
    pub content: ContentGateway,
    pub brand_name: String,
    pub metrics: Option<PrometheusHandle>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wires every service to the same store.
    pub fn new(store: &Store, content: ContentGateway, brand_name: impl Into<String>) -> Self {
        let posts = PostService::new(store);
        Self {
            products: ProductService::new(store),
            analytics: AnalyticsService::new(posts.clone()),
            posts,
            accounts: AccountService::new(store),
            content,
            brand_name: brand_name.into(),
            metrics: None,
        }
    }

    /// Serves `/metrics` from this Prometheus handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Builds the application router with its middleware stack.
pub fn router(state: SharedState, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let api = Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route(
            "/api/products",
            post(handlers::products_create).get(handlers::products_list),
        )
        .route(
            "/api/products/{id}",
            get(handlers::products_get).delete(handlers::products_delete),
        )
        .route("/api/content/generate", post(handlers::content_generate))
        .route(
            "/api/posts",
            post(handlers::posts_create).get(handlers::posts_list),
        )
        .route("/api/posts/{id}", delete(handlers::posts_delete))
        .route("/api/social-accounts", get(handlers::accounts_list))
        .route("/api/analytics", get(handlers::analytics_get))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .with_state(state);

    api.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %id,
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(cors_layer(server))
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(server.request_timeout())),
    )
}

/// Renders middleware failures as `{"detail": ...}`.
async fn handle_middleware_error(err: BoxError) -> Response {
    let (status, detail) = if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        error!(error = %err, "Unhandled middleware error");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };
    (status, Json(ErrorResponse { detail })).into_response()
}

/// CORS policy from the configured allow-list.
///
/// Methods and headers are mirrored from the preflight and credentials are
/// allowed. With `"*"` in the list the request origin is mirrored, since a
/// literal wildcard cannot be combined with credentials.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    if server.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn app(server: &ServerConfig) -> Router {
        let store = Store::memory();
        let content = ContentGateway::from_config(&ProviderConfig::default(), "Rare Revisit").unwrap();
        let state = Arc::new(AppState::new(&store, content, "Rare Revisit"));
        router(state, server)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_greeting_with_and_without_slash() {
        for path in ["/api", "/api/"] {
            let response = app(&ServerConfig::default())
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["message"], "Rare Revisit Automation Hub API");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["detail"], "Not Found");
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let generated = app(&ServerConfig::default())
            .oneshot(Request::get("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(generated.headers().contains_key(REQUEST_ID_HEADER));

        let echoed = app(&ServerConfig::default())
            .oneshot(
                Request::get("/api")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(echoed.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_wildcard_cors_mirrors_origin_with_credentials() {
        let response = app(&ServerConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/products")
                    .header("origin", "https://studio.example")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "https://studio.example");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_allow_list_rejects_other_origins() {
        let server = ServerConfig {
            cors_origins: vec!["https://studio.example".to_string()],
            ..ServerConfig::default()
        };
        let response = app(&server)
            .oneshot(
                Request::get("/api")
                    .header("origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_request_timeout_has_detail() {
        let response = handle_middleware_error(Box::new(Elapsed::new())).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_json(response).await["detail"], "Request timed out");
    }

    #[tokio::test]
    async fn test_other_middleware_error_is_json_500() {
        let response = handle_middleware_error("boom".into()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_metrics_disabled_is_404() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
