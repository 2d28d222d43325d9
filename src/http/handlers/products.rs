//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use super::super::SharedState;
use super::super::extract::{ApiJson, ApiQuery};
use super::super::types::MessageResponse;
use crate::error::Result;
use crate::model::{Product, ProductCreate};
use crate::query::ProductQuery;

/// POST /api/products - Create a product.
pub(crate) async fn products_create(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<ProductCreate>,
) -> Result<Json<Product>> {
    let product = state.products.create(input).await?;
    Ok(Json(product))
}

/// GET /api/products - List products, optionally filtered by mood and category.
pub(crate) async fn products_list(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.products.list(&query).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - Fetch one product.
pub(crate) async fn products_get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.products.get(&id).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - Delete a product.
pub(crate) async fn products_delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.products.delete(&id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
