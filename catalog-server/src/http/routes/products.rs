//! Product endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{ProductId, ValidJson, ValidPage};
use crate::http::server::AppState;
use crate::models::{Product, ProductCreate, ProductUpdate};

/// GET /products - list products with skip/limit
async fn list_products(
    State(state): State<Arc<AppState>>,
    ValidPage(page): ValidPage,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products().list(page).await?;
    Ok(Json(products))
}

/// POST /products - create a new product
async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id} - get a single product
async fn get_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, ApiError> {
    let product = state.products().get_by_id(id).await?;
    Ok(Json(product))
}

/// PUT /products/{id} - partial update
async fn update_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
    ValidJson(input): ValidJson<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products().update(id, input).await?;
    Ok(Json(product))
}

/// DELETE /products/{id} - delete, returning the removed record
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, ApiError> {
    let product = state.products().delete(id).await?;
    Ok(Json(product))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
