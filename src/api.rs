//! HTTP routes for live re-pricing and server-side quotes

use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post}, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::aggregates::{Product, Selections};
use crate::pricing::{calculate, PriceCalculationContext, PriceSummary};
use crate::PricingError;

#[derive(Clone)] pub struct AppState { pub catalog: Arc<Catalog> }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "printshop-pricing"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/products/:id/quote", post(quote_product))
        .route("/api/v1/pricing/calculate", post(calculate_price))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

/// Price with entities the caller already resolved.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub product: Product,
    #[serde(default)] pub selections: Selections,
    #[serde(default)] pub context: PriceCalculationContext,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote { pub id: Uuid, pub product_id: String, pub quoted_at: DateTime<Utc>, pub summary: PriceSummary }

fn error_response(e: PricingError) -> (StatusCode, String) {
    match e {
        PricingError::ProductNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn list_products(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(s.catalog.products().cloned().collect())
}

async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>, (StatusCode, String)> {
    s.catalog.product(&id).cloned().map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn quote_product(State(s): State<AppState>, Path(id): Path<String>, Json(selections): Json<Selections>) -> Result<Json<PriceQuote>, (StatusCode, String)> {
    let summary = s.catalog.quote(&id, &selections).map_err(error_response)?;
    tracing::info!(product_id = %id, total = %summary.total, "quote issued");
    Ok(Json(PriceQuote { id: Uuid::now_v7(), product_id: id, quoted_at: Utc::now(), summary }))
}

async fn calculate_price(Json(r): Json<CalculateRequest>) -> Json<PriceSummary> {
    Json(calculate(&r.product, &r.selections, &r.context))
}
