//! Catalog route handlers: browse, detail, and the stock-availability query.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use maison_core::{ApiEnvelope, BrandId, ProductId, VariantId};

use crate::error::{AppError, Result};
use crate::models::{ProductDetail, ProductFilter, ProductSummary, SizeAvailability};
use crate::state::AppState;

/// Query parameters of `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub brand_id: Option<i32>,
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

impl From<ListQuery> for ProductFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            brand_id: query.brand_id.map(BrandId::new),
            category: query.category,
            search: query.search,
            page: query.page,
            per_page: query.per_page,
        }
    }
}

/// Query parameters of `GET /api/variants/{id}/stock`.
#[derive(Debug, Deserialize, Validate)]
pub struct StockQuery {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub size: String,
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<Vec<ProductSummary>>>> {
    let filter: ProductFilter = query.into();
    let mut summaries = state.store().list_products(&filter).await?;
    for summary in &mut summaries {
        summary.image_path = summary
            .image_path
            .take()
            .map(|path| state.config().asset_url(&path));
    }
    Ok(Json(ApiEnvelope::ok("products", summaries)))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiEnvelope<ProductDetail>>> {
    let mut detail = state
        .store()
        .product_detail(ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id} not found")))?;

    for variant in &mut detail.variants {
        for image in &mut variant.images {
            image.path = state.config().asset_url(&image.path);
        }
    }
    Ok(Json(ApiEnvelope::ok("product", detail)))
}

/// `GET /api/variants/{id}/stock?size=M`
///
/// The stock-checker surface consulted before an add-to-cart; the answer is
/// advisory since the cart mutation re-validates under lock.
#[instrument(skip(state))]
pub async fn stock(
    State(state): State<AppState>,
    Path(variant_id): Path<i32>,
    Query(query): Query<StockQuery>,
) -> Result<Json<ApiEnvelope<SizeAvailability>>> {
    query.validate()?;
    let variant_id = VariantId::new(variant_id);
    let availability = state
        .store()
        .size_availability(variant_id, &query.size)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "variant {variant_id} is not available in size {}",
                query.size
            ))
        })?;
    Ok(Json(ApiEnvelope::ok("stock", availability)))
}
