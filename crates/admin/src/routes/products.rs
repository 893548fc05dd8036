//! Catalog route handlers: the upload orchestrators and brand-scoped views.

use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use maison_core::{ApiEnvelope, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::BrandAuth;
use crate::models::{BrandProductDetail, BrandProductSummary, Product, Variant};
use crate::services::catalog::{
    self, ImageForm, MeasurementForm, ProductForm, SizeForm, VariantForm,
};
use crate::state::AppState;

/// Body of `POST /api/products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub subcategory: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub season: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub gender: String,
    #[validate(length(equal = 3, message = "must be an ISO 4217 code"))]
    pub currency: String,
}

/// Body of `POST /api/products/{id}/variants`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub images: Vec<ImageRequest>,
    pub sizes: Vec<SizeRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub path: String,
    #[serde(default)]
    pub is_main: bool,
}

#[derive(Debug, Deserialize)]
pub struct SizeRequest {
    pub name: String,
    pub stock_quantity: i32,
    #[serde(default)]
    pub measurements: Vec<MeasurementRequest>,
}

#[derive(Debug, Deserialize)]
pub struct MeasurementRequest {
    pub name: String,
    pub value_cm: Decimal,
}

/// `POST /api/products`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn create(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ApiEnvelope<Product>>> {
    request.validate()?;
    let product = catalog::upload_product(
        state.store(),
        brand.id,
        ProductForm {
            name: request.name,
            description: request.description,
            category: request.category,
            subcategory: request.subcategory,
            season: request.season,
            gender: request.gender,
            currency: request.currency,
        },
    )
    .await?;
    Ok(Json(ApiEnvelope::ok("product created", product)))
}

/// `POST /api/products/{id}/variants`
#[instrument(skip(state, request), fields(brand_id = %brand.id))]
pub async fn create_variant(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Path(product_id): Path<i32>,
    Json(request): Json<CreateVariantRequest>,
) -> Result<Json<ApiEnvelope<Variant>>> {
    request.validate()?;
    if request.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }
    if request.sizes.iter().any(|size| size.stock_quantity < 0) {
        return Err(AppError::BadRequest(
            "stock quantity must not be negative".to_owned(),
        ));
    }

    let variant = catalog::upload_variant(
        state.store(),
        brand.id,
        ProductId::new(product_id),
        VariantForm {
            sku: request.sku,
            price: request.price,
            colors: request.colors,
            materials: request.materials,
            tags: request.tags,
            images: request
                .images
                .into_iter()
                .map(|image| ImageForm {
                    path: image.path,
                    is_main: image.is_main,
                })
                .collect(),
            sizes: request
                .sizes
                .into_iter()
                .map(|size| SizeForm {
                    name: size.name,
                    stock_quantity: size.stock_quantity,
                    measurements: size
                        .measurements
                        .into_iter()
                        .map(|measurement| MeasurementForm {
                            name: measurement.name,
                            value_cm: measurement.value_cm,
                        })
                        .collect(),
                })
                .collect(),
        },
    )
    .await?;
    Ok(Json(ApiEnvelope::ok("variant created", variant)))
}

/// `GET /api/products`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn list(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
) -> Result<Json<ApiEnvelope<Vec<BrandProductSummary>>>> {
    let products = state.store().brand_products(brand.id).await?;
    Ok(Json(ApiEnvelope::ok("products", products)))
}

/// `GET /api/products/{id}`
#[instrument(skip(state), fields(brand_id = %brand.id))]
pub async fn detail(
    State(state): State<AppState>,
    BrandAuth(brand): BrandAuth,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiEnvelope<BrandProductDetail>>> {
    let detail = state
        .store()
        .brand_product_detail(brand.id, ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id} not found")))?;
    Ok(Json(ApiEnvelope::ok("product", detail)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_request_validation() {
        let request = CreateProductRequest {
            name: String::new(),
            description: None,
            category: "Outerwear".to_owned(),
            subcategory: "Coats".to_owned(),
            season: "AW26".to_owned(),
            gender: "Women".to_owned(),
            currency: "EURO".to_owned(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("name"));
        assert!(errors.errors().contains_key("currency"));
    }
}
