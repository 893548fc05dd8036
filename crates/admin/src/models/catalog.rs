//! Catalog write models for the dashboard.
//!
//! `New*` records carry ids already resolved by the upload orchestrator
//! (`services::catalog`), so the store can write them without further
//! lookups. Read-side shapes mirror what the brand sees in the dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use maison_core::{
    BrandId, CategoryId, ColorId, CurrencyId, GenderId, ImageId, MaterialId, MeasurementTypeId,
    ProductId, SeasonId, SizeId, SubcategoryId, TagId, VariantId,
};

/// A product row as the dashboard sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub brand_id: BrandId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub season_id: SeasonId,
    pub gender_id: GenderId,
    pub currency_id: CurrencyId,
    pub created_at: DateTime<Utc>,
}

/// Fields of a new product row, all references already resolved.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub season_id: SeasonId,
    pub gender_id: GenderId,
    pub currency_id: CurrencyId,
}

/// A variant with its sub-resources, written in one transaction.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub sku: String,
    /// Authoritative unit price in the product's base currency.
    pub price: Decimal,
    pub color_ids: Vec<ColorId>,
    pub material_ids: Vec<MaterialId>,
    pub tag_ids: Vec<TagId>,
    pub images: Vec<NewImage>,
    pub sizes: Vec<NewVariantSize>,
}

/// An image row for a new variant.
#[derive(Debug, Clone)]
pub struct NewImage {
    /// Path inside the hosted object store (uploaded out of band).
    pub path: String,
    /// Exactly one image per variant is the main one.
    pub is_main: bool,
}

/// One size of a new variant, with stock and measurements.
#[derive(Debug, Clone)]
pub struct NewVariantSize {
    pub size_id: SizeId,
    pub stock_quantity: i32,
    pub measurements: Vec<NewMeasurement>,
}

/// One garment measurement for a size.
#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub measurement_type_id: MeasurementTypeId,
    pub value_cm: Decimal,
}

/// A created variant as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub price: Decimal,
}

/// One product in the brand's catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct BrandProductSummary {
    pub id: ProductId,
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    pub variant_count: i64,
    pub total_stock: i64,
    pub created_at: DateTime<Utc>,
}

/// A product with its variants expanded, scoped to the owning brand.
#[derive(Debug, Clone, Serialize)]
pub struct BrandProductDetail {
    pub product: Product,
    pub variants: Vec<BrandVariantDetail>,
}

/// One variant in the brand's product view.
#[derive(Debug, Clone, Serialize)]
pub struct BrandVariantDetail {
    pub id: VariantId,
    pub sku: String,
    pub price: Decimal,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<BrandVariantImage>,
    pub sizes: Vec<BrandVariantSize>,
}

/// An image attached to a variant.
#[derive(Debug, Clone, Serialize)]
pub struct BrandVariantImage {
    pub id: ImageId,
    pub path: String,
    pub is_main: bool,
}

/// Stock per size as the brand sees it.
#[derive(Debug, Clone, Serialize)]
pub struct BrandVariantSize {
    pub size_id: SizeId,
    pub size_name: String,
    pub stock_quantity: i32,
}
