//! Catalog read models for the storefront.
//!
//! The storefront never writes catalog data; these are the shapes the
//! browse and detail endpoints project out of the shared database.

use rust_decimal::Decimal;
use serde::Serialize;

use maison_core::{BrandId, CategoryId, ImageId, ProductId, SizeId, VariantId};

/// One product in a browse listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    /// Lowest variant price, absent for products with no variants yet.
    pub price_from: Option<Decimal>,
    /// Currency code the prices are denominated in.
    pub currency: String,
    /// Stored path of a representative image.
    pub image_path: Option<String>,
}

/// A product with all its variants expanded.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub name: String,
    pub description: Option<String>,
    pub category_name: String,
    pub subcategory_name: String,
    pub season_name: String,
    pub gender_name: String,
    pub currency: String,
    pub variants: Vec<VariantDetail>,
}

/// One purchasable variant of a product.
#[derive(Debug, Clone, Serialize)]
pub struct VariantDetail {
    pub id: VariantId,
    pub sku: String,
    pub price: Decimal,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<VariantImage>,
    pub sizes: Vec<VariantSizeDetail>,
}

/// An image attached to a variant.
#[derive(Debug, Clone, Serialize)]
pub struct VariantImage {
    pub id: ImageId,
    /// Stored path, resolved against the asset base URL when serialized
    /// for shoppers.
    pub path: String,
    pub is_main: bool,
}

/// Stock and measurements for one size of a variant.
#[derive(Debug, Clone, Serialize)]
pub struct VariantSizeDetail {
    pub size_id: SizeId,
    pub size_name: String,
    pub stock_quantity: i32,
    pub measurements: Vec<SizeMeasurementDetail>,
}

/// One garment measurement for a size (e.g., chest: 54.5 cm).
#[derive(Debug, Clone, Serialize)]
pub struct SizeMeasurementDetail {
    pub measurement_type: String,
    pub value_cm: Decimal,
}

/// Answer to a stock availability query for `(variant, size)`.
#[derive(Debug, Clone, Serialize)]
pub struct SizeAvailability {
    pub variant_id: VariantId,
    pub size_id: SizeId,
    pub size_name: String,
    pub available: i32,
}

/// The authoritative price of a variant, resolved before a cart add.
#[derive(Debug, Clone, Serialize)]
pub struct VariantPricing {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    /// `base_currency_price`; the value captured into cart lines.
    pub price: Decimal,
}

/// Filters accepted by the browse endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub brand_id: Option<BrandId>,
    /// Category name, matched case-insensitively.
    pub category: Option<String>,
    /// Substring match against product name and description.
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl ProductFilter {
    /// Rows to skip for the requested page (pages are 1-based).
    #[must_use]
    pub const fn offset(&self) -> i64 {
        let page = if self.page == 0 { 1 } else { self.page };
        ((page - 1) as i64) * self.limit()
    }

    /// Rows per page, clamped to the API maximum of 100.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        let per_page = if self.per_page == 0 { 20 } else { self.per_page };
        if per_page > 100 { 100 } else { per_page as i64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_and_clamping() {
        let filter = ProductFilter::default();
        assert_eq!(filter.offset(), 0);
        assert_eq!(filter.limit(), 20);

        let filter = ProductFilter {
            page: 3,
            per_page: 250,
            ..ProductFilter::default()
        };
        assert_eq!(filter.limit(), 100);
        assert_eq!(filter.offset(), 200);
    }
}
