//! Domain models for the storefront.

pub mod cart;
pub mod catalog;

pub use cart::{Cart, CartDetail, CartItem, CartLine};
pub use catalog::{
    ProductDetail, ProductFilter, ProductSummary, SizeAvailability, SizeMeasurementDetail,
    VariantDetail, VariantImage, VariantPricing, VariantSizeDetail,
};
