//! Domain models for the dashboard.

pub mod brand;
pub mod catalog;
pub mod payout;
pub mod returns;
pub mod shipping;

pub use brand::Brand;
pub use catalog::{
    BrandProductDetail, BrandProductSummary, BrandVariantDetail, BrandVariantImage,
    BrandVariantSize, NewImage, NewMeasurement, NewProduct, NewVariant, NewVariantSize, Product,
    Variant,
};
pub use payout::{PayoutAccount, PayoutAccountView, PayoutDetails};
pub use returns::{ReturnPolicy, ReturnPolicyDraft};
pub use shipping::{
    ShippingConfiguration, ShippingMethod, ShippingMethodUpdate, ShippingUpdate, ShippingZone,
    ShippingZoneUpdate,
};
