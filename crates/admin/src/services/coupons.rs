//! Coupon workflow: name resolution, validation, then atomic store calls.
//!
//! Coupon forms name things the way brand operators see them: countries by
//! English name or code, products and categories by name. The service
//! resolves all of that to ids, so the store writes a fully resolved draft
//! in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use maison_core::{BrandId, Coupon, CouponId, CouponScope, Country, DiscountType};

use crate::db::{CouponDraft, DashboardStore};
use crate::error::{AppError, Result};

/// Raw coupon fields as the dashboard submits them.
#[derive(Debug, Clone)]
pub struct CouponForm {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub applies_to: CouponScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub min_purchase_amount: Option<Decimal>,
    pub is_active: bool,
    /// Product names, resolved within the brand's catalog.
    pub products: Vec<String>,
    /// Category names, resolved against the shared lookup table.
    pub categories: Vec<String>,
    /// Country names or alpha-2 codes.
    pub countries: Vec<String>,
}

/// Create a coupon from raw form fields.
pub async fn create_coupon(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    form: CouponForm,
) -> Result<Coupon> {
    let draft = resolve(store, brand_id, form).await?;
    Ok(store.create_coupon(brand_id, draft).await?)
}

/// Replace a coupon's fields and association sets from raw form fields.
pub async fn update_coupon(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    coupon_id: CouponId,
    form: CouponForm,
) -> Result<Coupon> {
    let draft = resolve(store, brand_id, form).await?;
    Ok(store.update_coupon(brand_id, coupon_id, draft).await?)
}

/// Resolve names to ids and check the form's internal consistency.
async fn resolve(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    form: CouponForm,
) -> Result<CouponDraft> {
    check_form(&form)?;

    let mut country_codes = Vec::with_capacity(form.countries.len());
    for country in &form.countries {
        let resolved = Country::resolve(country).ok_or_else(|| {
            AppError::BadRequest(format!("unknown country \"{country}\""))
        })?;
        country_codes.push(resolved.code.to_owned());
    }

    let mut product_ids = Vec::with_capacity(form.products.len());
    if form.applies_to == CouponScope::Products {
        for name in &form.products {
            let id = store
                .product_id_by_name(brand_id, name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("product \"{name}\" not found")))?;
            product_ids.push(id);
        }
    }

    let mut category_ids = Vec::with_capacity(form.categories.len());
    if form.applies_to == CouponScope::Categories {
        for name in &form.categories {
            let id = store
                .category_id_by_name(name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("category \"{name}\" not found")))?;
            category_ids.push(id);
        }
    }

    Ok(CouponDraft {
        code: form.code,
        description: form.description,
        discount_type: form.discount_type,
        discount_value: form.discount_value,
        applies_to: form.applies_to,
        starts_at: form.starts_at,
        expires_at: form.expires_at,
        usage_limit: form.usage_limit,
        min_purchase_amount: form.min_purchase_amount,
        is_active: form.is_active,
        product_ids,
        category_ids,
        country_codes,
    })
}

fn check_form(form: &CouponForm) -> Result<()> {
    if form.code.trim().is_empty() {
        return Err(AppError::BadRequest("coupon code must not be empty".to_owned()));
    }
    // Free-shipping coupons carry no amount; the value is stored as zero
    // and ignored at checkout.
    if form.discount_type == DiscountType::FreeShipping {
        if form.discount_value != Decimal::ZERO {
            return Err(AppError::BadRequest(
                "a free-shipping coupon must not carry a discount value".to_owned(),
            ));
        }
    } else if form.discount_value <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "discount value must be positive".to_owned(),
        ));
    }
    if form.discount_type == DiscountType::Percentage && form.discount_value > Decimal::from(100) {
        return Err(AppError::BadRequest(
            "percentage discount cannot exceed 100".to_owned(),
        ));
    }
    if let (Some(starts), Some(expires)) = (form.starts_at, form.expires_at)
        && starts > expires
    {
        return Err(AppError::BadRequest(
            "starts_at must not be after expires_at".to_owned(),
        ));
    }
    // A scoped coupon with an empty selection would be indistinguishable
    // from an unrestricted one; reject it instead.
    if form.applies_to == CouponScope::Products && form.products.is_empty() {
        return Err(AppError::BadRequest(
            "a products-scoped coupon needs at least one product".to_owned(),
        ));
    }
    if form.applies_to == CouponScope::Categories && form.categories.is_empty() {
        return Err(AppError::BadRequest(
            "a categories-scoped coupon needs at least one category".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::db::{BrandStore, CouponStore, MemoryDashboardStore};
    use crate::services::catalog::{self, ProductForm};

    use super::*;

    fn form(code: &str) -> CouponForm {
        CouponForm {
            code: code.to_owned(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            applies_to: CouponScope::EntireStore,
            starts_at: None,
            expires_at: None,
            usage_limit: None,
            min_purchase_amount: None,
            is_active: true,
            products: vec![],
            categories: vec![],
            countries: vec![],
        }
    }

    async fn store_with_product() -> (MemoryDashboardStore, BrandId) {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        catalog::upload_product(
            &store,
            brand.id,
            ProductForm {
                name: "Wool Coat".to_owned(),
                description: None,
                category: "Outerwear".to_owned(),
                subcategory: "Coats".to_owned(),
                season: "AW26".to_owned(),
                gender: "Women".to_owned(),
                currency: "EUR".to_owned(),
            },
        )
        .await
        .unwrap();
        (store, brand.id)
    }

    #[tokio::test]
    async fn test_country_names_resolve_to_codes() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("SPRING10");
        coupon_form.countries = vec!["France".to_owned(), "de".to_owned()];
        let coupon = create_coupon(&store, brand_id, coupon_form).await.unwrap();
        assert_eq!(coupon.country_codes, vec!["FR", "DE"]);
    }

    #[tokio::test]
    async fn test_unknown_country_rejected_with_name() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("SPRING10");
        coupon_form.countries = vec!["Atlantis".to_owned()];
        let err = create_coupon(&store, brand_id, coupon_form).await.unwrap_err();
        match err {
            AppError::BadRequest(message) => assert!(message.contains("Atlantis")),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_product_scope_resolves_names() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("COAT15");
        coupon_form.applies_to = CouponScope::Products;
        coupon_form.products = vec!["wool coat".to_owned()];
        let coupon = create_coupon(&store, brand_id, coupon_form).await.unwrap();
        assert_eq!(coupon.product_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_product_name_is_not_found() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("COAT15");
        coupon_form.applies_to = CouponScope::Products;
        coupon_form.products = vec!["Silk Scarf".to_owned()];
        let err = create_coupon(&store, brand_id, coupon_form).await.unwrap_err();
        match err {
            AppError::NotFound(message) => {
                assert_eq!(message, "product \"Silk Scarf\" not found");
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_product_scope_rejected() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("COAT15");
        coupon_form.applies_to = CouponScope::Products;
        let err = create_coupon(&store, brand_id, coupon_form).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_association_sets() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("EUR5");
        coupon_form.countries = vec!["France".to_owned()];
        let coupon = create_coupon(&store, brand_id, coupon_form).await.unwrap();

        let mut updated_form = form("EUR5");
        updated_form.countries = vec!["Germany".to_owned(), "Italy".to_owned()];
        let updated = update_coupon(&store, brand_id, coupon.id, updated_form)
            .await
            .unwrap();
        assert_eq!(updated.country_codes, vec!["DE", "IT"]);

        let details = store
            .coupon_details(brand_id, coupon.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.country_codes, vec!["DE", "IT"]);
    }

    #[tokio::test]
    async fn test_free_shipping_coupon_has_no_amount() {
        let (store, brand_id) = store_with_product().await;

        let mut coupon_form = form("SHIPFREE");
        coupon_form.discount_type = DiscountType::FreeShipping;
        coupon_form.discount_value = Decimal::ZERO;
        let coupon = create_coupon(&store, brand_id, coupon_form).await.unwrap();
        assert_eq!(coupon.discount_value, Decimal::ZERO);

        let mut with_amount = form("SHIPFREE2");
        with_amount.discount_type = DiscountType::FreeShipping;
        with_amount.discount_value = dec!(5);
        let err = create_coupon(&store, brand_id, with_amount).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_for_amount_discounts() {
        let (store, brand_id) = store_with_product().await;
        for discount_type in [DiscountType::Percentage, DiscountType::Fixed] {
            let mut coupon_form = form("ZERO");
            coupon_form.discount_type = discount_type;
            coupon_form.discount_value = Decimal::ZERO;
            let err = create_coupon(&store, brand_id, coupon_form).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_inverted_window_rejected() {
        let (store, brand_id) = store_with_product().await;
        let mut coupon_form = form("WINDOW");
        coupon_form.starts_at = Some(Utc::now());
        coupon_form.expires_at = Some(Utc::now() - chrono::Duration::days(1));
        let err = create_coupon(&store, brand_id, coupon_form).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
