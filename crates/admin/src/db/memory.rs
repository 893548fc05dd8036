//! In-memory [`DashboardStore`](crate::db::DashboardStore) used by service
//! and route tests. Mirrors the `PostgreSQL` store's semantics: atomic
//! lookup upserts, uniqueness conflicts, brand scoping, and return policy
//! versioning.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use maison_core::{
    BrandId, CategoryId, ColorId, Coupon, CouponId, CurrencyId, GenderId, ImageId, MaterialId,
    MeasurementTypeId, PayoutAccountId, ProductId, ReturnPolicyId, SeasonId, ShippingConfigId,
    ShippingMethodId, ShippingZoneId, SizeId, SubcategoryId, TagId, VariantId,
};

use crate::db::{
    BrandStore, CatalogStore, CouponDraft, CouponStore, PayoutStore, RepositoryError,
    ReturnPolicyStore, ShippingStore,
};
use crate::models::{
    Brand, BrandProductDetail, BrandProductSummary, BrandVariantDetail, BrandVariantImage,
    BrandVariantSize, NewProduct, NewVariant, PayoutAccount, PayoutDetails, Product, ReturnPolicy,
    ReturnPolicyDraft, ShippingConfiguration, ShippingMethod, ShippingUpdate, ShippingZone,
    Variant,
};

/// Name-keyed lookup table with a reverse index for display names.
#[derive(Debug, Default)]
struct Lookup {
    by_name: HashMap<String, i32>,
    names: HashMap<i32, String>,
}

impl Lookup {
    fn upsert(&mut self, name: &str, next_id: &mut i32) -> i32 {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        *next_id += 1;
        let id = *next_id;
        self.by_name.insert(name.to_owned(), id);
        self.names.insert(id, name.to_owned());
        id
    }

    fn name(&self, id: i32) -> String {
        self.names.get(&id).cloned().unwrap_or_default()
    }

    fn find_ci(&self, name: &str) -> Option<i32> {
        self.by_name
            .iter()
            .find(|(stored, _)| stored.eq_ignore_ascii_case(name))
            .map(|(_, &id)| id)
    }
}

#[derive(Debug, Clone)]
struct StoredVariant {
    id: VariantId,
    product_id: ProductId,
    sku: String,
    price: Decimal,
    color_ids: Vec<ColorId>,
    material_ids: Vec<MaterialId>,
    tag_ids: Vec<TagId>,
    images: Vec<(ImageId, String, bool)>,
    sizes: Vec<(SizeId, i32)>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i32,
    brands: HashMap<BrandId, Brand>,
    categories: Lookup,
    // Keyed by (category, name); reverse index shared via `subcategory_names`.
    subcategories: HashMap<(CategoryId, String), SubcategoryId>,
    subcategory_names: HashMap<SubcategoryId, String>,
    materials: Lookup,
    colors: Lookup,
    sizes: Lookup,
    tags: Lookup,
    seasons: Lookup,
    genders: Lookup,
    currencies: Lookup,
    measurement_types: Lookup,
    products: HashMap<ProductId, Product>,
    variants: HashMap<VariantId, StoredVariant>,
    coupons: HashMap<CouponId, Coupon>,
    shipping: HashMap<BrandId, ShippingConfiguration>,
    policies: Vec<ReturnPolicy>,
    payout_accounts: HashMap<BrandId, PayoutAccount>,
}

impl MemoryInner {
    fn next(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryDashboardStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryDashboardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BrandStore for MemoryDashboardStore {
    async fn brand_by_id(&self, brand_id: BrandId) -> Result<Option<Brand>, RepositoryError> {
        Ok(self.inner.lock().brands.get(&brand_id).cloned())
    }

    async fn create_brand(&self, name: &str, slug: &str) -> Result<Brand, RepositoryError> {
        let mut inner = self.inner.lock();
        if inner
            .brands
            .values()
            .any(|brand| brand.name == name || brand.slug == slug)
        {
            return Err(RepositoryError::Conflict(
                "a brand with this name or slug already exists".to_owned(),
            ));
        }
        let brand = Brand {
            id: BrandId::new(inner.next()),
            name: name.to_owned(),
            slug: slug.to_owned(),
            created_at: Utc::now(),
        };
        inner.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }
}

#[async_trait]
impl CatalogStore for MemoryDashboardStore {
    async fn upsert_category(&self, name: &str) -> Result<CategoryId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.categories.upsert(name, &mut next);
        inner.next_id = next;
        Ok(CategoryId::new(id))
    }

    async fn upsert_subcategory(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<SubcategoryId, RepositoryError> {
        let mut inner = self.inner.lock();
        let key = (category_id, name.to_owned());
        if let Some(&id) = inner.subcategories.get(&key) {
            return Ok(id);
        }
        let id = SubcategoryId::new(inner.next());
        inner.subcategories.insert(key, id);
        inner.subcategory_names.insert(id, name.to_owned());
        Ok(id)
    }

    async fn upsert_material(&self, name: &str) -> Result<MaterialId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.materials.upsert(name, &mut next);
        inner.next_id = next;
        Ok(MaterialId::new(id))
    }

    async fn upsert_color(&self, name: &str) -> Result<ColorId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.colors.upsert(name, &mut next);
        inner.next_id = next;
        Ok(ColorId::new(id))
    }

    async fn upsert_size(&self, name: &str) -> Result<SizeId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.sizes.upsert(name, &mut next);
        inner.next_id = next;
        Ok(SizeId::new(id))
    }

    async fn upsert_tag(&self, name: &str) -> Result<TagId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.tags.upsert(name, &mut next);
        inner.next_id = next;
        Ok(TagId::new(id))
    }

    async fn upsert_season(&self, name: &str) -> Result<SeasonId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.seasons.upsert(name, &mut next);
        inner.next_id = next;
        Ok(SeasonId::new(id))
    }

    async fn upsert_gender(&self, name: &str) -> Result<GenderId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.genders.upsert(name, &mut next);
        inner.next_id = next;
        Ok(GenderId::new(id))
    }

    async fn upsert_currency(&self, code: &str) -> Result<CurrencyId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.currencies.upsert(code, &mut next);
        inner.next_id = next;
        Ok(CurrencyId::new(id))
    }

    async fn upsert_measurement_type(
        &self,
        name: &str,
    ) -> Result<MeasurementTypeId, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut next = inner.next_id;
        let id = inner.measurement_types.upsert(name, &mut next);
        inner.next_id = next;
        Ok(MeasurementTypeId::new(id))
    }

    async fn create_product(
        &self,
        brand_id: BrandId,
        product: NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.inner.lock();
        if inner
            .products
            .values()
            .any(|existing| existing.brand_id == brand_id && existing.name == product.name)
        {
            return Err(RepositoryError::Conflict(
                "a product with this name already exists".to_owned(),
            ));
        }
        let created = Product {
            id: ProductId::new(inner.next()),
            brand_id,
            name: product.name,
            description: product.description,
            category_id: product.category_id,
            subcategory_id: product.subcategory_id,
            season_id: product.season_id,
            gender_id: product.gender_id,
            currency_id: product.currency_id,
            created_at: Utc::now(),
        };
        inner.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_variant(
        &self,
        product_id: ProductId,
        variant: NewVariant,
    ) -> Result<Variant, RepositoryError> {
        let mut inner = self.inner.lock();
        if !inner.products.contains_key(&product_id) {
            return Err(RepositoryError::NotFound);
        }
        if inner
            .variants
            .values()
            .any(|existing| existing.sku == variant.sku)
        {
            return Err(RepositoryError::Conflict(
                "a variant with this SKU already exists".to_owned(),
            ));
        }
        let id = VariantId::new(inner.next());
        let images = variant
            .images
            .iter()
            .map(|image| {
                (
                    ImageId::new(inner.next()),
                    image.path.clone(),
                    image.is_main,
                )
            })
            .collect();
        let stored = StoredVariant {
            id,
            product_id,
            sku: variant.sku.clone(),
            price: variant.price,
            color_ids: variant.color_ids,
            material_ids: variant.material_ids,
            tag_ids: variant.tag_ids,
            images,
            sizes: variant
                .sizes
                .iter()
                .map(|size| (size.size_id, size.stock_quantity))
                .collect(),
        };
        inner.variants.insert(id, stored);
        Ok(Variant {
            id,
            product_id,
            sku: variant.sku,
            price: variant.price,
        })
    }

    async fn product_id_by_name(
        &self,
        brand_id: BrandId,
        name: &str,
    ) -> Result<Option<ProductId>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .products
            .values()
            .find(|product| {
                product.brand_id == brand_id && product.name.eq_ignore_ascii_case(name)
            })
            .map(|product| product.id))
    }

    async fn category_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CategoryId>, RepositoryError> {
        Ok(self.inner.lock().categories.find_ci(name).map(CategoryId::new))
    }

    async fn brand_products(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<BrandProductSummary>, RepositoryError> {
        let inner = self.inner.lock();
        let mut summaries: Vec<BrandProductSummary> = inner
            .products
            .values()
            .filter(|product| product.brand_id == brand_id)
            .map(|product| {
                let variants: Vec<&StoredVariant> = inner
                    .variants
                    .values()
                    .filter(|variant| variant.product_id == product.id)
                    .collect();
                let total_stock = variants
                    .iter()
                    .flat_map(|variant| &variant.sizes)
                    .map(|(_, stock)| i64::from(*stock))
                    .sum();
                BrandProductSummary {
                    id: product.id,
                    name: product.name.clone(),
                    category_name: inner.categories.name(product.category_id.as_i32()),
                    subcategory_name: inner
                        .subcategory_names
                        .get(&product.subcategory_id)
                        .cloned()
                        .unwrap_or_default(),
                    variant_count: variants.len() as i64,
                    total_stock,
                    created_at: product.created_at,
                }
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn brand_product_detail(
        &self,
        brand_id: BrandId,
        product_id: ProductId,
    ) -> Result<Option<BrandProductDetail>, RepositoryError> {
        let inner = self.inner.lock();
        let Some(product) = inner
            .products
            .get(&product_id)
            .filter(|product| product.brand_id == brand_id)
        else {
            return Ok(None);
        };

        let mut variants: Vec<&StoredVariant> = inner
            .variants
            .values()
            .filter(|variant| variant.product_id == product_id)
            .collect();
        variants.sort_by_key(|variant| variant.id);

        let detail = BrandProductDetail {
            product: product.clone(),
            variants: variants
                .into_iter()
                .map(|variant| {
                    let mut images: Vec<BrandVariantImage> = variant
                        .images
                        .iter()
                        .map(|(id, path, is_main)| BrandVariantImage {
                            id: *id,
                            path: path.clone(),
                            is_main: *is_main,
                        })
                        .collect();
                    images.sort_by_key(|image| (!image.is_main, image.id));
                    BrandVariantDetail {
                        id: variant.id,
                        sku: variant.sku.clone(),
                        price: variant.price,
                        colors: sorted_names(&inner.colors, &variant.color_ids),
                        materials: sorted_names(&inner.materials, &variant.material_ids),
                        tags: sorted_names(&inner.tags, &variant.tag_ids),
                        images,
                        sizes: variant
                            .sizes
                            .iter()
                            .map(|(size_id, stock)| BrandVariantSize {
                                size_id: *size_id,
                                size_name: inner.sizes.name(size_id.as_i32()),
                                stock_quantity: *stock,
                            })
                            .collect(),
                    }
                })
                .collect(),
        };
        Ok(Some(detail))
    }
}

fn sorted_names<I: Copy + Into<i32>>(lookup: &Lookup, ids: &[I]) -> Vec<String> {
    let mut names: Vec<String> = ids.iter().map(|id| lookup.name((*id).into())).collect();
    names.sort();
    names
}

#[async_trait]
impl CouponStore for MemoryDashboardStore {
    async fn create_coupon(
        &self,
        brand_id: BrandId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError> {
        let mut inner = self.inner.lock();
        if inner
            .coupons
            .values()
            .any(|coupon| coupon.code.eq_ignore_ascii_case(&draft.code))
        {
            return Err(RepositoryError::Conflict(
                "a coupon with this code already exists".to_owned(),
            ));
        }
        let coupon = Coupon {
            id: CouponId::new(inner.next()),
            brand_id,
            code: draft.code,
            description: draft.description,
            discount_type: draft.discount_type,
            discount_value: draft.discount_value,
            applies_to: draft.applies_to,
            starts_at: draft.starts_at,
            expires_at: draft.expires_at,
            usage_limit: draft.usage_limit,
            usage_count: 0,
            min_purchase_amount: draft.min_purchase_amount,
            is_active: draft.is_active,
            product_ids: draft.product_ids,
            category_ids: draft.category_ids,
            country_codes: draft.country_codes,
        };
        inner.coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    async fn update_coupon(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        draft: CouponDraft,
    ) -> Result<Coupon, RepositoryError> {
        let mut inner = self.inner.lock();
        if inner.coupons.values().any(|coupon| {
            coupon.id != coupon_id && coupon.code.eq_ignore_ascii_case(&draft.code)
        }) {
            return Err(RepositoryError::Conflict(
                "a coupon with this code already exists".to_owned(),
            ));
        }
        let Some(coupon) = inner
            .coupons
            .get_mut(&coupon_id)
            .filter(|coupon| coupon.brand_id == brand_id)
        else {
            return Err(RepositoryError::NotFound);
        };
        coupon.code = draft.code;
        coupon.description = draft.description;
        coupon.discount_type = draft.discount_type;
        coupon.discount_value = draft.discount_value;
        coupon.applies_to = draft.applies_to;
        coupon.starts_at = draft.starts_at;
        coupon.expires_at = draft.expires_at;
        coupon.usage_limit = draft.usage_limit;
        coupon.min_purchase_amount = draft.min_purchase_amount;
        coupon.is_active = draft.is_active;
        coupon.product_ids = draft.product_ids;
        coupon.category_ids = draft.category_ids;
        coupon.country_codes = draft.country_codes;
        Ok(coupon.clone())
    }

    async fn set_coupon_active(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
        is_active: bool,
    ) -> Result<Coupon, RepositoryError> {
        let mut inner = self.inner.lock();
        let Some(coupon) = inner
            .coupons
            .get_mut(&coupon_id)
            .filter(|coupon| coupon.brand_id == brand_id)
        else {
            return Err(RepositoryError::NotFound);
        };
        coupon.is_active = is_active;
        Ok(coupon.clone())
    }

    async fn list_coupons(&self, brand_id: BrandId) -> Result<Vec<Coupon>, RepositoryError> {
        let inner = self.inner.lock();
        let mut coupons: Vec<Coupon> = inner
            .coupons
            .values()
            .filter(|coupon| coupon.brand_id == brand_id)
            .cloned()
            .collect();
        coupons.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(coupons)
    }

    async fn coupon_details(
        &self,
        brand_id: BrandId,
        coupon_id: CouponId,
    ) -> Result<Option<Coupon>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .coupons
            .get(&coupon_id)
            .filter(|coupon| coupon.brand_id == brand_id)
            .cloned())
    }
}

#[async_trait]
impl ShippingStore for MemoryDashboardStore {
    async fn shipping_configuration(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ShippingConfiguration>, RepositoryError> {
        Ok(self.inner.lock().shipping.get(&brand_id).cloned())
    }

    async fn upsert_shipping(
        &self,
        brand_id: BrandId,
        update: ShippingUpdate,
    ) -> Result<ShippingConfiguration, RepositoryError> {
        let mut inner = self.inner.lock();
        let mut config = match inner.shipping.remove(&brand_id) {
            Some(config) => config,
            None => ShippingConfiguration {
                id: ShippingConfigId::new(inner.next()),
                brand_id,
                methods: Vec::new(),
                zones: Vec::new(),
            },
        };

        for method in update.methods {
            match config
                .methods
                .iter_mut()
                .find(|existing| existing.method_type == method.method_type)
            {
                Some(existing) => {
                    existing.fee = method.fee;
                    existing.min_transit_days = method.min_transit_days;
                    existing.max_transit_days = method.max_transit_days;
                    existing.enabled = method.enabled;
                }
                None => config.methods.push(ShippingMethod {
                    id: ShippingMethodId::new(inner.next()),
                    method_type: method.method_type,
                    fee: method.fee,
                    min_transit_days: method.min_transit_days,
                    max_transit_days: method.max_transit_days,
                    enabled: method.enabled,
                }),
            }
        }
        for zone in update.zones {
            match config
                .zones
                .iter_mut()
                .find(|existing| existing.zone_type == zone.zone_type)
            {
                Some(existing) => {
                    existing.fee = zone.fee;
                    existing.country_codes = zone.country_codes;
                }
                None => config.zones.push(ShippingZone {
                    id: ShippingZoneId::new(inner.next()),
                    zone_type: zone.zone_type,
                    fee: zone.fee,
                    country_codes: zone.country_codes,
                }),
            }
        }

        config.methods.sort_by_key(|method| method.method_type);
        config.zones.sort_by_key(|zone| zone.zone_type);
        inner.shipping.insert(brand_id, config.clone());
        Ok(config)
    }
}

#[async_trait]
impl ReturnPolicyStore for MemoryDashboardStore {
    async fn publish_return_policy(
        &self,
        brand_id: BrandId,
        draft: ReturnPolicyDraft,
    ) -> Result<ReturnPolicy, RepositoryError> {
        let mut inner = self.inner.lock();
        let prior_version = inner
            .policies
            .iter()
            .filter(|policy| policy.brand_id == brand_id)
            .map(|policy| policy.version)
            .max()
            .unwrap_or(0);
        for policy in &mut inner.policies {
            if policy.brand_id == brand_id {
                policy.is_active = false;
            }
        }
        let policy = ReturnPolicy {
            id: ReturnPolicyId::new(inner.next()),
            brand_id,
            version: prior_version + 1,
            is_active: true,
            accepts_returns: draft.accepts_returns,
            window_days: draft.window_days,
            terms: draft.terms,
            created_at: Utc::now(),
        };
        inner.policies.push(policy.clone());
        Ok(policy)
    }

    async fn active_return_policy(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<ReturnPolicy>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .policies
            .iter()
            .find(|policy| policy.brand_id == brand_id && policy.is_active)
            .cloned())
    }

    async fn return_policy_history(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<ReturnPolicy>, RepositoryError> {
        let inner = self.inner.lock();
        let mut history: Vec<ReturnPolicy> = inner
            .policies
            .iter()
            .filter(|policy| policy.brand_id == brand_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(history)
    }
}

#[async_trait]
impl PayoutStore for MemoryDashboardStore {
    async fn upsert_payout_account(
        &self,
        brand_id: BrandId,
        details: PayoutDetails,
    ) -> Result<PayoutAccount, RepositoryError> {
        let mut inner = self.inner.lock();
        let existing = inner.payout_accounts.get(&brand_id).map(|account| account.id);
        let id = existing.unwrap_or_else(|| PayoutAccountId::new(inner.next()));
        let account = PayoutAccount {
            id,
            brand_id,
            holder_name: details.holder_name,
            bank_name: details.bank_name,
            iban: details.iban,
            country_code: details.country_code,
            currency_code: details.currency_code,
            updated_at: Utc::now(),
        };
        inner.payout_accounts.insert(brand_id, account.clone());
        Ok(account)
    }

    async fn payout_account(
        &self,
        brand_id: BrandId,
    ) -> Result<Option<PayoutAccount>, RepositoryError> {
        Ok(self.inner.lock().payout_accounts.get(&brand_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use maison_core::{CouponScope, DiscountType, ShippingMethodType, ShippingZoneType};

    use super::*;
    use crate::models::{ShippingMethodUpdate, ShippingZoneUpdate};

    fn draft(code: &str) -> CouponDraft {
        CouponDraft {
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
            product_ids: vec![],
            category_ids: vec![],
            country_codes: vec![],
        }
    }

    #[tokio::test]
    async fn test_lookup_upserts_are_idempotent() {
        let store = MemoryDashboardStore::new();
        let first = store.upsert_category("Outerwear").await.unwrap();
        let second = store.upsert_category("Outerwear").await.unwrap();
        assert_eq!(first, second);
        let other = store.upsert_category("Knitwear").await.unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_subcategory_scoped_to_category() {
        let store = MemoryDashboardStore::new();
        let outer = store.upsert_category("Outerwear").await.unwrap();
        let knit = store.upsert_category("Knitwear").await.unwrap();
        let a = store.upsert_subcategory(outer, "Classic").await.unwrap();
        let b = store.upsert_subcategory(knit, "Classic").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a, store.upsert_subcategory(outer, "Classic").await.unwrap());
    }

    #[tokio::test]
    async fn test_coupon_code_conflict_is_case_insensitive() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        store.create_coupon(brand.id, draft("WELCOME10")).await.unwrap();
        let err = store
            .create_coupon(brand.id, draft("welcome10"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_coupon_scoped_to_brand() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let other = store.create_brand("Nord", "nord").await.unwrap();
        let coupon = store.create_coupon(brand.id, draft("SPRING")).await.unwrap();
        let err = store
            .update_coupon(other.id, coupon.id, draft("SPRING"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_shipping_upsert_preserves_unnamed_keys() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();

        let config = store
            .upsert_shipping(
                brand.id,
                ShippingUpdate {
                    methods: vec![
                        ShippingMethodUpdate {
                            method_type: ShippingMethodType::Standard,
                            fee: dec!(4.90),
                            min_transit_days: 3,
                            max_transit_days: 5,
                            enabled: true,
                        },
                        ShippingMethodUpdate {
                            method_type: ShippingMethodType::Express,
                            fee: dec!(12.00),
                            min_transit_days: 1,
                            max_transit_days: 2,
                            enabled: true,
                        },
                    ],
                    zones: vec![ShippingZoneUpdate {
                        zone_type: ShippingZoneType::Domestic,
                        fee: dec!(0),
                        country_codes: vec!["FR".to_owned()],
                    }],
                },
            )
            .await
            .unwrap();
        assert_eq!(config.methods.len(), 2);

        // Touch only express; standard must survive unchanged.
        let config = store
            .upsert_shipping(
                brand.id,
                ShippingUpdate {
                    methods: vec![ShippingMethodUpdate {
                        method_type: ShippingMethodType::Express,
                        fee: dec!(9.50),
                        min_transit_days: 1,
                        max_transit_days: 2,
                        enabled: false,
                    }],
                    zones: vec![],
                },
            )
            .await
            .unwrap();
        assert_eq!(config.methods.len(), 2);
        let standard = config
            .methods
            .iter()
            .find(|m| m.method_type == ShippingMethodType::Standard)
            .unwrap();
        assert_eq!(standard.fee, dec!(4.90));
        let express = config
            .methods
            .iter()
            .find(|m| m.method_type == ShippingMethodType::Express)
            .unwrap();
        assert_eq!(express.fee, dec!(9.50));
        assert!(!express.enabled);
        assert_eq!(config.zones.len(), 1);
    }

    #[tokio::test]
    async fn test_return_policy_versioning() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();

        let v1 = store
            .publish_return_policy(
                brand.id,
                ReturnPolicyDraft {
                    accepts_returns: true,
                    window_days: 14,
                    terms: "14 days".to_owned(),
                },
            )
            .await
            .unwrap();
        assert_eq!(v1.version, 1);

        let v2 = store
            .publish_return_policy(
                brand.id,
                ReturnPolicyDraft {
                    accepts_returns: true,
                    window_days: 30,
                    terms: "30 days".to_owned(),
                },
            )
            .await
            .unwrap();
        assert_eq!(v2.version, 2);
        assert!(v2.is_active);

        let active = store.active_return_policy(brand.id).await.unwrap().unwrap();
        assert_eq!(active.version, 2);
        let history = store.return_policy_history(brand.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[1].is_active);
    }
}
