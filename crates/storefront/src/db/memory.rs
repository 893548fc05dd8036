//! In-memory store used by unit and integration tests.
//!
//! Mirrors the transactional semantics of the `PostgreSQL` store (line
//! upserts, stock checks against the resulting quantity, total
//! reconciliation after every mutation) over plain maps behind a mutex, so
//! workflow logic is exercised without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use maison_core::{
    BrandId, CartId, CartItemId, CategoryId, Coupon, CouponId, ProductId, ShopperIdentity, SizeId,
    VariantId,
};

use crate::db::carts::CartStore;
use crate::db::catalog::CatalogReader;
use crate::db::coupons::CouponReader;
use crate::db::RepositoryError;
use crate::models::{
    Cart, CartDetail, CartItem, CartLine, ProductDetail, ProductFilter, ProductSummary,
    SizeAvailability, VariantDetail, VariantImage, VariantPricing, VariantSizeDetail,
};

/// Catalog fixture for seeding one variant and its surroundings.
#[derive(Debug, Clone)]
pub struct VariantFixture {
    pub brand_id: BrandId,
    pub brand_name: String,
    pub product_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub sku: String,
    pub price: Decimal,
    /// `(size name, stock quantity)` pairs.
    pub sizes: Vec<(String, i32)>,
}

#[derive(Debug, Clone)]
struct StoredProduct {
    id: ProductId,
    brand_id: BrandId,
    brand_name: String,
    name: String,
    category_id: CategoryId,
    category_name: String,
}

#[derive(Debug, Clone)]
struct StoredVariant {
    id: VariantId,
    product_id: ProductId,
    sku: String,
    price: Decimal,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i32,
    products: HashMap<ProductId, StoredProduct>,
    variants: HashMap<VariantId, StoredVariant>,
    /// Size name registry; ids are shared across variants like the
    /// `size` lookup table.
    size_names: HashMap<SizeId, String>,
    stock: HashMap<(VariantId, SizeId), i32>,
    carts: HashMap<CartId, Cart>,
    items: HashMap<CartItemId, CartItem>,
    coupons: HashMap<CouponId, Coupon>,
}

impl MemoryInner {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn size_id_by_name(&self, name: &str) -> Option<SizeId> {
        self.size_names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    fn intern_size(&mut self, name: &str) -> SizeId {
        if let Some(id) = self.size_id_by_name(name) {
            return id;
        }
        let id = SizeId::new(self.allocate_id());
        self.size_names.insert(id, name.to_owned());
        id
    }

    fn cart_id_for(&self, shopper: ShopperIdentity) -> Option<CartId> {
        self.carts
            .values()
            .find(|cart| match shopper {
                ShopperIdentity::Customer(id) => cart.customer_id == Some(id),
                ShopperIdentity::Anonymous(id) => cart.anonymous_id == Some(id),
            })
            .map(|cart| cart.id)
    }

    fn resolve_cart(&mut self, shopper: ShopperIdentity) -> CartId {
        if let Some(id) = self.cart_id_for(shopper) {
            return id;
        }
        let id = CartId::new(self.allocate_id());
        let now = Utc::now();
        self.carts.insert(
            id,
            Cart {
                id,
                customer_id: shopper.customer_id(),
                anonymous_id: shopper.anonymous_id(),
                coupon_id: None,
                total_price: Decimal::ZERO,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    fn resum_total(&mut self, cart_id: CartId) {
        let total: Decimal = self
            .items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .map(CartItem::line_total)
            .sum();
        if let Some(cart) = self.carts.get_mut(&cart_id) {
            cart.total_price = total;
            cart.updated_at = Utc::now();
        }
    }

    fn detail(&self, cart_id: CartId) -> Result<CartDetail, RepositoryError> {
        let cart = self
            .carts
            .get(&cart_id)
            .ok_or(RepositoryError::NotFound)?
            .clone();

        let mut lines: Vec<CartLine> = Vec::new();
        let mut items: Vec<&CartItem> = self
            .items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .collect();
        items.sort_by_key(|item| (item.created_at, item.id));
        for item in items {
            let variant = self.variants.get(&item.variant_id).ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "cart item {} references missing variant",
                    item.id
                ))
            })?;
            let product = self.products.get(&variant.product_id).ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "variant {} references missing product",
                    variant.id
                ))
            })?;
            let size_name = self
                .size_names
                .get(&item.size_id)
                .cloned()
                .unwrap_or_default();
            lines.push(CartLine {
                item: item.clone(),
                product_id: product.id,
                brand_id: product.brand_id,
                product_name: product.name.clone(),
                sku: variant.sku.clone(),
                size_name,
                image_path: None,
                category_id: product.category_id,
            });
        }

        let coupon = match cart.coupon_id {
            Some(id) => Some(
                self.coupons
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::DataCorruption(format!(
                            "cart {cart_id} references missing coupon {id}"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(CartDetail {
            cart,
            lines,
            coupon,
        })
    }
}

/// Map-backed [`StorefrontStore`](crate::db::StorefrontStore) for tests.
#[derive(Default)]
pub struct MemoryStorefrontStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStorefrontStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product with one variant, returning `(product, variant)` ids.
    pub fn add_variant(&self, fixture: VariantFixture) -> (ProductId, VariantId) {
        let mut inner = self.inner.lock();
        let product_id = ProductId::new(inner.allocate_id());
        let variant_id = VariantId::new(inner.allocate_id());
        inner.products.insert(
            product_id,
            StoredProduct {
                id: product_id,
                brand_id: fixture.brand_id,
                brand_name: fixture.brand_name,
                name: fixture.product_name,
                category_id: fixture.category_id,
                category_name: fixture.category_name,
            },
        );
        inner.variants.insert(
            variant_id,
            StoredVariant {
                id: variant_id,
                product_id,
                sku: fixture.sku,
                price: fixture.price,
            },
        );
        for (size_name, stock) in fixture.sizes {
            let size_id = inner.intern_size(&size_name);
            inner.stock.insert((variant_id, size_id), stock);
        }
        (product_id, variant_id)
    }

    /// Seed a coupon.
    pub fn add_coupon(&self, coupon: Coupon) {
        self.inner.lock().coupons.insert(coupon.id, coupon);
    }

    /// Overwrite the stock for `(variant, size name)`.
    pub fn set_stock(&self, variant_id: VariantId, size_name: &str, quantity: i32) {
        let mut inner = self.inner.lock();
        let size_id = inner.intern_size(size_name);
        inner.stock.insert((variant_id, size_id), quantity);
    }

    /// The size id the store interned for `name`, if seeded.
    #[must_use]
    pub fn size_id(&self, name: &str) -> Option<SizeId> {
        self.inner.lock().size_id_by_name(name)
    }
}

#[async_trait]
impl CartStore for MemoryStorefrontStore {
    async fn find_or_create_cart(
        &self,
        shopper: ShopperIdentity,
    ) -> Result<Cart, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);
        Ok(inner.carts[&cart_id].clone())
    }

    async fn cart_detail(&self, shopper: ShopperIdentity) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);
        inner.detail(cart_id)
    }

    async fn add_item(
        &self,
        shopper: ShopperIdentity,
        variant_id: VariantId,
        size_id: SizeId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);

        let unit_price = inner
            .variants
            .get(&variant_id)
            .map(|variant| variant.price)
            .ok_or(RepositoryError::NotFound)?;
        let stock = *inner
            .stock
            .get(&(variant_id, size_id))
            .ok_or(RepositoryError::NotFound)?;

        let existing = inner
            .items
            .values()
            .find(|item| {
                item.cart_id == cart_id && item.variant_id == variant_id && item.size_id == size_id
            })
            .map(|item| (item.id, item.quantity));

        let resulting = existing.map_or(0, |(_, quantity)| quantity).saturating_add(quantity);
        if resulting > stock {
            return Err(RepositoryError::InsufficientStock { available: stock });
        }

        let now = Utc::now();
        match existing {
            Some((item_id, _)) => {
                if let Some(item) = inner.items.get_mut(&item_id) {
                    item.quantity = resulting;
                    item.updated_at = now;
                }
            }
            None => {
                let item_id = CartItemId::new(inner.allocate_id());
                inner.items.insert(
                    item_id,
                    CartItem {
                        id: item_id,
                        cart_id,
                        variant_id,
                        size_id,
                        quantity,
                        unit_price,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }

        inner.resum_total(cart_id);
        inner.detail(cart_id)
    }

    async fn set_item_quantity(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);

        let (variant_id, size_id, current) = inner
            .items
            .get(&item_id)
            .filter(|item| item.cart_id == cart_id)
            .map(|item| (item.variant_id, item.size_id, item.quantity))
            .ok_or(RepositoryError::NotFound)?;

        if quantity > current {
            let stock = *inner.stock.get(&(variant_id, size_id)).ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "cart item {item_id} references missing variant size"
                ))
            })?;
            if quantity > stock {
                return Err(RepositoryError::InsufficientStock { available: stock });
            }
        }

        if let Some(item) = inner.items.get_mut(&item_id) {
            item.quantity = quantity;
            item.updated_at = Utc::now();
        }

        inner.resum_total(cart_id);
        inner.detail(cart_id)
    }

    async fn remove_item(
        &self,
        shopper: ShopperIdentity,
        item_id: CartItemId,
    ) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);

        let belongs = inner
            .items
            .get(&item_id)
            .is_some_and(|item| item.cart_id == cart_id);
        if !belongs {
            return Err(RepositoryError::NotFound);
        }
        inner.items.remove(&item_id);

        inner.resum_total(cart_id);
        inner.detail(cart_id)
    }

    async fn apply_coupon(
        &self,
        shopper: ShopperIdentity,
        coupon_id: CouponId,
    ) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);
        if let Some(cart) = inner.carts.get_mut(&cart_id) {
            cart.coupon_id = Some(coupon_id);
            cart.updated_at = Utc::now();
        }
        inner.detail(cart_id)
    }

    async fn clear_coupon(
        &self,
        shopper: ShopperIdentity,
    ) -> Result<CartDetail, RepositoryError> {
        let mut inner = self.inner.lock();
        let cart_id = inner.resolve_cart(shopper);
        if let Some(cart) = inner.carts.get_mut(&cart_id) {
            cart.coupon_id = None;
            cart.updated_at = Utc::now();
        }
        inner.detail(cart_id)
    }
}

#[async_trait]
impl CatalogReader for MemoryStorefrontStore {
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let inner = self.inner.lock();
        let mut products: Vec<&StoredProduct> = inner
            .products
            .values()
            .filter(|product| {
                filter.brand_id.is_none_or(|brand| product.brand_id == brand)
                    && filter
                        .category
                        .as_deref()
                        .is_none_or(|category| product.category_name.eq_ignore_ascii_case(category))
                    && filter.search.as_deref().is_none_or(|needle| {
                        product
                            .name
                            .to_lowercase()
                            .contains(&needle.to_lowercase())
                    })
            })
            .collect();
        products.sort_by_key(|product| std::cmp::Reverse(product.id));

        let summaries = products
            .into_iter()
            .skip(usize::try_from(filter.offset()).unwrap_or(0))
            .take(usize::try_from(filter.limit()).unwrap_or(20))
            .map(|product| {
                let price_from = inner
                    .variants
                    .values()
                    .filter(|variant| variant.product_id == product.id)
                    .map(|variant| variant.price)
                    .min();
                ProductSummary {
                    id: product.id,
                    brand_id: product.brand_id,
                    brand_name: product.brand_name.clone(),
                    name: product.name.clone(),
                    category_id: product.category_id,
                    category_name: product.category_name.clone(),
                    price_from,
                    currency: "USD".to_owned(),
                    image_path: None,
                }
            })
            .collect();
        Ok(summaries)
    }

    async fn product_detail(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let inner = self.inner.lock();
        let Some(product) = inner.products.get(&product_id) else {
            return Ok(None);
        };

        let mut variants: Vec<&StoredVariant> = inner
            .variants
            .values()
            .filter(|variant| variant.product_id == product_id)
            .collect();
        variants.sort_by_key(|variant| variant.id);

        let variants = variants
            .into_iter()
            .map(|variant| {
                let mut sizes: Vec<VariantSizeDetail> = inner
                    .stock
                    .iter()
                    .filter(|((v, _), _)| *v == variant.id)
                    .map(|((_, size_id), stock)| VariantSizeDetail {
                        size_id: *size_id,
                        size_name: inner
                            .size_names
                            .get(size_id)
                            .cloned()
                            .unwrap_or_default(),
                        stock_quantity: *stock,
                        measurements: Vec::new(),
                    })
                    .collect();
                sizes.sort_by_key(|size| size.size_id);
                VariantDetail {
                    id: variant.id,
                    sku: variant.sku.clone(),
                    price: variant.price,
                    colors: Vec::new(),
                    materials: Vec::new(),
                    tags: Vec::new(),
                    images: Vec::<VariantImage>::new(),
                    sizes,
                }
            })
            .collect();

        Ok(Some(ProductDetail {
            id: product.id,
            brand_id: product.brand_id,
            brand_name: product.brand_name.clone(),
            name: product.name.clone(),
            description: None,
            category_name: product.category_name.clone(),
            subcategory_name: String::new(),
            season_name: String::new(),
            gender_name: String::new(),
            currency: "USD".to_owned(),
            variants,
        }))
    }

    async fn variant_pricing(
        &self,
        variant_id: VariantId,
    ) -> Result<Option<VariantPricing>, RepositoryError> {
        let inner = self.inner.lock();
        Ok(inner.variants.get(&variant_id).map(|variant| VariantPricing {
            variant_id: variant.id,
            product_id: variant.product_id,
            sku: variant.sku.clone(),
            price: variant.price,
        }))
    }

    async fn size_availability(
        &self,
        variant_id: VariantId,
        size_name: &str,
    ) -> Result<Option<SizeAvailability>, RepositoryError> {
        let inner = self.inner.lock();
        if !inner.variants.contains_key(&variant_id) {
            return Ok(None);
        }
        let Some(size_id) = inner.size_id_by_name(size_name) else {
            return Ok(None);
        };
        Ok(inner
            .stock
            .get(&(variant_id, size_id))
            .map(|available| SizeAvailability {
                variant_id,
                size_id,
                size_name: inner
                    .size_names
                    .get(&size_id)
                    .cloned()
                    .unwrap_or_default(),
                available: *available,
            }))
    }
}

#[async_trait]
impl CouponReader for MemoryStorefrontStore {
    async fn coupon_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let inner = self.inner.lock();
        Ok(inner
            .coupons
            .values()
            .find(|coupon| coupon.code.eq_ignore_ascii_case(code))
            .cloned())
    }
}
