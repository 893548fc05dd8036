//! Read-only catalog queries for the storefront.
//!
//! Browse, product detail, variant pricing, and per-size stock. All writes
//! to these tables happen in the dashboard binary.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use maison_core::{BrandId, CategoryId, ImageId, ProductId, SizeId, VariantId, VariantSizeId};

use crate::db::{PgStorefrontStore, RepositoryError};
use crate::models::{
    ProductDetail, ProductFilter, ProductSummary, SizeAvailability, SizeMeasurementDetail,
    VariantDetail, VariantImage, VariantPricing, VariantSizeDetail,
};

/// Read access to the shared product catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Browse products matching `filter`, newest first.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// A product with every variant, image, size, and measurement expanded.
    async fn product_detail(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError>;

    /// The authoritative price of a variant.
    async fn variant_pricing(
        &self,
        variant_id: VariantId,
    ) -> Result<Option<VariantPricing>, RepositoryError>;

    /// Stock for a `(variant, size-name)` pair; `None` when the variant
    /// does not carry the size.
    async fn size_availability(
        &self,
        variant_id: VariantId,
        size_name: &str,
    ) -> Result<Option<SizeAvailability>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSummaryRow {
    id: ProductId,
    brand_id: BrandId,
    brand_name: String,
    name: String,
    category_id: CategoryId,
    category_name: String,
    currency: String,
    price_from: Option<Decimal>,
    image_path: Option<String>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            brand_name: row.brand_name,
            name: row.name,
            category_id: row.category_id,
            category_name: row.category_name,
            price_from: row.price_from,
            currency: row.currency,
            image_path: row.image_path,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductHeaderRow {
    id: ProductId,
    brand_id: BrandId,
    brand_name: String,
    name: String,
    description: Option<String>,
    category_name: String,
    subcategory_name: String,
    season_name: String,
    gender_name: String,
    currency: String,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: VariantId,
    sku: String,
    price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    variant_id: VariantId,
    path: String,
    is_main: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantSizeRow {
    id: VariantSizeId,
    variant_id: VariantId,
    size_id: SizeId,
    size_name: String,
    stock_quantity: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct MeasurementRow {
    variant_size_id: VariantSizeId,
    measurement_type: String,
    value_cm: Decimal,
}

#[async_trait]
impl CatalogReader for PgStorefrontStore {
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSummaryRow>(
            r"
            SELECT p.id, p.brand_id, b.name AS brand_name, p.name,
                   p.category_id, c.name AS category_name, cur.code AS currency,
                   (SELECT MIN(pv.base_currency_price)
                      FROM maison.product_variant pv
                     WHERE pv.product_id = p.id) AS price_from,
                   (SELECT pi.path
                      FROM maison.product_image pi
                      JOIN maison.product_variant pv ON pv.id = pi.variant_id
                     WHERE pv.product_id = p.id AND pi.is_main
                     ORDER BY pv.id
                     LIMIT 1) AS image_path
            FROM maison.product p
            JOIN maison.brand b ON b.id = p.brand_id
            JOIN maison.category c ON c.id = p.category_id
            JOIN maison.currency cur ON cur.id = p.currency_id
            WHERE ($1::int4 IS NULL OR p.brand_id = $1)
              AND ($2::text IS NULL OR lower(c.name) = lower($2))
              AND ($3::text IS NULL
                   OR p.name ILIKE '%' || $3 || '%'
                   OR COALESCE(p.description, '') ILIKE '%' || $3 || '%')
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(filter.brand_id)
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref())
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn product_detail(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let header = sqlx::query_as::<_, ProductHeaderRow>(
            r"
            SELECT p.id, p.brand_id, b.name AS brand_name, p.name, p.description,
                   c.name AS category_name, sc.name AS subcategory_name,
                   se.name AS season_name, g.name AS gender_name, cur.code AS currency
            FROM maison.product p
            JOIN maison.brand b ON b.id = p.brand_id
            JOIN maison.category c ON c.id = p.category_id
            JOIN maison.subcategory sc ON sc.id = p.subcategory_id
            JOIN maison.season se ON se.id = p.season_id
            JOIN maison.gender g ON g.id = p.gender_id
            JOIN maison.currency cur ON cur.id = p.currency_id
            WHERE p.id = $1
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool())
        .await?;
        let Some(header) = header else {
            return Ok(None);
        };

        let variants = sqlx::query_as::<_, VariantRow>(
            "SELECT id, sku, base_currency_price AS price
             FROM maison.product_variant WHERE product_id = $1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(self.pool())
        .await?;

        let variant_ids: Vec<i32> = variants.iter().map(|v| v.id.as_i32()).collect();

        let mut colors = grouped_names(
            self,
            "SELECT vc.variant_id, c.name
             FROM maison.variant_color vc
             JOIN maison.color c ON c.id = vc.color_id
             WHERE vc.variant_id = ANY($1) ORDER BY c.name",
            &variant_ids,
        )
        .await?;
        let mut materials = grouped_names(
            self,
            "SELECT vm.variant_id, m.name
             FROM maison.variant_material vm
             JOIN maison.material m ON m.id = vm.material_id
             WHERE vm.variant_id = ANY($1) ORDER BY m.name",
            &variant_ids,
        )
        .await?;
        let mut tags = grouped_names(
            self,
            "SELECT vt.variant_id, t.name
             FROM maison.variant_tag vt
             JOIN maison.tag t ON t.id = vt.tag_id
             WHERE vt.variant_id = ANY($1) ORDER BY t.name",
            &variant_ids,
        )
        .await?;

        let image_rows = sqlx::query_as::<_, ImageRow>(
            "SELECT id, variant_id, path, is_main
             FROM maison.product_image
             WHERE variant_id = ANY($1) ORDER BY is_main DESC, id",
        )
        .bind(&variant_ids)
        .fetch_all(self.pool())
        .await?;
        let mut images: HashMap<VariantId, Vec<VariantImage>> = HashMap::new();
        for row in image_rows {
            images.entry(row.variant_id).or_default().push(VariantImage {
                id: row.id,
                path: row.path,
                is_main: row.is_main,
            });
        }

        let size_rows = sqlx::query_as::<_, VariantSizeRow>(
            "SELECT vs.id, vs.variant_id, vs.size_id, s.name AS size_name, vs.stock_quantity
             FROM maison.variant_size vs
             JOIN maison.size s ON s.id = vs.size_id
             WHERE vs.variant_id = ANY($1) ORDER BY vs.id",
        )
        .bind(&variant_ids)
        .fetch_all(self.pool())
        .await?;

        let variant_size_ids: Vec<i32> = size_rows.iter().map(|s| s.id.as_i32()).collect();
        let measurement_rows = sqlx::query_as::<_, MeasurementRow>(
            "SELECT sm.variant_size_id, mt.name AS measurement_type, sm.value_cm
             FROM maison.size_measurement sm
             JOIN maison.measurement_type mt ON mt.id = sm.measurement_type_id
             WHERE sm.variant_size_id = ANY($1) ORDER BY mt.name",
        )
        .bind(&variant_size_ids)
        .fetch_all(self.pool())
        .await?;
        let mut measurements: HashMap<VariantSizeId, Vec<SizeMeasurementDetail>> = HashMap::new();
        for row in measurement_rows {
            measurements
                .entry(row.variant_size_id)
                .or_default()
                .push(SizeMeasurementDetail {
                    measurement_type: row.measurement_type,
                    value_cm: row.value_cm,
                });
        }

        let mut sizes: HashMap<VariantId, Vec<VariantSizeDetail>> = HashMap::new();
        for row in size_rows {
            sizes
                .entry(row.variant_id)
                .or_default()
                .push(VariantSizeDetail {
                    size_id: row.size_id,
                    size_name: row.size_name,
                    stock_quantity: row.stock_quantity,
                    measurements: measurements.remove(&row.id).unwrap_or_default(),
                });
        }

        let variants = variants
            .into_iter()
            .map(|v| VariantDetail {
                id: v.id,
                sku: v.sku,
                price: v.price,
                colors: colors.remove(&v.id).unwrap_or_default(),
                materials: materials.remove(&v.id).unwrap_or_default(),
                tags: tags.remove(&v.id).unwrap_or_default(),
                images: images.remove(&v.id).unwrap_or_default(),
                sizes: sizes.remove(&v.id).unwrap_or_default(),
            })
            .collect();

        Ok(Some(ProductDetail {
            id: header.id,
            brand_id: header.brand_id,
            brand_name: header.brand_name,
            name: header.name,
            description: header.description,
            category_name: header.category_name,
            subcategory_name: header.subcategory_name,
            season_name: header.season_name,
            gender_name: header.gender_name,
            currency: header.currency,
            variants,
        }))
    }

    async fn variant_pricing(
        &self,
        variant_id: VariantId,
    ) -> Result<Option<VariantPricing>, RepositoryError> {
        let row: Option<(VariantId, ProductId, String, Decimal)> = sqlx::query_as(
            "SELECT id, product_id, sku, base_currency_price
             FROM maison.product_variant WHERE id = $1",
        )
        .bind(variant_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(variant_id, product_id, sku, price)| VariantPricing {
            variant_id,
            product_id,
            sku,
            price,
        }))
    }

    async fn size_availability(
        &self,
        variant_id: VariantId,
        size_name: &str,
    ) -> Result<Option<SizeAvailability>, RepositoryError> {
        let row: Option<(SizeId, String, i32)> = sqlx::query_as(
            "SELECT vs.size_id, s.name, vs.stock_quantity
             FROM maison.variant_size vs
             JOIN maison.size s ON s.id = vs.size_id
             WHERE vs.variant_id = $1 AND lower(s.name) = lower($2)",
        )
        .bind(variant_id)
        .bind(size_name)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(size_id, size_name, available)| SizeAvailability {
            variant_id,
            size_id,
            size_name,
            available,
        }))
    }
}

/// Run a `(variant_id, name)` query and group the names per variant.
async fn grouped_names(
    store: &PgStorefrontStore,
    sql: &str,
    variant_ids: &[i32],
) -> Result<HashMap<VariantId, Vec<String>>, RepositoryError> {
    let rows: Vec<(VariantId, String)> = sqlx::query_as(sql)
        .bind(variant_ids)
        .fetch_all(store.pool())
        .await?;

    let mut grouped: HashMap<VariantId, Vec<String>> = HashMap::new();
    for (variant_id, name) in rows {
        grouped.entry(variant_id).or_default().push(name);
    }
    Ok(grouped)
}
