//! Catalog writes: lookup upserts and product/variant creation.
//!
//! Lookup rows are shared reference data, created with
//! `INSERT … ON CONFLICT … DO UPDATE SET name = EXCLUDED.name RETURNING id`
//! so concurrent identical requests converge on one row without a
//! check-then-insert window. (`DO NOTHING` would skip `RETURNING` on
//! conflict; the self-assign makes the statement always return the id.)
//!
//! Product rows are created in their own transaction; a variant and all its
//! sub-resources (images, links, sizes, measurements) commit atomically, so
//! no orphaned children survive a failed upload.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use maison_core::{
    BrandId, CategoryId, ColorId, CurrencyId, GenderId, ImageId, MaterialId, MeasurementTypeId,
    ProductId, SeasonId, SizeId, SubcategoryId, TagId, VariantId,
};

use crate::db::{PgDashboardStore, RepositoryError};
use crate::models::{
    BrandProductDetail, BrandProductSummary, BrandVariantDetail, BrandVariantImage,
    BrandVariantSize, NewProduct, NewVariant, Product, Variant,
};

/// Catalog write access plus the brand-scoped reads the dashboard shows.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // Lookup upserts (atomic find-or-create, shared reference data).
    async fn upsert_category(&self, name: &str) -> Result<CategoryId, RepositoryError>;
    async fn upsert_subcategory(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<SubcategoryId, RepositoryError>;
    async fn upsert_material(&self, name: &str) -> Result<MaterialId, RepositoryError>;
    async fn upsert_color(&self, name: &str) -> Result<ColorId, RepositoryError>;
    async fn upsert_size(&self, name: &str) -> Result<SizeId, RepositoryError>;
    async fn upsert_tag(&self, name: &str) -> Result<TagId, RepositoryError>;
    async fn upsert_season(&self, name: &str) -> Result<SeasonId, RepositoryError>;
    async fn upsert_gender(&self, name: &str) -> Result<GenderId, RepositoryError>;
    async fn upsert_currency(&self, code: &str) -> Result<CurrencyId, RepositoryError>;
    async fn upsert_measurement_type(
        &self,
        name: &str,
    ) -> Result<MeasurementTypeId, RepositoryError>;

    /// Create a product row for `brand_id`.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the brand already has a
    /// product with this name.
    async fn create_product(
        &self,
        brand_id: BrandId,
        product: NewProduct,
    ) -> Result<Product, RepositoryError>;

    /// Create a variant and all its sub-resources in one transaction.
    async fn create_variant(
        &self,
        product_id: ProductId,
        variant: NewVariant,
    ) -> Result<Variant, RepositoryError>;

    /// Resolve a product name to its id within the brand's catalog.
    async fn product_id_by_name(
        &self,
        brand_id: BrandId,
        name: &str,
    ) -> Result<Option<ProductId>, RepositoryError>;

    /// Resolve a category name to its id.
    async fn category_id_by_name(&self, name: &str)
    -> Result<Option<CategoryId>, RepositoryError>;

    /// The brand's products, newest first.
    async fn brand_products(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<BrandProductSummary>, RepositoryError>;

    /// One of the brand's products with variants expanded; `None` when the
    /// product does not exist or belongs to another brand.
    async fn brand_product_detail(
        &self,
        brand_id: BrandId,
        product_id: ProductId,
    ) -> Result<Option<BrandProductDetail>, RepositoryError>;
}

/// Upsert into a single-`name`-column lookup table and return the id.
async fn upsert_lookup(
    conn: &mut PgConnection,
    table: &str,
    name: &str,
) -> Result<i32, RepositoryError> {
    // Table names come from a fixed set below, never from input.
    let sql = format!(
        "INSERT INTO maison.{table} (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id"
    );
    let id: i32 = sqlx::query_scalar(&sql)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(id)
}

/// Row shape of `maison.product`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    brand_id: BrandId,
    name: String,
    description: Option<String>,
    category_id: CategoryId,
    subcategory_id: SubcategoryId,
    season_id: SeasonId,
    gender_id: GenderId,
    currency_id: CurrencyId,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            name: row.name,
            description: row.description,
            category_id: row.category_id,
            subcategory_id: row.subcategory_id,
            season_id: row.season_id,
            gender_id: row.gender_id,
            currency_id: row.currency_id,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, brand_id, name, description, category_id, subcategory_id,
                               season_id, gender_id, currency_id, created_at";

#[async_trait]
impl CatalogStore for PgDashboardStore {
    async fn upsert_category(&self, name: &str) -> Result<CategoryId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "category", name)
            .await
            .map(CategoryId::new)
    }

    async fn upsert_subcategory(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<SubcategoryId, RepositoryError> {
        // Scoped uniqueness: the same name may exist under other categories.
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO maison.subcategory (category_id, name) VALUES ($1, $2)
             ON CONFLICT (category_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(category_id)
        .bind(name)
        .fetch_one(self.pool())
        .await?;
        Ok(SubcategoryId::new(id))
    }

    async fn upsert_material(&self, name: &str) -> Result<MaterialId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "material", name)
            .await
            .map(MaterialId::new)
    }

    async fn upsert_color(&self, name: &str) -> Result<ColorId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "color", name)
            .await
            .map(ColorId::new)
    }

    async fn upsert_size(&self, name: &str) -> Result<SizeId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "size", name).await.map(SizeId::new)
    }

    async fn upsert_tag(&self, name: &str) -> Result<TagId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "tag", name).await.map(TagId::new)
    }

    async fn upsert_season(&self, name: &str) -> Result<SeasonId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "season", name)
            .await
            .map(SeasonId::new)
    }

    async fn upsert_gender(&self, name: &str) -> Result<GenderId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "gender", name)
            .await
            .map(GenderId::new)
    }

    async fn upsert_currency(&self, code: &str) -> Result<CurrencyId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO maison.currency (code) VALUES ($1)
             ON CONFLICT (code) DO UPDATE SET code = EXCLUDED.code
             RETURNING id",
        )
        .bind(code)
        .fetch_one(self.pool())
        .await?;
        Ok(CurrencyId::new(id))
    }

    async fn upsert_measurement_type(
        &self,
        name: &str,
    ) -> Result<MeasurementTypeId, RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        upsert_lookup(&mut *conn, "measurement_type", name)
            .await
            .map(MeasurementTypeId::new)
    }

    async fn create_product(
        &self,
        brand_id: BrandId,
        product: NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO maison.product
                 (brand_id, name, description, category_id, subcategory_id,
                  season_id, gender_id, currency_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(brand_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.subcategory_id)
        .bind(product.season_id)
        .bind(product.gender_id)
        .bind(product.currency_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a product with this name"))?;
        Ok(row.into())
    }

    async fn create_variant(
        &self,
        product_id: ProductId,
        variant: NewVariant,
    ) -> Result<Variant, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let variant_id: VariantId = sqlx::query_scalar(
            "INSERT INTO maison.product_variant (product_id, sku, base_currency_price)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(product_id)
        .bind(&variant.sku)
        .bind(variant.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a variant with this SKU"))?;

        for color_id in &variant.color_ids {
            sqlx::query("INSERT INTO maison.variant_color (variant_id, color_id) VALUES ($1, $2)")
                .bind(variant_id)
                .bind(color_id)
                .execute(&mut *tx)
                .await?;
        }
        for material_id in &variant.material_ids {
            sqlx::query(
                "INSERT INTO maison.variant_material (variant_id, material_id) VALUES ($1, $2)",
            )
            .bind(variant_id)
            .bind(material_id)
            .execute(&mut *tx)
            .await?;
        }
        for tag_id in &variant.tag_ids {
            sqlx::query("INSERT INTO maison.variant_tag (variant_id, tag_id) VALUES ($1, $2)")
                .bind(variant_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }
        for image in &variant.images {
            sqlx::query(
                "INSERT INTO maison.product_image (variant_id, path, is_main) VALUES ($1, $2, $3)",
            )
            .bind(variant_id)
            .bind(&image.path)
            .bind(image.is_main)
            .execute(&mut *tx)
            .await?;
        }
        for size in &variant.sizes {
            let variant_size_id: i32 = sqlx::query_scalar(
                "INSERT INTO maison.variant_size (variant_id, size_id, stock_quantity)
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(variant_id)
            .bind(size.size_id)
            .bind(size.stock_quantity)
            .fetch_one(&mut *tx)
            .await?;
            for measurement in &size.measurements {
                sqlx::query(
                    "INSERT INTO maison.size_measurement
                         (variant_size_id, measurement_type_id, value_cm)
                     VALUES ($1, $2, $3)",
                )
                .bind(variant_size_id)
                .bind(measurement.measurement_type_id)
                .bind(measurement.value_cm)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Variant {
            id: variant_id,
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
        let id = sqlx::query_scalar(
            "SELECT id FROM maison.product WHERE brand_id = $1 AND lower(name) = lower($2)",
        )
        .bind(brand_id)
        .bind(name)
        .fetch_optional(self.pool())
        .await?;
        Ok(id)
    }

    async fn category_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CategoryId>, RepositoryError> {
        let id =
            sqlx::query_scalar("SELECT id FROM maison.category WHERE lower(name) = lower($1)")
                .bind(name)
                .fetch_optional(self.pool())
                .await?;
        Ok(id)
    }

    async fn brand_products(
        &self,
        brand_id: BrandId,
    ) -> Result<Vec<BrandProductSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            id: ProductId,
            name: String,
            category_name: String,
            subcategory_name: String,
            variant_count: i64,
            total_stock: i64,
            created_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT p.id, p.name, c.name AS category_name, sc.name AS subcategory_name,
                   (SELECT COUNT(*) FROM maison.product_variant pv
                     WHERE pv.product_id = p.id) AS variant_count,
                   COALESCE((SELECT SUM(vs.stock_quantity)
                      FROM maison.variant_size vs
                      JOIN maison.product_variant pv ON pv.id = vs.variant_id
                     WHERE pv.product_id = p.id), 0) AS total_stock,
                   p.created_at
            FROM maison.product p
            JOIN maison.category c ON c.id = p.category_id
            JOIN maison.subcategory sc ON sc.id = p.subcategory_id
            WHERE p.brand_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            ",
        )
        .bind(brand_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| BrandProductSummary {
                id: row.id,
                name: row.name,
                category_name: row.category_name,
                subcategory_name: row.subcategory_name,
                variant_count: row.variant_count,
                total_stock: row.total_stock,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn brand_product_detail(
        &self,
        brand_id: BrandId,
        product_id: ProductId,
    ) -> Result<Option<BrandProductDetail>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM maison.product WHERE id = $1 AND brand_id = $2"
        ))
        .bind(product_id)
        .bind(brand_id)
        .fetch_optional(self.pool())
        .await?;
        let Some(product) = product else {
            return Ok(None);
        };

        #[derive(sqlx::FromRow)]
        struct VariantRow {
            id: VariantId,
            sku: String,
            price: Decimal,
        }
        let variant_rows = sqlx::query_as::<_, VariantRow>(
            "SELECT id, sku, base_currency_price AS price
             FROM maison.product_variant WHERE product_id = $1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(self.pool())
        .await?;

        let mut variants = Vec::with_capacity(variant_rows.len());
        for row in variant_rows {
            let colors: Vec<String> = sqlx::query_scalar(
                "SELECT c.name FROM maison.variant_color vc
                 JOIN maison.color c ON c.id = vc.color_id
                 WHERE vc.variant_id = $1 ORDER BY c.name",
            )
            .bind(row.id)
            .fetch_all(self.pool())
            .await?;
            let materials: Vec<String> = sqlx::query_scalar(
                "SELECT m.name FROM maison.variant_material vm
                 JOIN maison.material m ON m.id = vm.material_id
                 WHERE vm.variant_id = $1 ORDER BY m.name",
            )
            .bind(row.id)
            .fetch_all(self.pool())
            .await?;
            let tags: Vec<String> = sqlx::query_scalar(
                "SELECT t.name FROM maison.variant_tag vt
                 JOIN maison.tag t ON t.id = vt.tag_id
                 WHERE vt.variant_id = $1 ORDER BY t.name",
            )
            .bind(row.id)
            .fetch_all(self.pool())
            .await?;

            #[derive(sqlx::FromRow)]
            struct ImageRow {
                id: ImageId,
                path: String,
                is_main: bool,
            }
            let images = sqlx::query_as::<_, ImageRow>(
                "SELECT id, path, is_main FROM maison.product_image
                 WHERE variant_id = $1 ORDER BY is_main DESC, id",
            )
            .bind(row.id)
            .fetch_all(self.pool())
            .await?;

            #[derive(sqlx::FromRow)]
            struct SizeRow {
                size_id: SizeId,
                size_name: String,
                stock_quantity: i32,
            }
            let sizes = sqlx::query_as::<_, SizeRow>(
                "SELECT vs.size_id, s.name AS size_name, vs.stock_quantity
                 FROM maison.variant_size vs
                 JOIN maison.size s ON s.id = vs.size_id
                 WHERE vs.variant_id = $1 ORDER BY vs.id",
            )
            .bind(row.id)
            .fetch_all(self.pool())
            .await?;

            variants.push(BrandVariantDetail {
                id: row.id,
                sku: row.sku,
                price: row.price,
                colors,
                materials,
                tags,
                images: images
                    .into_iter()
                    .map(|image| BrandVariantImage {
                        id: image.id,
                        path: image.path,
                        is_main: image.is_main,
                    })
                    .collect(),
                sizes: sizes
                    .into_iter()
                    .map(|size| BrandVariantSize {
                        size_id: size.size_id,
                        size_name: size.size_name,
                        stock_quantity: size.stock_quantity,
                    })
                    .collect(),
            });
        }

        Ok(Some(BrandProductDetail {
            product: product.into(),
            variants,
        }))
    }
}
