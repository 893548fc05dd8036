//! Product and variant upload orchestration.
//!
//! Uploads arrive as raw form fields naming lookup values ("Outerwear",
//! "Navy", "M"); the orchestrator resolves each name to a row id through the
//! store's atomic upserts, in strict sequence, then creates the dependent
//! row. Lookup rows are shared reference data and stay in place even when a
//! later step fails; the product and variant rows themselves are created
//! transactionally, so no partial product or orphaned sub-resource survives
//! a failed upload.

use maison_core::{BrandId, ProductId};

use crate::db::DashboardStore;
use crate::error::{AppError, Result};
use crate::models::{
    NewImage, NewMeasurement, NewProduct, NewVariant, NewVariantSize, Product, Variant,
};

/// Raw product upload fields, lookup values by name.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub season: String,
    pub gender: String,
    /// ISO 4217 code of the brand's base currency for this product.
    pub currency: String,
}

/// Raw variant upload fields.
#[derive(Debug, Clone)]
pub struct VariantForm {
    pub sku: String,
    pub price: rust_decimal::Decimal,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<ImageForm>,
    pub sizes: Vec<SizeForm>,
}

/// One image of a variant upload.
#[derive(Debug, Clone)]
pub struct ImageForm {
    pub path: String,
    pub is_main: bool,
}

/// One size of a variant upload, with stock and measurements.
#[derive(Debug, Clone)]
pub struct SizeForm {
    pub name: String,
    pub stock_quantity: i32,
    pub measurements: Vec<MeasurementForm>,
}

/// One garment measurement, type by name.
#[derive(Debug, Clone)]
pub struct MeasurementForm {
    pub name: String,
    pub value_cm: rust_decimal::Decimal,
}

/// Create a product from raw form fields.
///
/// Resolves the lookups in strict sequence (category, then the subcategory
/// scoped to it, then season, gender, and currency), then creates the
/// product row referencing the resolved ids.
pub async fn upload_product(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    form: ProductForm,
) -> Result<Product> {
    let category_id = store.upsert_category(&form.category).await?;
    let subcategory_id = store.upsert_subcategory(category_id, &form.subcategory).await?;
    let season_id = store.upsert_season(&form.season).await?;
    let gender_id = store.upsert_gender(&form.gender).await?;
    let currency_id = store.upsert_currency(&form.currency).await?;

    let product = store
        .create_product(
            brand_id,
            NewProduct {
                name: form.name,
                description: form.description,
                category_id,
                subcategory_id,
                season_id,
                gender_id,
                currency_id,
            },
        )
        .await?;
    Ok(product)
}

/// Create a variant of one of the brand's products from raw form fields.
///
/// Resolves colors, materials, tags, sizes, and measurement types, then
/// hands the store a fully resolved [`NewVariant`] to write in one
/// transaction.
pub async fn upload_variant(
    store: &dyn DashboardStore,
    brand_id: BrandId,
    product_id: ProductId,
    form: VariantForm,
) -> Result<Variant> {
    if store.brand_product_detail(brand_id, product_id).await?.is_none() {
        return Err(AppError::NotFound("product not found".to_owned()));
    }
    check_images(&form)?;

    let mut color_ids = Vec::with_capacity(form.colors.len());
    for color in &form.colors {
        color_ids.push(store.upsert_color(color).await?);
    }
    let mut material_ids = Vec::with_capacity(form.materials.len());
    for material in &form.materials {
        material_ids.push(store.upsert_material(material).await?);
    }
    let mut tag_ids = Vec::with_capacity(form.tags.len());
    for tag in &form.tags {
        tag_ids.push(store.upsert_tag(tag).await?);
    }

    let mut sizes = Vec::with_capacity(form.sizes.len());
    for size in &form.sizes {
        let size_id = store.upsert_size(&size.name).await?;
        let mut measurements = Vec::with_capacity(size.measurements.len());
        for measurement in &size.measurements {
            let measurement_type_id = store.upsert_measurement_type(&measurement.name).await?;
            measurements.push(NewMeasurement {
                measurement_type_id,
                value_cm: measurement.value_cm,
            });
        }
        sizes.push(NewVariantSize {
            size_id,
            stock_quantity: size.stock_quantity,
            measurements,
        });
    }

    let variant = store
        .create_variant(
            product_id,
            NewVariant {
                sku: form.sku,
                price: form.price,
                color_ids,
                material_ids,
                tag_ids,
                images: form
                    .images
                    .into_iter()
                    .map(|image| NewImage {
                        path: image.path,
                        is_main: image.is_main,
                    })
                    .collect(),
                sizes,
            },
        )
        .await?;
    Ok(variant)
}

/// A variant needs at least one image, exactly one of them main, and at
/// least one size.
fn check_images(form: &VariantForm) -> Result<()> {
    if form.images.is_empty() {
        return Err(AppError::BadRequest(
            "a variant needs at least one image".to_owned(),
        ));
    }
    let main_count = form.images.iter().filter(|image| image.is_main).count();
    if main_count != 1 {
        return Err(AppError::BadRequest(format!(
            "exactly one image must be marked main (got {main_count})"
        )));
    }
    if form.sizes.is_empty() {
        return Err(AppError::BadRequest(
            "a variant needs at least one size".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::db::{BrandStore, CatalogStore, MemoryDashboardStore};

    use super::*;

    fn product_form(name: &str) -> ProductForm {
        ProductForm {
            name: name.to_owned(),
            description: None,
            category: "Outerwear".to_owned(),
            subcategory: "Coats".to_owned(),
            season: "AW26".to_owned(),
            gender: "Women".to_owned(),
            currency: "EUR".to_owned(),
        }
    }

    fn variant_form(sku: &str) -> VariantForm {
        VariantForm {
            sku: sku.to_owned(),
            price: dec!(240.00),
            colors: vec!["Navy".to_owned()],
            materials: vec!["Wool".to_owned()],
            tags: vec!["new-season".to_owned()],
            images: vec![
                ImageForm {
                    path: "front.jpg".to_owned(),
                    is_main: true,
                },
                ImageForm {
                    path: "back.jpg".to_owned(),
                    is_main: false,
                },
            ],
            sizes: vec![SizeForm {
                name: "M".to_owned(),
                stock_quantity: 10,
                measurements: vec![MeasurementForm {
                    name: "Chest".to_owned(),
                    value_cm: dec!(52.0),
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_upload_product_resolves_lookups() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();

        let first = upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap();
        let second = upload_product(&store, brand.id, product_form("Cashmere Coat"))
            .await
            .unwrap();

        // Shared lookups resolve to the same rows across uploads.
        assert_eq!(first.category_id, second.category_id);
        assert_eq!(first.subcategory_id, second.subcategory_id);
        assert_eq!(first.currency_id, second.currency_id);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_product_name_conflicts() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap();
        let err = upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upload_variant() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let product = upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap();

        let variant = upload_variant(&store, brand.id, product.id, variant_form("WC-NVY"))
            .await
            .unwrap();
        assert_eq!(variant.price, dec!(240.00));

        let detail = store
            .brand_product_detail(brand.id, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.variants.len(), 1);
        assert_eq!(detail.variants[0].colors, vec!["Navy"]);
        assert_eq!(detail.variants[0].sizes[0].size_name, "M");
        assert_eq!(detail.variants[0].sizes[0].stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_variant_requires_exactly_one_main_image() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let product = upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap();

        let mut form = variant_form("WC-NVY");
        form.images[1].is_main = true;
        let err = upload_variant(&store, brand.id, product.id, form)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_variant_for_foreign_product_is_not_found() {
        let store = MemoryDashboardStore::new();
        let brand = store.create_brand("Atelier", "atelier").await.unwrap();
        let other = store.create_brand("Nord", "nord").await.unwrap();
        let product = upload_product(&store, brand.id, product_form("Wool Coat"))
            .await
            .unwrap();

        let err = upload_variant(&store, other.id, product.id, variant_form("WC-NVY"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
