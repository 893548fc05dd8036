//! Brand management commands.
//!
//! The auth gateway owns dashboard users; brands themselves are created
//! here, out of band, and referenced by id in the gateway's tenant mapping.

use maison_admin::db::{BrandStore, PgDashboardStore};
use maison_admin::models::brand::slugify;

use super::CliError;

/// Create a brand and print its id.
pub async fn create(name: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let store = PgDashboardStore::new(pool);

    let slug = slugify(name);
    let brand = store.create_brand(name, &slug).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("created brand \"{}\" (slug {}) with id {}", brand.name, brand.slug, brand.id);
    }
    Ok(())
}
