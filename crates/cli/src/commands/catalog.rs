//! Catalog inspection commands.

use std::path::Path;

use tracing::info;

use dessert_shop_core::{Product, ProductId};
use dessert_shop_storefront::state::load_catalog;

/// List products, optionally filtered by category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(
    file: Option<&Path>,
    category: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(file).await?;

    let products: Vec<&Product> = match category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.products().iter().collect(),
    };

    if products.is_empty() {
        info!("No products found");
        return Ok(());
    }

    for product in &products {
        info!(
            "{:>4}  {:<32} {:<12} {:>8}",
            product.id,
            product.name,
            product.category,
            product.price.display()
        );
    }
    info!(count = products.len(), "Listed products");

    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the product doesn't exist.
pub async fn show(file: Option<&Path>, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(file).await?;
    let product = catalog
        .get(id)
        .ok_or_else(|| format!("Product not found: {id}"))?;

    info!("Product {}", product.id);
    info!("  Name:      {}", product.name);
    info!("  Category:  {}", product.category);
    info!(
        "  Price:     {} ({})",
        product.price.display(),
        product.price.currency_code.code()
    );
    info!("  Thumbnail: {}", product.image.thumbnail);
    info!("  Mobile:    {}", product.image.mobile);
    info!("  Tablet:    {}", product.image.tablet);
    info!("  Desktop:   {}", product.image.desktop);

    Ok(())
}

/// Validate a catalog file.
///
/// Reports the number of products and categories on success.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub async fn validate(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Validating catalog");

    let catalog = load_catalog(Some(file)).await?;
    let categories = catalog.categories();

    info!(
        products = catalog.len(),
        categories = categories.len(),
        "Catalog is valid"
    );
    for category in categories {
        info!("  {category}");
    }

    Ok(())
}
