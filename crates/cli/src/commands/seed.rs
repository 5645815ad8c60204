//! Seed the menu (categories and products) from a YAML file.
//!
//! The file is parsed and validated before any connection is made. Entries
//! whose name already exists are skipped, so seeding is safe to repeat.
//!
//! ```yaml
//! categories:
//!   - name: Temaki
//!     description: Hand rolls
//! products:
//!   - name: Temaki de salmao
//!     price: "39.90"
//!     categories: [Temaki]
//! ```

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};

use sushi_api::db::{CategoryStore, PgCategoryStore, PgProductStore, ProductStore};
use sushi_api::services::catalog::{
    CategoryService, NewCategory, NewProduct, ProductService,
};
use sushi_core::{CategoryId, CurrencyCode, Price};

/// Menu file contents.
#[derive(Debug, Deserialize)]
pub struct MenuConfig {
    pub categories: Vec<CategorySeed>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Category names, as declared under `categories`.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Outcome of a seeding run.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub categories_inserted: usize,
    pub products_inserted: usize,
    pub skipped: usize,
}

/// Seed the menu from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or if
/// database operations fail.
pub async fn menu(file_path: &str, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let menu: MenuConfig = serde_yaml::from_str(&content)?;

    info!(
        categories = menu.categories.len(),
        products = menu.products.len(),
        "Parsed menu"
    );

    let errors = validate_menu(&menu);
    if !errors.is_empty() {
        error!("Menu validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = super::connect().await?;
    info!("Connected to database");

    if clear_existing {
        clear_menu(&pool).await?;
        info!("Cleared existing menu");
    }

    let result = seed_menu(&pool, menu).await?;

    info!("Seeding complete!");
    info!("  Categories inserted: {}", result.categories_inserted);
    info!("  Products inserted: {}", result.products_inserted);
    info!("  Skipped (already exist): {}", result.skipped);

    Ok(())
}

/// Check a menu for problems; an empty list means it is valid.
pub fn validate_menu(menu: &MenuConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let mut declared: Vec<String> = Vec::new();

    for (i, category) in menu.categories.iter().enumerate() {
        let key = category.name.trim().to_lowercase();
        if key.is_empty() {
            errors.push(format!("Empty category name at index {i}"));
            continue;
        }
        if declared.contains(&key) {
            errors.push(format!("Duplicate category: {}", category.name));
        }
        declared.push(key);
    }

    for (i, product) in menu.products.iter().enumerate() {
        if product.name.trim().is_empty() {
            errors.push(format!("Empty product name at index {i}"));
        }

        if let Err(e) = Price::new(product.price, product.currency_code) {
            errors.push(format!("Invalid price for product '{}': {e}", product.name));
        }

        for name in &product.categories {
            if !declared.contains(&name.trim().to_lowercase()) {
                errors.push(format!(
                    "Unknown category '{name}' for product '{}'",
                    product.name
                ));
            }
        }
    }

    errors
}

async fn clear_menu(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE sushi.product_category, sushi.product, sushi.category RESTART IDENTITY")
        .execute(pool)
        .await?;
    Ok(())
}

async fn seed_menu(pool: &PgPool, menu: MenuConfig) -> Result<SeedResult, Box<dyn std::error::Error>> {
    let category_store = PgCategoryStore::new(pool);
    let product_store = PgProductStore::new(pool);
    let categories = CategoryService::new(PgCategoryStore::new(pool));
    let products = ProductService::new(PgProductStore::new(pool), PgCategoryStore::new(pool));

    let mut result = SeedResult::default();
    let mut ids: HashMap<String, CategoryId> = HashMap::new();

    for seed in menu.categories {
        let key = seed.name.trim().to_lowercase();

        let existing = category_store
            .find_by_name_containing_ignore_case(seed.name.trim())
            .await?
            .into_iter()
            .find(|c| c.name.trim().to_lowercase() == key);

        let category = match existing {
            Some(category) => {
                result.skipped += 1;
                category
            }
            None => {
                result.categories_inserted += 1;
                categories
                    .create(NewCategory {
                        name: seed.name.trim().to_string(),
                        description: seed.description,
                    })
                    .await?
            }
        };

        if let Some(id) = category.id {
            ids.insert(key, id);
        }
    }

    for seed in menu.products {
        let exists = product_store
            .find_by_name_containing_ignore_case(seed.name.trim())
            .await?
            .iter()
            .any(|p| p.name.trim().eq_ignore_ascii_case(seed.name.trim()));

        if exists {
            result.skipped += 1;
            continue;
        }

        let category_ids = seed
            .categories
            .iter()
            .filter_map(|name| ids.get(&name.trim().to_lowercase()).copied())
            .collect();

        products
            .create(NewProduct {
                name: seed.name.trim().to_string(),
                description: seed.description,
                price: Price::new(seed.price, seed.currency_code)?,
                image_url: seed.image_url,
                category_ids,
            })
            .await?;
        result.products_inserted += 1;
    }

    Ok(result)
}
