//! Product persistence, including the product/category link table.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use sushi_core::{CategoryId, CurrencyCode, Page, PageRequest, Price, ProductId};

use super::{RepositoryError, begin_snapshot, count_to_total, escape_like};
use crate::models::{Category, Product};

/// Storage port for menu products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// One page of products ordered by name.
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Product>, RepositoryError>;

    /// Every product ordered by name.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products whose name contains `name`, ignoring case.
    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Products listed under a category.
    async fn find_by_category(&self, id: CategoryId) -> Result<Vec<Product>, RepositoryError>;

    /// Insert (no id) or update (with id) a product and replace its links.
    async fn save(&self, product: &Product) -> Result<Product, RepositoryError>;

    /// Delete a product and its category links.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    currency_code: String,
    image_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductCategoryRow {
    product_id: ProductId,
    id: CategoryId,
    name: String,
    description: Option<String>,
}

const PRODUCT_COLUMNS: &str =
    "SELECT p.id, p.name, p.description, p.price, p.currency_code, p.image_url FROM sushi.product p";

/// `PostgreSQL` implementation of [`ProductStore`].
pub struct PgProductStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgProductStore<'a> {
    /// Create a new product store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load categories for a batch of product rows.
    async fn assemble(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id.get()).collect();

        let links = sqlx::query_as::<_, ProductCategoryRow>(
            r"
            SELECT pc.product_id, c.id, c.name, c.description
            FROM sushi.product_category pc
            JOIN sushi.category c ON c.id = pc.category_id
            WHERE pc.product_id = ANY($1)
            ORDER BY c.name
            ",
        )
        .bind(ids.as_slice())
        .fetch_all(self.pool)
        .await?;

        let mut categories: HashMap<ProductId, Vec<Category>> = HashMap::new();
        for link in links {
            categories.entry(link.product_id).or_default().push(Category {
                id: Some(link.id),
                name: link.name,
                description: link.description,
            });
        }

        rows.into_iter()
            .map(|row| {
                let currency_code: CurrencyCode = row.currency_code.parse().map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
                })?;
                let price = Price::new(row.price, currency_code).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
                })?;

                Ok(Product {
                    id: Some(row.id),
                    name: row.name,
                    description: row.description,
                    price,
                    image_url: row.image_url,
                    categories: categories.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ProductStore for PgProductStore<'_> {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Product>, RepositoryError> {
        // Count and page from the same snapshot so the total matches the content.
        let mut tx = begin_snapshot(self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sushi.product")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_COLUMNS} ORDER BY p.name, p.id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let products = self.assemble(rows).await?;
        Ok(Page::new(products, page, count_to_total(total)))
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_COLUMNS} ORDER BY p.name, p.id"))
                .fetch_all(self.pool)
                .await?;

        self.assemble(rows).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_COLUMNS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"{PRODUCT_COLUMNS} WHERE p.name ILIKE '%' || $1 || '%' ESCAPE '\' ORDER BY p.name, p.id"
        ))
        .bind(escape_like(name))
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn find_by_category(&self, id: CategoryId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"{PRODUCT_COLUMNS}
            JOIN sushi.product_category pc ON pc.product_id = p.id
            WHERE pc.category_id = $1
            ORDER BY p.name, p.id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn save(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: ProductId = match product.id {
            None => {
                sqlx::query_scalar::<_, ProductId>(
                    r"
                    INSERT INTO sushi.product (name, description, price, currency_code, image_url)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    ",
                )
                .bind(&product.name)
                .bind(product.description.as_deref())
                .bind(product.price.amount)
                .bind(product.price.currency_code.as_str())
                .bind(product.image_url.as_deref())
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_scalar::<_, ProductId>(
                r"
                UPDATE sushi.product
                SET name = $2, description = $3, price = $4, currency_code = $5, image_url = $6
                WHERE id = $1
                RETURNING id
                ",
            )
            .bind(id)
            .bind(&product.name)
            .bind(product.description.as_deref())
            .bind(product.price.amount)
            .bind(product.price.currency_code.as_str())
            .bind(product.image_url.as_deref())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?,
        };

        sqlx::query("DELETE FROM sushi.product_category WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for category in &product.categories {
            let category_id = category.id.ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "category '{}' has not been saved",
                    category.name
                ))
            })?;

            sqlx::query(
                r"
                INSERT INTO sushi.product_category (product_id, category_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Product {
            id: Some(id),
            ..product.clone()
        })
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sushi.product_category WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sushi.product WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
