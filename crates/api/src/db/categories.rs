//! Category persistence.

use async_trait::async_trait;
use sqlx::PgPool;

use sushi_core::{CategoryId, Page, PageRequest};

use super::{RepositoryError, begin_snapshot, count_to_total, escape_like};
use crate::models::Category;

/// Storage port for menu categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// One page of categories ordered by name.
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Category>, RepositoryError>;

    /// Every category ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Look up a category by id.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;

    /// Categories whose name contains `name`, ignoring case.
    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Category>, RepositoryError>;

    /// Insert (no id) or update (with id) a category.
    ///
    /// Returns the stored category with its id assigned. Updating an id that
    /// does not exist yields `RepositoryError::NotFound`.
    async fn save(&self, category: &Category) -> Result<Category, RepositoryError>;

    /// Delete a category and its product links.
    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

/// `PostgreSQL` implementation of [`CategoryStore`].
pub struct PgCategoryStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCategoryStore<'a> {
    /// Create a new category store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore<'_> {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Category>, RepositoryError> {
        // Count and page from the same snapshot so the total matches the content.
        let mut tx = begin_snapshot(self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sushi.category")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description
            FROM sushi.category
            ORDER BY name, id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Page::new(
            rows.into_iter().map(Category::from).collect(),
            page,
            count_to_total(total),
        ))
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description FROM sushi.category ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description FROM sushi.category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description
            FROM sushi.category
            WHERE name ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY name, id
            ",
        )
        .bind(escape_like(name))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn save(&self, category: &Category) -> Result<Category, RepositoryError> {
        let row = match category.id {
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    r"
                    INSERT INTO sushi.category (name, description)
                    VALUES ($1, $2)
                    RETURNING id, name, description
                    ",
                )
                .bind(&category.name)
                .bind(category.description.as_deref())
                .fetch_one(self.pool)
                .await?
            }
            Some(id) => sqlx::query_as::<_, CategoryRow>(
                r"
                UPDATE sushi.category
                SET name = $2, description = $3
                WHERE id = $1
                RETURNING id, name, description
                ",
            )
            .bind(id)
            .bind(&category.name)
            .bind(category.description.as_deref())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?,
        };

        Ok(row.into())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        // product_category rows cascade with the category
        let result = sqlx::query("DELETE FROM sushi.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
