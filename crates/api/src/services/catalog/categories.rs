//! Category service.

use tracing::instrument;

use sushi_core::{CategoryId, Page, PageRequest};

use super::CatalogError;
use crate::db::{CategoryStore, RepositoryError};
use crate::models::Category;

/// Data for a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Full replacement of an existing category.
#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Category service.
pub struct CategoryService<S> {
    categories: S,
}

impl<S> CategoryService<S> {
    /// Create a new category service.
    #[must_use]
    pub const fn new(categories: S) -> Self {
        Self { categories }
    }
}

impl<S: CategoryStore> CategoryService<S> {
    /// One page of categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all_paged(&self, page: PageRequest) -> Result<Page<Category>, CatalogError> {
        Ok(self.categories.find_all_paged(page).await?)
    }

    /// Every category, unpaged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.find_all().await?)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no category has this id.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn find_by_id(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("category not found with this id"))
    }

    /// Categories whose name contains `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if nothing matches.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Category>, CatalogError> {
        let categories = self
            .categories
            .find_by_name_containing_ignore_case(name)
            .await?;

        if categories.is_empty() {
            return Err(CatalogError::not_found("no categories found with this name"));
        }

        Ok(categories)
    }

    /// Create a category; storage assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the insert fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: NewCategory) -> Result<Category, CatalogError> {
        let category = self
            .categories
            .save(&Category::new(request.name, request.description))
            .await?;

        if let Some(id) = category.id {
            tracing::info!(category_id = %id, "category created");
        }
        Ok(category)
    }

    /// Overwrite a category's name and description.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no category has this id.
    #[instrument(skip(self, update), fields(category_id = %update.id))]
    pub async fn replace(&self, update: CategoryUpdate) -> Result<(), CatalogError> {
        let mut category = self.find_by_id(update.id).await?;
        category.name = update.name;
        category.description = update.description;

        self.categories
            .save(&category)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => {
                    CatalogError::not_found("category not found with this id")
                }
                other => CatalogError::Repository(other),
            })?;

        tracing::info!("category replaced");
        Ok(())
    }

    /// Delete a category; its product links go with it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no category has this id.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: CategoryId) -> Result<(), CatalogError> {
        self.categories.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::not_found("category not found with this id"),
            other => CatalogError::Repository(other),
        })?;

        tracing::info!("category deleted");
        Ok(())
    }
}
