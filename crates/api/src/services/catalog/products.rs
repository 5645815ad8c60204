//! Product service.

use tracing::instrument;

use sushi_core::{CategoryId, Page, PageRequest, Price, ProductId};

use super::CatalogError;
use crate::db::{CategoryStore, ProductStore, RepositoryError};
use crate::models::{Category, Product};

/// Data for a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub category_ids: Vec<CategoryId>,
}

/// Full replacement of an existing product, including its category links.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub category_ids: Vec<CategoryId>,
}

/// Product service.
///
/// Needs the category store to resolve the categories a product is listed
/// under.
pub struct ProductService<P, C> {
    products: P,
    categories: C,
}

impl<P, C> ProductService<P, C> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(products: P, categories: C) -> Self {
        Self {
            products,
            categories,
        }
    }
}

impl<P: ProductStore, C: CategoryStore> ProductService<P, C> {
    /// One page of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all_paged(&self, page: PageRequest) -> Result<Page<Product>, CatalogError> {
        Ok(self.products.find_all_paged(page).await?)
    }

    /// Every product, unpaged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.find_all().await?)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product not found with this id"))
    }

    /// Products whose name contains `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if nothing matches.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .products
            .find_by_name_containing_ignore_case(name)
            .await?;

        if products.is_empty() {
            return Err(CatalogError::not_found("no products found with this name"));
        }

        Ok(products)
    }

    /// Products listed under a category. An existing but empty category
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the category does not exist.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn find_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(CatalogError::not_found("category not found with this id"));
        }

        Ok(self.products.find_by_category(category_id).await?)
    }

    /// Create a product listed under the given categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if any category id does not exist
    /// (nothing is written).
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: NewProduct) -> Result<Product, CatalogError> {
        let categories = self.resolve_categories(&request.category_ids).await?;

        let product = Product {
            id: None,
            name: request.name,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            categories,
        };

        let product = self.products.save(&product).await?;

        if let Some(id) = product.id {
            tracing::info!(product_id = %id, "product created");
        }
        Ok(product)
    }

    /// Overwrite a product and replace its category links.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product or any category does
    /// not exist (nothing is written).
    #[instrument(skip(self, update), fields(product_id = %update.id))]
    pub async fn replace(&self, update: ProductUpdate) -> Result<(), CatalogError> {
        let mut product = self.find_by_id(update.id).await?;
        let categories = self.resolve_categories(&update.category_ids).await?;

        product.name = update.name;
        product.description = update.description;
        product.price = update.price;
        product.image_url = update.image_url;
        product.categories = categories;

        self.products.save(&product).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::not_found("product not found with this id"),
            other => CatalogError::Repository(other),
        })?;

        tracing::info!("product replaced");
        Ok(())
    }

    /// Delete a product and its category links.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::not_found("product not found with this id"),
            other => CatalogError::Repository(other),
        })?;

        tracing::info!("product deleted");
        Ok(())
    }

    /// Load every category in `ids`, skipping repeats.
    async fn resolve_categories(&self, ids: &[CategoryId]) -> Result<Vec<Category>, CatalogError> {
        let mut categories: Vec<Category> = Vec::with_capacity(ids.len());

        for &id in ids {
            if categories.iter().any(|c| c.id == Some(id)) {
                continue;
            }

            let category = self.categories.find_by_id(id).await?.ok_or_else(|| {
                CatalogError::NotFound(format!("category {id} not found"))
            })?;
            categories.push(category);
        }

        Ok(categories)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sushi_core::CurrencyCode;

    use super::*;
    use crate::services::catalog::{CategoryService, NewCategory};
    use crate::services::testing::{InMemoryCategoryStore, InMemoryProductStore};

    struct Fixture {
        products: InMemoryProductStore,
        service: ProductService<InMemoryProductStore, InMemoryCategoryStore>,
        temaki: CategoryId,
        uramaki: CategoryId,
    }

    async fn fixture() -> Fixture {
        let categories = InMemoryCategoryStore::default();
        let category_service = CategoryService::new(categories.clone());

        let mut ids = Vec::new();
        for name in ["Temaki", "Uramaki"] {
            let category = category_service
                .create(NewCategory {
                    name: name.to_owned(),
                    description: None,
                })
                .await
                .unwrap();
            ids.push(category.id.unwrap());
        }

        let products = InMemoryProductStore::default();
        Fixture {
            service: ProductService::new(products.clone(), categories),
            products,
            temaki: ids[0],
            uramaki: ids[1],
        }
    }

    fn price(cents: i64) -> Price {
        Price::from_cents(cents, CurrencyCode::BRL).unwrap()
    }

    fn new_product(name: &str, category_ids: Vec<CategoryId>) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: None,
            price: price(3_990),
            image_url: None,
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_links_categories() {
        let f = fixture().await;

        let product = f
            .service
            .create(new_product("Temaki de salmao", vec![f.temaki, f.temaki]))
            .await
            .unwrap();

        let id = product.id.unwrap();
        assert_eq!(product.categories.len(), 1);
        assert_eq!(product.categories[0].id, Some(f.temaki));
        assert_eq!(product.price.to_string(), "R$39.90");
        assert!(f.products.get(id).is_some());
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_writes_nothing() {
        let f = fixture().await;

        let err = f
            .service
            .create(new_product("Mystery roll", vec![f.temaki, CategoryId::new(99)]))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(f.products.saves(), 0);
    }

    #[tokio::test]
    async fn test_find_by_category() {
        let f = fixture().await;
        f.service
            .create(new_product("Temaki de atum", vec![f.temaki]))
            .await
            .unwrap();
        f.service
            .create(new_product("Uramaki filadelfia", vec![f.uramaki]))
            .await
            .unwrap();

        let temakis = f.service.find_by_category(f.temaki).await.unwrap();
        assert_eq!(temakis.len(), 1);
        assert_eq!(temakis[0].name, "Temaki de atum");

        assert!(matches!(
            f.service.find_by_category(CategoryId::new(99)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_category_empty_category_is_ok() {
        let f = fixture().await;
        assert!(f.service.find_by_category(f.uramaki).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_swaps_categories() {
        let f = fixture().await;
        let id = f
            .service
            .create(new_product("Hot roll", vec![f.temaki]))
            .await
            .unwrap()
            .id
            .unwrap();

        f.service
            .replace(ProductUpdate {
                id,
                name: "Hot roll".to_owned(),
                description: Some("Empanado".to_owned()),
                price: price(2_500),
                image_url: None,
                category_ids: vec![f.uramaki],
            })
            .await
            .unwrap();

        let stored = f.products.get(id).unwrap();
        assert_eq!(stored.categories.len(), 1);
        assert_eq!(stored.categories[0].id, Some(f.uramaki));
        assert_eq!(stored.price, price(2_500));
        assert_eq!(stored.description.as_deref(), Some("Empanado"));
    }

    #[tokio::test]
    async fn test_replace_missing_product_is_not_found() {
        let f = fixture().await;

        let err = f
            .service
            .replace(ProductUpdate {
                id: ProductId::new(7),
                name: "Ghost".to_owned(),
                description: None,
                price: price(100),
                image_url: None,
                category_ids: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(f.products.saves(), 0);
    }

    #[tokio::test]
    async fn test_find_by_name_and_delete() {
        let f = fixture().await;
        let id = f
            .service
            .create(new_product("Sashimi de salmao", Vec::new()))
            .await
            .unwrap()
            .id
            .unwrap();

        assert_eq!(f.service.find_by_name("SALMAO").await.unwrap().len(), 1);

        f.service.delete(id).await.unwrap();
        assert!(matches!(
            f.service.find_by_name("salmao").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete(id).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
