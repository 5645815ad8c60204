//! In-memory stores and a deterministic encoder for service tests.
//!
//! Each store is `Clone` and shares its state, so a test keeps one handle for
//! assertions while the service owns another.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sushi_core::{CategoryId, CustomerId, Email, Page, PageRequest, ProductId};

use crate::db::{CategoryStore, CustomerStore, ProductStore, RepositoryError};
use crate::models::{Category, Customer, Product};
use crate::services::password::{PasswordEncoder, PasswordHashError};

/// Encodes `raw` as `encoded:{raw}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakePasswordEncoder;

impl PasswordEncoder for FakePasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError> {
        Ok(format!("encoded:{raw}"))
    }
}

/// Encoder that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPasswordEncoder;

impl PasswordEncoder for FailingPasswordEncoder {
    fn encode(&self, _raw: &str) -> Result<String, PasswordHashError> {
        Err(PasswordHashError)
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let offset = usize::try_from(page.offset()).unwrap();
    let limit = usize::try_from(page.limit()).unwrap();
    let content = items.iter().skip(offset).take(limit).cloned().collect();
    Page::new(content, page, u64::try_from(items.len()).unwrap())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Default)]
struct CustomerState {
    customers: Vec<Customer>,
    saves: usize,
    deletes: usize,
}

/// Customer store backed by a `Vec`, enforcing email uniqueness like the
/// database constraint does.
#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    state: Arc<Mutex<CustomerState>>,
}

impl InMemoryCustomerStore {
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().customers = customers;
        store
    }

    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.state
            .lock()
            .unwrap()
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap().customers.len()
    }

    pub fn saves(&self) -> usize {
        self.state.lock().unwrap().saves
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    fn sorted(&self) -> Vec<Customer> {
        let mut customers = self.state.lock().unwrap().customers.clone();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        customers
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Customer>, RepositoryError> {
        Ok(paginate(&self.sorted(), page))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.sorted())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .customers
            .iter()
            .find(|c| &c.email == email)
            .cloned())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|c| contains_ignore_case(&c.name, name))
            .collect())
    }

    async fn save(&self, customer: &Customer) -> Result<Customer, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        if state
            .customers
            .iter()
            .any(|c| c.id != customer.id && c.email == customer.email)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        state.saves += 1;
        match state.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer.clone(),
            None => state.customers.push(customer.clone()),
        }

        Ok(customer.clone())
    }

    async fn delete(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.customers.len();
        state.customers.retain(|c| c.id != customer.id);

        if state.customers.len() == before {
            return Err(RepositoryError::NotFound);
        }

        state.deletes += 1;
        Ok(())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Default)]
struct CategoryState {
    categories: Vec<Category>,
    next_id: i32,
    saves: usize,
}

/// Category store assigning sequential ids from 1.
#[derive(Clone, Default)]
pub struct InMemoryCategoryStore {
    state: Arc<Mutex<CategoryState>>,
}

impl InMemoryCategoryStore {
    pub fn get(&self, id: CategoryId) -> Option<Category> {
        self.state
            .lock()
            .unwrap()
            .categories
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
    }

    pub fn saves(&self) -> usize {
        self.state.lock().unwrap().saves
    }

    fn sorted(&self) -> Vec<Category> {
        let mut categories = self.state.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Category>, RepositoryError> {
        Ok(paginate(&self.sorted(), page))
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.sorted())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|c| contains_ignore_case(&c.name, name))
            .collect())
    }

    async fn save(&self, category: &Category) -> Result<Category, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        let saved = match category.id {
            None => {
                state.next_id += 1;
                let saved = Category {
                    id: Some(CategoryId::new(state.next_id)),
                    ..category.clone()
                };
                state.categories.push(saved.clone());
                saved
            }
            Some(id) => {
                let existing = state
                    .categories
                    .iter_mut()
                    .find(|c| c.id == Some(id))
                    .ok_or(RepositoryError::NotFound)?;
                *existing = category.clone();
                category.clone()
            }
        };

        state.saves += 1;
        Ok(saved)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != Some(id));

        if state.categories.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Default)]
struct ProductState {
    products: Vec<Product>,
    next_id: i32,
    saves: usize,
}

/// Product store assigning sequential ids from 1.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    state: Arc<Mutex<ProductState>>,
}

impl InMemoryProductStore {
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.state
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
    }

    pub fn saves(&self) -> usize {
        self.state.lock().unwrap().saves
    }

    fn sorted(&self) -> Vec<Product> {
        let mut products = self.state.lock().unwrap().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Product>, RepositoryError> {
        Ok(paginate(&self.sorted(), page))
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.sorted())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|p| contains_ignore_case(&p.name, name))
            .collect())
    }

    async fn find_by_category(&self, id: CategoryId) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|p| p.categories.iter().any(|c| c.id == Some(id)))
            .collect())
    }

    async fn save(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        let saved = match product.id {
            None => {
                state.next_id += 1;
                let saved = Product {
                    id: Some(ProductId::new(state.next_id)),
                    ..product.clone()
                };
                state.products.push(saved.clone());
                saved
            }
            Some(id) => {
                let existing = state
                    .products
                    .iter_mut()
                    .find(|p| p.id == Some(id))
                    .ok_or(RepositoryError::NotFound)?;
                *existing = product.clone();
                product.clone()
            }
        };

        state.saves += 1;
        Ok(saved)
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| p.id != Some(id));

        if state.products.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
