//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Customers
//! GET    /api/customers?page&size        - Page of customers
//! GET    /api/customers/all              - All customers
//! GET    /api/customers/find?name=       - Customers by name part
//! GET    /api/customers/by-email?email=  - Customer by email
//! GET    /api/customers/{id}             - Customer by id
//! GET    /api/customers/{id}/phone       - Customer's phone
//! GET    /api/customers/{id}/addresses   - Customer's addresses
//! POST   /api/customers                  - Register (201)
//! PUT    /api/customers                  - Replace, id in body (204)
//! DELETE /api/customers/{id}             - Delete (204)
//!
//! # Categories
//! GET    /api/categories?page&size       - Page of categories
//! GET    /api/categories/all             - All categories
//! GET    /api/categories/find?name=      - Categories by name part
//! GET    /api/categories/{id}            - Category by id
//! POST   /api/categories                 - Create (201)
//! PUT    /api/categories                 - Replace, id in body (204)
//! DELETE /api/categories/{id}            - Delete (204)
//!
//! # Products
//! GET    /api/products?page&size         - Page of products
//! GET    /api/products/all               - All products
//! GET    /api/products/find?name=        - Products by name part
//! GET    /api/products/by-category/{id}  - Products in a category
//! GET    /api/products/{id}              - Product by id
//! POST   /api/products                   - Create (201)
//! PUT    /api/products                   - Replace, id in body (204)
//! DELETE /api/products/{id}              - Delete (204)
//! ```

pub mod categories;
pub mod customers;
pub mod products;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::get,
};
use serde::Deserialize;

use sushi_core::PageRequest;

use crate::error::AppError;
use crate::state::AppState;

// =============================================================================
// Extractors
// =============================================================================

/// JSON body whose rejection is reported as an `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejection is reported as an `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters whose rejection is reported as an `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `?page=&size=` paging parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        Self::new(
            params.page.unwrap_or(0),
            params.size.unwrap_or(Self::DEFAULT_SIZE),
        )
    }
}

/// `?name=` search parameter.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

// =============================================================================
// Validation
// =============================================================================

/// Reject blank strings; returns the value unchanged.
pub(crate) fn require_non_blank(field: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be blank")));
    }
    Ok(value)
}

/// Treat a blank optional string as absent.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Routers
// =============================================================================

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customers::list)
                .post(customers::create)
                .put(customers::replace),
        )
        .route("/all", get(customers::list_all))
        .route("/find", get(customers::find_by_name))
        .route("/by-email", get(customers::find_by_email))
        .route("/{id}", get(customers::show).delete(customers::delete))
        .route("/{id}/phone", get(customers::phone))
        .route("/{id}/addresses", get(customers::addresses))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list)
                .post(categories::create)
                .put(categories::replace),
        )
        .route("/all", get(categories::list_all))
        .route("/find", get(categories::find_by_name))
        .route("/{id}", get(categories::show).delete(categories::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list)
                .post(products::create)
                .put(products::replace),
        )
        .route("/all", get(products::list_all))
        .route("/find", get(products::find_by_name))
        .route("/by-category/{id}", get(products::by_category))
        .route("/{id}", get(products::show).delete(products::delete))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/customers", customer_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/products", product_routes())
}
