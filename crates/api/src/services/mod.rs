//! Business logic services for the Sushi API.
//!
//! # Services
//!
//! - `customers` - Customer aggregate (customer + phone + addresses)
//! - `catalog` - Menu categories and products
//! - `password` - One-way password encoding (Argon2id)
//!
//! Services take their storage ports and encoder through the constructor;
//! handlers build them per request from [`crate::state::AppState`].

pub mod catalog;
pub mod customers;
pub mod password;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{CatalogError, CategoryService, ProductService};
pub use customers::{CustomerError, CustomerService};
pub use password::{Argon2PasswordEncoder, PasswordEncoder, PasswordHashError};
