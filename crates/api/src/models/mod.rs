//! Domain models for the Sushi API.
//!
//! These types represent validated domain objects, separate from both the
//! database row types in [`crate::db`] and the JSON payloads in
//! [`crate::routes`].

pub mod category;
pub mod customer;
pub mod product;

pub use category::Category;
pub use customer::{Address, Customer, Phone};
pub use product::Product;
