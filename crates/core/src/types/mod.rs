//! Core types for the Sushi API.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod page;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use page::{Page, PageRequest};
pub use price::{CurrencyCode, Price, PriceError};
