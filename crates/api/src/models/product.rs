//! Menu product.

use sushi_core::{Price, ProductId};

use super::Category;

/// A menu item and the categories it is listed under.
#[derive(Debug, Clone)]
pub struct Product {
    /// Database id, `None` until the product is saved.
    pub id: Option<ProductId>,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Categories this product belongs to.
    pub categories: Vec<Category>,
}
