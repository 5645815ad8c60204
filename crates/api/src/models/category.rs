//! Menu category.

use std::hash::{Hash, Hasher};

use sushi_core::CategoryId;

/// A menu category (e.g. "Temaki", "Uramaki").
///
/// Identity is the database id: two categories are equal iff both have been
/// persisted and their ids match. A category that has not been saved yet is
/// only equal to itself.
#[derive(Debug, Clone)]
pub struct Category {
    /// Database id, `None` until the category is saved.
    pub id: Option<CategoryId>,
    /// Category name (required).
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl Category {
    /// Build an unsaved category.
    #[must_use]
    pub const fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: None,
            name,
            description,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
