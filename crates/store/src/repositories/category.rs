//! Operation category storage.

use dashmap::DashMap;

use tally_core::operation::OperationCategory;
use tally_shared::types::CategoryId;

/// Categories keyed by id.
#[derive(Debug, Default)]
pub struct CategoryRepository {
    categories: DashMap<CategoryId, OperationCategory>,
}

impl CategoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a category.
    pub fn insert(&self, category: OperationCategory) {
        self.categories.insert(category.id, category);
    }

    /// Fetches a category by id.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<OperationCategory> {
        self.categories.get(&id).map(|entry| entry.clone())
    }

    /// All categories, unordered.
    #[must_use]
    pub fn list(&self) -> Vec<OperationCategory> {
        self.categories.iter().map(|entry| entry.clone()).collect()
    }
}
