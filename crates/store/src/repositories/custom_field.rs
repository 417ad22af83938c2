//! Custom-field definition storage.

use dashmap::DashMap;

use tally_core::operation::CustomFieldDef;
use tally_core::query::FieldCatalog;
use tally_shared::types::CustomFieldId;

/// Custom-field definitions keyed by id.
#[derive(Debug, Default)]
pub struct CustomFieldRepository {
    fields: DashMap<CustomFieldId, CustomFieldDef>,
}

impl CustomFieldRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field definition.
    pub fn insert(&self, field: CustomFieldDef) {
        self.fields.insert(field.id, field);
    }

    /// Fetches a field definition by id.
    #[must_use]
    pub fn get(&self, id: CustomFieldId) -> Option<CustomFieldDef> {
        self.fields.get(&id).map(|entry| entry.clone())
    }

    /// All field definitions, unordered.
    #[must_use]
    pub fn list(&self) -> Vec<CustomFieldDef> {
        self.fields.iter().map(|entry| entry.clone()).collect()
    }

    /// Builds the filterable-field catalog from the current definitions.
    #[must_use]
    pub fn catalog(&self) -> FieldCatalog {
        FieldCatalog::new(self.list())
    }
}
