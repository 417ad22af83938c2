//! Operation storage.

use dashmap::DashMap;

use tally_core::operation::Operation;
use tally_shared::types::OperationId;

/// Operations keyed by id; custom-field values travel inside the entity.
#[derive(Debug, Default)]
pub struct OperationRepository {
    operations: DashMap<OperationId, Operation>,
}

impl OperationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an operation.
    pub fn insert(&self, operation: Operation) {
        self.operations.insert(operation.id, operation);
    }

    /// Fetches an operation by id.
    #[must_use]
    pub fn get(&self, id: OperationId) -> Option<Operation> {
        self.operations.get(&id).map(|entry| entry.clone())
    }

    /// Removes an operation together with its custom-field values.
    pub fn remove(&self, id: OperationId) -> Option<Operation> {
        self.operations.remove(&id).map(|(_, op)| op)
    }

    /// All operations, unordered.
    #[must_use]
    pub fn list(&self) -> Vec<Operation> {
        self.operations.iter().map(|entry| entry.clone()).collect()
    }

    /// Number of stored operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if no operations are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
