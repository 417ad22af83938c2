//! Saved query storage.

use dashmap::DashMap;

use tally_core::query::SavedQuery;
use tally_shared::types::SavedQueryId;

/// Saved queries keyed by id.
#[derive(Debug, Default)]
pub struct SavedQueryRepository {
    queries: DashMap<SavedQueryId, SavedQuery>,
}

impl SavedQueryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a saved query.
    pub fn insert(&self, query: SavedQuery) {
        self.queries.insert(query.id, query);
    }

    /// Fetches a saved query by id.
    #[must_use]
    pub fn get(&self, id: SavedQueryId) -> Option<SavedQuery> {
        self.queries.get(&id).map(|entry| entry.clone())
    }

    /// Removes a saved query.
    pub fn remove(&self, id: SavedQueryId) -> Option<SavedQuery> {
        self.queries.remove(&id).map(|(_, query)| query)
    }
}
