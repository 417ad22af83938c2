//! Account storage and per-account serialization.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use tally_core::ledger::{Account, LedgerError};
use tally_shared::types::{AccountId, Money};

use crate::error::StoreError;

/// Accounts plus the per-account lock registry.
///
/// Every balance mutation happens while the caller holds the account's
/// lock handle. Multi-account changes must acquire handles in ascending
/// id order, which [`lock_handles`](Self::lock_handles) enforces.
#[derive(Debug, Default)]
pub struct AccountRepository {
    accounts: DashMap<AccountId, Account>,
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account.
    pub fn insert(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Fetches an account by id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|entry| entry.clone())
    }

    /// Returns true if the account exists.
    #[must_use]
    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// All accounts, unordered.
    #[must_use]
    pub fn list(&self) -> Vec<Account> {
        self.accounts.iter().map(|entry| entry.clone()).collect()
    }

    /// Removes an account. Callers are responsible for ensuring no
    /// operations still reference it.
    pub fn remove(&self, id: AccountId) -> Option<Account> {
        self.locks.remove(&id);
        self.accounts.remove(&id).map(|(_, account)| account)
    }

    /// The lock handle serializing mutations of one account.
    #[must_use]
    pub fn lock_handle(&self, id: AccountId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Lock handles for a set of accounts in canonical (ascending id)
    /// order, deduplicated, so concurrent multi-account changes cannot
    /// deadlock on each other.
    #[must_use]
    pub fn lock_handles(&self, ids: &[AccountId]) -> Vec<Arc<Mutex<()>>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(|id| self.lock_handle(id)).collect()
    }

    /// Applies a signed delta to an account balance.
    ///
    /// Must only be called while holding the account's lock handle.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the account is absent;
    /// no balance changes in that case.
    pub fn apply_delta(&self, id: AccountId, delta: Money) -> Result<(), StoreError> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::Ledger(LedgerError::AccountNotFound(id)))?;
        entry.balance += delta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_shared::types::{Currency, ProjectId};

    #[test]
    fn test_apply_delta_adjusts_balance() {
        let repo = AccountRepository::new();
        let account = Account::new(ProjectId::new(), "Main", Currency::new("EUR"));
        let id = account.id;
        repo.insert(account);

        repo.apply_delta(id, Money::from_major(30)).unwrap();
        repo.apply_delta(id, Money::from_major(-10)).unwrap();
        assert_eq!(repo.get(id).unwrap().balance, Money::from_major(20));
    }

    #[test]
    fn test_apply_delta_unknown_account() {
        let repo = AccountRepository::new();
        let err = repo.apply_delta(AccountId::new(), Money::from_major(1));
        assert!(matches!(
            err,
            Err(StoreError::Ledger(LedgerError::AccountNotFound(_)))
        ));
    }

    #[test]
    fn test_lock_handles_sorted_and_deduplicated() {
        let repo = AccountRepository::new();
        let a = AccountId::new();
        let b = AccountId::new();

        let handles = repo.lock_handles(&[b, a, b, a]);
        assert_eq!(handles.len(), 2);

        // Same set in any order yields the same handles in the same order.
        let again = repo.lock_handles(&[a, b]);
        assert!(Arc::ptr_eq(&handles[0], &again[0]));
        assert!(Arc::ptr_eq(&handles[1], &again[1]));
    }
}
