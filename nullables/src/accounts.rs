//! Nullable account store: in-memory, never touches disk.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use steward_accounts::{Account, AccountError, AccountStore};
use steward_types::VoterId;

/// In-memory [`AccountStore`] for testing.
#[derive(Debug, Default)]
pub struct NullAccountStore {
    accounts: Mutex<BTreeMap<VoterId, Account>>,
}

impl NullAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with the given accounts.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts.into_iter().map(|a| (a.id.clone(), a)).collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<VoterId, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccountStore for NullAccountStore {
    fn get(&self, id: &VoterId) -> Result<Option<Account>, AccountError> {
        Ok(self.lock().get(id).cloned())
    }

    fn put(&self, account: &Account) -> Result<(), AccountError> {
        self.lock().insert(account.id.clone(), account.clone());
        Ok(())
    }

    fn remove(&self, id: &VoterId) -> Result<bool, AccountError> {
        Ok(self.lock().remove(id).is_some())
    }

    fn all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.lock().values().cloned().collect())
    }
}
