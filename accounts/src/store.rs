//! Account storage trait.

use steward_types::VoterId;

use crate::account::Account;
use crate::error::AccountError;

/// Trait for account storage operations.
pub trait AccountStore: Send + Sync {
    fn get(&self, id: &VoterId) -> Result<Option<Account>, AccountError>;
    fn put(&self, account: &Account) -> Result<(), AccountError>;
    /// Returns whether an account was removed.
    fn remove(&self, id: &VoterId) -> Result<bool, AccountError>;
    fn all(&self) -> Result<Vec<Account>, AccountError>;

    fn count(&self) -> Result<usize, AccountError> {
        self.all().map(|a| a.len())
    }

    fn banned(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.all()?.into_iter().filter(|a| a.banned).collect())
    }

    /// Look up an account by display name, case-insensitively.
    fn find_by_name(&self, name: &str) -> Result<Option<Account>, AccountError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name)))
    }

    /// Ban an existing account. Returns the updated record.
    fn ban(&self, id: &VoterId, reason: Option<String>) -> Result<Account, AccountError> {
        let mut account = self
            .get(id)?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        account.banned = true;
        account.ban_reason = reason;
        self.put(&account)?;
        Ok(account)
    }

    /// Lift a ban. Returns the updated record.
    fn unban(&self, id: &VoterId) -> Result<Account, AccountError> {
        let mut account = self
            .get(id)?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        account.banned = false;
        account.ban_reason = None;
        self.put(&account)?;
        Ok(account)
    }
}
