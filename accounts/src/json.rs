//! Flat-file JSON account store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use steward_types::VoterId;

use crate::account::Account;
use crate::error::AccountError;
use crate::store::AccountStore;

#[derive(Default, Serialize, Deserialize)]
struct AccountFile {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// [`AccountStore`] that keeps every account in memory and rewrites one JSON
/// file on each change.
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write leaves the previous file intact. Memory is only
/// updated once the file write succeeds.
pub struct JsonAccountStore {
    path: PathBuf,
    accounts: Mutex<BTreeMap<VoterId, Account>>,
}

impl JsonAccountStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AccountError> {
        let path = path.into();
        let accounts = match fs::read_to_string(&path) {
            Ok(content) => {
                let file: AccountFile = serde_json::from_str(&content).map_err(|source| {
                    AccountError::Json {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                file.accounts.into_iter().map(|a| (a.id.clone(), a)).collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(AccountError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        tracing::info!(path = %path.display(), count = accounts.len(), "loaded accounts");
        Ok(Self {
            path,
            accounts: Mutex::new(accounts),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<VoterId, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn io_err(&self, source: std::io::Error) -> AccountError {
        AccountError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn persist(&self, accounts: &BTreeMap<VoterId, Account>) -> Result<(), AccountError> {
        let file = AccountFile {
            accounts: accounts.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| AccountError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }
}

impl AccountStore for JsonAccountStore {
    fn get(&self, id: &VoterId) -> Result<Option<Account>, AccountError> {
        Ok(self.lock().get(id).cloned())
    }

    fn put(&self, account: &Account) -> Result<(), AccountError> {
        let mut accounts = self.lock();
        let mut next = accounts.clone();
        next.insert(account.id.clone(), account.clone());
        self.persist(&next)?;
        *accounts = next;
        Ok(())
    }

    fn remove(&self, id: &VoterId) -> Result<bool, AccountError> {
        let mut accounts = self.lock();
        if !accounts.contains_key(id) {
            return Ok(false);
        }
        let mut next = accounts.clone();
        next.remove(id);
        self.persist(&next)?;
        *accounts = next;
        Ok(true)
    }

    fn all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.lock().values().cloned().collect())
    }

    fn count(&self) -> Result<usize, AccountError> {
        Ok(self.lock().len())
    }
}
