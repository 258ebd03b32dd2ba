//! In-process store and session fakes for the unit tests.
//!
//! `MemoryStore` implements the three store traits over hash maps with
//! real affected-row counts and duplicate-key detection, close enough to
//! the backing store to exercise the status filters and the
//! update-else-insert race without a live database.
use super::*;
use kw_core::ID;
use kw_core::Status;
use kw_core::Unique;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    accounts: HashMap<uuid::Uuid, Account>,
    hashes: HashMap<uuid::Uuid, String>,
    /// When set, `update_hash` reports zero rows regardless of state,
    /// replaying the losing side of the first-write race.
    update_misses: bool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn seed(&self, login: &str, status: Status) -> Account {
        let account = Account::new(ID::default(), login.to_string(), status, None);
        self.inner
            .lock()
            .unwrap()
            .accounts
            .insert(account.id().inner(), account.clone());
        account
    }

    pub fn put_hash(&self, account: &Account, hash: &str) {
        self.inner
            .lock()
            .unwrap()
            .hashes
            .insert(account.id().inner(), hash.to_string());
    }

    pub fn stored_hash(&self, account: &Account) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .hashes
            .get(&account.id().inner())
            .cloned()
    }

    pub fn hash_rows(&self) -> usize {
        self.inner.lock().unwrap().hashes.len()
    }

    pub fn reload(&self, account: &Account) -> Option<Account> {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(&account.id().inner())
            .cloned()
    }

    pub fn evict(&self, account: &Account) {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .remove(&account.id().inner());
    }

    pub fn force_update_miss(&self, missing: bool) {
        self.inner.lock().unwrap().update_misses = missing;
    }
}

fn admitted(account: &Account, statuses: Option<&[Status]>) -> bool {
    match statuses {
        Some(statuses) => statuses.contains(&account.status_id()),
        None => true,
    }
}

impl AccountStore for MemoryStore {
    async fn account_by_login(
        &self,
        login: &str,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|account| account.login() == login && admitted(account, statuses))
            .cloned())
    }

    async fn account_by_id(
        &self,
        id: ID<Account>,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .accounts
            .get(&id.inner())
            .filter(|account| admitted(account, statuses))
            .cloned())
    }

    async fn update_password_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.accounts.get_mut(&id.inner()) {
            Some(account) => {
                *account = Account::new(
                    account.id(),
                    account.login().to_string(),
                    account.status_id(),
                    Some(hash.to_string()),
                );
                Ok(())
            }
            None => Err(StoreError::Failure("no account row to update".into())),
        }
    }
}

impl PasswordHashStore for MemoryStore {
    async fn hash_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().unwrap().hashes.get(&id.inner()).cloned())
    }

    async fn update_hash(&self, id: ID<Account>, hash: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.update_misses {
            return Ok(0);
        }
        match inner.hashes.get_mut(&id.inner()) {
            Some(row) => {
                *row = hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.hashes.contains_key(&id.inner()) {
            return Err(StoreError::UniquenessViolation);
        }
        inner.hashes.insert(id.inner(), hash.to_string());
        Ok(())
    }
}

/// Mirrors the backend functions: the salt record leaves the store, the
/// stored hash never does.
impl AuthFunctions for MemoryStore {
    async fn salt_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .hashes
            .get(&id.inner())
            .and_then(|stored| password::salt_record(stored))
            .map(str::to_string))
    }

    async fn hash_matches(&self, id: ID<Account>, candidate: &str) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .hashes
            .get(&id.inner())
            .is_some_and(|stored| stored == candidate))
    }
}

/// Request-scoped session bag.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl SessionScope for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
    fn clear(&mut self) {
        self.values.clear();
    }
}
