use super::*;
use kw_core::ID;
use kw_core::Status;

/// Account reads, plus the one write the inline-column mode needs.
///
/// Lookups return at most one row; uniqueness of login and id is the
/// store's responsibility. `statuses` is the status filter to apply, or
/// `None` when status checks are skipped.
#[allow(async_fn_in_trait)]
pub trait AccountStore {
    async fn account_by_login(
        &self,
        login: &str,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError>;
    async fn account_by_id(
        &self,
        id: ID<Account>,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError>;
    /// Update the hash column on the account row itself. Zero rows
    /// affected is a failure: the resolved account has vanished.
    async fn update_password_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError>;
}

/// The secondary hash table: one row per account, keyed by account id.
#[allow(async_fn_in_trait)]
pub trait PasswordHashStore {
    async fn hash_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError>;
    /// Conditional update by key, reporting the affected-row count.
    async fn update_hash(&self, id: ID<Account>, hash: &str) -> Result<u64, StoreError>;
    /// Insert a new row. A duplicate key must surface as
    /// [`StoreError::UniquenessViolation`], distinctly from other faults.
    async fn insert_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError>;
}

/// The backend authentication functions for database-offloaded
/// verification.
///
/// Contract: implementations return the salt record and a match verdict,
/// never the stored hash. Keeping the hash inside the store is the point
/// of this mode.
#[allow(async_fn_in_trait)]
pub trait AuthFunctions {
    /// Salt record for the account, or `None` when no password is set.
    async fn salt_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError>;
    /// Backend-side comparison of a locally computed candidate hash.
    async fn hash_matches(&self, id: ID<Account>, candidate: &str) -> Result<bool, StoreError>;
}

/// The external session scope: a request-scoped key-value bag.
pub trait SessionScope {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn clear(&mut self);
}

/// A disabled credential backend. It holds no credentials, so lookups
/// miss, verification fails, and writes report a storage failure. Lets
/// inline-column deployments skip wiring table or function backends.
impl PasswordHashStore for () {
    async fn hash_for(&self, _: ID<Account>) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
    async fn update_hash(&self, _: ID<Account>, _: &str) -> Result<u64, StoreError> {
        Ok(0)
    }
    async fn insert_hash(&self, _: ID<Account>, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Failure(
            "no password hash store configured".into(),
        ))
    }
}

impl AuthFunctions for () {
    async fn salt_for(&self, _: ID<Account>) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
    async fn hash_matches(&self, _: ID<Account>, _: &str) -> Result<bool, StoreError> {
        Ok(false)
    }
}
