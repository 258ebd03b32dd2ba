use super::*;
use kw_core::ID;

/// Account lookup by login or session value, applying the status rules.
///
/// Each lookup is exactly one store query with no retries; the resolved
/// account is what every subsequent step operates on.
#[derive(Debug, Clone)]
pub struct AccountDirectory<S> {
    store: S,
    policy: StatusPolicy,
}

impl<S: AccountStore> AccountDirectory<S> {
    pub fn new(store: S, policy: StatusPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }

    /// Resolve the unique account with this login. Unverified accounts may
    /// still log in; unrecognized statuses may not.
    pub async fn account_from_login(&self, login: &str) -> Result<Option<Account>, AuthError> {
        let statuses = [self.policy.unverified_value, self.policy.open_value];
        let filter = (!self.policy.skip).then_some(&statuses[..]);
        Ok(self.store.account_by_login(login, filter).await?)
    }

    /// Resolve the account a session value points at. Only open accounts
    /// may resume a session; a value that does not parse as an account id
    /// is a stale session, not an error.
    pub async fn account_from_session(
        &self,
        session_value: &str,
    ) -> Result<Option<Account>, AuthError> {
        let id = match session_value.parse::<ID<Account>>() {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        let statuses = [self.policy.open_value];
        let filter = (!self.policy.skip).then_some(&statuses[..]);
        Ok(self.store.account_by_id(id, filter).await?)
    }

    pub fn is_open(&self, account: &Account) -> bool {
        self.policy.skip || account.status_id() == self.policy.open_value
    }
}
