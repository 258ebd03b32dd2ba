use super::*;

/// Binds authenticated identity into the external session scope.
///
/// One key holds the bound account's session value; there is no partially
/// authenticated state. Binding clears the scope first, so at most one
/// identity is ever bound and no prior session state survives a login.
#[derive(Debug, Clone)]
pub struct SessionBinder<K> {
    scope: K,
    key: String,
}

impl<K: SessionScope> SessionBinder<K> {
    pub fn new(scope: K, key: impl Into<String>) -> Self {
        Self {
            scope,
            key: key.into(),
        }
    }

    /// Transition to authenticated: clear everything, then bind.
    pub fn bind(&mut self, account: &Account) {
        self.scope.clear();
        self.scope.set(&self.key, account.session_value());
    }

    /// Transition back to anonymous.
    pub fn clear(&mut self) {
        self.scope.clear();
    }

    /// The bound session value, if any. Empty values count as unbound.
    pub fn session_value(&self) -> Option<String> {
        self.scope.get(&self.key).filter(|value| !value.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_value().is_some()
    }

    /// Re-resolve the bound account. `Ok(None)` means the session is
    /// stale (deleted or closed account, or a foreign value); the caller
    /// decides whether to clear and demand a fresh login.
    pub async fn current_account<S: AccountStore>(
        &self,
        directory: &AccountDirectory<S>,
    ) -> Result<Option<Account>, AuthError> {
        match self.session_value() {
            Some(ref value) => directory.account_from_session(value).await,
            None => Ok(None),
        }
    }
}
