use super::*;

/// Outcome of a full login attempt. Refusals carry the user-facing
/// catalog message; store faults surface as errors, not refusals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Account),
    Refused(String),
}

/// Outcome of a password change attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordChange {
    /// The new hash, already persisted.
    Updated(String),
    /// The requirement refusal message.
    Refused(String),
}

/// Per-request composition of the authentication components.
///
/// Constructed once per request from the process-lifetime configuration
/// and the request's session scope. The components are public so callers
/// can drive the individual steps; `login`/`logout`/`set_password` are
/// the assembled flows.
pub struct Auth<S, H, F, K> {
    config: AuthConfig,
    pub requirements: RequirementValidator,
    pub directory: AccountDirectory<S>,
    pub verifier: PasswordVerifier<H, F>,
    pub writer: PasswordWriter<S, H>,
    pub session: SessionBinder<K>,
}

impl<S, H, F, K> Auth<S, H, F, K>
where
    S: AccountStore + Clone,
    H: PasswordHashStore + Clone,
    F: AuthFunctions,
    K: SessionScope,
{
    pub fn new(config: AuthConfig, accounts: S, hashes: H, functions: F, scope: K) -> Self {
        let requirements = RequirementValidator::new(config.password_minimum_length);
        let directory = AccountDirectory::new(accounts.clone(), config.statuses.clone());
        let verifier = PasswordVerifier::from_mode(config.verify_mode, hashes.clone(), functions);
        let writer = PasswordWriter::new(accounts, hashes, config.verify_mode, config.cost);
        let session = SessionBinder::new(scope, config.session_key.clone());
        Self {
            config,
            requirements,
            directory,
            verifier,
            writer,
            session,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Resolve, check status, verify, and bind.
    ///
    /// Which refusal is reported for unknown logins, closed accounts, and
    /// wrong passwords collapses to one combined message when
    /// `conceal_failure_reason` is set; a login that fails the shape check
    /// is always reported as such, since format is not account knowledge.
    pub async fn login(&mut self, login: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if !self.requirements.login_meets_requirements(login) {
            return Ok(self.refused(self.config.messages.invalid_login_format.clone()));
        }
        let account = match self.directory.account_from_login(login).await? {
            Some(account) => account,
            None => return Ok(self.concealable(&self.config.messages.no_matching_login)),
        };
        if !self.directory.is_open(&account) {
            return Ok(self.concealable(&self.config.messages.unverified_account));
        }
        if !self.verifier.matches(&account, password).await? {
            return Ok(self.concealable(&self.config.messages.invalid_password));
        }
        self.session.bind(&account);
        Ok(LoginOutcome::Authenticated(account))
    }

    /// Gate the new password, then hash and persist it.
    pub async fn set_password(
        &self,
        account: &Account,
        new_password: &str,
    ) -> Result<PasswordChange, AuthError> {
        if let Err(detail) = self.requirements.password_meets_requirements(new_password) {
            return Ok(PasswordChange::Refused(
                self.config.messages.password_requirements_detail(&detail),
            ));
        }
        let hash = self.writer.set_password(account, new_password).await?;
        Ok(PasswordChange::Updated(hash))
    }

    pub fn logout(&mut self) {
        self.session.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub async fn current_account(&self) -> Result<Option<Account>, AuthError> {
        self.session.current_account(&self.directory).await
    }

    fn concealable(&self, message: &str) -> LoginOutcome {
        match self.config.conceal_failure_reason {
            true => self.refused(self.config.messages.invalid_credentials.clone()),
            false => self.refused(message.to_string()),
        }
    }

    fn refused(&self, message: String) -> LoginOutcome {
        log::debug!("login refused: {}", message);
        LoginOutcome::Refused(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySession;
    use crate::testing::MemoryStore;
    use kw_core::OPEN_STATUS;
    use kw_core::UNVERIFIED_STATUS;

    fn config(mode: VerifyMode) -> AuthConfig {
        AuthConfig {
            verify_mode: mode,
            cost: HashCost::Minimum,
            ..AuthConfig::default()
        }
    }

    fn auth(
        store: &MemoryStore,
        config: AuthConfig,
    ) -> Auth<MemoryStore, MemoryStore, MemoryStore, MemorySession> {
        Auth::new(
            config,
            store.clone(),
            store.clone(),
            store.clone(),
            MemorySession::default(),
        )
    }

    async fn seeded(store: &MemoryStore, mode: VerifyMode) -> Account {
        let account = store.seed("ada@lovelace.dev", OPEN_STATUS);
        let writer = PasswordWriter::new(store.clone(), store.clone(), mode, HashCost::Minimum);
        writer.set_password(&account, "opensesame").await.unwrap();
        match mode {
            VerifyMode::InlineColumn => store.reload(&account).expect("account"),
            _ => account,
        }
    }

    #[tokio::test]
    async fn login_succeeds_under_each_mode() {
        for mode in [
            VerifyMode::InlineColumn,
            VerifyMode::DatabaseFunctions,
            VerifyMode::SecondaryTable,
        ] {
            let store = MemoryStore::default();
            let account = seeded(&store, mode).await;
            let mut auth = auth(&store, config(mode));
            let outcome = auth.login("ada@lovelace.dev", "opensesame").await.unwrap();
            assert_eq!(outcome, LoginOutcome::Authenticated(account.clone()));
            assert!(auth.is_authenticated());
            assert_eq!(auth.current_account().await.unwrap(), Some(account));
        }
    }

    #[tokio::test]
    async fn wrong_password_is_refused_with_the_stock_message() {
        let store = MemoryStore::default();
        seeded(&store, VerifyMode::SecondaryTable).await;
        let mut auth = auth(&store, config(VerifyMode::SecondaryTable));
        let outcome = auth.login("ada@lovelace.dev", "wrong").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Refused("invalid password".into()));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn unknown_login_is_refused_with_the_stock_message() {
        let store = MemoryStore::default();
        let mut auth = auth(&store, config(VerifyMode::SecondaryTable));
        let outcome = auth.login("nobody@example.com", "opensesame").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Refused("no matching login".into()));
    }

    #[tokio::test]
    async fn malformed_login_fails_the_shape_gate() {
        let store = MemoryStore::default();
        let mut auth = auth(&store, config(VerifyMode::SecondaryTable));
        let outcome = auth.login("not-an-email", "opensesame").await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Refused("invalid login, not a valid email address".into())
        );
    }

    #[tokio::test]
    async fn concealment_collapses_the_refusal_reasons() {
        let store = MemoryStore::default();
        seeded(&store, VerifyMode::SecondaryTable).await;
        let mut auth = auth(
            &store,
            AuthConfig {
                conceal_failure_reason: true,
                ..config(VerifyMode::SecondaryTable)
            },
        );
        let combined = LoginOutcome::Refused("invalid login or password".into());
        let unknown = auth.login("nobody@example.com", "opensesame").await.unwrap();
        let wrong = auth.login("ada@lovelace.dev", "wrong").await.unwrap();
        assert_eq!(unknown, combined);
        assert_eq!(wrong, combined);
    }

    #[tokio::test]
    async fn unverified_accounts_cannot_complete_login() {
        let store = MemoryStore::default();
        let account = store.seed("ada@lovelace.dev", UNVERIFIED_STATUS);
        let writer = PasswordWriter::new(
            store.clone(),
            store.clone(),
            VerifyMode::SecondaryTable,
            HashCost::Minimum,
        );
        writer.set_password(&account, "opensesame").await.unwrap();
        let mut auth = auth(&store, config(VerifyMode::SecondaryTable));
        let outcome = auth.login("ada@lovelace.dev", "opensesame").await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Refused(
                "unverified account, please verify account before logging in".into()
            )
        );
    }

    #[tokio::test]
    async fn logout_clears_the_bound_identity() {
        let store = MemoryStore::default();
        seeded(&store, VerifyMode::SecondaryTable).await;
        let mut auth = auth(&store, config(VerifyMode::SecondaryTable));
        auth.login("ada@lovelace.dev", "opensesame").await.unwrap();
        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.current_account().await.unwrap(), None);
    }

    #[tokio::test]
    async fn short_passwords_are_refused_before_the_writer_runs() {
        let store = MemoryStore::default();
        let account = store.seed("ada@lovelace.dev", OPEN_STATUS);
        let auth = auth(&store, config(VerifyMode::SecondaryTable));
        let change = auth.set_password(&account, "abcde").await.unwrap();
        assert_eq!(
            change,
            PasswordChange::Refused(
                "invalid password, does not meet requirements (minimum 6 characters)".into()
            )
        );
        assert_eq!(store.hash_rows(), 0);
    }

    #[tokio::test]
    async fn accepted_passwords_persist_and_verify() {
        let store = MemoryStore::default();
        let account = store.seed("ada@lovelace.dev", OPEN_STATUS);
        let auth = auth(&store, config(VerifyMode::SecondaryTable));
        let change = auth.set_password(&account, "abcdef").await.unwrap();
        let PasswordChange::Updated(hash) = change else {
            panic!("expected update");
        };
        assert_eq!(password::verify("abcdef", &hash), Ok(true));
        assert_eq!(store.hash_rows(), 1);
    }
}
