use super::*;
use kw_core::Unique;

/// Where password hashes live and how they are checked. One mode is
/// active for the process lifetime; nothing re-derives this per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    /// Hash stored on the account row itself, checked in-process.
    InlineColumn,
    /// Salt fetch and final comparison delegated to backend functions.
    DatabaseFunctions,
    /// Hash row read from the separate hash table, checked in-process.
    SecondaryTable,
}

impl VerifyMode {
    /// Startup selection: the inline column wins when the account model
    /// carries its own hash field; otherwise backend functions when the
    /// dialect provides them; otherwise the secondary table.
    pub fn select(inline_column: bool, database_functions: bool) -> Self {
        if inline_column {
            Self::InlineColumn
        } else if database_functions {
            Self::DatabaseFunctions
        } else {
            Self::SecondaryTable
        }
    }
}

/// Checks a submitted password against the stored credential, carrying
/// only the backend the active mode needs.
///
/// Both in-process modes decode the stored PHC hash (decode failures
/// propagate, they are corruption rather than mismatches) and compare
/// through the hashing library. The function mode recomputes the hash
/// from the fetched salt record and leaves the verdict to the backend, so
/// the stored hash never crosses into this tier.
#[derive(Debug, Clone)]
pub enum PasswordVerifier<H, F> {
    InlineColumn,
    DatabaseFunctions(F),
    SecondaryTable(H),
}

impl<H, F> PasswordVerifier<H, F> {
    /// Instantiate the verifier for the statically selected mode. Backends
    /// the mode does not use are dropped here.
    pub fn from_mode(mode: VerifyMode, hashes: H, functions: F) -> Self {
        match mode {
            VerifyMode::InlineColumn => Self::InlineColumn,
            VerifyMode::DatabaseFunctions => Self::DatabaseFunctions(functions),
            VerifyMode::SecondaryTable => Self::SecondaryTable(hashes),
        }
    }

    pub fn mode(&self) -> VerifyMode {
        match self {
            Self::InlineColumn => VerifyMode::InlineColumn,
            Self::DatabaseFunctions(_) => VerifyMode::DatabaseFunctions,
            Self::SecondaryTable(_) => VerifyMode::SecondaryTable,
        }
    }
}

impl<H: PasswordHashStore, F: AuthFunctions> PasswordVerifier<H, F> {
    /// `Ok(false)` covers both a wrong password and no credential on
    /// file; callers cannot tell the two apart.
    pub async fn matches(&self, account: &Account, submitted: &str) -> Result<bool, AuthError> {
        match self {
            Self::InlineColumn => match account.password_hash() {
                Some(stored) => Ok(password::verify(submitted, stored)?),
                None => Ok(false),
            },
            Self::DatabaseFunctions(functions) => {
                match functions.salt_for(account.id()).await? {
                    Some(ref record) => {
                        let candidate = password::hash_with_salt(submitted, record)?;
                        Ok(functions.hash_matches(account.id(), &candidate).await?)
                    }
                    None => Ok(false),
                }
            }
            Self::SecondaryTable(hashes) => match hashes.hash_for(account.id()).await? {
                Some(ref stored) => Ok(password::verify(submitted, stored)?),
                None => Ok(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use kw_core::ID;
    use kw_core::OPEN_STATUS;

    fn account_with_hash(hash: Option<String>) -> Account {
        Account::new(ID::default(), "ada@lovelace.dev".into(), OPEN_STATUS, hash)
    }

    fn stored(password: &str) -> String {
        password::hash(password, &HashCost::Minimum.params()).expect("hash")
    }

    #[test]
    fn selection_priority_is_inline_then_functions_then_table() {
        assert_eq!(VerifyMode::select(true, true), VerifyMode::InlineColumn);
        assert_eq!(VerifyMode::select(false, true), VerifyMode::DatabaseFunctions);
        assert_eq!(VerifyMode::select(false, false), VerifyMode::SecondaryTable);
    }

    #[tokio::test]
    async fn inline_column_mode_checks_the_account_row() {
        let account = account_with_hash(Some(stored("opensesame")));
        let verifier = PasswordVerifier::<(), ()>::InlineColumn;
        assert!(verifier.matches(&account, "opensesame").await.unwrap());
        assert!(!verifier.matches(&account, "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn inline_column_mode_without_credential_fails() {
        let account = account_with_hash(None);
        let verifier = PasswordVerifier::<(), ()>::InlineColumn;
        assert!(!verifier.matches(&account, "opensesame").await.unwrap());
    }

    #[tokio::test]
    async fn inline_column_mode_surfaces_corrupt_hashes() {
        let account = account_with_hash(Some("garbage".into()));
        let verifier = PasswordVerifier::<(), ()>::InlineColumn;
        assert!(matches!(
            verifier.matches(&account, "opensesame").await,
            Err(AuthError::MalformedHash(_))
        ));
    }

    #[tokio::test]
    async fn secondary_table_mode_checks_the_hash_row() {
        let store = MemoryStore::default();
        let account = store.seed("ada@lovelace.dev", OPEN_STATUS);
        store.put_hash(&account, &stored("opensesame"));
        let verifier = PasswordVerifier::<_, ()>::SecondaryTable(store.clone());
        assert!(verifier.matches(&account, "opensesame").await.unwrap());
        assert!(!verifier.matches(&account, "wrong").await.unwrap());
        let missing = store.seed("grace@hopper.dev", OPEN_STATUS);
        assert!(!verifier.matches(&missing, "opensesame").await.unwrap());
    }

    #[tokio::test]
    async fn database_function_mode_delegates_the_verdict() {
        let store = MemoryStore::default();
        let account = store.seed("ada@lovelace.dev", OPEN_STATUS);
        store.put_hash(&account, &stored("opensesame"));
        let verifier = PasswordVerifier::<(), _>::DatabaseFunctions(store.clone());
        assert!(verifier.matches(&account, "opensesame").await.unwrap());
        assert!(!verifier.matches(&account, "wrong").await.unwrap());
        let missing = store.seed("grace@hopper.dev", OPEN_STATUS);
        assert!(!verifier.matches(&missing, "opensesame").await.unwrap());
    }

    #[tokio::test]
    async fn disabled_backends_hold_no_credentials() {
        let account = account_with_hash(None);
        let table = PasswordVerifier::<(), ()>::SecondaryTable(());
        let functions = PasswordVerifier::<(), ()>::DatabaseFunctions(());
        assert!(!table.matches(&account, "opensesame").await.unwrap());
        assert!(!functions.matches(&account, "opensesame").await.unwrap());
    }
}
