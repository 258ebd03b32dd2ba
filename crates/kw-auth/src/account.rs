use kw_core::ID;
use kw_core::Status;
use kw_core::Unique;

/// Account row as read from the backing store.
///
/// Accounts are owned by the store: this core reads them and, when the
/// inline-column mode is active, updates the hash field. It never creates
/// or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: ID<Self>,
    login: String,
    status_id: Status,
    password_hash: Option<String>,
}

impl Account {
    pub fn new(
        id: ID<Self>,
        login: String,
        status_id: Status,
        password_hash: Option<String>,
    ) -> Self {
        Self {
            id,
            login,
            status_id,
            password_hash,
        }
    }
    pub fn login(&self) -> &str {
        &self.login
    }
    pub fn status_id(&self) -> Status {
        self.status_id
    }
    /// Hash carried on the account row itself (inline-column mode only).
    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
    /// Value bound into the session scope. Defaults to the account id.
    pub fn session_value(&self) -> String {
        self.id.to_string()
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Row of the secondary password-hash table. One row per account that has
/// ever set a password in the table modes; the primary key enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashRecord {
    account: ID<Account>,
    hash: String,
}

impl PasswordHashRecord {
    pub fn new(account: ID<Account>, hash: String) -> Self {
        Self { account, hash }
    }
    pub fn account(&self) -> ID<Account> {
        self.account
    }
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use kw_pg::*;

    impl Schema for Account {
        fn name() -> &'static str {
            ACCOUNTS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::INT2,
                tokio_postgres::types::Type::TEXT,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ACCOUNTS,
                " (
                    id            UUID PRIMARY KEY,
                    login         VARCHAR(255) UNIQUE NOT NULL,
                    status_id     SMALLINT NOT NULL DEFAULT 1,
                    password_hash TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_accounts_login ON ",
                ACCOUNTS,
                " (login);"
            )
        }
    }

    /// Hash rows live in their own table so the account row never carries
    /// credentials in the table modes. The primary key doubles as the
    /// uniqueness constraint that arbitrates the first-write race.
    impl Schema for PasswordHashRecord {
        fn name() -> &'static str {
            PASSWORD_HASHES
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::TEXT,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                PASSWORD_HASHES,
                " (
                    account_id    UUID PRIMARY KEY REFERENCES ",
                ACCOUNTS,
                "(id) ON DELETE CASCADE,
                    password_hash TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}
