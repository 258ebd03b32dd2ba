use super::*;
use kw_core::ID;
use kw_core::Status;
use kw_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::error::SqlState;

/// The store reports duplicate keys distinctly; everything else is an
/// ordinary storage fault.
fn classify(e: PgErr) -> StoreError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::UniquenessViolation
    } else {
        StoreError::Failure(Box::new(e))
    }
}

fn hydrate(row: tokio_postgres::Row) -> Account {
    Account::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, Status>(2),
        row.get::<_, Option<String>>(3),
    )
}

impl AccountStore for Arc<Client> {
    async fn account_by_login(
        &self,
        login: &str,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError> {
        let result = match statuses {
            Some(statuses) => {
                self.query_opt(
                    const_format::concatcp!(
                        "SELECT id, login, status_id, password_hash FROM ",
                        ACCOUNTS,
                        " WHERE login = $1 AND status_id = ANY($2)"
                    ),
                    &[&login, &statuses],
                )
                .await
            }
            None => {
                self.query_opt(
                    const_format::concatcp!(
                        "SELECT id, login, status_id, password_hash FROM ",
                        ACCOUNTS,
                        " WHERE login = $1"
                    ),
                    &[&login],
                )
                .await
            }
        };
        result.map(|opt| opt.map(hydrate)).map_err(classify)
    }

    async fn account_by_id(
        &self,
        id: ID<Account>,
        statuses: Option<&[Status]>,
    ) -> Result<Option<Account>, StoreError> {
        let id_inner = id.inner();
        let result = match statuses {
            Some(statuses) => {
                self.query_opt(
                    const_format::concatcp!(
                        "SELECT id, login, status_id, password_hash FROM ",
                        ACCOUNTS,
                        " WHERE id = $1 AND status_id = ANY($2)"
                    ),
                    &[&id_inner, &statuses],
                )
                .await
            }
            None => {
                self.query_opt(
                    const_format::concatcp!(
                        "SELECT id, login, status_id, password_hash FROM ",
                        ACCOUNTS,
                        " WHERE id = $1"
                    ),
                    &[&id_inner],
                )
                .await
            }
        };
        result.map(|opt| opt.map(hydrate)).map_err(classify)
    }

    async fn update_password_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError> {
        let affected = self
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    ACCOUNTS,
                    " SET password_hash = $2 WHERE id = $1"
                ),
                &[&id.inner(), &hash],
            )
            .await
            .map_err(classify)?;
        match affected {
            0 => Err(StoreError::Failure("no account row to update".into())),
            _ => Ok(()),
        }
    }
}

impl PasswordHashStore for Arc<Client> {
    async fn hash_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT password_hash FROM ",
                PASSWORD_HASHES,
                " WHERE account_id = $1"
            ),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| row.get::<_, String>(0)))
        .map_err(classify)
    }

    async fn update_hash(&self, id: ID<Account>, hash: &str) -> Result<u64, StoreError> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                PASSWORD_HASHES,
                " SET password_hash = $2 WHERE account_id = $1"
            ),
            &[&id.inner(), &hash],
        )
        .await
        .map_err(classify)
    }

    async fn insert_hash(&self, id: ID<Account>, hash: &str) -> Result<(), StoreError> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                PASSWORD_HASHES,
                " (account_id, password_hash) VALUES ($1, $2)"
            ),
            &[&id.inner(), &hash],
        )
        .await
        .map(|_| ())
        .map_err(classify)
    }
}

impl AuthFunctions for Arc<Client> {
    async fn salt_for(&self, id: ID<Account>) -> Result<Option<String>, StoreError> {
        self.query_one(
            const_format::concatcp!("SELECT ", GET_SALT, "($1)"),
            &[&id.inner()],
        )
        .await
        .map(|row| row.get::<_, Option<String>>(0))
        .map_err(classify)
    }

    async fn hash_matches(&self, id: ID<Account>, candidate: &str) -> Result<bool, StoreError> {
        self.query_one(
            const_format::concatcp!("SELECT ", VALID_HASH, "($1, $2)"),
            &[&id.inner(), &candidate],
        )
        .await
        .map(|row| row.get::<_, bool>(0))
        .map_err(classify)
    }
}

/// One-time capability probe behind [`StatusPolicy::skip`]: a schema
/// without the status column runs with status checks disabled.
pub async fn has_status_column(db: &Client) -> Result<bool, StoreError> {
    db.query_opt(
        "SELECT 1 FROM information_schema.columns WHERE table_name = $1 AND column_name = 'status_id'",
        &[&ACCOUNTS],
    )
    .await
    .map(|opt| opt.is_some())
    .map_err(classify)
}
