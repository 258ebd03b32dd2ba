use super::*;
use kw_core::Unique;

/// Computes and durably persists password hashes.
#[derive(Debug, Clone)]
pub struct PasswordWriter<S, H> {
    accounts: S,
    hashes: H,
    mode: VerifyMode,
    cost: HashCost,
}

impl<S: AccountStore, H: PasswordHashStore> PasswordWriter<S, H> {
    pub fn new(accounts: S, hashes: H, mode: VerifyMode, cost: HashCost) -> Self {
        Self {
            accounts,
            hashes,
            mode,
            cost,
        }
    }

    /// Hash the new password and persist it, returning the computed hash.
    ///
    /// Table modes update the existing row first; only an account that has
    /// never set a password misses that update, so a miss falls through to
    /// an insert. If a concurrent first write lands between the two, the
    /// store's uniqueness constraint rejects this insert; retrying would
    /// clobber the other writer's hash, so the conflict goes back to the
    /// caller as [`AuthError::HashConflict`] instead.
    pub async fn set_password(
        &self,
        account: &Account,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let hash = password::hash(new_password, &self.cost.params())?;
        match self.mode {
            VerifyMode::InlineColumn => {
                self.accounts
                    .update_password_hash(account.id(), &hash)
                    .await?
            }
            VerifyMode::DatabaseFunctions | VerifyMode::SecondaryTable => {
                if self.hashes.update_hash(account.id(), &hash).await? == 0 {
                    match self.hashes.insert_hash(account.id(), &hash).await {
                        Ok(()) => {}
                        Err(StoreError::UniquenessViolation) => {
                            log::warn!("concurrent password write for account {}", account.id());
                            return Err(AuthError::HashConflict);
                        }
                        Err(e) => return Err(AuthError::Store(e)),
                    }
                }
            }
        }
        Ok(hash)
    }
}
