/// Store-level faults, classified just enough for the password upsert.
///
/// Repository implementations map their backend's duplicate-key signal to
/// [`StoreError::UniquenessViolation`]; everything else rides through as
/// [`StoreError::Failure`] and is never retried here.
#[derive(Debug)]
pub enum StoreError {
    /// An insert would duplicate a uniquely-constrained key.
    UniquenessViolation,
    /// Any other store fault: connectivity, timeouts, unrelated constraints.
    Failure(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UniquenessViolation => write!(f, "uniqueness violation"),
            Self::Failure(e) => write!(f, "store failure: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UniquenessViolation => None,
            Self::Failure(e) => Some(e.as_ref()),
        }
    }
}

/// Errors surfaced by the authentication core.
///
/// "Not found" and "wrong password" are not errors: lookups return
/// `Ok(None)` and verification returns `Ok(false)`, and callers cannot
/// tell a wrong password from an absent credential.
#[derive(Debug)]
pub enum AuthError {
    /// A stored hash could not be decoded. Treating this as a non-match
    /// would mask data corruption, so it propagates.
    MalformedHash(argon2::password_hash::Error),
    /// Two first-time password writes raced and this caller lost. Expected
    /// but rare; surfaced to the caller instead of retried.
    HashConflict,
    /// Store fault encountered outside the documented insert race.
    Store(StoreError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHash(e) => write!(f, "malformed password hash: {}", e),
            Self::HashConflict => write!(f, "concurrent password write detected"),
            Self::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedHash(e) => Some(e),
            Self::HashConflict => None,
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::MalformedHash(e)
    }
}
