//! DDL for the backend authentication functions.
//!
//! Both functions are `SECURITY DEFINER`: they read the password hash
//! table under the definer's privileges, so the application role needs no
//! SELECT grant on [`PASSWORD_HASHES`]. In the database-offloaded
//! verification mode this is what keeps the stored hash from ever
//! reaching the application tier.
use super::*;

/// Creates the salt-retrieval function.
///
/// Returns the stored PHC string minus its final hash segment (algorithm,
/// version, parameters, and salt), or NULL when the account has no
/// password row.
pub const CREATES_GET_SALT: &str = const_format::concatcp!(
    "CREATE OR REPLACE FUNCTION ",
    GET_SALT,
    r#"(acct_id uuid) RETURNS text AS $$
DECLARE
    stored text;
BEGIN
    SELECT password_hash INTO stored FROM "#,
    PASSWORD_HASHES,
    r#" WHERE account_id = acct_id;
    RETURN substring(stored from '^(.*)\$');
END;
$$ LANGUAGE plpgsql SECURITY DEFINER SET search_path = public;"#
);

/// Creates the hash-validation function.
///
/// Compares a candidate hash computed by the application against the
/// stored hash, entirely inside the database.
pub const CREATES_VALID_HASH: &str = const_format::concatcp!(
    "CREATE OR REPLACE FUNCTION ",
    VALID_HASH,
    r#"(acct_id uuid, hash text) RETURNS boolean AS $$
DECLARE
    valid boolean;
BEGIN
    SELECT password_hash = hash INTO valid FROM "#,
    PASSWORD_HASHES,
    r#" WHERE account_id = acct_id;
    RETURN coalesce(valid, false);
END;
$$ LANGUAGE plpgsql SECURITY DEFINER SET search_path = public;"#
);
