//! Argon2 hashing and verification.
//!
//! Stored hashes are PHC strings. Decoding failures are surfaced to the
//! caller — a hash that cannot be parsed is corrupt data, not a wrong
//! password — and the match decision itself is the hashing library's
//! constant-time comparison.
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
use argon2::password_hash::SaltString;
use argon2::password_hash::errors::InvalidValue;

fn salt() -> SaltString {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes).expect("salt")
}

/// Hash a password with a fresh salt at the given cost.
pub fn hash(password: &str, params: &Params) -> Result<String, argon2::password_hash::Error> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
        .hash_password(password.as_bytes(), &salt())
        .map(|h| h.to_string())
}

/// Verify a password against a stored hash.
///
/// A mismatch is `Ok(false)`; a hash that cannot be decoded is an error.
pub fn verify(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let ref parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Recompute a full hash from a salt record fetched from the backend.
///
/// The record carries algorithm, version, parameters, and salt; the
/// computed hash is handed back to the backend for the final comparison,
/// so the stored hash itself never reaches this tier.
pub fn hash_with_salt(
    password: &str,
    salt_record: &str,
) -> Result<String, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(salt_record)?;
    let salt = parsed
        .salt
        .ok_or(argon2::password_hash::Error::SaltInvalid(
            InvalidValue::TooShort,
        ))?;
    let params = Params::try_from(&parsed)?;
    Argon2::default()
        .hash_password_customized(
            password.as_bytes(),
            Some(parsed.algorithm),
            parsed.version,
            params,
            salt,
        )
        .map(|h| h.to_string())
}

/// The salt record of a stored hash: the PHC string minus its final hash
/// segment. This is the shape the backend salt function returns.
pub fn salt_record(stored: &str) -> Option<&str> {
    stored.rfind('$').filter(|i| *i > 0).map(|i| &stored[..i])
}

/// Opaque single-use key: 32 random bytes, URL-safe base64, no padding.
pub fn random_key() -> String {
    use base64::Engine;
    use rand::Rng;
    let mut bytes = [0u8; kw_core::RANDOM_KEY_BYTES];
    rand::rng().fill(&mut bytes[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashCost;

    #[test]
    fn hash_and_verify_roundtrip() {
        let stored = hash("opensesame", &HashCost::Minimum.params()).expect("hash");
        assert_eq!(verify("opensesame", &stored), Ok(true));
        assert_eq!(verify("open sesame", &stored), Ok(false));
    }

    #[test]
    fn salts_are_fresh_per_hash() {
        let params = HashCost::Minimum.params();
        let a = hash("opensesame", &params).expect("hash");
        let b = hash("opensesame", &params).expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify("anything", "not-a-phc-string").is_err());
        assert!(verify("anything", "").is_err());
    }

    #[test]
    fn salt_record_recomputes_the_same_hash() {
        let stored = hash("opensesame", &HashCost::Minimum.params()).expect("hash");
        let record = salt_record(&stored).expect("salt record");
        assert_eq!(
            hash_with_salt("opensesame", record).expect("recompute"),
            stored
        );
        assert_ne!(
            hash_with_salt("wrong", record).expect("recompute"),
            stored
        );
    }

    #[test]
    fn salt_record_strips_only_the_hash_segment() {
        let stored = hash("opensesame", &HashCost::Minimum.params()).expect("hash");
        let record = salt_record(&stored).expect("salt record");
        assert!(stored.starts_with(record));
        assert!(record.starts_with("$argon2id$"));
        assert!(!record.is_empty());
        assert!(salt_record("no dollar signs").is_none());
    }

    #[test]
    fn random_keys_are_distinct_and_urlsafe() {
        let a = random_key();
        let b = random_key();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(!a.contains('=') && !a.contains('+') && !a.contains('/'));
    }
}
