use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a plaintext password with a fresh random salt. The returned string is
/// the full PHC-format hash, safe to store as-is.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(hash_err)?;
    Ok(hash.to_string())
}

/// Check a candidate against a stored hash. A mismatch is `Ok(false)`; only a
/// malformed stored hash is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(hash_err)?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn hash_err(e: argon2::password_hash::Error) -> anyhow::Error {
    tracing::error!(error = %e, "argon2 failure");
    anyhow::anyhow!(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_accepts_the_original_password() {
        let hash = hash_password("hub-admin-2025!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hub-admin-2025!", &hash).unwrap());
    }

    #[test]
    fn near_miss_candidates_are_rejected() {
        let hash = hash_password("hub-admin-2025!").unwrap();
        assert!(!verify_password("hub-admin-2025", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_salts_differently() {
        let a = hash_password("repeatable").unwrap();
        let b = hash_password("repeatable").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "plaintext-leftover").is_err());
    }
}
