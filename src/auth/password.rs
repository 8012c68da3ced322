//! Credential hashing. Stored passwords are Argon2 PHC strings; verification
//! goes through `password-auth`, which compares in constant time.

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> String {
    password_auth::generate_hash(password)
}

/// True when `password` matches the stored PHC `hash`. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    password_auth::verify_password(password, hash).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("hunter22");
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("hunter22", "hunter22"));
    }
}
