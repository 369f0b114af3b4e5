//! Opaque access token generation and hashing.
//!
//! Raw tokens leave the server exactly once, in the login response; only
//! the SHA-256 hash is ever stored or compared.

use std::fmt::Write;

use vestry_core::{AppError, AppResult};

/// Generates a cryptographically random access token and its SHA-256 hash.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
pub fn generate_access_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate access token: {error}")))?;

    let raw_token = bytes
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        });

    let hash = hash_access_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the SHA-256 hash of a token string for storage.
#[must_use]
pub fn hash_access_token(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    let result = hasher.finalize();

    result
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::{generate_access_token, hash_access_token};

    #[test]
    fn generated_token_is_hex_with_matching_hash() {
        let generated = generate_access_token();
        assert!(generated.is_ok());

        let Ok((raw, hash)) = generated else {
            panic!("token generation failed");
        };
        assert_eq!(raw.len(), 64);
        assert!(raw.chars().all(|character| character.is_ascii_hexdigit()));
        assert_eq!(hash_access_token(&raw), hash);
    }

    #[test]
    fn hash_is_deterministic_and_token_specific() {
        assert_eq!(hash_access_token("abc"), hash_access_token("abc"));
        assert_ne!(hash_access_token("abc"), hash_access_token("abd"));
    }
}
