//! Password hashing and verification for stored credentials.
//!
//! Wraps bcrypt behind a small capability trait so the hashing primitive can
//! be swapped for a deterministic double in tests.

use crate::errors::{ServiceError, ServiceResult};

/// Bcrypt cost factor applied to every password hash.
///
/// Intentionally low to favor throughput in trusted deployments; the value is
/// a constant so hashing behavior stays reproducible across processes.
pub const HASH_COST: u32 = 4;

/// One-way password hashing capability.
pub trait PasswordCodec: Send + Sync {
    /// Hashes a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> ServiceResult<String>;

    /// Verifies a candidate password against a stored hash.
    ///
    /// A plain mismatch returns `Ok(false)`; only failures of the underlying
    /// primitive (e.g. an unparseable hash) surface as errors.
    fn verify(&self, plaintext: &str, hashed: &str) -> ServiceResult<bool>;
}

/// Production codec backed by the bcrypt crate.
pub struct BcryptCodec;

impl PasswordCodec for BcryptCodec {
    fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        bcrypt::hash(plaintext, HASH_COST)
            .map_err(|e| ServiceError::internal(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> ServiceResult<bool> {
        bcrypt::verify(plaintext, hashed)
            .map_err(|e| ServiceError::internal(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let codec = BcryptCodec;
        let hash = codec.hash("testpassword").unwrap();

        assert!(codec.verify("testpassword", &hash).unwrap());
        assert!(!codec.verify("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_hash_uses_fixed_cost() {
        let codec = BcryptCodec;
        let hash = codec.hash("testpassword").unwrap();

        // Bcrypt encodes the cost in the hash prefix, e.g. "$2b$04$..."
        assert!(hash.contains("$04$"), "unexpected cost in hash: {}", hash);
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        let codec = BcryptCodec;
        let hash1 = codec.hash("samepassword").unwrap();
        let hash2 = codec.hash("samepassword").unwrap();

        // Random salt per hash
        assert_ne!(hash1, hash2);
        assert!(codec.verify("samepassword", &hash1).unwrap());
        assert!(codec.verify("samepassword", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_is_an_error() {
        let codec = BcryptCodec;
        let result = codec.verify("testpassword", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(ServiceError::Internal { .. })));
    }
}
