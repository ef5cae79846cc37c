//! Password hashing and verification.
//!
//! Uses Argon2id with a per-password random salt. Hash and salt are kept
//! as separate byte strings, matching the credential store's columns.

use argon2::password_hash::Output;
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::{OsRng, RngCore};
use serde::Deserialize;

use super::error::AuthError;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// Salt length in bytes.
    pub salt_len: usize,
    /// Derived key length in bytes.
    pub output_len: usize,
    /// Number of iterations.
    pub time_cost: u32,
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            salt_len: 32,
            output_len: 32,
            time_cost: 1,
            memory_kib: 64 * 1024, // 64 MiB
            parallelism: 4,
        }
    }
}

/// A stored password hash with its salt.
///
/// Never leaves the hashing/store boundary; `Debug` is redacted so the
/// bytes cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for PasswordRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordRecord").finish_non_exhaustive()
    }
}

/// Argon2id password hasher.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: HashParams,
}

impl PasswordHasher {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    fn argon2(&self, output_len: usize) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(
            self.params.memory_kib,
            self.params.time_cost,
            self.params.parallelism,
            Some(output_len),
        )
        .map_err(|e| AuthError::Crypto(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Fails only when parameters are invalid or the OS RNG cannot supply
    /// the salt; there is no fallback to a weaker randomness source.
    pub fn hash(&self, password: &str) -> Result<PasswordRecord, AuthError> {
        let mut salt = vec![0u8; self.params.salt_len];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| AuthError::Crypto(e.to_string()))?;

        let mut hash = vec![0u8; self.params.output_len];
        self.argon2(self.params.output_len)?
            .hash_password_into(password.as_bytes(), &salt, &mut hash)
            .map_err(|e| AuthError::Crypto(e.to_string()))?;

        Ok(PasswordRecord { hash, salt })
    }

    /// Verify a password against a stored record.
    ///
    /// Recomputes the derivation with the stored salt and compares in
    /// constant time. A wrong password returns `false`, never an error.
    pub fn verify(&self, password: &str, record: &PasswordRecord) -> bool {
        let Ok(argon2) = self.argon2(record.hash.len()) else {
            return false;
        };

        let mut computed = vec![0u8; record.hash.len()];
        if argon2
            .hash_password_into(password.as_bytes(), &record.salt, &mut computed)
            .is_err()
        {
            return false;
        }

        // Output's equality is constant-time; no early exit per byte.
        match (Output::new(&record.hash), Output::new(&computed)) {
            (Ok(stored), Ok(fresh)) => stored == fresh,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small cost parameters so the suite stays fast.
    fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(HashParams {
            salt_len: 16,
            output_len: 32,
            time_cost: 1,
            memory_kib: 16,
            parallelism: 1,
        })
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = test_hasher();
        let record = hasher.hash("correct horse battery staple").unwrap();
        assert!(hasher.verify("correct horse battery staple", &record));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hasher = test_hasher();
        let record = hasher.hash("password123").unwrap();
        assert!(!hasher.verify("password124", &record));
        assert!(!hasher.verify("", &record));
    }

    #[test]
    fn test_salts_are_unique() {
        let hasher = test_hasher();
        let a = hasher.hash("same password").unwrap();
        let b = hasher.hash("same password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_record_lengths_follow_params() {
        let hasher = test_hasher();
        let record = hasher.hash("pw").unwrap();
        assert_eq!(record.salt.len(), 16);
        assert_eq!(record.hash.len(), 32);
    }

    #[test]
    fn test_debug_is_redacted() {
        let record = PasswordRecord {
            hash: vec![0xAA; 32],
            salt: vec![0xBB; 16],
        };
        let rendered = format!("{record:?}");
        assert!(!rendered.contains("aa"));
        assert!(!rendered.contains("170"));
    }

    #[test]
    fn test_unicode_passwords() {
        let hasher = test_hasher();
        let record = hasher.hash("contraseña-pässwörd-密码").unwrap();
        assert!(hasher.verify("contraseña-pässwörd-密码", &record));
        assert!(!hasher.verify("contraseña-pässwörd", &record));
    }
}
