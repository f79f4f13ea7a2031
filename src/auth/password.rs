/// Password Hashing and Verification
///
/// Digest = lowercase hex of SHA-256(secret || password). Deterministic, so a
/// login attempt is checked by recomputing and comparing against the stored
/// value. There is no per-user salt; the single process-wide secret is the
/// only thing mixed in.

use sha2::{Digest, Sha256};

/// Length of every digest produced by `PasswordHasher::hash`
pub const DIGEST_LENGTH: usize = 64;

#[derive(Clone)]
pub struct PasswordHasher {
    secret: Vec<u8>,
}

impl PasswordHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Digest of `password` under this hasher's secret
    pub fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Recompute the digest of `password` and compare it with `stored`.
    ///
    /// The comparison runs in constant time over the digest length.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        constant_time_eq(self.hash(password).as_bytes(), stored.as_bytes())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("secret", &"[redacted]")
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
