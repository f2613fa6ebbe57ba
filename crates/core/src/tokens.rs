//! Opaque token generation and hashing.
//!
//! Setup, verification, and password-reset tokens are random alphanumeric
//! strings shown to the user once. Only their SHA-256 hex digest is stored,
//! so a database leak does not expose usable tokens.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a family setup token.
pub const SETUP_TOKEN_LENGTH: usize = 32;

/// Length of email verification and password-reset tokens.
pub const EMAIL_TOKEN_LENGTH: usize = 48;

/// A freshly generated token: plaintext for the user, hash for storage.
pub struct GeneratedToken {
    pub plaintext: String,
    pub hash: String,
}

/// Generate a random alphanumeric token of `length` characters.
pub fn generate_token(length: usize) -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    let hash = hash_token(&plaintext);
    GeneratedToken { plaintext, hash }
}

/// SHA-256 hex digest of a token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
