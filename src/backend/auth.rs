//! Login codes and session tokens
//!
//! Codes are six random digits, kept only as Argon2 hashes. Tokens are 32
//! random bytes in URL-safe base64.

use std::sync::Mutex;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use zeroize::Zeroize;

use crate::error::{FinError, FinResult};
use crate::models::AuthToken;

/// Wrong guesses allowed before a code is invalidated
pub const MAX_CODE_ATTEMPTS: u32 = 5;

const TOKEN_BYTES: usize = 32;

/// Largest multiple of 1_000_000 below `u32::MAX`, for unbiased sampling
const CODE_SAMPLE_LIMIT: u32 = 4_294_000_000;

/// Delivers login codes to users
pub trait CodeDelivery: Send + Sync {
    fn deliver(&self, email: &str, code: &str) -> FinResult<()>;
}

/// Prints codes to stderr; used when no mail relay is configured
#[derive(Debug, Default)]
pub struct TerminalDelivery;

impl CodeDelivery for TerminalDelivery {
    fn deliver(&self, email: &str, code: &str) -> FinResult<()> {
        tracing::info!(%email, "delivering login code to terminal");
        eprintln!("Login code for {}: {}", email, code);
        Ok(())
    }
}

/// Keeps delivered codes in memory so callers can read them back
#[derive(Debug, Default)]
pub struct MemoryDelivery {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent code delivered to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().ok()?;
        sent.iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

impl CodeDelivery for MemoryDelivery {
    fn deliver(&self, email: &str, code: &str) -> FinResult<()> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| FinError::Transport(format!("Code outbox unavailable: {}", e)))?;
        sent.push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Generate a uniformly distributed six-digit code
pub fn generate_code() -> String {
    loop {
        let n = OsRng.next_u32();
        if n < CODE_SAMPLE_LIMIT {
            return format!("{:06}", n % 1_000_000);
        }
    }
}

/// Hash a code for storage
pub fn hash_code(code: &str) -> FinResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FinError::Storage(format!("Failed to hash login code: {}", e)))
}

/// Check a code against its stored hash
pub fn code_matches(code: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(code.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generate a fresh session token
pub fn generate_token() -> AuthToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = AuthToken::new(URL_SAFE_NO_PAD.encode(bytes));
    bytes.zeroize();
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_code("123456").unwrap();
        assert_ne!(hash, "123456");
        assert!(code_matches("123456", &hash));
        assert!(!code_matches("654321", &hash));
        assert!(!code_matches("123456", "not-a-hash"));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.expose().len(), 43);
    }

    #[test]
    fn test_memory_delivery() {
        let outbox = MemoryDelivery::new();
        outbox.deliver("a@example.com", "111111").unwrap();
        outbox.deliver("a@example.com", "222222").unwrap();
        assert_eq!(outbox.last_code_for("a@example.com").as_deref(), Some("222222"));
        assert!(outbox.last_code_for("b@example.com").is_none());
    }
}
