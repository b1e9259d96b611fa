//! Authenticated user and credential types

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ids::UserId;

/// Length of an emailed login code
pub const LOGIN_CODE_LEN: usize = 6;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Bearer token issued after a successful code exchange
///
/// The inner string is wiped from memory when dropped and never printed by
/// `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Normalize an email address: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check an email has a non-empty local part and a dotted domain
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(format!("Invalid email address: '{}'", email));
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(format!("Invalid email address: '{}'", email));
    }
    Ok(())
}

/// Check a login code is exactly six ASCII digits
pub fn validate_login_code(code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.len() == LOGIN_CODE_LEN && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(format!("Login code must be {} digits", LOGIN_CODE_LEN))
    }
}

/// Default display name: the local part of the email
pub fn default_name(email: &str) -> String {
    email
        .split_once('@')
        .map(|(local, _)| local.to_string())
        .unwrap_or_else(|| email.to_string())
}
