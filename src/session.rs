//! Client session
//!
//! Holds the bearer token and the signed-in user. The token is persisted in
//! `session.json` under a fixed key so later invocations stay signed in. Any
//! authentication failure clears it.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{FinError, FinResult};
use crate::models::user::{validate_email, validate_login_code};
use crate::models::{AuthToken, User};
use crate::storage::{read_json, write_json_atomic};

/// Key the token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Persistent key/value storage for the token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> FinResult<Option<AuthToken>> {
        let values: Map<String, Value> = read_json(&self.path)?;
        Ok(values
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new))
    }

    pub fn save(&self, token: &AuthToken) -> FinResult<()> {
        let mut values: Map<String, Value> = read_json(&self.path)?;
        values.insert(TOKEN_KEY.to_string(), Value::String(token.expose().to_string()));
        write_json_atomic(&self.path, &values)
    }

    pub fn clear(&self) -> FinResult<()> {
        let mut values: Map<String, Value> = read_json(&self.path)?;
        if values.remove(TOKEN_KEY).is_some() {
            write_json_atomic(&self.path, &values)?;
        }
        Ok(())
    }
}

/// The signed-in state of this client
#[derive(Debug)]
pub struct Session {
    store: TokenStore,
    token: Option<AuthToken>,
    user: Option<User>,
}

impl Session {
    /// Restore the session persisted in `store`, if any
    pub fn restore(store: TokenStore) -> FinResult<Self> {
        let token = store.load()?;
        Ok(Self {
            store,
            token,
            user: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current token, or `FinError::Auth` when signed out
    pub fn token(&self) -> FinResult<&AuthToken> {
        self.token
            .as_ref()
            .ok_or_else(|| FinError::Auth("Not logged in. Run `fintrack login <email>`".into()))
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Ask the backend to send a login code
    pub fn request_code(backend: &dyn Backend, email: &str) -> FinResult<String> {
        validate_email(email).map_err(FinError::Validation)?;
        Ok(backend.send_code(email)?.message)
    }

    /// Exchange a code for a token and persist it
    pub fn login(&mut self, backend: &dyn Backend, email: &str, code: &str) -> FinResult<User> {
        validate_email(email).map_err(FinError::Validation)?;
        validate_login_code(code).map_err(FinError::Validation)?;

        let auth = backend.verify_code(email, code.trim())?;
        self.store.save(&auth.token)?;
        debug!(user = %auth.user.id, "signed in");
        self.token = Some(auth.token);
        self.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Confirm the stored token with the backend and cache the user
    pub fn refresh_user(&mut self, backend: &dyn Backend) -> FinResult<User> {
        let result = backend.verify_token(self.token()?);
        let user = self.guard(result)?;
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Revoke the token remotely (best effort) and forget it locally
    pub fn logout(&mut self, backend: &dyn Backend) -> FinResult<()> {
        if let Some(token) = &self.token {
            if let Err(e) = backend.revoke_token(token) {
                warn!(error = %e, "failed to revoke session remotely");
            }
        }
        self.clear()
    }

    /// Drop the session after the backend rejected the token
    pub fn force_logout(&mut self) {
        warn!("session rejected by backend, signing out");
        if let Err(e) = self.clear() {
            warn!(error = %e, "failed to clear stored token");
        }
    }

    /// Pass a backend result through, signing out on authentication errors
    pub fn guard<T>(&mut self, result: FinResult<T>) -> FinResult<T> {
        if let Err(e) = &result {
            if e.is_auth() {
                self.force_logout();
            }
        }
        result
    }

    fn clear(&mut self) -> FinResult<()> {
        self.token = None;
        self.user = None;
        self.store.clear()
    }
}
