//! User, login code and session repository

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FinError;
use crate::models::user::default_name;
use crate::models::{User, UserId};

use super::file_io::JsonFile;

/// An outstanding login code, stored only as a hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCode {
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub failed_attempts: u32,
}

/// An issued bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserData {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    codes: Vec<PendingCode>,
    #[serde(default)]
    sessions: Vec<SessionRecord>,
}

/// Repository for users and their credentials
pub struct UserRepository {
    file: JsonFile<UserData>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn load(&self) -> Result<(), FinError> {
        self.file.load()
    }

    pub fn save(&self) -> Result<(), FinError> {
        self.file.save()
    }

    /// Find the user with this (normalized) email, registering it if new
    pub fn find_or_create(&self, email: &str) -> Result<User, FinError> {
        let mut data = self.file.write()?;
        if let Some(user) = data.users.iter().find(|u| u.email == email) {
            return Ok(user.clone());
        }
        data.next_id += 1;
        let user = User {
            id: UserId::new(data.next_id),
            email: email.to_string(),
            name: default_name(email),
        };
        data.users.push(user.clone());
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, FinError> {
        let data = self.file.read()?;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    /// Store a code for `email`, replacing any earlier one
    pub fn put_code(&self, code: PendingCode) -> Result<(), FinError> {
        let mut data = self.file.write()?;
        data.codes.retain(|c| c.email != code.email);
        data.codes.push(code);
        Ok(())
    }

    pub fn get_code(&self, email: &str) -> Result<Option<PendingCode>, FinError> {
        let data = self.file.read()?;
        Ok(data.codes.iter().find(|c| c.email == email).cloned())
    }

    /// Count a wrong guess, returning the new attempt total
    pub fn record_failed_attempt(&self, email: &str) -> Result<u32, FinError> {
        let mut data = self.file.write()?;
        Ok(data
            .codes
            .iter_mut()
            .find(|c| c.email == email)
            .map(|c| {
                c.failed_attempts += 1;
                c.failed_attempts
            })
            .unwrap_or(0))
    }

    pub fn remove_code(&self, email: &str) -> Result<(), FinError> {
        let mut data = self.file.write()?;
        data.codes.retain(|c| c.email != email);
        Ok(())
    }

    pub fn insert_session(&self, session: SessionRecord) -> Result<(), FinError> {
        let mut data = self.file.write()?;
        data.sessions.push(session);
        Ok(())
    }

    pub fn find_session(&self, token: &str) -> Result<Option<SessionRecord>, FinError> {
        let data = self.file.read()?;
        Ok(data.sessions.iter().find(|s| s.token == token).cloned())
    }

    /// Remove a session, returning whether it existed
    pub fn remove_session(&self, token: &str) -> Result<bool, FinError> {
        let mut data = self.file.write()?;
        let before = data.sessions.len();
        data.sessions.retain(|s| s.token != token);
        Ok(data.sessions.len() != before)
    }

    /// Drop expired codes and sessions, returning how many were removed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, FinError> {
        let mut data = self.file.write()?;
        let before = data.codes.len() + data.sessions.len();
        data.codes.retain(|c| c.expires_at > now);
        data.sessions.retain(|s| s.expires_at > now);
        Ok(before - data.codes.len() - data.sessions.len())
    }
}
