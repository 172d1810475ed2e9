//! Administrator account model.

use anyhow::Result;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidationErrors;

/// Administrator record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,

    /// Login name, unique across admins.
    pub username: String,

    /// Argon2id password hash.
    #[serde(skip_serializing)]
    pub pass: String,

    /// Username of the admin who created this account.
    pub added_by: Option<String>,

    /// Username of the admin who last edited this account.
    pub updated_by: Option<String>,

    pub created: i64,
    pub changed: i64,
}

/// Registration / edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Validated admin fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminFields {
    pub username: String,
    pub password: String,
}

impl AdminInput {
    pub fn validate(&self) -> Result<AdminFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(&self.username, "Name is Required");
        errors.require(&self.password, "Password is Required");
        if self.password != self.confirm_password {
            errors.push("Passwords do not match");
        }

        errors.finish(AdminFields {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

impl Admin {
    /// Create an account, hashing the password.
    pub fn new(username: &str, password: &str, added_by: Option<&str>) -> Result<Self> {
        let now = chrono::Utc::now().timestamp();
        Ok(Self {
            id: Uuid::now_v7(),
            username: username.to_string(),
            pass: hash_password(password)?,
            added_by: added_by.map(str::to_string),
            updated_by: None,
            created: now,
            changed: now,
        })
    }

    /// Replace username and password, recording who made the edit.
    pub fn apply(&mut self, fields: &AdminFields, editor: &str) -> Result<()> {
        self.username.clone_from(&fields.username);
        self.set_password(&fields.password)?;
        self.updated_by = Some(editor.to_string());
        self.changed = chrono::Utc::now().timestamp();
        Ok(())
    }

    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.pass = hash_password(password)?;
        Ok(())
    }

    /// Verify a password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.pass.is_empty() {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.pass) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
