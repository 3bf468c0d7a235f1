//! User Password Value Object
//!
//! Stored Argon2id hash plus the policy mapping from `platform::password`.

use kernel::error::{AppError, AppResult, FieldViolation};
use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

/// Password submitted at registration; checked against the policy
pub struct NewPassword(ClearTextPassword);

impl NewPassword {
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw).map(Self).map_err(|e| {
            AppError::validation(vec![FieldViolation::new("password", e.to_string())])
        })
    }
}

/// Hashed password as stored in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_new(password: &NewPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        password
            .0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))
    }

    pub fn from_db(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AppError::internal("Stored password hash is corrupt").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Login attempts are verified without re-applying the policy
    pub fn verify(&self, attempt: String, pepper: Option<&[u8]>) -> bool {
        self.0
            .verify(&ClearTextPassword::for_verification(attempt), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
